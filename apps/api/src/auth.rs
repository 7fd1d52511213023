//! JWT verification and the authenticated-staff extractor.
//!
//! Token issuance lives in an external identity service; this module only
//! verifies bearer tokens and resolves them to a [`StaffContext`].
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! extract_bearer_token ──► JwtVerifier::verify (signature + expiry)
//!        │
//!        ▼
//! staff row loaded fresh (unknown / inactive → 401)
//!        │
//!        ▼
//! CurrentStaff(StaffContext { staff_id, full_name, role, grants })
//! ```
//!
//! Role and grants are loaded from the database on every request rather than
//! trusted from the token, so a revoked grant takes effect immediately.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trackside_core::{Capability, CapabilitySet, StaffContext, StaffRole};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
///
/// `sub` carries the staff id; everything else about the caller is loaded
/// from the staff table at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (staff id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verifies bearer tokens against the shared HS256 secret.
#[derive(Clone)]
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    /// Create a new verifier.
    pub fn new(secret: impl Into<String>) -> Self {
        JwtVerifier {
            secret: secret.into(),
        }
    }

    /// Validate and decode a token.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    if auth_header.starts_with("Bearer ") {
        Some(&auth_header[7..])
    } else {
        None
    }
}

/// Fails with 403 unless the staff member holds the capability.
pub fn require(ctx: &StaffContext, capability: Capability) -> Result<(), ApiError> {
    if ctx.can(capability) {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

/// The authenticated staff member, extracted from the bearer token.
///
/// ## Usage in Handlers
/// ```rust,ignore
/// async fn create_expense(
///     State(state): State<AppState>,
///     CurrentStaff(ctx): CurrentStaff,
///     Json(input): Json<ExpenseInput>,
/// ) -> ApiResult<Json<Expense>> {
///     require(&ctx, Capability::EditExpenses)?;
///     // ...
/// }
/// ```
pub struct CurrentStaff(pub StaffContext);

impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let token = extract_bearer_token(auth_header)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = state.verifier.verify(token)?;

        let staff_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        // A valid signature over a deleted staff row is still a dead token.
        let staff = state
            .db
            .staff()
            .get(staff_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        if !staff.is_active {
            return Err(ApiError::unauthorized("Account is inactive"));
        }

        // Only secondary admins carry persisted grants; main admin and staff
        // capability sets are implied by the role.
        let grants = match staff.role {
            StaffRole::SecondaryAdmin => state.db.staff().capabilities(staff.id).await?,
            StaffRole::MainAdmin | StaffRole::Staff => CapabilitySet::empty(),
        };

        Ok(CurrentStaff(StaffContext {
            staff_id: staff.id,
            full_name: staff.full_name,
            role: staff.role,
            grants,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, sub: &str, lifetime_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now,
            exp: now + lifetime_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_jwt_roundtrip() {
        let verifier = JwtVerifier::new("test-secret");
        let staff_id = Uuid::new_v4();

        let token = make_token("test-secret", &staff_id.to_string(), 3600);
        let claims = verifier.verify(&token).unwrap();

        assert_eq!(claims.sub, staff_id.to_string());
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = JwtVerifier::new("test-secret");

        // Well past the default leeway window.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = verifier.verify(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = JwtVerifier::new("test-secret");
        let token = make_token("other-secret", &Uuid::new_v4().to_string(), 3600);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let verifier = JwtVerifier::new("test-secret");
        assert!(verifier.verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_require_checks_capability() {
        let ctx = StaffContext {
            staff_id: Uuid::new_v4(),
            full_name: "Till Operator".to_string(),
            role: StaffRole::Staff,
            grants: CapabilitySet::empty(),
        };

        assert!(require(&ctx, Capability::MakeSale).is_ok());

        let err = require(&ctx, Capability::ViewExpenses).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
