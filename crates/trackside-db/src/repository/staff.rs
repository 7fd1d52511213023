//! # Staff Repository
//!
//! Staff reference data and capability grants. Credential management lives
//! with the identity service; this repository only serves what the API needs
//! at request time:
//!
//! - the staff row behind a verified token (`get`),
//! - the per-staff capability grants (`capabilities`),
//! - the active-staff list for task assignment (`assignees`).
//!
//! Role base sets are not stored here. `StaffContext::capabilities()` unions
//! the role's base set with the grants this repository loads, so a main admin
//! with zero grant rows still holds everything.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use trackside_core::{Assignee, Capability, CapabilitySet, Staff, StaffRole};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::default_true;

/// Fields accepted when creating a staff record.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffInput {
    pub username: String,
    pub full_name: String,
    pub role: StaffRole,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Repository for staff rows and capability grants.
#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches a staff member by id.
    ///
    /// Returns `Ok(None)` for unknown ids rather than an error: the auth
    /// extractor treats a token whose subject no longer exists as a plain
    /// 401, not a server fault.
    pub async fn get(&self, id: Uuid) -> DbResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT id, username, full_name, role, email, phone, is_active,
                    created_at, updated_at
             FROM staff
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Loads the explicit capability grants for one staff member.
    ///
    /// Only the persisted grant rows; the caller unions these with the
    /// role's base set.
    pub async fn capabilities(&self, staff_id: Uuid) -> DbResult<CapabilitySet> {
        let grants = sqlx::query_scalar::<_, Capability>(
            "SELECT capability FROM staff_capabilities WHERE staff_id = $1",
        )
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(grants.into_iter().collect())
    }

    /// Active staff members who can be assigned tasks, ordered by name.
    pub async fn assignees(&self) -> DbResult<Vec<Assignee>> {
        let assignees = sqlx::query_as::<_, Assignee>(
            "SELECT id, full_name, role
             FROM staff
             WHERE is_active = true
             ORDER BY full_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assignees)
    }

    /// Creates a staff record.
    pub async fn create(&self, input: &StaffInput) -> DbResult<Staff> {
        let id = Uuid::new_v4();

        let staff = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (id, username, full_name, role, email, phone, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, username, full_name, role, email, phone, is_active,
                       created_at, updated_at",
        )
        .bind(id)
        .bind(&input.username)
        .bind(&input.full_name)
        .bind(input.role)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %staff.id, username = %staff.username, "staff created");
        Ok(staff)
    }

    /// Replaces a staff member's grant rows with the given set.
    pub async fn replace_grants(&self, staff_id: Uuid, grants: CapabilitySet) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM staff_capabilities WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&mut *tx)
            .await?;

        for capability in grants.iter() {
            sqlx::query(
                "INSERT INTO staff_capabilities (staff_id, capability) VALUES ($1, $2)",
            )
            .bind(staff_id)
            .bind(capability)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(staff_id = %staff_id, "capability grants replaced");
        Ok(())
    }
}
