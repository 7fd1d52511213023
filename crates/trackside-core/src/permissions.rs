//! # Capabilities & Staff Context
//!
//! Enum-keyed permission checks. Every guarded route names a [`Capability`];
//! a staff member's effective set is their role's base set unioned with the
//! per-staff grants persisted in the database. No string lookups anywhere.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::types::StaffRole;

// =============================================================================
// Capability
// =============================================================================

/// One grantable permission. Stored per staff member as rows in
/// `staff_capabilities` (PostgreSQL enum `capability`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "capability", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Capability {
    MakeSale,
    ViewCustomerBasic,
    ManageCustomers,
    ManagePrices,
    ManageOffers,
    ViewExpenses,
    EditExpenses,
    ViewInventory,
    EditInventory,
    ViewInvestments,
    EditInvestments,
    ManageTasks,
    ViewAudit,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 13] = [
        Capability::MakeSale,
        Capability::ViewCustomerBasic,
        Capability::ManageCustomers,
        Capability::ManagePrices,
        Capability::ManageOffers,
        Capability::ViewExpenses,
        Capability::EditExpenses,
        Capability::ViewInventory,
        Capability::EditInventory,
        Capability::ViewInvestments,
        Capability::EditInvestments,
        Capability::ManageTasks,
        Capability::ViewAudit,
    ];

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

// =============================================================================
// CapabilitySet
// =============================================================================

/// A set of capabilities packed into a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    pub const fn empty() -> Self {
        CapabilitySet(0)
    }

    pub const fn all() -> Self {
        // 13 capabilities → low 13 bits set.
        CapabilitySet((1 << Capability::ALL.len()) - 1)
    }

    pub const fn with(self, capability: Capability) -> Self {
        CapabilitySet(self.0 | capability.bit())
    }

    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub const fn union(self, other: CapabilitySet) -> Self {
        CapabilitySet(self.0 | other.0)
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Capabilities present in this set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::empty();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

impl StaffRole {
    /// The capabilities a role holds before per-staff grants are applied.
    pub fn base_capabilities(self) -> CapabilitySet {
        match self {
            StaffRole::MainAdmin => CapabilitySet::all(),
            // Secondary admins start empty; everything comes from grants.
            StaffRole::SecondaryAdmin => CapabilitySet::empty(),
            StaffRole::Staff => CapabilitySet::empty()
                .with(Capability::MakeSale)
                .with(Capability::ViewCustomerBasic),
        }
    }
}

// =============================================================================
// StaffContext
// =============================================================================

/// The authenticated staff member attached to a request.
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub staff_id: Uuid,
    pub full_name: String,
    pub role: StaffRole,
    /// Per-staff grants loaded from `staff_capabilities`.
    pub grants: CapabilitySet,
}

impl StaffContext {
    /// Effective set: role base unioned with persisted grants.
    pub fn capabilities(&self) -> CapabilitySet {
        self.role.base_capabilities().union(self.grants)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    pub fn is_main_admin(&self) -> bool {
        self.role == StaffRole::MainAdmin
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: StaffRole, grants: CapabilitySet) -> StaffContext {
        StaffContext {
            staff_id: Uuid::new_v4(),
            full_name: "Test Staff".to_string(),
            role,
            grants,
        }
    }

    #[test]
    fn test_main_admin_holds_everything() {
        let ctx = context(StaffRole::MainAdmin, CapabilitySet::empty());
        for capability in Capability::ALL {
            assert!(ctx.can(capability), "main admin missing {capability:?}");
        }
    }

    #[test]
    fn test_staff_base_set() {
        let ctx = context(StaffRole::Staff, CapabilitySet::empty());
        assert!(ctx.can(Capability::MakeSale));
        assert!(ctx.can(Capability::ViewCustomerBasic));
        assert!(!ctx.can(Capability::ViewExpenses));
        assert!(!ctx.can(Capability::ManagePrices));
        assert!(!ctx.is_main_admin());
    }

    #[test]
    fn test_secondary_admin_needs_grants() {
        let ungranted = context(StaffRole::SecondaryAdmin, CapabilitySet::empty());
        assert!(!ungranted.can(Capability::ViewExpenses));

        let granted = context(
            StaffRole::SecondaryAdmin,
            CapabilitySet::empty().with(Capability::ViewExpenses),
        );
        assert!(granted.can(Capability::ViewExpenses));
        assert!(!granted.can(Capability::EditExpenses));
    }

    #[test]
    fn test_set_operations() {
        let mut set = CapabilitySet::empty();
        assert!(set.is_empty());

        set.insert(Capability::ManageTasks);
        set.insert(Capability::ManageTasks);
        assert!(set.contains(Capability::ManageTasks));
        assert!(!set.contains(Capability::ViewAudit));

        let other = CapabilitySet::empty().with(Capability::ViewAudit);
        let both = set.union(other);
        assert!(both.contains(Capability::ManageTasks));
        assert!(both.contains(Capability::ViewAudit));
    }

    #[test]
    fn test_all_is_exhaustive() {
        let set = CapabilitySet::all();
        for capability in Capability::ALL {
            assert!(set.contains(capability));
        }
        assert_eq!(Capability::ALL.iter().copied().collect::<CapabilitySet>(), set);
    }

    #[test]
    fn test_iter_round_trips() {
        let set = CapabilitySet::empty()
            .with(Capability::MakeSale)
            .with(Capability::EditInventory);
        let collected: Vec<Capability> = set.iter().collect();
        assert_eq!(
            collected,
            vec![Capability::MakeSale, Capability::EditInventory]
        );
    }

    #[test]
    fn test_capability_serde_snake_case() {
        let json = serde_json::to_string(&Capability::ViewCustomerBasic).unwrap();
        assert_eq!(json, "\"view_customer_basic\"");
        let parsed: Capability = serde_json::from_str("\"manage_prices\"").unwrap();
        assert_eq!(parsed, Capability::ManagePrices);
    }
}
