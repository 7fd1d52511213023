//! # Sale Pricing Engine
//!
//! Pure pricing for the three line families of a sale. The database layer
//! resolves catalog snapshots inside the sale transaction and hands them
//! here; this module never performs I/O, so every rupee of the contract
//! is testable without a database.
//!
//! ## Pricing Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sale Pricing                                     │
//! │                                                                         │
//! │  SERVICE line:    total = base_price × qty − line_discount             │
//! │                   → joins total_amount                                  │
//! │                                                                         │
//! │  PACKAGE line:    total = base_price × qty − line_discount             │
//! │                   → joins total_amount                                  │
//! │                   then EXPANDS: each configured menu item becomes a    │
//! │                   menu line with qty = item_qty × package_qty,         │
//! │                   tax = price × qty × rate, total = price × qty + tax. │
//! │                   Expanded lines carry source_package_id and are       │
//! │                   EXCLUDED from header totals (the package base price  │
//! │                   already covers them).                                 │
//! │                                                                         │
//! │  MENU line:       pre_tax = price × qty − line_discount                │
//! │                   tax     = pre_tax × rate                             │
//! │                   total   = pre_tax + tax                              │
//! │                   → pre_tax joins total_amount, tax joins tax_amount   │
//! │                                                                         │
//! │  HEADER:          final = total_amount + tax_amount − header_discount  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, TaxRate};

// =============================================================================
// Request Types
// =============================================================================

fn default_quantity() -> i32 {
    1
}

/// The POST /sales payload. Line arrays default to empty and quantities
/// to 1, so clients only send what they use.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    #[ts(as = "Option<String>")]
    pub customer_id: Option<Uuid>,
    /// Optional here so a missing method surfaces as a validation error,
    /// not a deserialization rejection.
    pub payment_method: Option<PaymentMethod>,
    /// Header-level discount, applied after tax.
    #[serde(default)]
    pub discount_amount: Money,
    pub notes: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceLineRequest>,
    #[serde(default)]
    pub packages: Vec<PackageLineRequest>,
    #[serde(default)]
    pub menu_items: Vec<MenuLineRequest>,
}

/// One requested service line.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct ServiceLineRequest {
    #[ts(as = "String")]
    pub service_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub discount_amount: Money,
    #[ts(as = "Option<String>")]
    pub track_id: Option<Uuid>,
    #[ts(as = "Option<String>")]
    pub car_id: Option<Uuid>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// One requested package line.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct PackageLineRequest {
    #[ts(as = "String")]
    pub package_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub discount_amount: Money,
    #[ts(as = "Option<String>")]
    pub track_id: Option<Uuid>,
    #[ts(as = "Option<String>")]
    pub car_id: Option<Uuid>,
}

/// One requested direct menu-item line.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct MenuLineRequest {
    #[ts(as = "String")]
    pub menu_item_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub discount_amount: Money,
}

// =============================================================================
// Catalog Snapshots
// =============================================================================

/// Price data for one service as read inside the sale transaction.
#[derive(Debug, Clone, Copy)]
pub struct ServiceSnapshot {
    pub base_price: Money,
}

/// Price data for one menu item as read inside the sale transaction.
#[derive(Debug, Clone, Copy)]
pub struct MenuItemSnapshot {
    pub price: Money,
    pub tax_rate: TaxRate,
}

/// One configured menu item on a package.
#[derive(Debug, Clone, Copy)]
pub struct PackageItemSnapshot {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Money,
    pub tax_rate: TaxRate,
}

/// Price data and item configuration for one package.
#[derive(Debug, Clone)]
pub struct PackageSnapshot {
    pub base_price: Money,
    pub items: Vec<PackageItemSnapshot>,
}

/// Everything the pricing engine needs about the catalog, keyed by id.
/// Only ids the request references need to be present.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub services: HashMap<Uuid, ServiceSnapshot>,
    pub packages: HashMap<Uuid, PackageSnapshot>,
    pub menu_items: HashMap<Uuid, MenuItemSnapshot>,
}

// =============================================================================
// Priced Output
// =============================================================================

/// A priced service line, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedServiceLine {
    pub service_id: Uuid,
    pub track_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub total_price: Money,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// A priced package line, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedPackageLine {
    pub package_id: Uuid,
    pub track_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub total_price: Money,
}

/// A priced menu line, direct or package-expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedMenuLine {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total_price: Money,
    /// Set when this line was expanded from a package; such lines are
    /// excluded from the header totals.
    pub source_package_id: Option<Uuid>,
}

/// The fully priced sale: header totals plus every line row.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedSale {
    /// Sum of pre-tax totals of directly ordered lines.
    pub total_amount: Money,
    /// Sum of direct menu-line taxes.
    pub tax_amount: Money,
    /// Header-level discount (echoed from the request).
    pub discount_amount: Money,
    /// `total_amount + tax_amount - discount_amount`.
    pub final_amount: Money,
    pub service_lines: Vec<PricedServiceLine>,
    pub package_lines: Vec<PricedPackageLine>,
    pub menu_lines: Vec<PricedMenuLine>,
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a sale request against catalog snapshots.
///
/// The request must already have passed
/// [`validate_sale_request`](crate::validation::validate_sale_request);
/// this function only fails when a referenced catalog id is missing from
/// the snapshot, which inside the sale transaction aborts the whole sale.
pub fn price_sale(req: &SaleRequest, catalog: &CatalogSnapshot) -> CoreResult<PricedSale> {
    let mut total_amount = Money::zero();
    let mut tax_amount = Money::zero();

    let mut service_lines = Vec::with_capacity(req.services.len());
    let mut package_lines = Vec::with_capacity(req.packages.len());
    let mut menu_lines = Vec::new();

    for line in &req.services {
        let snapshot = catalog
            .services
            .get(&line.service_id)
            .ok_or(CoreError::ServiceNotFound(line.service_id))?;

        let total_price = snapshot.base_price * line.quantity - line.discount_amount;
        total_amount += total_price;

        service_lines.push(PricedServiceLine {
            service_id: line.service_id,
            track_id: line.track_id,
            car_id: line.car_id,
            quantity: line.quantity,
            unit_price: snapshot.base_price,
            discount_amount: line.discount_amount,
            total_price,
            duration_minutes: line.duration_minutes,
            notes: line.notes.clone(),
        });
    }

    for line in &req.packages {
        let snapshot = catalog
            .packages
            .get(&line.package_id)
            .ok_or(CoreError::PackageNotFound(line.package_id))?;

        let total_price = snapshot.base_price * line.quantity - line.discount_amount;
        total_amount += total_price;

        package_lines.push(PricedPackageLine {
            package_id: line.package_id,
            track_id: line.track_id,
            car_id: line.car_id,
            quantity: line.quantity,
            unit_price: snapshot.base_price,
            discount_amount: line.discount_amount,
            total_price,
        });

        // Expansion: each configured item becomes its own menu line so the
        // kitchen sees real quantities. Covered by the package base price,
        // so none of it joins the header totals.
        for item in &snapshot.items {
            let quantity = item.quantity * line.quantity;
            let pre_tax = item.unit_price * quantity;
            let item_tax = pre_tax.calculate_tax(item.tax_rate);

            menu_lines.push(PricedMenuLine {
                menu_item_id: item.menu_item_id,
                quantity,
                unit_price: item.unit_price,
                discount_amount: Money::zero(),
                tax_rate: item.tax_rate,
                tax_amount: item_tax,
                total_price: pre_tax + item_tax,
                source_package_id: Some(line.package_id),
            });
        }
    }

    for line in &req.menu_items {
        let snapshot = catalog
            .menu_items
            .get(&line.menu_item_id)
            .ok_or(CoreError::MenuItemNotFound(line.menu_item_id))?;

        let pre_tax = snapshot.price * line.quantity - line.discount_amount;
        let item_tax = pre_tax.calculate_tax(snapshot.tax_rate);

        total_amount += pre_tax;
        tax_amount += item_tax;

        menu_lines.push(PricedMenuLine {
            menu_item_id: line.menu_item_id,
            quantity: line.quantity,
            unit_price: snapshot.price,
            discount_amount: line.discount_amount,
            tax_rate: snapshot.tax_rate,
            tax_amount: item_tax,
            total_price: pre_tax + item_tax,
            source_package_id: None,
        });
    }

    let final_amount = total_amount + tax_amount - req.discount_amount;

    Ok(PricedSale {
        total_amount,
        tax_amount,
        discount_amount: req.discount_amount,
        final_amount,
        service_lines,
        package_lines,
        menu_lines,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_request() -> SaleRequest {
        SaleRequest {
            customer_id: None,
            payment_method: Some(PaymentMethod::Cash),
            discount_amount: Money::zero(),
            notes: None,
            services: vec![],
            packages: vec![],
            menu_items: vec![],
        }
    }

    fn service_line(id: Uuid, quantity: i32, discount: i64) -> ServiceLineRequest {
        ServiceLineRequest {
            service_id: id,
            quantity,
            discount_amount: Money::from_paise(discount),
            track_id: None,
            car_id: None,
            duration_minutes: None,
            notes: None,
        }
    }

    /// Menu item at ₹100.00 with 10% tax, quantity 2:
    /// total 200.00, tax 20.00, final 220.00.
    #[test]
    fn test_direct_menu_line_tax() {
        let item_id = Uuid::new_v4();
        let mut catalog = CatalogSnapshot::default();
        catalog.menu_items.insert(
            item_id,
            MenuItemSnapshot {
                price: Money::from_paise(10000),
                tax_rate: TaxRate::from_bps(1000),
            },
        );

        let mut req = empty_request();
        req.menu_items.push(MenuLineRequest {
            menu_item_id: item_id,
            quantity: 2,
            discount_amount: Money::zero(),
        });

        let priced = price_sale(&req, &catalog).unwrap();
        assert_eq!(priced.total_amount, Money::from_paise(20000));
        assert_eq!(priced.tax_amount, Money::from_paise(2000));
        assert_eq!(priced.final_amount, Money::from_paise(22000));

        assert_eq!(priced.menu_lines.len(), 1);
        let line = &priced.menu_lines[0];
        assert_eq!(line.tax_amount, Money::from_paise(2000));
        assert_eq!(line.total_price, Money::from_paise(22000));
        assert_eq!(line.source_package_id, None);
    }

    /// Service at ₹500.00, line discount ₹50.00, header discount ₹20.00:
    /// total 450.00, tax 0, final 430.00.
    #[test]
    fn test_service_line_with_discounts() {
        let service_id = Uuid::new_v4();
        let mut catalog = CatalogSnapshot::default();
        catalog.services.insert(
            service_id,
            ServiceSnapshot {
                base_price: Money::from_paise(50000),
            },
        );

        let mut req = empty_request();
        req.discount_amount = Money::from_paise(2000);
        req.services.push(service_line(service_id, 1, 5000));

        let priced = price_sale(&req, &catalog).unwrap();
        assert_eq!(priced.total_amount, Money::from_paise(45000));
        assert_eq!(priced.tax_amount, Money::zero());
        assert_eq!(priced.final_amount, Money::from_paise(43000));
        assert_eq!(priced.service_lines[0].total_price, Money::from_paise(45000));
    }

    /// A package with two configured items bought at quantity 3 expands
    /// into two menu lines at multiplied quantities, none of which touch
    /// the header totals.
    #[test]
    fn test_package_expansion() {
        let package_id = Uuid::new_v4();
        let burger = Uuid::new_v4();
        let cola = Uuid::new_v4();

        let mut catalog = CatalogSnapshot::default();
        catalog.packages.insert(
            package_id,
            PackageSnapshot {
                base_price: Money::from_paise(100000), // ₹1000.00
                items: vec![
                    PackageItemSnapshot {
                        menu_item_id: burger,
                        quantity: 2,
                        unit_price: Money::from_paise(15000),
                        tax_rate: TaxRate::from_bps(1000),
                    },
                    PackageItemSnapshot {
                        menu_item_id: cola,
                        quantity: 1,
                        unit_price: Money::from_paise(5000),
                        tax_rate: TaxRate::zero(),
                    },
                ],
            },
        );

        let mut req = empty_request();
        req.packages.push(PackageLineRequest {
            package_id,
            quantity: 3,
            discount_amount: Money::zero(),
            track_id: None,
            car_id: None,
        });

        let priced = price_sale(&req, &catalog).unwrap();

        // Header: only the package base price counts.
        assert_eq!(priced.total_amount, Money::from_paise(300000));
        assert_eq!(priced.tax_amount, Money::zero());
        assert_eq!(priced.final_amount, Money::from_paise(300000));

        assert_eq!(priced.package_lines.len(), 1);
        assert_eq!(priced.menu_lines.len(), 2);

        let burger_line = priced
            .menu_lines
            .iter()
            .find(|l| l.menu_item_id == burger)
            .unwrap();
        assert_eq!(burger_line.quantity, 6); // 2 × 3
        assert_eq!(burger_line.source_package_id, Some(package_id));
        // 6 × ₹150.00 = ₹900.00 pre-tax, 10% tax = ₹90.00
        assert_eq!(burger_line.tax_amount, Money::from_paise(9000));
        assert_eq!(burger_line.total_price, Money::from_paise(99000));

        let cola_line = priced
            .menu_lines
            .iter()
            .find(|l| l.menu_item_id == cola)
            .unwrap();
        assert_eq!(cola_line.quantity, 3);
        assert!(cola_line.tax_amount.is_zero());
    }

    /// Direct menu pre-tax and package totals both join total_amount;
    /// only direct menu tax joins tax_amount.
    #[test]
    fn test_mixed_sale_totals() {
        let service_id = Uuid::new_v4();
        let package_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();

        let mut catalog = CatalogSnapshot::default();
        catalog.services.insert(
            service_id,
            ServiceSnapshot {
                base_price: Money::from_paise(30000),
            },
        );
        catalog.packages.insert(
            package_id,
            PackageSnapshot {
                base_price: Money::from_paise(50000),
                items: vec![PackageItemSnapshot {
                    menu_item_id: item_id,
                    quantity: 1,
                    unit_price: Money::from_paise(10000),
                    tax_rate: TaxRate::from_bps(1000),
                }],
            },
        );
        catalog.menu_items.insert(
            item_id,
            MenuItemSnapshot {
                price: Money::from_paise(10000),
                tax_rate: TaxRate::from_bps(1000),
            },
        );

        let mut req = empty_request();
        req.services.push(service_line(service_id, 2, 0));
        req.packages.push(PackageLineRequest {
            package_id,
            quantity: 1,
            discount_amount: Money::from_paise(5000),
            track_id: None,
            car_id: None,
        });
        req.menu_items.push(MenuLineRequest {
            menu_item_id: item_id,
            quantity: 1,
            discount_amount: Money::zero(),
        });

        let priced = price_sale(&req, &catalog).unwrap();

        // services 60000 + package (50000 - 5000) + menu pre-tax 10000
        assert_eq!(priced.total_amount, Money::from_paise(115000));
        // only the direct menu line's tax
        assert_eq!(priced.tax_amount, Money::from_paise(1000));
        assert_eq!(priced.final_amount, Money::from_paise(116000));

        // one expanded + one direct menu line
        assert_eq!(priced.menu_lines.len(), 2);
        assert_eq!(
            priced
                .menu_lines
                .iter()
                .filter(|l| l.source_package_id.is_some())
                .count(),
            1
        );
    }

    /// Tax on a discounted menu line is computed on the discounted amount.
    #[test]
    fn test_menu_discount_before_tax() {
        let item_id = Uuid::new_v4();
        let mut catalog = CatalogSnapshot::default();
        catalog.menu_items.insert(
            item_id,
            MenuItemSnapshot {
                price: Money::from_paise(10000),
                tax_rate: TaxRate::from_bps(1000),
            },
        );

        let mut req = empty_request();
        req.menu_items.push(MenuLineRequest {
            menu_item_id: item_id,
            quantity: 1,
            discount_amount: Money::from_paise(2000),
        });

        let priced = price_sale(&req, &catalog).unwrap();
        // pre_tax 8000, tax 800
        assert_eq!(priced.total_amount, Money::from_paise(8000));
        assert_eq!(priced.tax_amount, Money::from_paise(800));
        assert_eq!(priced.final_amount, Money::from_paise(8800));
    }

    /// Half-paisa tax boundaries round up.
    #[test]
    fn test_tax_rounding_half_up() {
        let item_id = Uuid::new_v4();
        let mut catalog = CatalogSnapshot::default();
        catalog.menu_items.insert(
            item_id,
            MenuItemSnapshot {
                price: Money::from_paise(125), // ₹1.25 at 10% → 12.5 paise
                tax_rate: TaxRate::from_bps(1000),
            },
        );

        let mut req = empty_request();
        req.menu_items.push(MenuLineRequest {
            menu_item_id: item_id,
            quantity: 1,
            discount_amount: Money::zero(),
        });

        let priced = price_sale(&req, &catalog).unwrap();
        assert_eq!(priced.tax_amount, Money::from_paise(13));
    }

    #[test]
    fn test_missing_service_aborts() {
        let mut req = empty_request();
        req.services.push(service_line(Uuid::new_v4(), 1, 0));

        let err = price_sale(&req, &CatalogSnapshot::default()).unwrap_err();
        assert!(matches!(err, CoreError::ServiceNotFound(_)));
    }

    #[test]
    fn test_missing_package_aborts() {
        let mut req = empty_request();
        req.packages.push(PackageLineRequest {
            package_id: Uuid::new_v4(),
            quantity: 1,
            discount_amount: Money::zero(),
            track_id: None,
            car_id: None,
        });

        let err = price_sale(&req, &CatalogSnapshot::default()).unwrap_err();
        assert!(matches!(err, CoreError::PackageNotFound(_)));
    }

    #[test]
    fn test_missing_menu_item_aborts() {
        let mut req = empty_request();
        req.menu_items.push(MenuLineRequest {
            menu_item_id: Uuid::new_v4(),
            quantity: 1,
            discount_amount: Money::zero(),
        });

        let err = price_sale(&req, &CatalogSnapshot::default()).unwrap_err();
        assert!(matches!(err, CoreError::MenuItemNotFound(_)));
    }

    /// serde defaults: missing arrays and quantities deserialize cleanly.
    #[test]
    fn test_request_deserialization_defaults() {
        let json = r#"{
            "payment_method": "upi",
            "menu_items": [{"menu_item_id": "550e8400-e29b-41d4-a716-446655440000"}]
        }"#;

        let req: SaleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.payment_method, Some(PaymentMethod::Upi));
        assert!(req.services.is_empty());
        assert!(req.packages.is_empty());
        assert_eq!(req.menu_items[0].quantity, 1);
        assert!(req.discount_amount.is_zero());
    }
}
