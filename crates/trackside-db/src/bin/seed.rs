//! # Seed Data Generator
//!
//! Populates the database with demo catalog data for development.
//!
//! ## Usage
//! ```bash
//! # Use DATABASE_URL from the environment
//! cargo run -p trackside-db --bin seed
//!
//! # Specify the database explicitly
//! cargo run -p trackside-db --bin seed -- --db postgres://localhost/trackside
//! ```
//!
//! ## Generated Data
//! The initial migration already creates the four tracks and the main
//! admin account. On top of that this binary adds:
//! - A secondary admin (with expense/price/task grants) and a till operator
//! - RC cars attached to the seeded tracks
//! - Track-session and rental services
//! - A café menu across three categories
//! - Two packages bundling a session with menu items
//! - A couple of walk-in customers

use std::env;

use trackside_core::{Capability, CapabilitySet, Money, ServiceKind, StaffRole, TaxRate};
use trackside_db::{
    CarInput, CustomerInput, Database, DbConfig, MenuItemInput, PackageInput, PackageItemInput,
    ServiceInput, StaffInput,
};

/// 5% GST, the rate applied to prepared café items.
const GST_FOOD_BPS: i32 = 500;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| String::from("postgres://localhost/trackside"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    database_url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Trackside POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <URL>    Database URL (default: $DATABASE_URL)");
                println!("  -h, --help        Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Trackside POS Seed Data Generator");
    println!("====================================");
    println!("Database: {}", database_url);
    println!();

    // Connect to database
    let config = DbConfig::new(&database_url);
    let db = Database::connect(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check for existing catalog data
    let existing = db.services().list().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} services", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Seeding staff...");

    let manager = db
        .staff()
        .create(&StaffInput {
            username: "meera".to_string(),
            full_name: "Meera Pillai".to_string(),
            role: StaffRole::SecondaryAdmin,
            email: Some("meera@trackside.example".to_string()),
            phone: Some("9884010001".to_string()),
            is_active: true,
        })
        .await?;
    db.staff()
        .replace_grants(
            manager.id,
            CapabilitySet::empty()
                .with(Capability::ManagePrices)
                .with(Capability::ViewExpenses)
                .with(Capability::EditExpenses)
                .with(Capability::ManageTasks),
        )
        .await?;

    db.staff()
        .create(&StaffInput {
            username: "arjun".to_string(),
            full_name: "Arjun Nair".to_string(),
            role: StaffRole::Staff,
            email: None,
            phone: Some("9884010002".to_string()),
            is_active: true,
        })
        .await?;

    println!("✓ Seeded 2 staff members");

    println!();
    println!("Seeding cars...");

    let tracks = db.tracks().list().await?;
    let track_id = |name: &str| tracks.iter().find(|t| t.name == name).map(|t| t.id);

    let cars = [
        CarInput {
            name: "Rustler VXL".to_string(),
            model: Some("Traxxas Rustler 4x4".to_string()),
            track_id: track_id("Racing Track"),
            china_rate_usd: Some(Money::from_paise(18_500)),
            indian_conversion: Some(83.2),
            shipping_cost: Some(Money::from_rupees(2_400, 0)),
            total_cost: Some(Money::from_rupees(17_800, 0)),
            our_rate: Some(Money::from_rupees(21_000, 0)),
            rate_difference: Some(Money::from_rupees(3_200, 0)),
            hourly_charge: Some(Money::from_rupees(1_200, 0)),
            max_minutes: Some(60),
            play_minutes: Some(15),
            available_units: 4,
            total_units: 4,
            is_active: true,
        },
        CarInput {
            name: "Typhon 6S".to_string(),
            model: Some("Arrma Typhon".to_string()),
            track_id: track_id("Mud Track"),
            china_rate_usd: Some(Money::from_paise(24_900)),
            indian_conversion: Some(83.2),
            shipping_cost: Some(Money::from_rupees(2_900, 0)),
            total_cost: Some(Money::from_rupees(23_600, 0)),
            our_rate: Some(Money::from_rupees(27_500, 0)),
            rate_difference: Some(Money::from_rupees(3_900, 0)),
            hourly_charge: Some(Money::from_rupees(1_500, 0)),
            max_minutes: Some(45),
            play_minutes: Some(15),
            available_units: 2,
            total_units: 3,
            is_active: true,
        },
        CarInput {
            name: "SCX10 Crawler".to_string(),
            model: Some("Axial SCX10 III".to_string()),
            track_id: track_id("Crawler Track"),
            china_rate_usd: None,
            indian_conversion: None,
            shipping_cost: None,
            total_cost: None,
            our_rate: None,
            rate_difference: None,
            hourly_charge: Some(Money::from_rupees(900, 0)),
            max_minutes: Some(60),
            play_minutes: Some(20),
            available_units: 3,
            total_units: 3,
            is_active: true,
        },
    ];
    for car in &cars {
        db.cars().create(car).await?;
    }

    println!("✓ Seeded {} cars", cars.len());

    println!();
    println!("Seeding services...");

    let services = [
        ServiceInput {
            name: "Track Session 15 min".to_string(),
            kind: ServiceKind::TrackSession,
            description: Some("15 minutes on any open track, car included.".to_string()),
            base_price: Money::from_rupees(350, 0),
            duration_minutes: Some(15),
            is_active: true,
        },
        ServiceInput {
            name: "Track Session 30 min".to_string(),
            kind: ServiceKind::TrackSession,
            description: Some("Half-hour session with a marshal on duty.".to_string()),
            base_price: Money::from_rupees(600, 0),
            duration_minutes: Some(30),
            is_active: true,
        },
        ServiceInput {
            name: "Bring-Your-Own Car Rental".to_string(),
            kind: ServiceKind::CarRental,
            description: Some("Track time for customers running their own RC car.".to_string()),
            base_price: Money::from_rupees(250, 0),
            duration_minutes: Some(30),
            is_active: true,
        },
        ServiceInput {
            name: "Pit Lane Coaching".to_string(),
            kind: ServiceKind::Other,
            description: Some("One-on-one driving and tuning session.".to_string()),
            base_price: Money::from_rupees(800, 0),
            duration_minutes: Some(30),
            is_active: true,
        },
    ];
    for service in &services {
        db.services().create(service).await?;
    }

    println!("✓ Seeded {} services", services.len());

    println!();
    println!("Seeding menu...");

    let menu = [
        ("Masala Chai", "Beverages", Money::from_rupees(40, 0)),
        ("Cold Coffee", "Beverages", Money::from_rupees(120, 0)),
        ("Fresh Lime Soda", "Beverages", Money::from_rupees(80, 0)),
        ("Veg Sandwich", "Snacks", Money::from_rupees(110, 0)),
        ("French Fries", "Snacks", Money::from_rupees(130, 0)),
        ("Paneer Roll", "Snacks", Money::from_rupees(150, 0)),
        ("Veg Thali", "Meals", Money::from_rupees(220, 0)),
    ];

    let mut menu_ids = Vec::with_capacity(menu.len());
    for (name, category, price) in &menu {
        let item = db
            .menu_items()
            .create(&MenuItemInput {
                name: (*name).to_string(),
                category: (*category).to_string(),
                price: *price,
                tax_rate: TaxRate::from_bps(GST_FOOD_BPS),
                description: None,
                is_active: true,
            })
            .await?;
        menu_ids.push(item.id);
    }

    println!("✓ Seeded {} menu items", menu.len());

    println!();
    println!("Seeding packages...");

    // menu_ids indexes follow the menu array above
    db.packages()
        .create(&PackageInput {
            name: "Birthday Pit Stop".to_string(),
            description: Some("One hour of track time plus snacks for four.".to_string()),
            base_price: Money::from_rupees(2_500, 0),
            track_id: track_id("Racing Track"),
            car_id: None,
            duration_minutes: Some(60),
            menu_items: vec![
                PackageItemInput { menu_item_id: menu_ids[4], quantity: 4 },
                PackageItemInput { menu_item_id: menu_ids[3], quantity: 4 },
                PackageItemInput { menu_item_id: menu_ids[1], quantity: 4 },
            ],
            is_active: true,
        })
        .await?;

    db.packages()
        .create(&PackageInput {
            name: "Race & Refuel".to_string(),
            description: Some("A quick session with chai and fries after.".to_string()),
            base_price: Money::from_rupees(550, 0),
            track_id: None,
            car_id: None,
            duration_minutes: Some(15),
            menu_items: vec![
                PackageItemInput { menu_item_id: menu_ids[0], quantity: 1 },
                PackageItemInput { menu_item_id: menu_ids[4], quantity: 1 },
            ],
            is_active: true,
        })
        .await?;

    println!("✓ Seeded 2 packages");

    println!();
    println!("Seeding customers...");

    let customers = [
        CustomerInput {
            name: "Rahul Verma".to_string(),
            phone: "9884012345".to_string(),
            email: Some("rahul.v@example.com".to_string()),
            address: None,
            notes: Some("Regular on Saturday mornings.".to_string()),
        },
        CustomerInput {
            name: "Sneha Iyer".to_string(),
            phone: "9812098120".to_string(),
            email: None,
            address: Some("T. Nagar, Chennai".to_string()),
            notes: None,
        },
    ];
    for customer in &customers {
        db.customers().create(customer).await?;
    }

    println!("✓ Seeded {} customers", customers.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
