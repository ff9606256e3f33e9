//! # Database Seeder
//!
//! Populates a fresh database with demo inventory data: a small category
//! tree, lot-tracked elements with stock, one serial-tracked element and a
//! couple of movements so the history endpoints have something to show.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin seed                       # seeds data/inventario.db
//! cargo run --bin seed -- --db test.db       # custom database path
//! ```
//!
//! Safe to run twice: if the database already contains elements the seeder
//! leaves it untouched.

use inventario_core::types::{
    Category, CleaningStatus, Element, ItemStatus, LotStatus, MovementReason, NewMovement,
    Serial,
};
use inventario_db::{Database, DbConfig};
use std::collections::HashMap;

/// Category tree: (name, parent name). Parents must appear before children.
const CATEGORIES: &[(&str, Option<&str>)] = &[
    ("Sonido", None),
    ("Altavoces", Some("Sonido")),
    ("Microfonía", Some("Sonido")),
    ("Iluminación", None),
    ("Focos", Some("Iluminación")),
    ("Mobiliario", None),
    ("Sillas", Some("Mobiliario")),
    ("Mesas", Some("Mobiliario")),
    ("Textil", None),
];

/// Lot-tracked stock: (name, category, quantity, location)
const LOT_ELEMENTS: &[(&str, &str, i64, &str)] = &[
    ("Altavoz activo 15\"", "Altavoces", 8, "Almacén 1, estantería A"),
    ("Micrófono inalámbrico", "Microfonía", 12, "Almacén 1, cajón M2"),
    ("Foco PAR LED", "Focos", 24, "Almacén 2, estantería C"),
    ("Silla plegable blanca", "Sillas", 200, "Almacén 3"),
    ("Mesa redonda 180cm", "Mesas", 30, "Almacén 3"),
    ("Mantel blanco 2x2", "Textil", 60, "Almacén 1, estantería T"),
];

/// Serial-tracked equipment: (name, category, serial numbers)
const SERIAL_ELEMENTS: &[(&str, &str, &[&str])] = &[
    ("Proyector 4K", "Iluminación", &["PRJ-001", "PRJ-002", "PRJ-003"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let mut db_path = "data/inventario.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    println!("🌱 Seeding database at {db_path}...");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.elements().count().await?;
    if existing > 0 {
        println!("⚠ Database already contains {existing} elements, skipping seed");
        return Ok(());
    }

    // Categories first; children look their parent up by name.
    let mut category_ids: HashMap<&str, String> = HashMap::new();
    for (name, parent) in CATEGORIES {
        let parent_id = parent.map(|p| category_ids[p].clone());
        let category = Category::new(*name, parent_id);
        db.categories().insert(&category).await?;
        category_ids.insert(*name, category.id.clone());
        println!("  ✓ Category: {name}");
    }

    for (name, category, quantity, location) in LOT_ELEMENTS {
        let element = Element::new_lot(
            *name,
            None,
            Some(category_ids[category].clone()),
            *quantity,
            Some((*location).to_string()),
        );
        db.elements().insert(&element, &[]).await?;
        println!("  ✓ Element: {name} ({quantity} uds)");
    }

    for (name, category, numbers) in SERIAL_ELEMENTS {
        let element = Element::new_serial_tracked(
            *name,
            None,
            Some(category_ids[category].clone()),
            numbers.len() as i64,
            ItemStatus::New,
        );
        let serials: Vec<Serial> = numbers
            .iter()
            .map(|n| Serial::new(&element.id, *n, ItemStatus::New, None))
            .collect();
        db.elements().insert(&element, &serials).await?;
        println!("  ✓ Element: {name} ({} series)", numbers.len());
    }

    // A little history: part of the chair stock is out on a rental and a
    // few tablecloths came back dirty.
    let elements = db.elements().list().await?;
    if let Some(chairs) = elements.iter().find(|e| e.name.starts_with("Silla")) {
        db.movements()
            .apply(NewMovement {
                element_id: chairs.id.clone(),
                quantity: 80,
                from_status: LotStatus::Available,
                to_status: LotStatus::Rented,
                cleaning_status: CleaningStatus::Clean,
                reason: MovementReason::RentedOut,
                description: Some("Boda finca Los Olivos".to_string()),
                repair_cost_cents: None,
            })
            .await?;
        println!("  ✓ Movement: 80 sillas AVAILABLE → RENTED");
    }
    if let Some(cloths) = elements.iter().find(|e| e.name.starts_with("Mantel")) {
        db.movements()
            .apply(NewMovement {
                element_id: cloths.id.clone(),
                quantity: 15,
                from_status: LotStatus::Available,
                to_status: LotStatus::Cleaning,
                cleaning_status: CleaningStatus::Dirty,
                reason: MovementReason::ReturnedDirty,
                description: None,
                repair_cost_cents: None,
            })
            .await?;
        println!("  ✓ Movement: 15 manteles AVAILABLE → CLEANING");
    }

    let total = db.elements().count().await?;
    println!("✅ Seed complete: {} categories, {total} elements", CATEGORIES.len());

    db.close().await;
    Ok(())
}

fn print_help() {
    println!("Database seeder for the inventory system");
    println!();
    println!("USAGE:");
    println!("  seed [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --db <PATH>   Database file to seed (default: data/inventario.db)");
    println!("  --help, -h    Show this help");
}
