//! Database seeder for Obrix development and testing.
//!
//! Seeds the inputs catalog and one fully configured demo quotation so the
//! report endpoints have something to show.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use obrix_core::quotation::{
    AdditionalCostValues, CreateItemDetailInput, CreateItemInput, CreateQuotationInput,
    PercentageValues,
};
use obrix_db::QuotationRepository;
use obrix_db::entities::{inputs, quotations};
use obrix_shared::config::QuotationConfig;
use obrix_shared::types::InputId;

/// Catalog rows: name, unit, unit cost, performance.
const CATALOG: [(&str, &str, Decimal, Decimal); 5] = [
    ("Portland cement", "bag", dec!(32.5), dec!(7)),
    ("Washed sand", "m3", dec!(48), dec!(1.8)),
    ("Crushed gravel", "m3", dec!(55), dec!(1.2)),
    ("Rebar 1/2\"", "kg", dec!(4.2), dec!(0.35)),
    ("Mason crew", "day", dec!(180), dec!(12)),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = obrix_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding inputs catalog...");
    let input_ids = seed_inputs(&db).await?;

    println!("Seeding demo quotation...");
    seed_demo_quotation(&db, &input_ids).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Inserts catalog inputs that do not exist yet, returning every catalog id.
async fn seed_inputs(db: &DatabaseConnection) -> anyhow::Result<Vec<InputId>> {
    let mut ids = Vec::with_capacity(CATALOG.len());

    for (name, unit, cost, performance) in CATALOG {
        let existing = inputs::Entity::find()
            .filter(inputs::Column::Name.eq(name))
            .one(db)
            .await?;

        let id = match existing {
            Some(model) => {
                println!("  {name} already exists, skipping...");
                model.id
            }
            None => {
                let model = inputs::ActiveModel {
                    name: Set(name.to_string()),
                    unit: Set(Some(unit.to_string())),
                    cost: Set(cost),
                    performance: Set(performance),
                    created_at: Set(Utc::now().into()),
                    ..Default::default()
                }
                .insert(db)
                .await
                .with_context(|| format!("Failed to insert input {name}"))?;
                println!("  Created {name}");
                model.id
            }
        };
        ids.push(InputId::new(id));
    }

    Ok(ids)
}

/// Creates a demo quotation with two items, unless any quotation exists.
async fn seed_demo_quotation(db: &DatabaseConnection, input_ids: &[InputId]) -> anyhow::Result<()> {
    if quotations::Entity::find().count(db).await? > 0 {
        println!("  Quotations already exist, skipping...");
        return Ok(());
    }

    let repo = QuotationRepository::new(db.clone(), QuotationConfig::default());

    let quotation = repo
        .create_quotation(CreateQuotationInput {
            name: "Warehouse floor slab".to_string(),
            client: Some("Demo Client".to_string()),
            builder: Some("Demo Builder".to_string()),
            ..CreateQuotationInput::default()
        })
        .await?;

    let slab = repo
        .create_item(CreateItemInput {
            quotation_id: quotation.id,
            item: "Reinforced concrete slab".to_string(),
            technical_specification: Some("3000 psi, 15 cm".to_string()),
            unit_of_measure: Some("m2".to_string()),
            quantity: dec!(120),
            unit_price: Decimal::ZERO,
        })
        .await?;

    let walls = repo
        .create_item(CreateItemInput {
            quotation_id: quotation.id,
            item: "Block masonry".to_string(),
            technical_specification: None,
            unit_of_measure: Some("m2".to_string()),
            quantity: dec!(45),
            unit_price: Decimal::ZERO,
        })
        .await?;

    let details = [
        (slab.id, 0),
        (slab.id, 1),
        (slab.id, 2),
        (slab.id, 3),
        (walls.id, 0),
        (walls.id, 4),
    ];
    for (item_id, catalog_index) in details {
        let Some(&input_id) = input_ids.get(catalog_index) else {
            continue;
        };
        repo.create_item_detail(CreateItemDetailInput {
            quotation_item_id: item_id,
            input_id,
            unit_cost: None,
            performance: None,
        })
        .await?;
    }

    repo.set_percentage(
        quotation.id,
        PercentageValues {
            administration: Some(dec!(0.1)),
            unforeseen: Some(dec!(0.05)),
            utility: Some(dec!(0.05)),
            vat: Some(dec!(0.19)),
        },
    )
    .await?;

    repo.set_additional_cost(
        quotation.id,
        AdditionalCostValues {
            per_diem: Some(dec!(250)),
            siso_value: Some(dec!(120)),
            tax: Some(dec!(1)),
            commission: Some(dec!(1)),
            petty_cash: Some(dec!(1)),
            policy: Some(dec!(1)),
            utility: Some(dec!(0.1)),
        },
    )
    .await?;

    let refreshed = repo.refresh_total_cost(quotation.id).await?;
    println!(
        "  Created {} with total cost {}",
        refreshed.consecutive_code.unwrap_or_default(),
        refreshed.total_cost.unwrap_or_default()
    );

    Ok(())
}
