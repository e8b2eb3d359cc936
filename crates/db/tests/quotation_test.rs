//! Integration tests for the quotation repository.
//!
//! Runs against an in-memory SQLite database with tables created from the
//! entities, so no external database is needed.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, Schema, Set,
};

use obrix_core::quotation::{
    AdditionalCostValues, CreateItemDetailInput, CreateItemInput, CreateQuotationInput,
    PercentageValues, QuotationError, QuotationReportService,
    QuotationRepository as QuotationRepoTrait, UpdateItemDetailInput, UpdateItemInput,
    UpdateQuotationInput,
};
use obrix_db::entities::{
    inputs, quotation_additional_costs, quotation_item_details, quotation_items,
    quotation_percentages, quotations,
};
use obrix_db::{QuotationRepository, RepositoryError};
use obrix_shared::config::QuotationConfig;
use obrix_shared::types::{InputId, QuotationId, QuotationItemId};

async fn setup() -> (DatabaseConnection, QuotationRepository) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let statements = [
        schema.create_table_from_entity(inputs::Entity),
        schema.create_table_from_entity(quotations::Entity),
        schema.create_table_from_entity(quotation_items::Entity),
        schema.create_table_from_entity(quotation_item_details::Entity),
        schema.create_table_from_entity(quotation_percentages::Entity),
        schema.create_table_from_entity(quotation_additional_costs::Entity),
    ];
    for statement in &statements {
        db.execute(backend.build(statement))
            .await
            .expect("Failed to create table");
    }

    let repo = QuotationRepository::new(db.clone(), QuotationConfig::default());
    (db, repo)
}

async fn seed_input(
    db: &DatabaseConnection,
    name: &str,
    cost: Decimal,
    performance: Decimal,
) -> InputId {
    let model = inputs::ActiveModel {
        name: Set(name.to_string()),
        unit: Set(Some("unit".to_string())),
        cost: Set(cost),
        performance: Set(performance),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert input");

    InputId::new(model.id)
}

async fn seed_quotation(repo: &QuotationRepository) -> QuotationId {
    repo.create_quotation(CreateQuotationInput {
        name: "Warehouse slab".to_string(),
        client: Some("ACME".to_string()),
        ..CreateQuotationInput::default()
    })
    .await
    .expect("Failed to create quotation")
    .id
}

async fn seed_item(
    repo: &QuotationRepository,
    quotation_id: QuotationId,
    quantity: Decimal,
) -> QuotationItemId {
    repo.create_item(CreateItemInput {
        quotation_id,
        item: "Concrete".to_string(),
        technical_specification: None,
        unit_of_measure: Some("m3".to_string()),
        quantity,
        unit_price: dec!(12),
    })
    .await
    .expect("Failed to create item")
    .id
}

fn standard_percentages() -> PercentageValues {
    PercentageValues {
        administration: Some(dec!(0.1)),
        unforeseen: Some(dec!(0.05)),
        utility: Some(dec!(0.2)),
        vat: Some(dec!(0.19)),
    }
}

// ============================================================================
// Quotations
// ============================================================================

#[tokio::test]
async fn test_consecutive_code_follows_generated_id() {
    let (_db, repo) = setup().await;

    let first = seed_quotation(&repo).await;
    let second = seed_quotation(&repo).await;

    let first = repo.get_quotation(first).await.unwrap();
    let second = repo.get_quotation(second).await.unwrap();

    assert_eq!(
        first.consecutive_code.as_deref(),
        Some(format!("COT-{:05}", first.id.into_inner()).as_str())
    );
    assert_eq!(
        second.consecutive_code.as_deref(),
        Some(format!("COT-{:05}", second.id.into_inner()).as_str())
    );
    assert_ne!(first.consecutive_code, second.consecutive_code);
}

#[tokio::test]
async fn test_update_quotation_fields() {
    let (_db, repo) = setup().await;
    let id = seed_quotation(&repo).await;

    let updated = repo
        .update_quotation(
            id,
            UpdateQuotationInput {
                name: Some("Warehouse slab, phase 2".to_string()),
                client: Some(None),
                ..UpdateQuotationInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Warehouse slab, phase 2");
    assert_eq!(updated.client, None);
    assert!(updated.consecutive_code.is_some());
}

#[tokio::test]
async fn test_soft_deleted_quotation_is_hidden() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    repo.create_item_detail(CreateItemDetailInput {
        quotation_item_id: item,
        input_id: cement,
        unit_cost: None,
        performance: None,
    })
    .await
    .unwrap();
    repo.set_percentage(id, standard_percentages()).await.unwrap();
    repo.set_additional_cost(id, AdditionalCostValues::default())
        .await
        .unwrap();

    repo.delete_quotation(id).await.unwrap();

    let service = QuotationReportService::new(Arc::new(repo.clone()));
    assert!(service.build_report(id).await.unwrap().is_empty());
    assert!(matches!(
        service.build_complete_report(id).await,
        Err(QuotationError::NotFound(_))
    ));
    assert!(matches!(
        repo.get_quotation(id).await,
        Err(RepositoryError::Quotation(QuotationError::NotFound(_)))
    ));
    assert!(matches!(
        repo.delete_quotation(id).await,
        Err(RepositoryError::Quotation(QuotationError::NotFound(_)))
    ));

    // rows are kept
    assert_eq!(quotations::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(quotation_items::Entity::find().count(&db).await.unwrap(), 1);
}

// ============================================================================
// Items and details
// ============================================================================

#[tokio::test]
async fn test_detail_defaults_from_catalog_and_derives() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;

    let detail = repo
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: item,
            input_id: cement,
            unit_cost: None,
            performance: None,
        })
        .await
        .unwrap();

    assert_eq!(detail.unit_cost, dec!(50));
    assert_eq!(detail.performance, dec!(2));
    assert_eq!(detail.quantity, dec!(5));
    assert_eq!(detail.total_cost, dec!(250));
}

#[tokio::test]
async fn test_item_total_is_quantity_times_price() {
    let (_db, repo) = setup().await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;

    let items = repo.list_items(id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, item);
    assert_eq!(items[0].total, dec!(120));
}

#[tokio::test]
async fn test_item_quantity_change_cascades_to_details() {
    let (db, repo) = setup().await;
    let sand = seed_input(&db, "Sand", dec!(10), dec!(3)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    repo.create_item_detail(CreateItemDetailInput {
        quotation_item_id: item,
        input_id: sand,
        unit_cost: None,
        performance: None,
    })
    .await
    .unwrap();

    let updated = repo
        .update_item(
            item,
            UpdateItemInput {
                quantity: Some(dec!(20)),
                ..UpdateItemInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total, dec!(240));

    let details = repo.list_item_details(item).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].quantity, dec!(7));
    assert_eq!(details[0].total_cost, dec!(70));
}

#[tokio::test]
async fn test_failed_cascade_rolls_back_item_and_details() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    repo.create_item_detail(CreateItemDetailInput {
        quotation_item_id: item,
        input_id: cement,
        unit_cost: None,
        performance: None,
    })
    .await
    .unwrap();

    // a legacy row that cannot be re-derived
    let now = Utc::now().into();
    quotation_item_details::ActiveModel {
        quotation_item_id: Set(item.into_inner()),
        input_id: Set(cement.into_inner()),
        quantity: Set(dec!(1)),
        performance: Set(Decimal::ZERO),
        unit_cost: Set(dec!(5)),
        total_cost: Set(dec!(5)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let result = repo
        .update_item(
            item,
            UpdateItemInput {
                quantity: Some(dec!(20)),
                ..UpdateItemInput::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::InvalidPerformance(_)))
    ));

    let items = repo.list_items(id).await.unwrap();
    assert_eq!(items[0].quantity, dec!(10));
    assert_eq!(items[0].total, dec!(120));

    let details = repo.list_item_details(item).await.unwrap();
    assert_eq!(details[0].quantity, dec!(5));
    assert_eq!(details[0].total_cost, dec!(250));
}

#[tokio::test]
async fn test_changing_detail_input_rereads_catalog() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let gravel = seed_input(&db, "Gravel", dec!(8), dec!(4)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    let detail = repo
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: item,
            input_id: cement,
            unit_cost: None,
            performance: None,
        })
        .await
        .unwrap();

    let updated = repo
        .update_item_detail(
            detail.id,
            UpdateItemDetailInput {
                input_id: Some(gravel),
                ..UpdateItemDetailInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.input_id, gravel);
    assert_eq!(updated.unit_cost, dec!(8));
    assert_eq!(updated.performance, dec!(4));
    assert_eq!(updated.quantity, dec!(3));
    assert_eq!(updated.total_cost, dec!(24));
}

#[tokio::test]
async fn test_invalid_performance_writes_nothing() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;

    let result = repo
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: item,
            input_id: cement,
            unit_cost: None,
            performance: Some(Decimal::ZERO),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::InvalidPerformance(_)))
    ));
    assert_eq!(
        quotation_item_details::Entity::find().count(&db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_unknown_input_is_reported() {
    let (_db, repo) = setup().await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;

    let result = repo
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: item,
            input_id: InputId::new(404),
            unit_cost: None,
            performance: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::InputNotFound(_)))
    ));
}

#[tokio::test]
async fn test_delete_item_removes_details() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    repo.create_item_detail(CreateItemDetailInput {
        quotation_item_id: item,
        input_id: cement,
        unit_cost: None,
        performance: None,
    })
    .await
    .unwrap();

    repo.delete_item(item).await.unwrap();

    assert!(repo.list_items(id).await.unwrap().is_empty());
    assert_eq!(
        quotation_item_details::Entity::find().count(&db).await.unwrap(),
        0
    );
    assert!(matches!(
        repo.delete_item(item).await,
        Err(RepositoryError::Quotation(QuotationError::ItemNotFound(_)))
    ));
}

// ============================================================================
// Pricing configuration
// ============================================================================

#[tokio::test]
async fn test_set_percentage_is_idempotent_upsert() {
    let (db, repo) = setup().await;
    let id = seed_quotation(&repo).await;

    repo.set_percentage(id, standard_percentages()).await.unwrap();
    repo.set_percentage(id, standard_percentages()).await.unwrap();
    assert_eq!(
        quotation_percentages::Entity::find().count(&db).await.unwrap(),
        1
    );

    let changed = PercentageValues {
        vat: None,
        ..standard_percentages()
    };
    repo.set_percentage(id, changed).await.unwrap();

    let stored = repo.find_percentage(id).await.unwrap().unwrap();
    assert_eq!(stored.vat, None);
    assert_eq!(stored.administration, Some(dec!(0.1)));
    assert_eq!(
        quotation_percentages::Entity::find().count(&db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_set_additional_cost_rejects_negative_values() {
    let (db, repo) = setup().await;
    let id = seed_quotation(&repo).await;

    let result = repo
        .set_additional_cost(
            id,
            AdditionalCostValues {
                tax: Some(dec!(-0.01)),
                ..AdditionalCostValues::default()
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::NegativeValue { field: "tax", .. }))
    ));
    assert_eq!(
        quotation_additional_costs::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_set_percentage_unknown_quotation() {
    let (_db, repo) = setup().await;

    let result = repo
        .set_percentage(QuotationId::new(77), standard_percentages())
        .await;
    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::NotFound(_)))
    ));
}

// ============================================================================
// Report end to end
// ============================================================================

#[tokio::test]
async fn test_report_and_cached_total_end_to_end() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    repo.create_item_detail(CreateItemDetailInput {
        quotation_item_id: item,
        input_id: cement,
        unit_cost: None,
        performance: None,
    })
    .await
    .unwrap();

    let service = QuotationReportService::new(Arc::new(repo.clone()));

    // not configured yet
    assert!(service.build_report(id).await.unwrap().is_empty());

    repo.set_percentage(id, standard_percentages()).await.unwrap();
    repo.set_additional_cost(
        id,
        AdditionalCostValues {
            utility: Some(dec!(0.2)),
            ..AdditionalCostValues::default()
        },
    )
    .await
    .unwrap();

    let report = service.build_complete_report(id).await.unwrap().rounded(2);
    assert_eq!(report.additional_cost.direct_cost, dec!(250));
    assert_eq!(report.items[0].percentage, dec!(100));
    assert_eq!(report.summary.unit_value_aiu, dec!(216.14));
    assert_eq!(report.summary.administration, dec!(21.61));
    assert_eq!(report.summary.unforeseen, dec!(10.81));
    assert_eq!(report.summary.utility, dec!(43.23));
    assert_eq!(report.summary.vat, dec!(8.21));
    assert_eq!(report.summary.total_value, dec!(300));

    let refreshed = repo.refresh_total_cost(id).await.unwrap();
    assert_eq!(refreshed.total_cost, Some(dec!(300)));

    let priced = service.priced_items(id).await.unwrap();
    assert_eq!(priced.len(), 1);
    assert_eq!(priced[0].item.id, item);
}

#[tokio::test]
async fn test_refresh_total_cost_tracks_detail_changes() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    let detail = repo
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: item,
            input_id: cement,
            unit_cost: None,
            performance: None,
        })
        .await
        .unwrap();

    // unconfigured quotations cache a zero total
    let refreshed = repo.refresh_total_cost(id).await.unwrap();
    assert_eq!(refreshed.total_cost, Some(Decimal::ZERO));

    repo.set_percentage(id, standard_percentages()).await.unwrap();
    repo.set_additional_cost(
        id,
        AdditionalCostValues {
            utility: Some(dec!(0.2)),
            ..AdditionalCostValues::default()
        },
    )
    .await
    .unwrap();
    let refreshed = repo.refresh_total_cost(id).await.unwrap();
    assert_eq!(refreshed.total_cost, Some(dec!(300)));

    repo.update_item_detail(
        detail.id,
        UpdateItemDetailInput {
            unit_cost: Some(dec!(100)),
            ..UpdateItemDetailInput::default()
        },
    )
    .await
    .unwrap();

    let refreshed = repo.refresh_total_cost(id).await.unwrap();
    assert_eq!(refreshed.total_cost, Some(dec!(600)));
    assert_eq!(
        repo.get_quotation(id).await.unwrap().total_cost,
        Some(dec!(600))
    );

    repo.delete_quotation(id).await.unwrap();
    assert!(matches!(
        repo.refresh_total_cost(id).await,
        Err(RepositoryError::Quotation(QuotationError::NotFound(_)))
    ));
}

// ============================================================================
// Range checks
// ============================================================================

#[tokio::test]
async fn test_oversized_item_total_is_rejected() {
    let (db, repo) = setup().await;
    let id = seed_quotation(&repo).await;

    let result = repo
        .create_item(CreateItemInput {
            quotation_id: id,
            item: "Bulk fill".to_string(),
            technical_specification: None,
            unit_of_measure: None,
            quantity: dec!(100000000),
            unit_price: dec!(100000000),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::AmountOutOfRange {
            field: "total",
            ..
        }))
    ));
    assert_eq!(quotation_items::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_oversized_detail_is_rejected() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;

    let result = repo
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: item,
            input_id: cement,
            unit_cost: Some(dec!(100000000000000)),
            performance: Some(dec!(0.0001)),
        })
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::AmountOutOfRange { .. }))
    ));
    assert_eq!(
        quotation_item_details::Entity::find().count(&db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_oversized_cascade_leaves_item_unchanged() {
    let (db, repo) = setup().await;
    let cement = seed_input(&db, "Cement", dec!(50), dec!(2)).await;
    let id = seed_quotation(&repo).await;
    let item = seed_item(&repo, id, dec!(10)).await;
    repo.create_item_detail(CreateItemDetailInput {
        quotation_item_id: item,
        input_id: cement,
        unit_cost: None,
        performance: None,
    })
    .await
    .unwrap();

    let result = repo
        .update_item(
            item,
            UpdateItemInput {
                quantity: Some(dec!(100000000000000)),
                unit_price: Some(Decimal::ZERO),
                ..UpdateItemInput::default()
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::Quotation(QuotationError::AmountOutOfRange {
            field: "detail_total_cost",
            ..
        }))
    ));

    let stored = quotation_items::Entity::find_by_id(item.into_inner())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.quantity, dec!(10));
    assert_eq!(stored.unit_price, dec!(12));

    let details = repo.list_item_details(item).await.unwrap();
    assert_eq!(details[0].quantity, dec!(5));
    assert_eq!(details[0].total_cost, dec!(250));
}
