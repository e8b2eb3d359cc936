//! Item and item-detail routes.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use obrix_core::quotation::{
    CreateItemDetailInput, QuotationItem, QuotationItemDetail, UpdateItemDetailInput,
    UpdateItemInput,
};
use obrix_shared::types::{InputId, QuotationItemDetailId, QuotationItemId};

use crate::AppState;
use crate::error::{ApiResult, created, ok};
use crate::extractors::{ValidatedJson, amount, positive_amount};

/// Creates the item and detail routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items/{id}", patch(update_item).delete(delete_item))
        .route(
            "/items/{id}/details",
            get(list_details).post(create_detail),
        )
        .route(
            "/details/{id}",
            patch(update_detail).delete(delete_detail),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for updating an item.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    /// New description.
    #[validate(length(min = 1, max = 500))]
    pub item: Option<String>,
    /// New technical specification.
    pub technical_specification: Option<String>,
    /// New unit of measure.
    #[validate(length(max = 50))]
    pub unit_of_measure: Option<String>,
    /// New quantity. Re-derives every detail of the item.
    #[validate(custom(function = "amount"))]
    pub quantity: Option<Decimal>,
    /// New unit price.
    #[validate(custom(function = "amount"))]
    pub unit_price: Option<Decimal>,
}

/// Request body for adding a detail. Missing cost and performance come from the input.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDetailRequest {
    /// Catalog input.
    pub input_id: InputId,
    /// Unit cost override.
    #[validate(custom(function = "amount"))]
    pub unit_cost: Option<Decimal>,
    /// Performance override.
    #[validate(custom(function = "positive_amount"))]
    pub performance: Option<Decimal>,
}

/// Request body for updating a detail.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailRequest {
    /// New catalog input.
    pub input_id: Option<InputId>,
    /// New unit cost.
    #[validate(custom(function = "amount"))]
    pub unit_cost: Option<Decimal>,
    /// New performance.
    #[validate(custom(function = "positive_amount"))]
    pub performance: Option<Decimal>,
}

impl From<UpdateItemRequest> for UpdateItemInput {
    fn from(req: UpdateItemRequest) -> Self {
        Self {
            item: req.item,
            technical_specification: req.technical_specification.map(Some),
            unit_of_measure: req.unit_of_measure.map(Some),
            quantity: req.quantity,
            unit_price: req.unit_price,
        }
    }
}

impl From<UpdateDetailRequest> for UpdateItemDetailInput {
    fn from(req: UpdateDetailRequest) -> Self {
        Self {
            input_id: req.input_id,
            unit_cost: req.unit_cost,
            performance: req.performance,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// PATCH `/items/{id}` - Update an item and cascade to its details.
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<QuotationItemId>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> ApiResult<QuotationItem> {
    ok(state.quotations.update_item(id, payload.into()).await?)
}

/// DELETE `/items/{id}` - Delete an item with its details.
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<QuotationItemId>,
) -> ApiResult<QuotationItemId> {
    state.quotations.delete_item(id).await?;
    ok(id)
}

/// GET `/items/{id}/details` - Details of an item.
async fn list_details(
    State(state): State<AppState>,
    Path(id): Path<QuotationItemId>,
) -> ApiResult<Vec<QuotationItemDetail>> {
    ok(state.quotations.list_item_details(id).await?)
}

/// POST `/items/{id}/details` - Add a detail to an item.
async fn create_detail(
    State(state): State<AppState>,
    Path(id): Path<QuotationItemId>,
    ValidatedJson(payload): ValidatedJson<CreateDetailRequest>,
) -> ApiResult<QuotationItemDetail> {
    let detail = state
        .quotations
        .create_item_detail(CreateItemDetailInput {
            quotation_item_id: id,
            input_id: payload.input_id,
            unit_cost: payload.unit_cost,
            performance: payload.performance,
        })
        .await?;
    created(detail)
}

/// PATCH `/details/{id}` - Update a detail.
async fn update_detail(
    State(state): State<AppState>,
    Path(id): Path<QuotationItemDetailId>,
    ValidatedJson(payload): ValidatedJson<UpdateDetailRequest>,
) -> ApiResult<QuotationItemDetail> {
    ok(state.quotations.update_item_detail(id, payload.into()).await?)
}

/// DELETE `/details/{id}` - Delete a detail.
async fn delete_detail(
    State(state): State<AppState>,
    Path(id): Path<QuotationItemDetailId>,
) -> ApiResult<QuotationItemDetailId> {
    state.quotations.delete_item_detail(id).await?;
    ok(id)
}
