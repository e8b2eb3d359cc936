//! Quotation routes: CRUD, reports, item listing and pricing configuration.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use obrix_core::quotation::{
    AdditionalCostValues, CreateItemInput, CreateQuotationInput, PercentageValues, PricedItem,
    Quotation, QuotationAdditionalCost, QuotationItem, QuotationPercentage, QuotationReport,
    QuotationRepository as _, UpdateQuotationInput,
};
use obrix_shared::AppError;
use obrix_shared::types::{EmployeeId, QuotationId, QuotationStatusId};

use crate::AppState;
use crate::error::{ApiResult, created, ok};
use crate::extractors::{ValidatedJson, amount, rate};

/// Decimal places of amounts returned to callers.
const WIRE_SCALE: u32 = 2;

/// Creates the quotation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotations", post(create_quotation))
        .route(
            "/quotations/{id}",
            get(get_quotation)
                .patch(update_quotation)
                .delete(delete_quotation),
        )
        .route("/quotations/{id}/report", get(get_report))
        .route("/quotations/{id}/report/complete", get(get_complete_report))
        .route("/quotations/{id}/total-cost/refresh", post(refresh_total_cost))
        .route(
            "/quotations/{id}/items",
            get(list_items).post(create_item),
        )
        .route(
            "/quotations/{id}/percentage",
            get(get_percentage).put(set_percentage),
        )
        .route(
            "/quotations/{id}/additional-cost",
            get(get_additional_cost).put(set_additional_cost),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a quotation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationRequest {
    /// Quotation name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Client name.
    #[validate(length(max = 255))]
    pub client: Option<String>,
    /// Builder name.
    #[validate(length(max = 255))]
    pub builder: Option<String>,
    /// Responsible employee.
    pub responsible_employee_id: Option<EmployeeId>,
    /// Initial status.
    pub status_id: Option<QuotationStatusId>,
}

/// Request body for updating a quotation. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotationRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New client.
    #[validate(length(max = 255))]
    pub client: Option<String>,
    /// New builder.
    #[validate(length(max = 255))]
    pub builder: Option<String>,
    /// New responsible employee.
    pub responsible_employee_id: Option<EmployeeId>,
    /// New status.
    pub status_id: Option<QuotationStatusId>,
}

/// Request body for creating an item.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    /// Item description.
    #[validate(length(min = 1, max = 500))]
    pub item: String,
    /// Technical specification.
    pub technical_specification: Option<String>,
    /// Unit of measure.
    #[validate(length(max = 50))]
    pub unit_of_measure: Option<String>,
    /// Quantity.
    #[validate(custom(function = "amount"))]
    pub quantity: Decimal,
    /// Unit price.
    #[serde(default)]
    #[validate(custom(function = "amount"))]
    pub unit_price: Decimal,
}

/// Request body for setting overhead percentages. Absent rates are cleared.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPercentageRequest {
    /// Administration rate.
    #[validate(custom(function = "rate"))]
    pub administration: Option<Decimal>,
    /// Unforeseen rate.
    #[validate(custom(function = "rate"))]
    pub unforeseen: Option<Decimal>,
    /// Utility rate.
    #[validate(custom(function = "rate"))]
    pub utility: Option<Decimal>,
    /// VAT rate.
    #[validate(custom(function = "rate"))]
    pub vat: Option<Decimal>,
}

/// Request body for setting additional costs. Absent values are cleared.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetAdditionalCostRequest {
    /// Per diem amount.
    #[validate(custom(function = "amount"))]
    pub per_diem: Option<Decimal>,
    /// SISO amount.
    #[validate(custom(function = "amount"))]
    pub siso_value: Option<Decimal>,
    /// Tax rate.
    #[validate(custom(function = "rate"))]
    pub tax: Option<Decimal>,
    /// Commission rate.
    #[serde(alias = "commision")]
    #[validate(custom(function = "rate"))]
    pub commission: Option<Decimal>,
    /// Petty cash rate.
    #[validate(custom(function = "rate"))]
    pub petty_cash: Option<Decimal>,
    /// Policy rate.
    #[validate(custom(function = "rate"))]
    pub policy: Option<Decimal>,
    /// Utility rate.
    #[validate(custom(function = "rate"))]
    pub utility: Option<Decimal>,
}

impl From<CreateQuotationRequest> for CreateQuotationInput {
    fn from(req: CreateQuotationRequest) -> Self {
        Self {
            name: req.name,
            client: req.client,
            builder: req.builder,
            responsible_employee_id: req.responsible_employee_id,
            status_id: req.status_id,
        }
    }
}

impl From<UpdateQuotationRequest> for UpdateQuotationInput {
    fn from(req: UpdateQuotationRequest) -> Self {
        Self {
            name: req.name,
            client: req.client.map(Some),
            builder: req.builder.map(Some),
            responsible_employee_id: req.responsible_employee_id.map(Some),
            status_id: req.status_id.map(Some),
        }
    }
}

impl From<SetPercentageRequest> for PercentageValues {
    fn from(req: SetPercentageRequest) -> Self {
        Self {
            administration: req.administration,
            unforeseen: req.unforeseen,
            utility: req.utility,
            vat: req.vat,
        }
    }
}

impl From<SetAdditionalCostRequest> for AdditionalCostValues {
    fn from(req: SetAdditionalCostRequest) -> Self {
        Self {
            per_diem: req.per_diem,
            siso_value: req.siso_value,
            tax: req.tax,
            commission: req.commission,
            petty_cash: req.petty_cash,
            policy: req.policy,
            utility: req.utility,
        }
    }
}

fn round_priced(item: PricedItem) -> PricedItem {
    let r = |v: Decimal| {
        v.round_dp_with_strategy(WIRE_SCALE, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    };
    PricedItem {
        percentage: r(item.percentage),
        unit_value: r(item.unit_value),
        apportioned_total: r(item.apportioned_total),
        item: item.item,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/quotations` - Create a quotation.
async fn create_quotation(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateQuotationRequest>,
) -> ApiResult<Quotation> {
    let quotation = state.quotations.create_quotation(payload.into()).await?;
    created(quotation)
}

/// GET `/quotations/{id}` - Get a quotation.
async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<Quotation> {
    ok(state.quotations.get_quotation(id).await?)
}

/// PATCH `/quotations/{id}` - Update quotation fields.
async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
    ValidatedJson(payload): ValidatedJson<UpdateQuotationRequest>,
) -> ApiResult<Quotation> {
    ok(state.quotations.update_quotation(id, payload.into()).await?)
}

/// DELETE `/quotations/{id}` - Soft-delete a quotation.
async fn delete_quotation(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<QuotationId> {
    state.quotations.delete_quotation(id).await?;
    ok(id)
}

/// GET `/quotations/{id}/report` - Cost report; all zeros until configured.
async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<QuotationReport> {
    let report = state.reports.build_report(id).await?;
    ok(report.rounded(WIRE_SCALE))
}

/// GET `/quotations/{id}/report/complete` - Cost report; fails until configured.
async fn get_complete_report(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<QuotationReport> {
    let report = state.reports.build_complete_report(id).await?;
    ok(report.rounded(WIRE_SCALE))
}

/// POST `/quotations/{id}/total-cost/refresh` - Recompute the cached total.
async fn refresh_total_cost(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<Quotation> {
    ok(state.quotations.refresh_total_cost(id).await?)
}

/// GET `/quotations/{id}/items` - Items with their apportioned pricing.
async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<Vec<PricedItem>> {
    let items = state.reports.priced_items(id).await?;
    ok(items.into_iter().map(round_priced).collect())
}

/// POST `/quotations/{id}/items` - Add an item.
async fn create_item(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> ApiResult<QuotationItem> {
    let item = state
        .quotations
        .create_item(CreateItemInput {
            quotation_id: id,
            item: payload.item,
            technical_specification: payload.technical_specification,
            unit_of_measure: payload.unit_of_measure,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
        })
        .await?;
    created(item)
}

/// GET `/quotations/{id}/percentage` - Overhead percentages.
async fn get_percentage(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<QuotationPercentage> {
    state.quotations.get_quotation(id).await?;
    let percentage = state.quotations.find_percentage(id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Quotation {id} has no percentage configured"))
    })?;
    ok(percentage)
}

/// PUT `/quotations/{id}/percentage` - Set overhead percentages.
async fn set_percentage(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
    ValidatedJson(payload): ValidatedJson<SetPercentageRequest>,
) -> ApiResult<QuotationPercentage> {
    ok(state.quotations.set_percentage(id, payload.into()).await?)
}

/// GET `/quotations/{id}/additional-cost` - Additional costs.
async fn get_additional_cost(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
) -> ApiResult<QuotationAdditionalCost> {
    state.quotations.get_quotation(id).await?;
    let additional_cost = state
        .quotations
        .find_additional_cost(id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Quotation {id} has no additional cost configured"))
        })?;
    ok(additional_cost)
}

/// PUT `/quotations/{id}/additional-cost` - Set additional costs.
async fn set_additional_cost(
    State(state): State<AppState>,
    Path(id): Path<QuotationId>,
    ValidatedJson(payload): ValidatedJson<SetAdditionalCostRequest>,
) -> ApiResult<QuotationAdditionalCost> {
    ok(state.quotations.set_additional_cost(id, payload.into()).await?)
}
