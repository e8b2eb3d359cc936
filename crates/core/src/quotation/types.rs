//! Quotation data types.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use obrix_shared::types::{
    EmployeeId, InputId, QuotationId, QuotationItemDetailId, QuotationItemId, QuotationStatusId,
};

/// A priced proposal for a construction job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    /// Quotation ID.
    pub id: QuotationId,
    /// Quotation name.
    pub name: String,
    /// Client name.
    pub client: Option<String>,
    /// Builder (contractor) name.
    pub builder: Option<String>,
    /// Responsible employee.
    pub responsible_employee_id: Option<EmployeeId>,
    /// Workflow status.
    pub status_id: Option<QuotationStatusId>,
    /// Consecutive code, assigned right after creation.
    pub consecutive_code: Option<String>,
    /// Cached grand total from the last refresh.
    pub total_cost: Option<Decimal>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    /// Formats the consecutive code for a freshly inserted quotation.
    ///
    /// `consecutive_code("COT", 5, 17)` is `COT-00017`.
    #[must_use]
    pub fn consecutive_code(prefix: &str, width: usize, id: QuotationId) -> String {
        format!("{prefix}-{:0width$}", id.into_inner())
    }
}

/// A line item (scope element) within a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    /// Item ID.
    pub id: QuotationItemId,
    /// Parent quotation ID.
    pub quotation_id: QuotationId,
    /// Item description.
    pub item: String,
    /// Technical specification.
    pub technical_specification: Option<String>,
    /// Unit of measure.
    pub unit_of_measure: Option<String>,
    /// Quantity of the item.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
    /// `quantity × unit_price`.
    pub total: Decimal,
}

/// One input consumed to produce a unit of a quotation item.
///
/// `quantity` and `total_cost` are derived, never set directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItemDetail {
    /// Detail ID.
    pub id: QuotationItemDetailId,
    /// Parent item ID.
    pub quotation_item_id: QuotationItemId,
    /// Catalog input ID.
    pub input_id: InputId,
    /// `ceil(item.quantity / performance)`.
    pub quantity: Decimal,
    /// Units of item produced per unit of input.
    pub performance: Decimal,
    /// Unit cost of the input.
    pub unit_cost: Decimal,
    /// `round(unit_cost × quantity, 2)`.
    pub total_cost: Decimal,
}

/// Overhead percentages for a quotation, as fractional rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPercentage {
    /// Quotation ID.
    pub quotation_id: QuotationId,
    /// Administration rate.
    pub administration: Option<Decimal>,
    /// Unforeseen rate.
    pub unforeseen: Option<Decimal>,
    /// Utility rate.
    pub utility: Option<Decimal>,
    /// VAT rate, charged on the utility slice.
    pub vat: Option<Decimal>,
}

/// Additional flat and rate-based costs for a quotation.
///
/// `per_diem` and `siso_value` are absolute amounts; the rest are fractional rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationAdditionalCost {
    /// Quotation ID.
    pub quotation_id: QuotationId,
    /// Per diem amount.
    pub per_diem: Option<Decimal>,
    /// SISO amount.
    pub siso_value: Option<Decimal>,
    /// Tax rate.
    pub tax: Option<Decimal>,
    /// Commission rate.
    pub commission: Option<Decimal>,
    /// Petty cash rate.
    pub petty_cash: Option<Decimal>,
    /// Policy rate.
    pub policy: Option<Decimal>,
    /// Utility rate applied on the subtotal.
    pub utility: Option<Decimal>,
}

/// A catalog material or resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Input ID.
    pub id: InputId,
    /// Input name.
    pub name: String,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Unit price.
    pub cost: Decimal,
    /// Default yield.
    pub performance: Decimal,
}

// ============================================================================
// Mutation inputs
// ============================================================================

/// Input for creating a quotation.
#[derive(Debug, Clone, Default)]
pub struct CreateQuotationInput {
    /// Quotation name.
    pub name: String,
    /// Client name.
    pub client: Option<String>,
    /// Builder name.
    pub builder: Option<String>,
    /// Responsible employee.
    pub responsible_employee_id: Option<EmployeeId>,
    /// Initial status.
    pub status_id: Option<QuotationStatusId>,
}

/// Input for updating a quotation. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateQuotationInput {
    /// New name.
    pub name: Option<String>,
    /// New client.
    pub client: Option<Option<String>>,
    /// New builder.
    pub builder: Option<Option<String>>,
    /// New responsible employee.
    pub responsible_employee_id: Option<Option<EmployeeId>>,
    /// New status.
    pub status_id: Option<Option<QuotationStatusId>>,
}

/// Input for creating a quotation item.
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    /// Parent quotation ID.
    pub quotation_id: QuotationId,
    /// Item description.
    pub item: String,
    /// Technical specification.
    pub technical_specification: Option<String>,
    /// Unit of measure.
    pub unit_of_measure: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price.
    pub unit_price: Decimal,
}

/// Input for updating a quotation item.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    /// New description.
    pub item: Option<String>,
    /// New technical specification.
    pub technical_specification: Option<Option<String>>,
    /// New unit of measure.
    pub unit_of_measure: Option<Option<String>>,
    /// New quantity (cascades to details).
    pub quantity: Option<Decimal>,
    /// New unit price.
    pub unit_price: Option<Decimal>,
}

/// Input for attaching a catalog input to an item.
#[derive(Debug, Clone)]
pub struct CreateItemDetailInput {
    /// Parent item ID.
    pub quotation_item_id: QuotationItemId,
    /// Catalog input ID.
    pub input_id: InputId,
    /// Unit cost override; defaults to the input's cost.
    pub unit_cost: Option<Decimal>,
    /// Performance override; defaults to the input's performance.
    pub performance: Option<Decimal>,
}

/// Input for updating an item detail.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemDetailInput {
    /// New catalog input.
    pub input_id: Option<InputId>,
    /// New unit cost.
    pub unit_cost: Option<Decimal>,
    /// New performance.
    pub performance: Option<Decimal>,
}

/// Values written by "set percentage". Every field is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PercentageValues {
    /// Administration rate.
    pub administration: Option<Decimal>,
    /// Unforeseen rate.
    pub unforeseen: Option<Decimal>,
    /// Utility rate.
    pub utility: Option<Decimal>,
    /// VAT rate.
    pub vat: Option<Decimal>,
}

/// Values written by "set additional cost". Every field is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalCostValues {
    /// Per diem amount.
    pub per_diem: Option<Decimal>,
    /// SISO amount.
    pub siso_value: Option<Decimal>,
    /// Tax rate.
    pub tax: Option<Decimal>,
    /// Commission rate.
    pub commission: Option<Decimal>,
    /// Petty cash rate.
    pub petty_cash: Option<Decimal>,
    /// Policy rate.
    pub policy: Option<Decimal>,
    /// Utility rate.
    pub utility: Option<Decimal>,
}

// ============================================================================
// Report
// ============================================================================

/// Apportioned pricing for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItemSummary {
    /// Item ID.
    #[serde(rename = "idQuotationItem")]
    pub quotation_item_id: QuotationItemId,
    /// Item quantity.
    pub quantity: Decimal,
    /// Share of direct cost, 0-100.
    pub percentage: Decimal,
    /// Loaded cost per unit before dividing out the overhead layers.
    pub first_sum: Decimal,
    /// Apportioned unit value.
    pub unit_value: Decimal,
    /// `quantity × unit_value`.
    pub total_cost: Decimal,
}

/// Quotation-level AIU summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    /// Sum of apportioned item totals.
    #[serde(rename = "unitValueAIU")]
    pub unit_value_aiu: Decimal,
    /// Administration amount.
    pub administration: Decimal,
    /// Unforeseen amount.
    pub unforeseen: Decimal,
    /// Utility amount.
    pub utility: Decimal,
    /// VAT on the utility slice.
    pub vat: Decimal,
    /// AIU base plus overheads and VAT.
    #[serde(rename = "unitValueAIUIncluded")]
    pub unit_value_aiu_included: Decimal,
    /// Grand total; equal to `unit_value_aiu_included`.
    pub total_value: Decimal,
}

/// Additional cost breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationAdditionalCostSummary {
    /// Per diem amount.
    pub per_diem: Decimal,
    /// SISO amount.
    pub siso_value: Decimal,
    /// Scaled tax cost.
    pub tax: Decimal,
    /// Scaled commission cost.
    #[serde(rename = "commision")]
    pub commission: Decimal,
    /// Scaled petty cash cost.
    pub petty_cash: Decimal,
    /// Scaled policy cost.
    pub policy: Decimal,
    /// Utility on the subtotal.
    pub utility: Decimal,
    /// Sum of detail total costs.
    pub direct_cost: Decimal,
}

/// Full rollup output for one quotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationReport {
    /// Per-item apportionment, in item order.
    pub items: Vec<QuotationItemSummary>,
    /// AIU summary.
    pub summary: QuotationSummary,
    /// Additional cost breakdown.
    pub additional_cost: QuotationAdditionalCostSummary,
}

impl QuotationReport {
    /// The all-zero report returned for quotations that are not fully configured.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true for the empty-report sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Copy with every amount rounded to `dp` places, half away from zero.
    ///
    /// The engine keeps full precision; this is for presentation only.
    #[must_use]
    pub fn rounded(&self, dp: u32) -> Self {
        let r = |v: Decimal| v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);

        Self {
            items: self
                .items
                .iter()
                .map(|i| QuotationItemSummary {
                    quotation_item_id: i.quotation_item_id,
                    quantity: i.quantity,
                    percentage: r(i.percentage),
                    first_sum: r(i.first_sum),
                    unit_value: r(i.unit_value),
                    total_cost: r(i.total_cost),
                })
                .collect(),
            summary: QuotationSummary {
                unit_value_aiu: r(self.summary.unit_value_aiu),
                administration: r(self.summary.administration),
                unforeseen: r(self.summary.unforeseen),
                utility: r(self.summary.utility),
                vat: r(self.summary.vat),
                unit_value_aiu_included: r(self.summary.unit_value_aiu_included),
                total_value: r(self.summary.total_value),
            },
            additional_cost: QuotationAdditionalCostSummary {
                per_diem: r(self.additional_cost.per_diem),
                siso_value: r(self.additional_cost.siso_value),
                tax: r(self.additional_cost.tax),
                commission: r(self.additional_cost.commission),
                petty_cash: r(self.additional_cost.petty_cash),
                policy: r(self.additional_cost.policy),
                utility: r(self.additional_cost.utility),
                direct_cost: r(self.additional_cost.direct_cost),
            },
        }
    }
}

/// An item joined with its apportioned pricing, for item listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    /// The stored item.
    #[serde(flatten)]
    pub item: QuotationItem,
    /// Share of direct cost, 0-100.
    pub percentage: Decimal,
    /// Apportioned unit value.
    pub unit_value: Decimal,
    /// Apportioned total.
    pub apportioned_total: Decimal,
}
