//! AIU cost rollup.
//!
//! Order of operations matters and is preserved exactly:
//!
//! 1. `total` = direct cost (sum of detail totals) + per diem + SISO
//! 2. tax, policy, commission and petty cash are rates on `total`, scaled by
//!    fixed multipliers
//! 3. each item's share of direct cost
//! 4. `sub_total` = `total` + scaled extras; `final_total` = `sub_total` loaded with utility
//! 5. `sum_percents` = 1 + administration + unforeseen + utility + utility × VAT
//! 6. per item: `final_total × share / quantity / sum_percents`
//! 7. AIU summary over the apportioned item totals; VAT only on the utility slice
//! 8. additional cost breakdown
//!
//! The two-step apportionment (steps 5-6) mirrors the pricing spreadsheet the
//! business works from and must be confirmed with the business owner before any change.

use std::collections::HashMap;

use rust_decimal::Decimal;

use obrix_shared::types::QuotationItemId;

use super::types::{
    QuotationAdditionalCost, QuotationAdditionalCostSummary, QuotationItem, QuotationItemDetail,
    QuotationItemSummary, QuotationPercentage, QuotationReport, QuotationSummary,
};

/// Multiplier on the tax, policy and petty cash rates (1.5390).
///
/// Inherited business constant of unknown derivation. Do not change without domain confirmation.
pub const RATE_COST_FACTOR: Decimal = Decimal::from_parts(15_390, 0, 0, false, 4);

/// Multiplier on the commission rate (1.3317).
///
/// Inherited business constant of unknown derivation. Do not change without domain confirmation.
pub const COMMISSION_COST_FACTOR: Decimal = Decimal::from_parts(13_317, 0, 0, false, 4);

/// Everything the rollup reads, already loaded.
#[derive(Debug, Clone, Copy)]
pub struct RollupInput<'a> {
    /// Items of the quotation, in display order.
    pub items: &'a [QuotationItem],
    /// Details of those items.
    pub details: &'a [QuotationItemDetail],
    /// Overhead percentages.
    pub percentage: &'a QuotationPercentage,
    /// Additional costs.
    pub additional_cost: &'a QuotationAdditionalCost,
}

/// Intermediate totals, exposed for inspection in tests and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollupTotals {
    /// Direct cost: sum of detail total costs.
    pub direct_cost: Decimal,
    /// Direct cost plus per diem and SISO.
    pub total: Decimal,
    /// `total` plus scaled tax, policy, commission and petty cash.
    pub sub_total: Decimal,
    /// `sub_total` loaded with the additional-cost utility rate.
    pub final_total: Decimal,
    /// Divisor that strips the AIU layers back out of `final_total`.
    pub sum_percents: Decimal,
}

/// Cost rollup engine.
pub struct RollupEngine;

impl RollupEngine {
    /// Builds the full report for a configured quotation.
    #[must_use]
    pub fn build(input: &RollupInput<'_>) -> QuotationReport {
        let (report, _) = Self::build_with_totals(input);
        report
    }

    /// Builds the report and returns the intermediate totals alongside it.
    #[must_use]
    pub fn build_with_totals(input: &RollupInput<'_>) -> (QuotationReport, RollupTotals) {
        let add = input.additional_cost;
        let pct = input.percentage;

        // 1. direct cost base
        let direct_cost: Decimal = input.details.iter().map(|d| d.total_cost).sum();
        let total = direct_cost + rate(add.per_diem) + rate(add.siso_value);

        // 2. rate-scaled extras
        let tax = rate(add.tax) * total * RATE_COST_FACTOR;
        let policy = rate(add.policy) * total * RATE_COST_FACTOR;
        let commission = rate(add.commission) * total * COMMISSION_COST_FACTOR;
        let petty_cash = rate(add.petty_cash) * total * RATE_COST_FACTOR;

        // 3. share of direct cost per item
        let total_by_item = Self::total_by_item(input.details);
        let sum_total_items: Decimal = total_by_item.values().copied().sum();

        // 4. subtotal and final total
        let sub_total = total + tax + policy + commission + petty_cash;
        let final_total = sub_total * rate(add.utility) + sub_total;

        // 5. blended divisor
        let administration_rate = rate(pct.administration);
        let unforeseen_rate = rate(pct.unforeseen);
        let utility_rate = rate(pct.utility);
        let vat_rate = rate(pct.vat);
        let sum_percents = administration_rate
            + unforeseen_rate
            + utility_rate
            + (utility_rate * vat_rate)
            + Decimal::ONE;

        // 6. per-item apportionment
        let items: Vec<QuotationItemSummary> = input
            .items
            .iter()
            .map(|item| {
                let item_direct = total_by_item.get(&item.id).copied().unwrap_or_default();
                let percentage = share_of(item_direct, sum_total_items);
                Self::apportion(item, percentage, final_total, sum_percents)
            })
            .collect();

        // 7. AIU summary
        let unit_value_aiu: Decimal = items.iter().map(|i| i.total_cost).sum();
        let administration = unit_value_aiu * administration_rate;
        let unforeseen = unit_value_aiu * unforeseen_rate;
        let utility = unit_value_aiu * utility_rate;
        let vat = (unit_value_aiu * utility_rate) * vat_rate;
        let total_value = unit_value_aiu + (administration + unforeseen + utility) + vat;

        let summary = QuotationSummary {
            unit_value_aiu,
            administration,
            unforeseen,
            utility,
            vat,
            unit_value_aiu_included: total_value,
            total_value,
        };

        // 8. additional cost breakdown
        let additional_cost = QuotationAdditionalCostSummary {
            per_diem: rate(add.per_diem),
            siso_value: rate(add.siso_value),
            tax,
            commission,
            petty_cash,
            policy,
            utility: rate(add.utility) * sub_total,
            direct_cost,
        };

        let totals = RollupTotals {
            direct_cost,
            total,
            sub_total,
            final_total,
            sum_percents,
        };

        (
            QuotationReport {
                items,
                summary,
                additional_cost,
            },
            totals,
        )
    }

    /// Sums detail total costs per parent item.
    fn total_by_item(details: &[QuotationItemDetail]) -> HashMap<QuotationItemId, Decimal> {
        let mut totals: HashMap<QuotationItemId, Decimal> = HashMap::new();
        for detail in details {
            *totals.entry(detail.quotation_item_id).or_default() += detail.total_cost;
        }
        totals
    }

    /// Apportions `final_total` to one item. Zero quantity yields zeros.
    fn apportion(
        item: &QuotationItem,
        percentage: Decimal,
        final_total: Decimal,
        sum_percents: Decimal,
    ) -> QuotationItemSummary {
        let first_sum = if item.quantity > Decimal::ZERO {
            (final_total * (percentage / Decimal::ONE_HUNDRED))
                .checked_div(item.quantity)
                .unwrap_or_default()
        } else {
            Decimal::ZERO
        };
        let unit_value = first_sum.checked_div(sum_percents).unwrap_or_default();

        QuotationItemSummary {
            quotation_item_id: item.id,
            quantity: item.quantity,
            percentage,
            first_sum,
            unit_value,
            total_cost: item.quantity * unit_value,
        }
    }
}

/// Missing amounts and rates count as zero.
fn rate(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// `part / whole × 100`, or zero when there is nothing to share.
fn share_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .map_or(Decimal::ZERO, |ratio| ratio * Decimal::ONE_HUNDRED)
}
