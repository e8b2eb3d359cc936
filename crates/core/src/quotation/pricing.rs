//! Derived pricing for items and item details.
//!
//! Detail quantity and total cost are never set directly: they are always
//! recomputed from the parent item quantity and the detail's own
//! performance and unit cost.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::QuotationError;
use super::types::{AdditionalCostValues, Input, PercentageValues, QuotationItemDetail};

/// Decimal places kept on persisted detail total costs.
pub const TOTAL_COST_SCALE: u32 = 2;

/// Exclusive upper bound of stored amounts and quantities (`NUMERIC(19, 4)`).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Exclusive upper bound of stored rates (`NUMERIC(9, 6)`).
pub const MAX_RATE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Unit cost and performance resolved for a detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPricing {
    /// Unit cost of the input.
    pub unit_cost: Decimal,
    /// Units of item produced per unit of input.
    pub performance: Decimal,
}

/// Derived fields of a detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedDetail {
    /// Input units needed for the item quantity.
    pub quantity: Decimal,
    /// Cost of those units, rounded to cents.
    pub total_cost: Decimal,
}

/// Pricing rules for items and details.
pub struct PricingService;

impl PricingService {
    /// Input units needed: `ceil(item_quantity / performance)`.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::InvalidPerformance` if performance is not strictly positive
    /// and `QuotationError::AmountOutOfRange` if the quantity cannot be stored.
    pub fn detail_quantity(
        item_quantity: Decimal,
        performance: Decimal,
    ) -> Result<Decimal, QuotationError> {
        if performance <= Decimal::ZERO {
            return Err(QuotationError::InvalidPerformance(performance));
        }

        let exact = item_quantity
            .checked_div(performance)
            .ok_or_else(|| QuotationError::out_of_range("detail_quantity", item_quantity))?;
        let quantity = within("detail_quantity", exact, MAX_AMOUNT)?.ceil();
        within("detail_quantity", quantity, MAX_AMOUNT)
    }

    /// `round(unit_cost × quantity, 2)`, half away from zero.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::AmountOutOfRange` if the product cannot be stored.
    pub fn detail_total_cost(unit_cost: Decimal, quantity: Decimal) -> Result<Decimal, QuotationError> {
        let total = unit_cost
            .checked_mul(quantity)
            .ok_or_else(|| QuotationError::out_of_range("detail_total_cost", unit_cost))?
            .round_dp_with_strategy(TOTAL_COST_SCALE, RoundingStrategy::MidpointAwayFromZero);
        within("detail_total_cost", total, MAX_AMOUNT)
    }

    /// `quantity × unit_price`.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::AmountOutOfRange` if the product cannot be stored.
    pub fn item_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, QuotationError> {
        let total = quantity
            .checked_mul(unit_price)
            .ok_or_else(|| QuotationError::out_of_range("total", quantity))?;
        within("total", total, MAX_AMOUNT)
    }

    /// Derives quantity and total cost of a detail.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::InvalidPerformance` if performance is not strictly positive
    /// and `QuotationError::AmountOutOfRange` if a derived value cannot be stored.
    pub fn derive_detail(
        item_quantity: Decimal,
        pricing: DetailPricing,
    ) -> Result<DerivedDetail, QuotationError> {
        let quantity = Self::detail_quantity(item_quantity, pricing.performance)?;
        Ok(DerivedDetail {
            quantity,
            total_cost: Self::detail_total_cost(pricing.unit_cost, quantity)?,
        })
    }

    /// Resolves pricing for a new detail: explicit values win over catalog values.
    #[must_use]
    pub fn resolve_new(
        input: &Input,
        unit_cost: Option<Decimal>,
        performance: Option<Decimal>,
    ) -> DetailPricing {
        DetailPricing {
            unit_cost: unit_cost.unwrap_or(input.cost),
            performance: performance.unwrap_or(input.performance),
        }
    }

    /// Resolves pricing for an updated detail.
    ///
    /// When the input changes (`new_input` is set), values not explicitly given
    /// are re-read from the new input; otherwise the stored values are kept.
    #[must_use]
    pub fn resolve_update(
        current: &QuotationItemDetail,
        new_input: Option<&Input>,
        unit_cost: Option<Decimal>,
        performance: Option<Decimal>,
    ) -> DetailPricing {
        let (base_cost, base_performance) = match new_input {
            Some(input) => (input.cost, input.performance),
            None => (current.unit_cost, current.performance),
        };

        DetailPricing {
            unit_cost: unit_cost.unwrap_or(base_cost),
            performance: performance.unwrap_or(base_performance),
        }
    }

    /// Validates the amounts of an item.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::NegativeValue` for a negative quantity or unit price
    /// and `QuotationError::AmountOutOfRange` for one that cannot be stored.
    pub fn validate_item(quantity: Decimal, unit_price: Decimal) -> Result<(), QuotationError> {
        amount("quantity", Some(quantity))?;
        amount("unit_price", Some(unit_price))
    }

    /// Validates detail pricing.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or oversized cost and for a performance
    /// that is not strictly positive or cannot be stored.
    pub fn validate_detail(pricing: DetailPricing) -> Result<(), QuotationError> {
        amount("unit_cost", Some(pricing.unit_cost))?;
        if pricing.performance <= Decimal::ZERO {
            return Err(QuotationError::InvalidPerformance(pricing.performance));
        }
        within("performance", pricing.performance, MAX_AMOUNT).map(drop)
    }

    /// Validates overhead percentages.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::NegativeValue` for any negative rate and
    /// `QuotationError::AmountOutOfRange` for a rate of 1000 or more.
    pub fn validate_percentages(values: &PercentageValues) -> Result<(), QuotationError> {
        rate("administration", values.administration)?;
        rate("unforeseen", values.unforeseen)?;
        rate("utility", values.utility)?;
        rate("vat", values.vat)
    }

    /// Validates additional costs.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::NegativeValue` for any negative amount or rate and
    /// `QuotationError::AmountOutOfRange` for one that cannot be stored.
    pub fn validate_additional_costs(values: &AdditionalCostValues) -> Result<(), QuotationError> {
        amount("per_diem", values.per_diem)?;
        amount("siso_value", values.siso_value)?;
        rate("tax", values.tax)?;
        rate("commission", values.commission)?;
        rate("petty_cash", values.petty_cash)?;
        rate("policy", values.policy)?;
        rate("utility", values.utility)
    }
}

/// `0 <= value < MAX_AMOUNT`, when present.
fn amount(field: &'static str, value: Option<Decimal>) -> Result<(), QuotationError> {
    bounded(field, value, MAX_AMOUNT)
}

/// `0 <= value < MAX_RATE`, when present.
fn rate(field: &'static str, value: Option<Decimal>) -> Result<(), QuotationError> {
    bounded(field, value, MAX_RATE)
}

fn bounded(field: &'static str, value: Option<Decimal>, max: Decimal) -> Result<(), QuotationError> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(QuotationError::negative(field, v)),
        Some(v) => within(field, v, max).map(drop),
        None => Ok(()),
    }
}

fn within(field: &'static str, value: Decimal, max: Decimal) -> Result<Decimal, QuotationError> {
    if value.abs() >= max {
        return Err(QuotationError::out_of_range(field, value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obrix_shared::types::{InputId, QuotationItemDetailId, QuotationItemId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn cement() -> Input {
        Input {
            id: InputId::new(1),
            name: "Cement 50kg".to_string(),
            unit: Some("bag".to_string()),
            cost: dec!(32000),
            performance: dec!(4),
        }
    }

    fn stored_detail() -> QuotationItemDetail {
        QuotationItemDetail {
            id: QuotationItemDetailId::new(1),
            quotation_item_id: QuotationItemId::new(1),
            input_id: InputId::new(1),
            quantity: dec!(3),
            performance: dec!(2.5),
            unit_cost: dec!(1000),
            total_cost: dec!(3000),
        }
    }

    #[rstest]
    #[case(dec!(100), dec!(12.5), dec!(8))]
    #[case(dec!(100), dec!(12), dec!(9))]
    #[case(dec!(10), dec!(2), dec!(5))]
    #[case(dec!(0), dec!(3), dec!(0))]
    #[case(dec!(1), dec!(1000), dec!(1))]
    #[case(dec!(7.5), dec!(0.5), dec!(15))]
    fn test_detail_quantity_rounds_up(
        #[case] item_quantity: Decimal,
        #[case] performance: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(
            PricingService::detail_quantity(item_quantity, performance).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-2))]
    fn test_detail_quantity_rejects_non_positive_performance(#[case] performance: Decimal) {
        assert!(matches!(
            PricingService::detail_quantity(dec!(10), performance),
            Err(QuotationError::InvalidPerformance(_))
        ));
    }

    #[test]
    fn test_detail_total_cost_rounds_to_cents() {
        assert_eq!(
            PricingService::detail_total_cost(dec!(15.3333), dec!(8)).unwrap(),
            dec!(122.67)
        );
        assert_eq!(
            PricingService::detail_total_cost(dec!(0.125), dec!(1)).unwrap(),
            dec!(0.13)
        );
        assert_eq!(
            PricingService::detail_total_cost(dec!(50), dec!(5)).unwrap(),
            dec!(250)
        );
    }

    #[test]
    fn test_item_total() {
        assert_eq!(
            PricingService::item_total(dec!(10), dec!(12.5)).unwrap(),
            dec!(125)
        );
    }

    #[rstest]
    #[case(dec!(100000000000000000000), dec!(100000000000000000000))]
    #[case(dec!(100000000), dec!(10000000))]
    #[case(dec!(999999999999999.9999), dec!(2))]
    fn test_item_total_out_of_range(#[case] quantity: Decimal, #[case] unit_price: Decimal) {
        assert!(matches!(
            PricingService::item_total(quantity, unit_price),
            Err(QuotationError::AmountOutOfRange { field: "total", .. })
        ));
    }

    #[test]
    fn test_item_total_just_below_bound() {
        assert_eq!(
            PricingService::item_total(dec!(99999999999999.99), dec!(10)).unwrap(),
            dec!(999999999999999.9)
        );
    }

    #[rstest]
    #[case(dec!(100000000000000), dec!(100000000000000), dec!(0.0001), "detail_quantity")]
    #[case(dec!(1000000000000), dec!(1), dec!(0.0001), "detail_quantity")]
    #[case(dec!(1000), dec!(100000000000000), dec!(1), "detail_total_cost")]
    #[case(dec!(10), dec!(999999999999999), dec!(0.5), "detail_total_cost")]
    fn test_derive_detail_out_of_range(
        #[case] item_quantity: Decimal,
        #[case] unit_cost: Decimal,
        #[case] performance: Decimal,
        #[case] expected_field: &str,
    ) {
        let result = PricingService::derive_detail(
            item_quantity,
            DetailPricing {
                unit_cost,
                performance,
            },
        );

        match result {
            Err(QuotationError::AmountOutOfRange { field, .. }) => {
                assert_eq!(field, expected_field);
            }
            other => panic!("expected AmountOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_quantity_division_overflow() {
        assert!(matches!(
            PricingService::detail_quantity(Decimal::MAX, dec!(0.0000001)),
            Err(QuotationError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unstorable_inputs() {
        assert!(matches!(
            PricingService::validate_item(dec!(1000000000000000), dec!(1)),
            Err(QuotationError::AmountOutOfRange {
                field: "quantity",
                ..
            })
        ));
        assert!(matches!(
            PricingService::validate_detail(DetailPricing {
                unit_cost: dec!(1),
                performance: dec!(1000000000000000),
            }),
            Err(QuotationError::AmountOutOfRange {
                field: "performance",
                ..
            })
        ));
        assert!(matches!(
            PricingService::validate_percentages(&PercentageValues {
                vat: Some(dec!(1000)),
                ..PercentageValues::default()
            }),
            Err(QuotationError::AmountOutOfRange { field: "vat", .. })
        ));
        assert!(
            PricingService::validate_percentages(&PercentageValues {
                vat: Some(dec!(999.999999)),
                ..PercentageValues::default()
            })
            .is_ok()
        );
    }

    #[test]
    fn test_bounds_match_column_precision() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert_eq!(MAX_RATE, dec!(1000));
    }

    #[test]
    fn test_derive_detail() {
        let derived = PricingService::derive_detail(
            dec!(10),
            DetailPricing {
                unit_cost: dec!(50),
                performance: dec!(2),
            },
        )
        .unwrap();

        assert_eq!(derived.quantity, dec!(5));
        assert_eq!(derived.total_cost, dec!(250));
    }

    #[test]
    fn test_resolve_new_defaults_from_catalog() {
        let pricing = PricingService::resolve_new(&cement(), None, None);
        assert_eq!(pricing.unit_cost, dec!(32000));
        assert_eq!(pricing.performance, dec!(4));
    }

    #[test]
    fn test_resolve_new_prefers_explicit_values() {
        let pricing = PricingService::resolve_new(&cement(), Some(dec!(30000)), None);
        assert_eq!(pricing.unit_cost, dec!(30000));
        assert_eq!(pricing.performance, dec!(4));
    }

    #[test]
    fn test_resolve_update_keeps_stored_values_without_input_change() {
        let pricing = PricingService::resolve_update(&stored_detail(), None, None, None);
        assert_eq!(pricing.unit_cost, dec!(1000));
        assert_eq!(pricing.performance, dec!(2.5));
    }

    #[test]
    fn test_resolve_update_rereads_new_input() {
        let pricing =
            PricingService::resolve_update(&stored_detail(), Some(&cement()), None, Some(dec!(5)));
        assert_eq!(pricing.unit_cost, dec!(32000));
        assert_eq!(pricing.performance, dec!(5));
    }

    #[test]
    fn test_validate_item_rejects_negative_quantity() {
        assert!(matches!(
            PricingService::validate_item(dec!(-1), dec!(10)),
            Err(QuotationError::NegativeValue {
                field: "quantity",
                ..
            })
        ));
        assert!(PricingService::validate_item(dec!(0), dec!(0)).is_ok());
    }

    #[test]
    fn test_validate_percentages() {
        let mut values = PercentageValues {
            administration: Some(dec!(0.1)),
            unforeseen: None,
            utility: Some(dec!(0.2)),
            vat: Some(dec!(0.19)),
        };
        assert!(PricingService::validate_percentages(&values).is_ok());

        values.vat = Some(dec!(-0.19));
        assert!(PricingService::validate_percentages(&values).is_err());
    }

    #[test]
    fn test_validate_additional_costs() {
        let values = AdditionalCostValues {
            petty_cash: Some(dec!(-0.01)),
            ..AdditionalCostValues::default()
        };
        assert!(matches!(
            PricingService::validate_additional_costs(&values),
            Err(QuotationError::NegativeValue {
                field: "petty_cash",
                ..
            })
        ));
    }
}
