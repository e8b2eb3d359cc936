//! Quotation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use obrix_shared::types::{InputId, QuotationId, QuotationItemDetailId, QuotationItemId};

/// Part of a quotation that must exist before a full report can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingConfiguration {
    /// The quotation itself does not resolve.
    Quotation,
    /// The quotation has no line items.
    Items,
    /// No overhead percentage row.
    Percentage,
    /// No additional cost row.
    AdditionalCost,
}

impl std::fmt::Display for MissingConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quotation => write!(f, "quotation"),
            Self::Items => write!(f, "items"),
            Self::Percentage => write!(f, "percentage"),
            Self::AdditionalCost => write!(f, "additional cost"),
        }
    }
}

/// Quotation-related errors.
#[derive(Debug, Error)]
pub enum QuotationError {
    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    NotFound(QuotationId),

    /// Quotation item not found.
    #[error("Quotation item not found: {0}")]
    ItemNotFound(QuotationItemId),

    /// Quotation item detail not found.
    #[error("Quotation item detail not found: {0}")]
    DetailNotFound(QuotationItemDetailId),

    /// Catalog input not found.
    #[error("Input not found: {0}")]
    InputNotFound(InputId),

    /// Quotation exists but cannot be priced yet.
    #[error("Quotation {quotation_id} is not fully configured: missing {missing}")]
    NotConfigured {
        /// Quotation ID.
        quotation_id: QuotationId,
        /// First missing part found.
        missing: MissingConfiguration,
    },

    /// Performance (yield) must be strictly positive.
    #[error("Performance must be greater than zero, got {0}")]
    InvalidPerformance(Decimal),

    /// Amount or rate cannot be negative.
    #[error("{field} cannot be negative, got {value}")]
    NegativeValue {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Amount or derived value does not fit the stored precision.
    #[error("{field} is out of range, got {value}")]
    AmountOutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl QuotationError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Create a negative value error.
    #[must_use]
    pub const fn negative(field: &'static str, value: Decimal) -> Self {
        Self::NegativeValue { field, value }
    }

    /// Create an out-of-range error.
    #[must_use]
    pub const fn out_of_range(field: &'static str, value: Decimal) -> Self {
        Self::AmountOutOfRange { field, value }
    }

    /// Returns true for caller mistakes (as opposed to storage failures).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPerformance(_)
                | Self::NegativeValue { .. }
                | Self::AmountOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_configured_message_names_missing_part() {
        let err = QuotationError::NotConfigured {
            quotation_id: QuotationId::new(12),
            missing: MissingConfiguration::AdditionalCost,
        };

        assert_eq!(
            err.to_string(),
            "Quotation 12 is not fully configured: missing additional cost"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(QuotationError::InvalidPerformance(dec!(0)).is_validation());
        assert!(QuotationError::negative("quantity", dec!(-1)).is_validation());
        assert!(QuotationError::out_of_range("total", dec!(10000000000000000)).is_validation());
        assert!(!QuotationError::repository("timeout").is_validation());
        assert!(!QuotationError::NotFound(QuotationId::new(1)).is_validation());
    }
}
