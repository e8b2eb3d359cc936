//! Typed IDs for type-safe entity references.
//!
//! Rows are keyed by database-generated integers. Wrapping them keeps a
//! `QuotationItemId` from being passed where a `QuotationId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wraps a raw database key.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(QuotationId, "Unique identifier for a quotation.");
typed_id!(QuotationItemId, "Unique identifier for a quotation line item.");
typed_id!(
    QuotationItemDetailId,
    "Unique identifier for an input consumed by a quotation item."
);
typed_id!(InputId, "Unique identifier for a catalog input (material or resource).");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(QuotationStatusId, "Unique identifier for a quotation status.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
