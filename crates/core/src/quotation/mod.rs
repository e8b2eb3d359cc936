//! Quotation pricing and cost rollup.
//!
//! Direct cost flows up from item details (inputs consumed per item), gets
//! loaded with additional costs and AIU overheads, and is apportioned back
//! across the line items as a blended unit price.

pub mod error;
pub mod pricing;
pub mod rollup;
pub mod service;
pub mod types;


pub use error::{MissingConfiguration, QuotationError};
pub use pricing::{DerivedDetail, DetailPricing, MAX_AMOUNT, MAX_RATE, PricingService};
pub use rollup::{
    COMMISSION_COST_FACTOR, RATE_COST_FACTOR, RollupEngine, RollupInput, RollupTotals,
};
pub use service::{QuotationReportService, QuotationRepository};
pub use types::{
    AdditionalCostValues, CreateItemDetailInput, CreateItemInput, CreateQuotationInput, Input,
    PercentageValues, PricedItem, Quotation, QuotationAdditionalCost,
    QuotationAdditionalCostSummary, QuotationItem, QuotationItemDetail, QuotationItemSummary,
    QuotationPercentage, QuotationReport, QuotationSummary, UpdateItemDetailInput,
    UpdateItemInput, UpdateQuotationInput,
};
