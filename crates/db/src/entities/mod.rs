//! `SeaORM` entity definitions.

pub mod inputs;
pub mod quotation_additional_costs;
pub mod quotation_item_details;
pub mod quotation_items;
pub mod quotation_percentages;
pub mod quotations;

pub mod prelude {
    //! Entity re-exports.
    pub use super::inputs::Entity as Inputs;
    pub use super::quotation_additional_costs::Entity as QuotationAdditionalCosts;
    pub use super::quotation_item_details::Entity as QuotationItemDetails;
    pub use super::quotation_items::Entity as QuotationItems;
    pub use super::quotation_percentages::Entity as QuotationPercentages;
    pub use super::quotations::Entity as Quotations;
}
