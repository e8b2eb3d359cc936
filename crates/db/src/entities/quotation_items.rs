//! `SeaORM` Entity for quotation_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotation_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub quotation_id: i32,
    pub item: String,
    pub technical_specification: Option<String>,
    pub unit_of_measure: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotations::Entity",
        from = "Column::QuotationId",
        to = "super::quotations::Column::Id",
        on_delete = "Cascade"
    )]
    Quotations,
    #[sea_orm(has_many = "super::quotation_item_details::Entity")]
    QuotationItemDetails,
}

impl Related<super::quotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl Related<super::quotation_item_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationItemDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
