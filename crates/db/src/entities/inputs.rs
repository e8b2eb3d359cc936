//! `SeaORM` Entity for the inputs catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inputs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub unit: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub performance: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quotation_item_details::Entity")]
    QuotationItemDetails,
}

impl Related<super::quotation_item_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationItemDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
