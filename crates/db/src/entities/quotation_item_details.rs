//! `SeaORM` Entity for quotation_item_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotation_item_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub quotation_item_id: i32,
    pub input_id: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub performance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_cost: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quotation_items::Entity",
        from = "Column::QuotationItemId",
        to = "super::quotation_items::Column::Id",
        on_delete = "Cascade"
    )]
    QuotationItems,
    #[sea_orm(
        belongs_to = "super::inputs::Entity",
        from = "Column::InputId",
        to = "super::inputs::Column::Id"
    )]
    Inputs,
}

impl Related<super::quotation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationItems.def()
    }
}

impl Related<super::inputs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inputs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
