//! `SeaORM` Entity for quotations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub client: Option<String>,
    pub builder: Option<String>,
    pub responsible_employee_id: Option<i32>,
    pub status_id: Option<i32>,
    #[sea_orm(unique)]
    pub consecutive_code: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub total_cost: Option<Decimal>,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quotation_items::Entity")]
    QuotationItems,
    #[sea_orm(has_one = "super::quotation_percentages::Entity")]
    QuotationPercentages,
    #[sea_orm(has_one = "super::quotation_additional_costs::Entity")]
    QuotationAdditionalCosts,
}

impl Related<super::quotation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationItems.def()
    }
}

impl Related<super::quotation_percentages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationPercentages.def()
    }
}

impl Related<super::quotation_additional_costs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationAdditionalCosts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
