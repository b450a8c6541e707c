//! Settlement labor snapshot - By-value copy of each labor line consumed by
//! a settlement (base amount, rate, and computed commission at settlement
//! time). Later changes to the mechanic's rate never alter these rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement labor detail database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settlement_labor")]
pub struct Model {
    /// Unique identifier for the snapshot row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning settlement
    pub settlement_id: i64,
    /// Source ledger line item
    pub ledger_item_id: i64,
    /// Labor base amount at settlement time
    pub base_amount: f64,
    /// Commission percentage applied
    pub commission_rate: f64,
    /// Commission computed for this line
    pub commission_amount: f64,
}

/// Defines relationships between `SettlementLabor` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one settlement
    #[sea_orm(
        belongs_to = "super::settlement::Entity",
        from = "Column::SettlementId",
        to = "super::settlement::Column::Id"
    )]
    Settlement,
}

impl Related<super::settlement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settlement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
