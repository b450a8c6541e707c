//! Settlement adjustment snapshot - By-value copy of each pending
//! adjustment swept into a settlement. The pending row itself is deleted in
//! the same transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::pending_adjustment::AdjustmentKind;

/// Settlement adjustment detail database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settlement_adjustments")]
pub struct Model {
    /// Unique identifier for the snapshot row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning settlement
    pub settlement_id: i64,
    /// Income or deduction
    pub kind: AdjustmentKind,
    /// Category label copied from the pending adjustment
    pub category: String,
    /// Free-text detail copied from the pending adjustment
    pub description: Option<String>,
    /// Monetary amount copied from the pending adjustment
    pub amount: f64,
    /// Date copied from the pending adjustment
    pub date: Date,
}

/// Defines relationships between `SettlementAdjustment` and other entities
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
