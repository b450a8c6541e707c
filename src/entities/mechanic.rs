//! Mechanic entity - The workshop staff eligible for labor commissions.
//!
//! Each mechanic carries a *current* commission percentage. Settlements
//! snapshot the rate at generation time, so editing this field never
//! rewrites historical payouts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mechanic database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mechanics")]
pub struct Model {
    /// Unique identifier for the mechanic
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the mechanic
    pub name: String,
    /// Current commission percentage applied to labor lines (e.g. 10.0)
    pub commission_rate: f64,
    /// Soft delete flag - inactive mechanics are hidden but history remains
    pub active: bool,
}

/// Defines relationships between Mechanic and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One mechanic has many ledger labor lines
    #[sea_orm(has_many = "super::ledger_item::Entity")]
    LedgerItems,
    /// One mechanic has many pending adjustments
    #[sea_orm(has_many = "super::pending_adjustment::Entity")]
    PendingAdjustments,
    /// One mechanic has many settlements
    #[sea_orm(has_many = "super::settlement::Entity")]
    Settlements,
}

impl Related<super::ledger_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerItems.def()
    }
}

impl Related<super::pending_adjustment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PendingAdjustments.def()
    }
}

impl Related<super::settlement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settlements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
