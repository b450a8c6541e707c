//! Ledger entry entity - One header per recorded customer visit or movement.
//!
//! Line items hang off this header; the header's date is what classifies
//! items into a register day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry (header) database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar date of the movement (`YYYY-MM-DD`)
    pub date: Date,
    /// Customer or counterparty name
    pub client: String,
}

/// Defines relationships between `LedgerEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One entry has many line items
    #[sea_orm(has_many = "super::ledger_item::Entity")]
    Items,
}

impl Related<super::ledger_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
