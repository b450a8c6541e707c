//! Ledger item entity - One transaction line under a ledger entry.
//!
//! Items are immutable facts: once written they are only ever touched by
//! settlement generation, which stamps `settlement_id` and the computed
//! `commission`. An item with a `settlement_id` is consumed and must never
//! enter another commission computation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the ledger entry (header) this line belongs to
    pub entry_id: i64,
    /// Quantity sold or consumed
    pub quantity: i32,
    /// Human-readable description of the line
    pub description: String,
    /// Transaction class, e.g. `"Mano de Obra"`, `"Venta"`, `"Gasto"`
    pub transaction_type: String,
    /// Monetary amount of the line
    pub amount: f64,
    /// Mechanic who performed the work, for labor lines
    pub mechanic_id: Option<i64>,
    /// Commission computed at settlement time (0 until settled)
    pub commission: f64,
    /// Payment tag: `"Pagado (Efectivo)"`, `"Pagado (Transferencia)"`,
    /// or `"Pendiente"`
    pub payment_method: String,
    /// Settlement that consumed this labor line, if any
    pub settlement_id: Option<i64>,
}

/// Defines relationships between `LedgerItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one ledger entry
    #[sea_orm(
        belongs_to = "super::ledger_entry::Entity",
        from = "Column::EntryId",
        to = "super::ledger_entry::Column::Id"
    )]
    Entry,
    /// Labor lines reference the mechanic who performed the work
    #[sea_orm(
        belongs_to = "super::mechanic::Entity",
        from = "Column::MechanicId",
        to = "super::mechanic::Column::Id"
    )]
    Mechanic,
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl Related<super::mechanic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mechanic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
