//! Receivable entity - A customer debt tracked until it is paid off.
//!
//! `balance = max(0, principal - sum(payments))` and `status` is a pure
//! function of the balance. Receivables are created manually or imported
//! from ledger items tagged "Pendiente"; `ledger_item_id` is the import
//! idempotency key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment progress of a receivable or payable account.
///
/// Stored with the legacy Spanish labels used by exported reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ReceivableStatus {
    /// No payment applied yet
    #[sea_orm(string_value = "Pendiente")]
    #[serde(rename = "Pendiente")]
    Pending,
    /// Partially paid, balance still outstanding
    #[sea_orm(string_value = "Abonado")]
    #[serde(rename = "Abonado")]
    PartiallyPaid,
    /// Fully paid, balance at zero
    #[sea_orm(string_value = "Liquidado")]
    #[serde(rename = "Liquidado")]
    Settled,
}

/// Receivable account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receivables")]
pub struct Model {
    /// Unique identifier for the receivable
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Debtor (customer) name
    pub client: String,
    /// Date the debt originated
    pub date: Date,
    /// What the debt is for
    pub concept: String,
    /// Original amount owed
    pub principal: f64,
    /// Outstanding balance, clamped at zero
    pub balance: f64,
    /// Payment progress, derived from the balance
    pub status: ReceivableStatus,
    /// `"manual"` for operator-entered rows, `"registro"` for imports
    pub origin: String,
    /// Source ledger entry for imported rows
    pub ledger_entry_id: Option<i64>,
    /// Source ledger item for imported rows (import idempotency key)
    pub ledger_item_id: Option<i64>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between Receivable and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One receivable has many applied payments
    #[sea_orm(has_many = "super::receivable_payment::Entity")]
    Payments,
}

impl Related<super::receivable_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
