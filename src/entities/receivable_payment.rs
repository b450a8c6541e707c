//! Receivable payment entity - One abono (partial payment) applied against
//! a receivable. Deleting a payment restores the account balance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Receivable payment (abono) database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receivable_payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Receivable this payment applies to
    pub receivable_id: i64,
    /// Date the payment was received
    pub date: Date,
    /// Amount applied against the balance
    pub amount: f64,
    /// Optional payment method tag
    pub payment_method: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between `ReceivablePayment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one receivable
    #[sea_orm(
        belongs_to = "super::receivable::Entity",
        from = "Column::ReceivableId",
        to = "super::receivable::Column::Id"
    )]
    Receivable,
}

impl Related<super::receivable::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receivable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
