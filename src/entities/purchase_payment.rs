//! Purchase payment entity - One abono applied against a supplier invoice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase payment (abono) database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Purchase this payment applies to
    pub purchase_id: i64,
    /// Date the payment was made
    pub date: Date,
    /// Amount paid
    pub amount: f64,
    /// Optional payment method tag
    pub payment_method: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between `PurchasePayment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
