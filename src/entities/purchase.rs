//! Purchase entity - A supplier invoice with its running payment state.
//!
//! `balance = total - paid` and `status` is a pure function of the pair.
//! Purchases with an outstanding balance form the accounts-payable list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment progress of a supplier purchase.
///
/// Stored with the legacy lowercase Spanish labels used by exported reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PurchaseStatus {
    /// Nothing paid yet
    #[sea_orm(string_value = "pendiente")]
    #[serde(rename = "pendiente")]
    Pending,
    /// Partially paid
    #[sea_orm(string_value = "parcial")]
    #[serde(rename = "parcial")]
    Partial,
    /// Fully paid
    #[sea_orm(string_value = "pagado")]
    #[serde(rename = "pagado")]
    Paid,
}

/// Purchase (header) database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier the goods were bought from
    pub supplier_id: i64,
    /// Supplier invoice number
    pub invoice_number: Option<String>,
    /// Date the goods were received
    pub received_on: Date,
    /// Payment terms, e.g. `"contado"` (cash) or `"credito"`
    pub payment_terms: String,
    /// Invoice total (sum of item subtotals)
    pub total: f64,
    /// Amount paid so far
    pub paid: f64,
    /// Outstanding balance (`total - paid`)
    pub balance: f64,
    /// Payment progress, derived from total/paid
    pub status: PurchaseStatus,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// One purchase has many detail lines
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    Items,
    /// One purchase has many payments
    #[sea_orm(has_many = "super::purchase_payment::Entity")]
    Payments,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::purchase_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
