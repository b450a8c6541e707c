//! Purchase item entity - One line of a supplier invoice.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase detail line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning purchase
    pub purchase_id: i64,
    /// Description of the goods
    pub description: String,
    /// Units bought
    pub quantity: i32,
    /// Price per unit
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub subtotal: f64,
    /// `"manual"` or `"registro"` when cross-referenced from the ledger
    pub origin: Option<String>,
    /// Source ledger item when cross-referenced
    pub ledger_item_id: Option<i64>,
}

/// Defines relationships between `PurchaseItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one purchase
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
