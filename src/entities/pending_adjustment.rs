//! Pending adjustment entity - Ad-hoc income/deduction entries for a
//! mechanic, awaiting the next settlement.
//!
//! Every outstanding adjustment for a mechanic is swept into that mechanic's
//! next settlement regardless of the settlement's date range, then deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an adjustment adds to or subtracts from the payout.
///
/// Stored (and serialized) with the legacy Spanish labels, which are part of
/// the exported-report contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AdjustmentKind {
    /// Extra income owed to the mechanic (bonus, reimbursement)
    #[sea_orm(string_value = "INGRESO")]
    #[serde(rename = "INGRESO")]
    Income,
    /// Deduction from the payout (advance, tool damage)
    #[sea_orm(string_value = "DESCUENTO")]
    #[serde(rename = "DESCUENTO")]
    Deduction,
}

/// Pending adjustment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_adjustments")]
pub struct Model {
    /// Unique identifier for the adjustment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Mechanic this adjustment belongs to
    pub mechanic_id: i64,
    /// Income or deduction
    pub kind: AdjustmentKind,
    /// Short category label, e.g. "Adelanto", "Bono"
    pub category: String,
    /// Free-text detail
    pub description: Option<String>,
    /// Positive monetary amount
    pub amount: f64,
    /// Date the adjustment applies to
    pub date: Date,
    /// When the adjustment was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PendingAdjustment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each adjustment belongs to one mechanic
    #[sea_orm(
        belongs_to = "super::mechanic::Entity",
        from = "Column::MechanicId",
        to = "super::mechanic::Column::Id"
    )]
    Mechanic,
}

impl Related<super::mechanic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mechanic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
