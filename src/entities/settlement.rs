//! Settlement entity - Immutable commission payout record for a mechanic.
//!
//! A settlement is created atomically with its labor and adjustment
//! snapshots and never updated or deleted afterwards. The four totals are
//! each rounded to 2 decimals independently;
//! `net_payable = round2(total_commissions + total_income - total_deductions)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement (header) database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    /// Unique identifier for the settlement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Mechanic being paid out
    pub mechanic_id: i64,
    /// First day of the settled period (inclusive)
    pub period_start: Date,
    /// Last day of the settled period (inclusive)
    pub period_end: Date,
    /// Day the settlement was generated
    pub generated_on: Date,
    /// Sum of per-row rounded labor commissions, rounded
    pub total_commissions: f64,
    /// Sum of swept income adjustments, rounded
    pub total_income: f64,
    /// Sum of swept deduction adjustments, rounded
    pub total_deductions: f64,
    /// Net amount payable to the mechanic
    pub net_payable: f64,
    /// Free-text operator notes
    pub notes: Option<String>,
    /// When the settlement row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Settlement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each settlement belongs to one mechanic
    #[sea_orm(
        belongs_to = "super::mechanic::Entity",
        from = "Column::MechanicId",
        to = "super::mechanic::Column::Id"
    )]
    Mechanic,
    /// One settlement owns many labor snapshots
    #[sea_orm(has_many = "super::settlement_labor::Entity")]
    LaborLines,
    /// One settlement owns many adjustment snapshots
    #[sea_orm(has_many = "super::settlement_adjustment::Entity")]
    Adjustments,
}

impl Related<super::mechanic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mechanic.def()
    }
}

impl Related<super::settlement_labor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LaborLines.def()
    }
}

impl Related<super::settlement_adjustment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Adjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
