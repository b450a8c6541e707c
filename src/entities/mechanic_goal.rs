//! Mechanic goal entity - Monthly labor target per mechanic.
//!
//! At most one row per (mechanic, year, month); the upsert in
//! [`crate::core::goal`] enforces this. Mechanics without a row for a
//! month simply have a goal of zero.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mechanic monthly goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mechanic_goals")]
pub struct Model {
    /// Unique identifier for the goal row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Mechanic the target applies to
    pub mechanic_id: i64,
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1 through 12
    pub month: i32,
    /// Labor amount targeted for the month
    pub goal: f64,
}

/// Defines relationships between `MechanicGoal` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each goal belongs to one mechanic
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
