//! Register day entity - One cash-drawer reconciliation cycle per calendar
//! date.
//!
//! State machine: no row -> open (closing fields null) -> closed
//! (`closed_at` set). There is no reopen transition. `expected_total` is
//! frozen at close time so later ledger edits cannot silently change a
//! closed day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash register day database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "register_days")]
pub struct Model {
    /// Unique identifier for the register day
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar date; at most one register per date
    #[sea_orm(unique)]
    pub date: Date,
    /// Declared opening float
    pub opening_amount: f64,
    /// When the register was opened
    pub opened_at: DateTimeUtc,
    /// Physically counted closing amount (null until closed)
    pub physical_amount: Option<f64>,
    /// Expected total computed from the ledger, frozen at close time
    pub expected_total: Option<f64>,
    /// `physical_amount - expected_total`
    pub variance: Option<f64>,
    /// Mandatory explanation when the variance is non-zero
    pub closing_note: Option<String>,
    /// When the register was closed; the day is closed iff this is set
    pub closed_at: Option<DateTimeUtc>,
}

/// `RegisterDay` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
