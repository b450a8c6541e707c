//! Monthly mechanic goal business logic.
//!
//! Each active mechanic can carry one labor target per calendar month.
//! The listing always covers the whole active roster, defaulting missing
//! targets to zero, so the month view never has holes.

use crate::{
    entities::{Mechanic, MechanicGoal, mechanic, mechanic_goal},
    errors::{Error, Result},
    money::round2,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;

/// One mechanic's target for a month, zero if none was set.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyGoal {
    /// The mechanic
    pub mechanic_id: i64,
    /// Mechanic name at read time
    pub mechanic: String,
    /// Labor amount targeted for the month
    pub goal: f64,
}

/// Lists the month's goals for every active mechanic, ordered by name.
///
/// Mechanics without a stored target appear with a goal of zero.
pub async fn list_monthly_goals(
    db: &DatabaseConnection,
    year: i32,
    month: i32,
) -> Result<Vec<MonthlyGoal>> {
    validate_month(month)?;

    let mechanics = Mechanic::find()
        .filter(mechanic::Column::Active.eq(true))
        .order_by_asc(mechanic::Column::Name)
        .all(db)
        .await?;

    let stored: HashMap<i64, f64> = MechanicGoal::find()
        .filter(mechanic_goal::Column::Year.eq(year))
        .filter(mechanic_goal::Column::Month.eq(month))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.mechanic_id, g.goal))
        .collect();

    Ok(mechanics
        .into_iter()
        .map(|m| {
            let goal = stored.get(&m.id).copied().unwrap_or(0.0);
            MonthlyGoal {
                mechanic_id: m.id,
                mechanic: m.name,
                goal,
            }
        })
        .collect())
}

/// Sets or replaces a mechanic's target for a month.
///
/// At most one row exists per (mechanic, year, month); a second upsert for
/// the same month overwrites the stored amount.
pub async fn upsert_goal(
    db: &DatabaseConnection,
    mechanic_id: i64,
    year: i32,
    month: i32,
    goal: f64,
) -> Result<mechanic_goal::Model> {
    validate_month(month)?;
    if goal < 0.0 || !goal.is_finite() {
        return Err(Error::InvalidAmount { amount: goal });
    }

    let txn = db.begin().await?;

    Mechanic::find_by_id(mechanic_id)
        .filter(mechanic::Column::Active.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::MechanicNotFound { id: mechanic_id })?;

    let existing = MechanicGoal::find()
        .filter(mechanic_goal::Column::MechanicId.eq(mechanic_id))
        .filter(mechanic_goal::Column::Year.eq(year))
        .filter(mechanic_goal::Column::Month.eq(month))
        .one(&txn)
        .await?;

    let saved = match existing {
        Some(row) => {
            let mut active: mechanic_goal::ActiveModel = row.into();
            active.goal = Set(round2(goal));
            active.update(&txn).await?
        }
        None => {
            mechanic_goal::ActiveModel {
                mechanic_id: Set(mechanic_id),
                year: Set(year),
                month: Set(month),
                goal: Set(round2(goal)),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;
    Ok(saved)
}

fn validate_month(month: i32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(Error::Validation {
            message: format!("Month must be between 1 and 12, got {month}"),
        });
    }
    Ok(())
}
