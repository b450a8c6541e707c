//! Mechanic roster business logic.
//!
//! Provides functions for creating, retrieving, and managing mechanics.
//! Rate edits only affect future commission computations; settlements store
//! by-value snapshots and are never touched.

use crate::{
    entities::{Mechanic, mechanic},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active mechanics, ordered alphabetically by name.
pub async fn get_active_mechanics(db: &DatabaseConnection) -> Result<Vec<mechanic::Model>> {
    Mechanic::find()
        .filter(mechanic::Column::Active.eq(true))
        .order_by_asc(mechanic::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a mechanic by id, returning None if not found.
pub async fn get_mechanic_by_id(
    db: &DatabaseConnection,
    mechanic_id: i64,
) -> Result<Option<mechanic::Model>> {
    Mechanic::find_by_id(mechanic_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new mechanic with the given commission percentage.
///
/// The name must be non-empty and the rate must lie in `0..=100`.
pub async fn create_mechanic(
    db: &DatabaseConnection,
    name: String,
    commission_rate: f64,
) -> Result<mechanic::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Mechanic name cannot be empty".to_string(),
        });
    }
    if !(0.0..=100.0).contains(&commission_rate) || !commission_rate.is_finite() {
        return Err(Error::InvalidAmount {
            amount: commission_rate,
        });
    }

    let model = mechanic::ActiveModel {
        name: Set(name.trim().to_string()),
        commission_rate: Set(commission_rate),
        active: Set(true),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Updates a mechanic's current commission percentage.
///
/// Only affects previews and settlements generated after this call.
pub async fn update_commission_rate(
    db: &DatabaseConnection,
    mechanic_id: i64,
    commission_rate: f64,
) -> Result<mechanic::Model> {
    if !(0.0..=100.0).contains(&commission_rate) || !commission_rate.is_finite() {
        return Err(Error::InvalidAmount {
            amount: commission_rate,
        });
    }

    let mechanic = Mechanic::find_by_id(mechanic_id)
        .one(db)
        .await?
        .ok_or(Error::MechanicNotFound { id: mechanic_id })?;

    let mut active: mechanic::ActiveModel = mechanic.into();
    active.commission_rate = Set(commission_rate);
    active.update(db).await.map_err(Into::into)
}

/// Deactivates a mechanic (soft delete). History is preserved.
pub async fn deactivate_mechanic(db: &DatabaseConnection, mechanic_id: i64) -> Result<()> {
    let mechanic = Mechanic::find_by_id(mechanic_id)
        .one(db)
        .await?
        .ok_or(Error::MechanicNotFound { id: mechanic_id })?;

    let mut active: mechanic::ActiveModel = mechanic.into();
    active.active = Set(false);
    active.update(db).await?;
    Ok(())
}
