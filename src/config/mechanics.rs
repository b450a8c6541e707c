//! Mechanic roster configuration loading from config.toml
//!
//! The mechanics defined in config.toml are used to seed the database on
//! first run. Seeding is by name: mechanics already present keep their
//! stored commission rate (rates are edited through
//! [`crate::core::mechanic::update_commission_rate`], not the config file).

use crate::entities::{Mechanic, mechanic};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of mechanics to seed
    pub mechanics: Vec<MechanicConfig>,
}

/// Configuration for a single mechanic
#[derive(Debug, Deserialize, Clone)]
pub struct MechanicConfig {
    /// Display name of the mechanic
    pub name: String,
    /// Commission percentage applied to labor lines
    pub commission_rate: f64,
}

/// Loads the mechanic roster from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the mechanic roster from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds the mechanics table from configuration.
///
/// Inserts any configured mechanic whose name is not already present.
/// Returns the number of mechanics inserted.
pub async fn seed_initial_mechanics(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut inserted = 0;
    for entry in &config.mechanics {
        let existing = Mechanic::find()
            .filter(mechanic::Column::Name.eq(entry.name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }
        let model = mechanic::ActiveModel {
            name: Set(entry.name.clone()),
            commission_rate: Set(entry.commission_rate),
            active: Set(true),
            ..Default::default()
        };
        model.insert(db).await?;
        inserted += 1;
    }
    Ok(inserted)
}
