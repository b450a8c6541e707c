/// Database configuration, connection management, and table creation
pub mod database;

/// Mechanic roster loading and seeding from config.toml
pub mod mechanics;
