//! Shared test utilities for the garage back-office.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    core::{
        ledger::{self, NewLedgerItem},
        mechanic, receivable,
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed date used by tests that don't care about the calendar.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default()
}

/// Creates a test mechanic with a 10% commission rate.
pub async fn create_test_mechanic(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::mechanic::Model> {
    mechanic::create_mechanic(db, name.to_string(), 10.0).await
}

/// Creates a test mechanic with a custom commission rate.
pub async fn create_custom_mechanic(
    db: &DatabaseConnection,
    name: &str,
    commission_rate: f64,
) -> Result<entities::mechanic::Model> {
    mechanic::create_mechanic(db, name.to_string(), commission_rate).await
}

/// Records a one-line ledger entry and returns the created line item.
///
/// # Defaults
/// * `client`: `"Test Client"`
/// * `quantity`: 1
/// * `description`: `"Test line"`
pub async fn record_test_item(
    db: &DatabaseConnection,
    date: NaiveDate,
    transaction_type: &str,
    payment_method: &str,
    amount: f64,
    mechanic_id: Option<i64>,
) -> Result<entities::ledger_item::Model> {
    let (_, mut items) = ledger::record_entry(
        db,
        date,
        "Test Client".to_string(),
        vec![NewLedgerItem {
            quantity: 1,
            description: "Test line".to_string(),
            transaction_type: transaction_type.to_string(),
            amount,
            mechanic_id,
            payment_method: payment_method.to_string(),
        }],
    )
    .await?;
    Ok(items.remove(0))
}

/// Records a cash-paid labor line for the given mechanic.
pub async fn record_test_labor(
    db: &DatabaseConnection,
    mechanic_id: i64,
    date: NaiveDate,
    amount: f64,
) -> Result<entities::ledger_item::Model> {
    record_test_item(
        db,
        date,
        ledger::LABOR_TYPE,
        ledger::PAYMENT_CASH,
        amount,
        Some(mechanic_id),
    )
    .await
}

/// Creates a manual test receivable with the given principal.
pub async fn create_test_receivable(
    db: &DatabaseConnection,
    client: &str,
    principal: f64,
) -> Result<entities::receivable::Model> {
    receivable::create_receivable(
        db,
        receivable::NewReceivable {
            client: client.to_string(),
            date: test_date(),
            concept: "Test debt".to_string(),
            amount: principal,
            notes: None,
        },
    )
    .await
}

/// Sets up a complete test environment with one mechanic.
/// Returns (db, mechanic) for common commission test scenarios.
pub async fn setup_with_mechanic() -> Result<(DatabaseConnection, entities::mechanic::Model)> {
    let db = setup_test_db().await?;
    let mechanic = create_test_mechanic(&db, "Test Mechanic").await?;
    Ok((db, mechanic))
}
