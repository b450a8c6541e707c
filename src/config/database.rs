//! Database configuration module for the garage back-office.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Table creation is a single explicit, ordered pass over every
//! entity at startup (headers before their detail tables), replacing the
//! legacy habit of each feature module creating its own tables on first use.

use crate::entities::{
    LedgerEntry, LedgerItem, Mechanic, MechanicGoal, PendingAdjustment, Purchase, PurchaseItem,
    PurchasePayment, Receivable, ReceivablePayment, RegisterDay, Settlement, SettlementAdjustment,
    SettlementLabor, Supplier,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/garage_backoffice.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the
/// `DATABASE_URL` environment variable, falling back to a default local
/// `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all database tables from the entity definitions, in dependency
/// order.
///
/// Uses `SeaORM`'s `Schema::create_table_from_entity` so the schema always
/// matches the Rust structs. Safe to call on a fresh database only; existing
/// deployments keep their data files.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Ordered: referenced tables first, then their detail/line tables.
    let mechanic_table = schema.create_table_from_entity(Mechanic);
    let mechanic_goal_table = schema.create_table_from_entity(MechanicGoal);
    let ledger_entry_table = schema.create_table_from_entity(LedgerEntry);
    let ledger_item_table = schema.create_table_from_entity(LedgerItem);
    let pending_adjustment_table = schema.create_table_from_entity(PendingAdjustment);
    let settlement_table = schema.create_table_from_entity(Settlement);
    let settlement_labor_table = schema.create_table_from_entity(SettlementLabor);
    let settlement_adjustment_table = schema.create_table_from_entity(SettlementAdjustment);
    let register_day_table = schema.create_table_from_entity(RegisterDay);
    let receivable_table = schema.create_table_from_entity(Receivable);
    let receivable_payment_table = schema.create_table_from_entity(ReceivablePayment);
    let supplier_table = schema.create_table_from_entity(Supplier);
    let purchase_table = schema.create_table_from_entity(Purchase);
    let purchase_item_table = schema.create_table_from_entity(PurchaseItem);
    let purchase_payment_table = schema.create_table_from_entity(PurchasePayment);

    db.execute(builder.build(&mechanic_table)).await?;
    db.execute(builder.build(&mechanic_goal_table)).await?;
    db.execute(builder.build(&ledger_entry_table)).await?;
    db.execute(builder.build(&ledger_item_table)).await?;
    db.execute(builder.build(&pending_adjustment_table)).await?;
    db.execute(builder.build(&settlement_table)).await?;
    db.execute(builder.build(&settlement_labor_table)).await?;
    db.execute(builder.build(&settlement_adjustment_table)).await?;
    db.execute(builder.build(&register_day_table)).await?;
    db.execute(builder.build(&receivable_table)).await?;
    db.execute(builder.build(&receivable_payment_table)).await?;
    db.execute(builder.build(&supplier_table)).await?;
    db.execute(builder.build(&purchase_table)).await?;
    db.execute(builder.build(&purchase_item_table)).await?;
    db.execute(builder.build(&purchase_payment_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        ledger_item::Model as LedgerItemModel, mechanic::Model as MechanicModel,
        register_day::Model as RegisterDayModel, settlement::Model as SettlementModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist and are queryable
        let _: Vec<MechanicModel> = Mechanic::find().limit(1).all(&db).await?;
        let _: Vec<LedgerItemModel> = LedgerItem::find().limit(1).all(&db).await?;
        let _: Vec<SettlementModel> = Settlement::find().limit(1).all(&db).await?;
        let _: Vec<RegisterDayModel> = RegisterDay::find().limit(1).all(&db).await?;
        Ok(())
    }
}
