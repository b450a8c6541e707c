//! Daily transaction ledger business logic.
//!
//! The ledger is the append-only source of facts the other engines derive
//! from: labor lines feed the commission engine, and the day's movements
//! feed the cash register summary. Line items are only ever mutated by
//! settlement generation (consumption marking), never edited or deleted.

use crate::{
    entities::{LedgerEntry, LedgerItem, ledger_entry, ledger_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Deserialize;

/// Payment tag for collected cash.
pub const PAYMENT_CASH: &str = "Pagado (Efectivo)";
/// Payment tag for collected bank transfers.
pub const PAYMENT_TRANSFER: &str = "Pagado (Transferencia)";
/// Payment tag for amounts not yet collected.
pub const PAYMENT_PENDING: &str = "Pendiente";

/// Transaction type of commission-eligible mechanic labor.
pub const LABOR_TYPE: &str = "Mano de Obra";

/// Transaction types classified as expenses/outflows.
///
/// Matched case-insensitively: the legacy data contains mixed casing.
/// Expenses are counted against the register whether paid or pending, a
/// deliberate asymmetry from income (which only counts once collected).
pub const EXPENSE_TYPES: [&str; 9] = [
    "Gasto",
    "Salida",
    "Egreso",
    "Alimentación",
    "Compra",
    "Cuenta por Cobrar",
    "Proveedor",
    "Sueldo",
    "Trabajo en Curso",
];

/// Transaction types classified as income, used by the receivable import.
pub const INCOME_TYPES: [&str; 4] = ["Ingreso", "Venta", "Mano de Obra", "Cuenta Cobrada"];

/// Returns true if the transaction type is an expense/outflow.
#[must_use]
pub fn is_expense_type(transaction_type: &str) -> bool {
    EXPENSE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(transaction_type))
}

/// Returns true if the transaction type is an income class.
#[must_use]
pub fn is_income_type(transaction_type: &str) -> bool {
    INCOME_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(transaction_type))
}

/// One line of a new ledger entry, as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLedgerItem {
    /// Units sold or consumed
    pub quantity: i32,
    /// Human-readable description of the line
    pub description: String,
    /// Transaction class, e.g. `"Venta"`, `"Mano de Obra"`, `"Gasto"`
    pub transaction_type: String,
    /// Monetary amount
    pub amount: f64,
    /// Mechanic reference, required for labor lines to earn commission
    pub mechanic_id: Option<i64>,
    /// Payment tag, one of the `PAYMENT_*` constants
    pub payment_method: String,
}

/// Records a ledger entry (header plus line items) atomically.
///
/// Rejects an empty client or an empty item list before opening the
/// transaction. Commission starts at 0 and `settlement_id` at null; both
/// are filled in by settlement generation later.
pub async fn record_entry(
    db: &DatabaseConnection,
    date: NaiveDate,
    client: String,
    items: Vec<NewLedgerItem>,
) -> Result<(ledger_entry::Model, Vec<ledger_item::Model>)> {
    if client.trim().is_empty() {
        return Err(Error::Validation {
            message: "Client is required".to_string(),
        });
    }
    if items.is_empty() {
        return Err(Error::Validation {
            message: "At least one line item is required".to_string(),
        });
    }
    for item in &items {
        if !item.amount.is_finite() {
            return Err(Error::InvalidAmount {
                amount: item.amount,
            });
        }
    }

    let txn = db.begin().await?;

    let entry = ledger_entry::ActiveModel {
        date: Set(date),
        client: Set(client.trim().to_string()),
        ..Default::default()
    };
    let entry = entry.insert(&txn).await?;

    let mut created = Vec::with_capacity(items.len());
    for item in items {
        let model = ledger_item::ActiveModel {
            entry_id: Set(entry.id),
            quantity: Set(item.quantity),
            description: Set(item.description),
            transaction_type: Set(item.transaction_type),
            amount: Set(item.amount),
            mechanic_id: Set(item.mechanic_id),
            commission: Set(0.0),
            payment_method: Set(item.payment_method),
            settlement_id: Set(None),
            ..Default::default()
        };
        created.push(model.insert(&txn).await?);
    }

    txn.commit().await?;
    Ok((entry, created))
}

/// Retrieves every entry recorded for a date, each with its line items.
///
/// A date can hold any number of entries (one per client visit), oldest
/// first.
pub async fn get_entries_for_date(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Vec<(ledger_entry::Model, Vec<ledger_item::Model>)>> {
    let entries = LedgerEntry::find()
        .filter(ledger_entry::Column::Date.eq(date))
        .order_by_asc(ledger_entry::Column::Id)
        .all(db)
        .await?;

    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        let items = LedgerItem::find()
            .filter(ledger_item::Column::EntryId.eq(entry.id))
            .order_by_asc(ledger_item::Column::Id)
            .all(db)
            .await?;
        result.push((entry, items));
    }
    Ok(result)
}

/// Retrieves every line item whose parent entry falls on the given date.
///
/// Generic over the connection so the register close path can run it inside
/// its own transaction.
pub async fn get_movements_for_date<C>(db: &C, date: NaiveDate) -> Result<Vec<ledger_item::Model>>
where
    C: ConnectionTrait,
{
    LedgerItem::find()
        .join(JoinType::InnerJoin, ledger_item::Relation::Entry.def())
        .filter(ledger_entry::Column::Date.eq(date))
        .order_by_asc(ledger_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{record_test_item, setup_test_db, test_date};

    fn sale_line(amount: f64) -> NewLedgerItem {
        NewLedgerItem {
            quantity: 1,
            description: "Oil change".to_string(),
            transaction_type: "Venta".to_string(),
            amount,
            mechanic_id: None,
            payment_method: PAYMENT_CASH.to_string(),
        }
    }

    #[test]
    fn test_classification() {
        assert!(is_expense_type("Gasto"));
        assert!(is_expense_type("gasto"));
        assert!(is_expense_type("SUELDO"));
        assert!(is_expense_type("Trabajo en Curso"));
        assert!(is_expense_type("trabajo en curso"));
        assert!(!is_expense_type("Venta"));
        assert!(!is_expense_type("Mano de Obra"));

        assert!(is_income_type("Venta"));
        assert!(is_income_type("mano de obra"));
        assert!(!is_income_type("Gasto"));
    }

    #[tokio::test]
    async fn test_record_entry_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = record_entry(&db, test_date(), String::new(), vec![sale_line(10.0)]).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = record_entry(&db, test_date(), "Cliente".to_string(), vec![]).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = record_entry(
            &db,
            test_date(),
            "Cliente".to_string(),
            vec![sale_line(f64::NAN)],
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_and_fetch_entries() -> Result<()> {
        let db = setup_test_db().await?;

        let (entry, items) = record_entry(
            &db,
            test_date(),
            "Cliente Uno".to_string(),
            vec![sale_line(50.0), sale_line(25.5)],
        )
        .await?;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.entry_id == entry.id));
        assert!(items.iter().all(|i| i.settlement_id.is_none()));

        // A second visit on the same date gets its own header
        let (second, _) = record_entry(
            &db,
            test_date(),
            "Cliente Dos".to_string(),
            vec![sale_line(10.0)],
        )
        .await?;

        let fetched = get_entries_for_date(&db, test_date()).await?;
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].0, entry);
        assert_eq!(fetched[0].1.len(), 2);
        assert_eq!(fetched[1].0, second);
        assert_eq!(fetched[1].1.len(), 1);

        assert!(get_entries_for_date(&db, test_date().succ_opt().unwrap())
            .await?
            .is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_movements_filtered_by_date() -> Result<()> {
        let db = setup_test_db().await?;
        let other_day = test_date().succ_opt().unwrap();

        record_test_item(&db, test_date(), "Venta", PAYMENT_CASH, 50.0, None).await?;
        record_test_item(&db, test_date(), "Gasto", PAYMENT_CASH, 20.0, None).await?;
        record_test_item(&db, other_day, "Venta", PAYMENT_CASH, 99.0, None).await?;

        let movements = get_movements_for_date(&db, test_date()).await?;
        assert_eq!(movements.len(), 2);
        assert!(movements.iter().all(|m| m.amount != 99.0));
        Ok(())
    }
}
