//! Customer receivables business logic.
//!
//! A receivable tracks a client debt from creation through partial
//! payments to full settlement. The status is always derived from balance
//! against principal, never set directly. Receivables originate either
//! manually or by importing the ledger's uncollected income lines.

use crate::{
    core::ledger::{PAYMENT_PENDING, is_income_type},
    entities::{
        LedgerItem, Receivable, ReceivablePayment, ReceivableStatus, ledger_entry, ledger_item,
        receivable, receivable_payment,
    },
    errors::{Error, Result},
    money::round2,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::info;

/// Origin tag for receivables created by hand.
pub const ORIGIN_MANUAL: &str = "manual";
/// Origin tag for receivables imported from the daily ledger.
pub const ORIGIN_LEDGER: &str = "registro";

/// Derives a receivable status from its principal and current balance.
#[must_use]
pub fn status_for(principal: f64, balance: f64) -> ReceivableStatus {
    if balance <= 0.0 {
        ReceivableStatus::Settled
    } else if balance < principal {
        ReceivableStatus::PartiallyPaid
    } else {
        ReceivableStatus::Pending
    }
}

/// A new manual receivable, as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReceivable {
    /// Debtor client name
    pub client: String,
    /// Date the debt was incurred
    pub date: NaiveDate,
    /// What the debt is for
    pub concept: String,
    /// Principal amount
    pub amount: f64,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Creates a manual receivable with its full principal outstanding.
pub async fn create_receivable(
    db: &DatabaseConnection,
    receivable: NewReceivable,
) -> Result<receivable::Model> {
    if receivable.client.trim().is_empty() {
        return Err(Error::Validation {
            message: "Client is required".to_string(),
        });
    }
    if receivable.amount <= 0.0 || !receivable.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: receivable.amount,
        });
    }

    let principal = round2(receivable.amount);
    let model = receivable::ActiveModel {
        client: Set(receivable.client.trim().to_string()),
        date: Set(receivable.date),
        concept: Set(receivable.concept),
        principal: Set(principal),
        balance: Set(principal),
        status: Set(ReceivableStatus::Pending),
        origin: Set(ORIGIN_MANUAL.to_string()),
        notes: Set(receivable.notes),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Optional filters for the receivable listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceivableFilter {
    /// Match a single status
    pub status: Option<ReceivableStatus>,
    /// Case-insensitive client substring
    pub client: Option<String>,
    /// Earliest debt date (inclusive)
    pub date_from: Option<NaiveDate>,
    /// Latest debt date (inclusive)
    pub date_to: Option<NaiveDate>,
}

/// Lists receivables matching the filter, most recent date first.
pub async fn list_receivables(
    db: &DatabaseConnection,
    filter: ReceivableFilter,
) -> Result<Vec<receivable::Model>> {
    let mut query = Receivable::find();
    if let Some(status) = filter.status {
        query = query.filter(receivable::Column::Status.eq(status));
    }
    if let Some(client) = filter.client
        && !client.trim().is_empty()
    {
        query = query.filter(receivable::Column::Client.contains(client.trim()));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(receivable::Column::Date.gte(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(receivable::Column::Date.lte(to));
    }

    query
        .order_by_desc(receivable::Column::Date)
        .order_by_desc(receivable::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A receivable with its full payment history.
#[derive(Debug, Clone)]
pub struct ReceivableDetail {
    /// The receivable row
    pub receivable: receivable::Model,
    /// Payments in chronological order
    pub payments: Vec<receivable_payment::Model>,
}

/// Retrieves a receivable with its payment history.
pub async fn get_receivable_detail(
    db: &DatabaseConnection,
    receivable_id: i64,
) -> Result<ReceivableDetail> {
    let receivable = Receivable::find_by_id(receivable_id)
        .one(db)
        .await?
        .ok_or(Error::ReceivableNotFound { id: receivable_id })?;

    let payments = ReceivablePayment::find()
        .filter(receivable_payment::Column::ReceivableId.eq(receivable_id))
        .order_by_asc(receivable_payment::Column::Date)
        .order_by_asc(receivable_payment::Column::Id)
        .all(db)
        .await?;

    Ok(ReceivableDetail {
        receivable,
        payments,
    })
}

/// A new payment against a receivable.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    /// The receivable being paid down
    pub receivable_id: i64,
    /// Payment date
    pub date: NaiveDate,
    /// Positive payment amount
    pub amount: f64,
    /// How the payment was made
    pub payment_method: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Records a payment and rolls the balance and status forward atomically.
///
/// The balance floors at zero: paying more than is owed settles the
/// receivable rather than driving the balance negative. A settled
/// receivable accepts no further payments.
pub async fn record_payment(
    db: &DatabaseConnection,
    payment: NewPayment,
) -> Result<(receivable_payment::Model, receivable::Model)> {
    if payment.amount <= 0.0 || !payment.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: payment.amount,
        });
    }

    let txn = db.begin().await?;

    let receivable = Receivable::find_by_id(payment.receivable_id)
        .one(&txn)
        .await?
        .ok_or(Error::ReceivableNotFound {
            id: payment.receivable_id,
        })?;
    if receivable.status == ReceivableStatus::Settled {
        return Err(Error::Validation {
            message: format!("Receivable {} is already settled", receivable.id),
        });
    }

    let created = receivable_payment::ActiveModel {
        receivable_id: Set(receivable.id),
        date: Set(payment.date),
        amount: Set(round2(payment.amount)),
        payment_method: Set(payment.payment_method),
        notes: Set(payment.notes),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let balance = round2(receivable.balance - created.amount).max(0.0);
    let status = status_for(receivable.principal, balance);
    let mut active: receivable::ActiveModel = receivable.into();
    active.balance = Set(balance);
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok((created, updated))
}

/// Deletes a payment and restores the receivable's balance atomically.
///
/// The balance is recomputed from the remaining payments rather than by
/// adding the amount back, so reversals converge even after a clamped
/// overpayment.
pub async fn reverse_payment(db: &DatabaseConnection, payment_id: i64) -> Result<receivable::Model> {
    let txn = db.begin().await?;

    let payment = ReceivablePayment::find_by_id(payment_id)
        .one(&txn)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })?;
    let receivable = Receivable::find_by_id(payment.receivable_id)
        .one(&txn)
        .await?
        .ok_or(Error::ReceivableNotFound {
            id: payment.receivable_id,
        })?;

    ReceivablePayment::delete_by_id(payment_id).exec(&txn).await?;

    let paid: f64 = ReceivablePayment::find()
        .filter(receivable_payment::Column::ReceivableId.eq(receivable.id))
        .all(&txn)
        .await?
        .iter()
        .map(|p| p.amount)
        .sum();
    let balance = round2(receivable.principal - paid).max(0.0);
    let status = status_for(receivable.principal, balance);

    let mut active: receivable::ActiveModel = receivable.into();
    active.balance = Set(balance);
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Imports the ledger's uncollected income lines as receivables.
///
/// Candidates are income-typed items tagged with the pending payment
/// method, optionally bounded by entry date. Items already imported are
/// skipped, so the import is safe to run repeatedly. Returns the created
/// receivables.
pub async fn import_from_ledger(
    db: &DatabaseConnection,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> Result<Vec<receivable::Model>> {
    let txn = db.begin().await?;

    let mut query = LedgerItem::find()
        .find_also_related(crate::entities::LedgerEntry)
        .filter(ledger_item::Column::PaymentMethod.eq(PAYMENT_PENDING));
    if let Some(from) = date_from {
        query = query.filter(ledger_entry::Column::Date.gte(from));
    }
    if let Some(to) = date_to {
        query = query.filter(ledger_entry::Column::Date.lte(to));
    }
    let rows = query.order_by_asc(ledger_item::Column::Id).all(&txn).await?;

    let already_imported: HashSet<i64> = Receivable::find()
        .filter(receivable::Column::Origin.eq(ORIGIN_LEDGER))
        .filter(receivable::Column::LedgerItemId.is_not_null())
        .all(&txn)
        .await?
        .into_iter()
        .filter_map(|r| r.ledger_item_id)
        .collect();

    let mut created = Vec::new();
    for (item, entry) in rows {
        let Some(entry) = entry else { continue };
        if !is_income_type(&item.transaction_type) || already_imported.contains(&item.id) {
            continue;
        }
        let principal = round2(item.amount);
        if principal <= 0.0 {
            continue;
        }

        let model = receivable::ActiveModel {
            client: Set(entry.client.clone()),
            date: Set(entry.date),
            concept: Set(item.description.clone()),
            principal: Set(principal),
            balance: Set(principal),
            status: Set(ReceivableStatus::Pending),
            origin: Set(ORIGIN_LEDGER.to_string()),
            ledger_entry_id: Set(Some(entry.id)),
            ledger_item_id: Set(Some(item.id)),
            ..Default::default()
        };
        created.push(model.insert(&txn).await?);
    }

    txn.commit().await?;
    if !created.is_empty() {
        info!(imported = created.len(), "receivables imported from ledger");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::ledger::{LABOR_TYPE, PAYMENT_CASH};
    use crate::test_utils::{
        create_test_receivable, record_test_item, setup_test_db, test_date,
    };

    fn payment(receivable_id: i64, amount: f64) -> NewPayment {
        NewPayment {
            receivable_id,
            date: test_date(),
            amount,
            payment_method: Some("Efectivo".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_status_derivation() {
        assert_eq!(status_for(100.0, 100.0), ReceivableStatus::Pending);
        assert_eq!(status_for(100.0, 40.0), ReceivableStatus::PartiallyPaid);
        assert_eq!(status_for(100.0, 0.0), ReceivableStatus::Settled);
        assert_eq!(status_for(100.0, -0.01), ReceivableStatus::Settled);
    }

    #[tokio::test]
    async fn test_create_receivable_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_test_receivable(&db, "   ", 100.0).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_test_receivable(&db, "Cliente", 0.0).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_rolls_balance_and_status() -> Result<()> {
        let db = setup_test_db().await?;
        let r = create_test_receivable(&db, "Cliente Uno", 100.0).await?;
        assert_eq!(r.status, ReceivableStatus::Pending);

        let (_, r) = record_payment(&db, payment(r.id, 40.0)).await?;
        assert_eq!(r.balance, 60.0);
        assert_eq!(r.status, ReceivableStatus::PartiallyPaid);

        let (_, r) = record_payment(&db, payment(r.id, 60.0)).await?;
        assert_eq!(r.balance, 0.0);
        assert_eq!(r.status, ReceivableStatus::Settled);

        // No further payments once settled
        let result = record_payment(&db, payment(r.id, 1.0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_overpayment_floors_at_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let r = create_test_receivable(&db, "Cliente Uno", 50.0).await?;

        let (_, r) = record_payment(&db, payment(r.id, 80.0)).await?;
        assert_eq!(r.balance, 0.0);
        assert_eq!(r.status, ReceivableStatus::Settled);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let r = create_test_receivable(&db, "Cliente Uno", 50.0).await?;

        let result = record_payment(&db, payment(r.id, 0.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let result = record_payment(&db, payment(999, 10.0)).await;
        assert!(matches!(result, Err(Error::ReceivableNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_reverse_payment_restores_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let r = create_test_receivable(&db, "Cliente Uno", 100.0).await?;

        let (first, _) = record_payment(&db, payment(r.id, 30.0)).await?;
        let (_, after_second) = record_payment(&db, payment(r.id, 70.0)).await?;
        assert_eq!(after_second.status, ReceivableStatus::Settled);

        let restored = reverse_payment(&db, first.id).await?;
        assert_eq!(restored.balance, 30.0);
        assert_eq!(restored.status, ReceivableStatus::PartiallyPaid);

        let detail = get_receivable_detail(&db, r.id).await?;
        assert_eq!(detail.payments.len(), 1);

        let result = reverse_payment(&db, first.id).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_import_from_ledger_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        // One uncollected sale, one collected sale, one uncollected expense
        let pending = record_test_item(&db, test_date(), "Venta", PAYMENT_PENDING, 120.0, None).await?;
        record_test_item(&db, test_date(), "Venta", PAYMENT_CASH, 50.0, None).await?;
        record_test_item(&db, test_date(), "Gasto", PAYMENT_PENDING, 30.0, None).await?;

        let created = import_from_ledger(&db, None, None).await?;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].principal, 120.0);
        assert_eq!(created[0].origin, ORIGIN_LEDGER);
        assert_eq!(created[0].ledger_item_id, Some(pending.id));
        assert_eq!(created[0].client, "Test Client");

        // Re-running imports nothing new
        let created = import_from_ledger(&db, None, None).await?;
        assert!(created.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_import_respects_date_bounds() -> Result<()> {
        let db = setup_test_db().await?;
        let later = test_date().succ_opt().unwrap();

        record_test_item(&db, test_date(), LABOR_TYPE, PAYMENT_PENDING, 40.0, None).await?;
        record_test_item(&db, later, "Venta", PAYMENT_PENDING, 60.0, None).await?;

        let created = import_from_ledger(&db, Some(later), Some(later)).await?;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].principal, 60.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_receivable(&db, "Cliente Uno", 100.0).await?;
        create_test_receivable(&db, "Otro Taller", 200.0).await?;
        record_payment(&db, payment(a.id, 100.0)).await?;

        let settled = list_receivables(
            &db,
            ReceivableFilter {
                status: Some(ReceivableStatus::Settled),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].id, a.id);

        let by_client = list_receivables(
            &db,
            ReceivableFilter {
                client: Some("Taller".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_client.len(), 1);
        assert_eq!(by_client[0].client, "Otro Taller");

        let none = list_receivables(
            &db,
            ReceivableFilter {
                date_from: Some(test_date().succ_opt().unwrap()),
                ..Default::default()
            },
        )
        .await?;
        assert!(none.is_empty());
        Ok(())
    }
}
