//! Cash register reconciliation business logic.
//!
//! A register day moves through exactly one lifecycle: opened with a
//! starting float, summarized live from the day's ledger movements, then
//! closed once against a physical count. Closing freezes the expected
//! total; ledger rows recorded after the close never rewrite a closed day.

use crate::{
    core::ledger::{self, PAYMENT_CASH, PAYMENT_PENDING, PAYMENT_TRANSFER, is_expense_type},
    entities::{RegisterDay, ReceivableStatus, register_day},
    errors::{Error, Result},
    money::round2,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

/// Lifecycle state of a register day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    /// No register row exists for the date
    NotOpened,
    /// Opened, not yet closed
    Open,
    /// Closed and frozen
    Closed,
}

/// Live reconciliation summary for one register date.
///
/// For a day that was never opened every monetary field is zero; for a
/// closed day `expected_total` and `variance` come from the frozen close
/// record rather than being recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterSummary {
    /// The summarized date
    pub date: NaiveDate,
    /// Lifecycle state
    pub status: RegisterStatus,
    /// Opening float
    pub opening_amount: f64,
    /// Collected cash income
    pub cash_income: f64,
    /// Collected bank-transfer income
    pub transfer_income: f64,
    /// Uncollected income, informational only
    pub pending_income: f64,
    /// Expenses and outflows, counted whatever their payment tag
    pub expenses: f64,
    /// Outstanding receivable balance across the whole book, informational
    pub receivables_outstanding: f64,
    /// `round2(opening + cash + transfers - expenses)`
    pub expected_total: f64,
    /// Physical count entered at close
    pub physical_amount: Option<f64>,
    /// `round2(physical - expected)` at close
    pub variance: Option<f64>,
    /// Operator justification entered at close
    pub closing_note: Option<String>,
}

/// Cash movement totals folded from one day's ledger items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MovementTotals {
    cash: f64,
    transfer: f64,
    pending: f64,
    expenses: f64,
}

/// Classifies and folds a day's line items into register totals.
///
/// Expense-typed rows count as outflows regardless of their payment tag;
/// everything else is bucketed by payment tag, and only collected tags
/// contribute to the drawer.
fn fold_movements(items: &[crate::entities::ledger_item::Model]) -> MovementTotals {
    let mut totals = MovementTotals::default();
    for item in items {
        if is_expense_type(&item.transaction_type) {
            totals.expenses += item.amount;
        } else {
            match item.payment_method.as_str() {
                PAYMENT_CASH => totals.cash += item.amount,
                PAYMENT_TRANSFER => totals.transfer += item.amount,
                PAYMENT_PENDING => totals.pending += item.amount,
                _ => {}
            }
        }
    }
    MovementTotals {
        cash: round2(totals.cash),
        transfer: round2(totals.transfer),
        pending: round2(totals.pending),
        expenses: round2(totals.expenses),
    }
}

fn expected_total(opening: f64, totals: &MovementTotals) -> f64 {
    round2(opening + totals.cash + totals.transfer - totals.expenses)
}

/// Opens the register for a date with a starting float.
///
/// A date can be opened at most once; there is no reopen.
pub async fn open_register(
    db: &DatabaseConnection,
    date: NaiveDate,
    opening_amount: f64,
) -> Result<register_day::Model> {
    if opening_amount < 0.0 || !opening_amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: opening_amount,
        });
    }

    if find_register_day(db, date).await?.is_some() {
        return Err(Error::RegisterAlreadyOpen { date });
    }

    let model = register_day::ActiveModel {
        date: Set(date),
        opening_amount: Set(round2(opening_amount)),
        opened_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!(%date, opening_amount = created.opening_amount, "register opened");
    Ok(created)
}

/// Returns the lifecycle state of a register date.
pub async fn register_status(db: &DatabaseConnection, date: NaiveDate) -> Result<RegisterStatus> {
    Ok(match find_register_day(db, date).await? {
        None => RegisterStatus::NotOpened,
        Some(day) if day.closed_at.is_some() => RegisterStatus::Closed,
        Some(_) => RegisterStatus::Open,
    })
}

/// Computes the reconciliation summary for a date.
///
/// Pure read. A never-opened date yields an all-zero summary rather than
/// an error, so the day view renders before the register is opened; no
/// movement totals leak into it.
pub async fn get_register_summary(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<RegisterSummary> {
    let Some(day) = find_register_day(db, date).await? else {
        return Ok(RegisterSummary {
            date,
            status: RegisterStatus::NotOpened,
            opening_amount: 0.0,
            cash_income: 0.0,
            transfer_income: 0.0,
            pending_income: 0.0,
            expenses: 0.0,
            receivables_outstanding: 0.0,
            expected_total: 0.0,
            physical_amount: None,
            variance: None,
            closing_note: None,
        });
    };

    let movements = ledger::get_movements_for_date(db, date).await?;
    let totals = fold_movements(&movements);
    let receivables_outstanding = outstanding_receivable_balance(db).await?;

    let closed = day.closed_at.is_some();
    let expected = if closed {
        // Frozen at close; never recomputed from later ledger rows.
        day.expected_total.unwrap_or(0.0)
    } else {
        expected_total(day.opening_amount, &totals)
    };

    Ok(RegisterSummary {
        date,
        status: if closed {
            RegisterStatus::Closed
        } else {
            RegisterStatus::Open
        },
        opening_amount: day.opening_amount,
        cash_income: totals.cash,
        transfer_income: totals.transfer,
        pending_income: totals.pending,
        expenses: totals.expenses,
        receivables_outstanding,
        expected_total: expected,
        physical_amount: day.physical_amount,
        variance: day.variance,
        closing_note: day.closing_note,
    })
}

/// Closes the register for a date against a physical cash count.
///
/// The expected total is computed inside the closing transaction and
/// stored; any nonzero variance requires a justification note. Closing is
/// final: a second close reports a conflict.
pub async fn close_register(
    db: &DatabaseConnection,
    date: NaiveDate,
    physical_amount: f64,
    closing_note: Option<String>,
) -> Result<register_day::Model> {
    if physical_amount < 0.0 || !physical_amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: physical_amount,
        });
    }

    let txn = db.begin().await?;

    let day = RegisterDay::find()
        .filter(register_day::Column::Date.eq(date))
        .one(&txn)
        .await?
        .ok_or(Error::RegisterNotOpen { date })?;
    if day.closed_at.is_some() {
        return Err(Error::RegisterAlreadyClosed { date });
    }

    let movements = ledger::get_movements_for_date(&txn, date).await?;
    let totals = fold_movements(&movements);
    let expected = expected_total(day.opening_amount, &totals);
    let physical = round2(physical_amount);
    let variance = round2(physical - expected);

    let note = closing_note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    if variance.abs() > f64::EPSILON && note.is_none() {
        return Err(Error::VarianceNeedsJustification { variance });
    }

    let mut active: register_day::ActiveModel = day.into();
    active.physical_amount = Set(Some(physical));
    active.expected_total = Set(Some(expected));
    active.variance = Set(Some(variance));
    active.closing_note = Set(note);
    active.closed_at = Set(Some(chrono::Utc::now()));
    let closed = active.update(&txn).await?;

    txn.commit().await?;
    info!(%date, expected, physical, variance, "register closed");
    Ok(closed)
}

/// Lists closed register days, most recent date first.
pub async fn get_register_history(db: &DatabaseConnection) -> Result<Vec<register_day::Model>> {
    RegisterDay::find()
        .filter(register_day::Column::ClosedAt.is_not_null())
        .order_by_desc(register_day::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_register_day(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Option<register_day::Model>> {
    RegisterDay::find()
        .filter(register_day::Column::Date.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sums the outstanding balance of all non-settled receivables.
async fn outstanding_receivable_balance<C>(db: &C) -> Result<f64>
where
    C: ConnectionTrait,
{
    let open = crate::entities::Receivable::find()
        .filter(crate::entities::receivable::Column::Status.ne(ReceivableStatus::Settled))
        .all(db)
        .await?;
    Ok(round2(open.iter().map(|r| r.balance).sum()))
}
