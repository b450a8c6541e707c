//! Commission engine business logic.
//!
//! Handles the full settlement workflow: previewing pending labor
//! commissions for a mechanic over a period, managing the ad-hoc
//! income/deduction entries that ride along with the next payout, and
//! generating the immutable settlement record that consumes both.
//!
//! Rounding rule: each labor commission is rounded to cents on its own,
//! then each total is rounded independently before totals are combined.
//! Previews always use the mechanic's *current* rate; only the generated
//! settlement snapshots values.

use crate::{
    entities::{
        AdjustmentKind, LedgerItem, Mechanic, PendingAdjustment, Settlement, ledger_entry,
        ledger_item, mechanic, pending_adjustment, settlement, settlement_adjustment,
        settlement_labor,
    },
    errors::{Error, Result},
    money::{commission_for, round2},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

use super::ledger::LABOR_TYPE;

/// One unconsumed labor line with its commission computed at preview time.
#[derive(Debug, Clone, Serialize)]
pub struct PendingCommission {
    /// Source ledger line item
    pub ledger_item_id: i64,
    /// Date of the parent ledger entry
    pub date: NaiveDate,
    /// Description of the work performed
    pub description: String,
    /// Labor base amount
    pub base_amount: f64,
    /// Mechanic's current commission percentage
    pub commission_rate: f64,
    /// `round2(base_amount * commission_rate / 100)`
    pub commission: f64,
}

/// Result of a commission preview: the eligible lines plus their total.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionPreview {
    /// Unconsumed labor lines in the period, oldest first
    pub lines: Vec<PendingCommission>,
    /// `round2(sum of per-line commissions)`
    pub total: f64,
}

/// Computes the pending commissions for a mechanic over an inclusive date
/// range.
///
/// Pure read: no side effects, so repeated calls with no intervening writes
/// return identical results. Uses the mechanic's current rate - this is a
/// preview, not a commitment.
pub async fn compute_pending_commissions(
    db: &DatabaseConnection,
    mechanic_id: i64,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<CommissionPreview> {
    if date_from > date_to {
        return Err(Error::InvalidDateRange {
            from: date_from,
            to: date_to,
        });
    }
    let mechanic = require_active_mechanic(db, mechanic_id).await?;

    let rows = LedgerItem::find()
        .find_also_related(crate::entities::LedgerEntry)
        .filter(ledger_item::Column::MechanicId.eq(mechanic_id))
        .filter(ledger_item::Column::TransactionType.eq(LABOR_TYPE))
        .filter(ledger_item::Column::SettlementId.is_null())
        .filter(ledger_entry::Column::Date.between(date_from, date_to))
        .order_by_asc(ledger_entry::Column::Date)
        .order_by_asc(ledger_item::Column::Id)
        .all(db)
        .await?;

    let lines: Vec<PendingCommission> = rows
        .into_iter()
        .filter_map(|(item, entry)| entry.map(|e| (item, e)))
        .map(|(item, entry)| PendingCommission {
            ledger_item_id: item.id,
            date: entry.date,
            description: item.description,
            base_amount: item.amount,
            commission_rate: mechanic.commission_rate,
            commission: commission_for(item.amount, mechanic.commission_rate),
        })
        .collect();

    let total = round2(lines.iter().map(|l| l.commission).sum());
    Ok(CommissionPreview { lines, total })
}

/// A new ad-hoc income or deduction entry, as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAdjustment {
    /// Mechanic this adjustment belongs to
    pub mechanic_id: i64,
    /// Income or deduction
    pub kind: AdjustmentKind,
    /// Short category label; blank falls back to `"Otros"`
    pub category: String,
    /// Free-text detail
    pub description: Option<String>,
    /// Positive monetary amount
    pub amount: f64,
    /// Date the adjustment applies to
    pub date: NaiveDate,
}

/// Lists the outstanding adjustments for a mechanic, oldest first.
pub async fn list_pending_adjustments(
    db: &DatabaseConnection,
    mechanic_id: i64,
) -> Result<Vec<pending_adjustment::Model>> {
    PendingAdjustment::find()
        .filter(pending_adjustment::Column::MechanicId.eq(mechanic_id))
        .order_by_asc(pending_adjustment::Column::Date)
        .order_by_asc(pending_adjustment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a new pending adjustment.
///
/// Visible immediately in subsequent previews and swept into the mechanic's
/// next settlement whatever its date.
pub async fn add_pending_adjustment(
    db: &DatabaseConnection,
    adjustment: NewAdjustment,
) -> Result<pending_adjustment::Model> {
    if adjustment.amount <= 0.0 || !adjustment.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: adjustment.amount,
        });
    }
    require_active_mechanic(db, adjustment.mechanic_id).await?;

    let category = if adjustment.category.trim().is_empty() {
        "Otros".to_string()
    } else {
        adjustment.category.trim().to_string()
    };

    let model = pending_adjustment::ActiveModel {
        mechanic_id: Set(adjustment.mechanic_id),
        kind: Set(adjustment.kind),
        category: Set(category),
        description: Set(adjustment.description),
        amount: Set(round2(adjustment.amount)),
        date: Set(adjustment.date),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Deletes a pending adjustment.
///
/// Unknown ids report [`Error::AdjustmentNotFound`] rather than silently
/// succeeding, so a double-click in the UI surfaces as an error the caller
/// can ignore.
pub async fn remove_pending_adjustment(db: &DatabaseConnection, adjustment_id: i64) -> Result<()> {
    let result = PendingAdjustment::delete_by_id(adjustment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::AdjustmentNotFound { id: adjustment_id });
    }
    Ok(())
}

/// A settlement generation request, as submitted by the caller after
/// confirming a preview.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementRequest {
    /// Mechanic to settle
    pub mechanic_id: i64,
    /// First day of the settled period (inclusive)
    pub period_start: NaiveDate,
    /// Last day of the settled period (inclusive)
    pub period_end: NaiveDate,
    /// The previewed labor item ids to consume
    pub ledger_item_ids: Vec<i64>,
    /// Free-text operator notes
    pub notes: Option<String>,
}

/// Generates an immutable settlement for a mechanic.
///
/// The whole flow runs in one transaction: the requested labor items are
/// re-fetched constrained to this mechanic and still-unconsumed state (a
/// count mismatch aborts - the caller previewed stale data), commissions
/// are recomputed from the mechanic's current rate (client-supplied values
/// are never trusted), every outstanding adjustment for the mechanic is
/// swept in regardless of the period, snapshot detail rows are written, the
/// pending adjustments are deleted, and the consumed items are stamped with
/// the settlement id. Any failure rolls the whole thing back.
pub async fn generate_settlement(
    db: &DatabaseConnection,
    request: SettlementRequest,
) -> Result<settlement::Model> {
    if request.ledger_item_ids.is_empty() {
        return Err(Error::Validation {
            message: "At least one labor item is required".to_string(),
        });
    }
    if request.period_start > request.period_end {
        return Err(Error::InvalidDateRange {
            from: request.period_start,
            to: request.period_end,
        });
    }
    let item_ids: BTreeSet<i64> = request.ledger_item_ids.iter().copied().collect();

    let txn = db.begin().await?;

    let mechanic = Mechanic::find_by_id(request.mechanic_id)
        .filter(mechanic::Column::Active.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::MechanicNotFound {
            id: request.mechanic_id,
        })?;

    // Re-validate: the previewed items must still be unconsumed labor lines
    // of this mechanic. Guards against a concurrent settlement between
    // preview and confirm.
    let items = LedgerItem::find()
        .filter(ledger_item::Column::Id.is_in(item_ids.iter().copied()))
        .filter(ledger_item::Column::MechanicId.eq(mechanic.id))
        .filter(ledger_item::Column::TransactionType.eq(LABOR_TYPE))
        .filter(ledger_item::Column::SettlementId.is_null())
        .all(&txn)
        .await?;
    if items.len() != item_ids.len() {
        return Err(Error::StaleSettlementItems {
            requested: item_ids.len(),
            matched: items.len(),
        });
    }

    let commissions: Vec<(ledger_item::Model, f64)> = items
        .into_iter()
        .map(|item| {
            let commission = commission_for(item.amount, mechanic.commission_rate);
            (item, commission)
        })
        .collect();
    let total_commissions = round2(commissions.iter().map(|(_, c)| c).sum());

    // Every outstanding adjustment is swept, whatever its date.
    let adjustments = PendingAdjustment::find()
        .filter(pending_adjustment::Column::MechanicId.eq(mechanic.id))
        .order_by_asc(pending_adjustment::Column::Date)
        .order_by_asc(pending_adjustment::Column::Id)
        .all(&txn)
        .await?;
    let total_income = round2(
        adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Income)
            .map(|a| a.amount)
            .sum(),
    );
    let total_deductions = round2(
        adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Deduction)
            .map(|a| a.amount)
            .sum(),
    );
    let net_payable = round2(total_commissions + total_income - total_deductions);

    let now = chrono::Utc::now();
    let header = settlement::ActiveModel {
        mechanic_id: Set(mechanic.id),
        period_start: Set(request.period_start),
        period_end: Set(request.period_end),
        generated_on: Set(now.date_naive()),
        total_commissions: Set(total_commissions),
        total_income: Set(total_income),
        total_deductions: Set(total_deductions),
        net_payable: Set(net_payable),
        notes: Set(request.notes),
        created_at: Set(now),
        ..Default::default()
    };
    let header = header.insert(&txn).await?;

    for (item, commission) in &commissions {
        let snapshot = settlement_labor::ActiveModel {
            settlement_id: Set(header.id),
            ledger_item_id: Set(item.id),
            base_amount: Set(item.amount),
            commission_rate: Set(mechanic.commission_rate),
            commission_amount: Set(*commission),
            ..Default::default()
        };
        snapshot.insert(&txn).await?;
    }

    for adjustment in &adjustments {
        let snapshot = settlement_adjustment::ActiveModel {
            settlement_id: Set(header.id),
            kind: Set(adjustment.kind),
            category: Set(adjustment.category.clone()),
            description: Set(adjustment.description.clone()),
            amount: Set(adjustment.amount),
            date: Set(adjustment.date),
            ..Default::default()
        };
        snapshot.insert(&txn).await?;
    }

    // The swept adjustments are spent.
    PendingAdjustment::delete_many()
        .filter(pending_adjustment::Column::MechanicId.eq(mechanic.id))
        .exec(&txn)
        .await?;

    // Mark consumption in the source ledger.
    for (item, commission) in &commissions {
        let update = ledger_item::ActiveModel {
            id: Set(item.id),
            commission: Set(*commission),
            settlement_id: Set(Some(header.id)),
            ..Default::default()
        };
        update.update(&txn).await?;
    }

    txn.commit().await?;
    info!(
        settlement_id = header.id,
        mechanic_id = mechanic.id,
        net_payable,
        "settlement generated"
    );
    Ok(header)
}

/// One row of the settlement history listing.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    /// Settlement id
    pub id: i64,
    /// Day the settlement was generated
    pub generated_on: NaiveDate,
    /// First day of the settled period
    pub period_start: NaiveDate,
    /// Last day of the settled period
    pub period_end: NaiveDate,
    /// Mechanic name at read time
    pub mechanic: String,
    /// Rounded labor commission total
    pub total_commissions: f64,
    /// Rounded income adjustment total
    pub total_income: f64,
    /// Rounded deduction adjustment total
    pub total_deductions: f64,
    /// Net amount paid out
    pub net_payable: f64,
}

/// Lists all settlements, newest first. Read-only projection.
pub async fn get_settlement_history(db: &DatabaseConnection) -> Result<Vec<SettlementSummary>> {
    let rows = Settlement::find()
        .find_also_related(Mechanic)
        .order_by_desc(settlement::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(s, m)| SettlementSummary {
            id: s.id,
            generated_on: s.generated_on,
            period_start: s.period_start,
            period_end: s.period_end,
            mechanic: m.map(|m| m.name).unwrap_or_default(),
            total_commissions: s.total_commissions,
            total_income: s.total_income,
            total_deductions: s.total_deductions,
            net_payable: s.net_payable,
        })
        .collect())
}

/// One labor line of a settlement detail view, joined back to the source
/// ledger for date and description.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementLaborLine {
    /// Source ledger line item
    pub ledger_item_id: i64,
    /// Date of the source entry, if the ledger row still resolves
    pub date: Option<NaiveDate>,
    /// Description of the work, if the ledger row still resolves
    pub description: Option<String>,
    /// Snapshotted labor base amount
    pub base_amount: f64,
    /// Snapshotted commission percentage
    pub commission_rate: f64,
    /// Snapshotted commission amount
    pub commission_amount: f64,
}

/// Full detail of one settlement: header, labor snapshot, adjustments.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementDetail {
    /// Settlement header
    pub settlement: settlement::Model,
    /// Mechanic name at read time
    pub mechanic: String,
    /// Snapshotted labor lines
    pub labor: Vec<SettlementLaborLine>,
    /// Snapshotted adjustments
    pub adjustments: Vec<settlement_adjustment::Model>,
}

/// Retrieves a stored settlement with its snapshotted detail. No
/// computation happens here; totals are read back as persisted.
pub async fn get_settlement_detail(
    db: &DatabaseConnection,
    settlement_id: i64,
) -> Result<SettlementDetail> {
    let header = Settlement::find_by_id(settlement_id)
        .one(db)
        .await?
        .ok_or(Error::SettlementNotFound { id: settlement_id })?;

    let mechanic = Mechanic::find_by_id(header.mechanic_id)
        .one(db)
        .await?
        .map(|m| m.name)
        .unwrap_or_default();

    let labor_rows = crate::entities::SettlementLabor::find()
        .filter(settlement_labor::Column::SettlementId.eq(settlement_id))
        .order_by_asc(settlement_labor::Column::Id)
        .all(db)
        .await?;

    // Resolve source dates/descriptions in one pass.
    let item_ids: Vec<i64> = labor_rows.iter().map(|r| r.ledger_item_id).collect();
    let sources: HashMap<i64, (Option<NaiveDate>, String)> = LedgerItem::find()
        .find_also_related(crate::entities::LedgerEntry)
        .filter(ledger_item::Column::Id.is_in(item_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|(item, entry)| (item.id, (entry.map(|e| e.date), item.description)))
        .collect();

    let labor = labor_rows
        .into_iter()
        .map(|row| {
            let source = sources.get(&row.ledger_item_id);
            SettlementLaborLine {
                ledger_item_id: row.ledger_item_id,
                date: source.and_then(|(date, _)| *date),
                description: source.map(|(_, description)| description.clone()),
                base_amount: row.base_amount,
                commission_rate: row.commission_rate,
                commission_amount: row.commission_amount,
            }
        })
        .collect();

    let adjustments = crate::entities::SettlementAdjustment::find()
        .filter(settlement_adjustment::Column::SettlementId.eq(settlement_id))
        .order_by_asc(settlement_adjustment::Column::Id)
        .all(db)
        .await?;

    Ok(SettlementDetail {
        settlement: header,
        mechanic,
        labor,
        adjustments,
    })
}

/// Fetches a mechanic that must exist and be active.
async fn require_active_mechanic<C>(db: &C, mechanic_id: i64) -> Result<mechanic::Model>
where
    C: ConnectionTrait,
{
    Mechanic::find_by_id(mechanic_id)
        .filter(mechanic::Column::Active.eq(true))
        .one(db)
        .await?
        .ok_or(Error::MechanicNotFound { id: mechanic_id })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::mechanic::update_commission_rate;
    use crate::test_utils::{
        create_test_mechanic, record_test_labor, setup_test_db, setup_with_mechanic, test_date,
    };

    fn adjustment(mechanic_id: i64, kind: AdjustmentKind, amount: f64) -> NewAdjustment {
        NewAdjustment {
            mechanic_id,
            kind,
            category: "Otros".to_string(),
            description: None,
            amount,
            date: test_date(),
        }
    }

    async fn settle(
        db: &sea_orm::DatabaseConnection,
        mechanic_id: i64,
        ids: Vec<i64>,
    ) -> Result<settlement::Model> {
        generate_settlement(
            db,
            SettlementRequest {
                mechanic_id,
                period_start: test_date(),
                period_end: test_date(),
                ledger_item_ids: ids,
                notes: None,
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_preview_uses_current_rate_and_rounds_per_row() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        record_test_labor(&db, mechanic.id, test_date(), 40.0).await?;
        record_test_labor(&db, mechanic.id, test_date(), 60.0).await?;

        let preview =
            compute_pending_commissions(&db, mechanic.id, test_date(), test_date()).await?;
        assert_eq!(preview.lines.len(), 2);
        assert_eq!(preview.lines[0].commission, 4.0);
        assert_eq!(preview.lines[1].commission, 6.0);
        assert_eq!(preview.total, 10.0);

        // Rate change is reflected immediately (preview, not commitment)
        update_commission_rate(&db, mechanic.id, 20.0).await?;
        let preview =
            compute_pending_commissions(&db, mechanic.id, test_date(), test_date()).await?;
        assert_eq!(preview.total, 20.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_is_idempotent() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        record_test_labor(&db, mechanic.id, test_date(), 33.33).await?;

        let first = compute_pending_commissions(&db, mechanic.id, test_date(), test_date()).await?;
        let second =
            compute_pending_commissions(&db, mechanic.id, test_date(), test_date()).await?;
        assert_eq!(first.total, second.total);
        assert_eq!(first.lines.len(), second.lines.len());
        assert_eq!(
            first.lines[0].ledger_item_id,
            second.lines[0].ledger_item_id
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_validation() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;

        let result = compute_pending_commissions(
            &db,
            mechanic.id,
            test_date(),
            test_date().pred_opt().unwrap(),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidDateRange { .. })));

        let result = compute_pending_commissions(&db, 999, test_date(), test_date()).await;
        assert!(matches!(result, Err(Error::MechanicNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_excludes_other_dates_and_mechanics() -> Result<()> {
        let db = setup_test_db().await?;
        let carlos = create_test_mechanic(&db, "Carlos").await?;
        let luis = create_test_mechanic(&db, "Luis").await?;

        record_test_labor(&db, carlos.id, test_date(), 100.0).await?;
        record_test_labor(&db, luis.id, test_date(), 50.0).await?;
        record_test_labor(&db, carlos.id, test_date().succ_opt().unwrap(), 70.0).await?;

        let preview = compute_pending_commissions(&db, carlos.id, test_date(), test_date()).await?;
        assert_eq!(preview.lines.len(), 1);
        assert_eq!(preview.lines[0].base_amount, 100.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_adjustment_validation() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;

        let result =
            add_pending_adjustment(&db, adjustment(mechanic.id, AdjustmentKind::Income, 0.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0.0 })));

        let result =
            add_pending_adjustment(&db, adjustment(mechanic.id, AdjustmentKind::Income, -5.0))
                .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let result =
            add_pending_adjustment(&db, adjustment(999, AdjustmentKind::Income, 5.0)).await;
        assert!(matches!(result, Err(Error::MechanicNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_adjustment_blank_category_falls_back() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        let created = add_pending_adjustment(
            &db,
            NewAdjustment {
                mechanic_id: mechanic.id,
                kind: AdjustmentKind::Deduction,
                category: "  ".to_string(),
                description: Some("tool advance".to_string()),
                amount: 12.0,
                date: test_date(),
            },
        )
        .await?;
        assert_eq!(created.category, "Otros");
        assert_eq!(created.kind, AdjustmentKind::Deduction);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_adjustment() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        let created =
            add_pending_adjustment(&db, adjustment(mechanic.id, AdjustmentKind::Income, 5.0))
                .await?;

        remove_pending_adjustment(&db, created.id).await?;
        assert!(list_pending_adjustments(&db, mechanic.id).await?.is_empty());

        let result = remove_pending_adjustment(&db, created.id).await;
        assert!(matches!(result, Err(Error::AdjustmentNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_settlement_end_to_end() -> Result<()> {
        // Property: two labor items (40 @ 10%, 60 @ 10%) plus a pending
        // deduction of 5 -> commissions 10, deductions 5, net 5.
        let (db, mechanic) = setup_with_mechanic().await?;
        let item_a = record_test_labor(&db, mechanic.id, test_date(), 40.0).await?;
        let item_b = record_test_labor(&db, mechanic.id, test_date(), 60.0).await?;
        add_pending_adjustment(&db, adjustment(mechanic.id, AdjustmentKind::Deduction, 5.0))
            .await?;

        let header = settle(&db, mechanic.id, vec![item_a.id, item_b.id]).await?;
        assert_eq!(header.total_commissions, 10.0);
        assert_eq!(header.total_income, 0.0);
        assert_eq!(header.total_deductions, 5.0);
        assert_eq!(header.net_payable, 5.0);

        // Both items consumed and stamped
        let item_a = LedgerItem::find_by_id(item_a.id).one(&db).await?.unwrap();
        assert_eq!(item_a.settlement_id, Some(header.id));
        assert_eq!(item_a.commission, 4.0);

        // The deduction is spent
        assert!(list_pending_adjustments(&db, mechanic.id).await?.is_empty());

        // And no longer previewable (at-most-once consumption)
        let preview =
            compute_pending_commissions(&db, mechanic.id, test_date(), test_date()).await?;
        assert!(preview.lines.is_empty());
        assert_eq!(preview.total, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_settlement_rejects_stale_items() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        let item = record_test_labor(&db, mechanic.id, test_date(), 40.0).await?;

        settle(&db, mechanic.id, vec![item.id]).await?;

        // Replaying the same confirm must fail, nothing double-consumed
        let result = settle(&db, mechanic.id, vec![item.id]).await;
        assert!(matches!(
            result,
            Err(Error::StaleSettlementItems {
                requested: 1,
                matched: 0
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_settlement_rejects_foreign_items() -> Result<()> {
        let db = setup_test_db().await?;
        let carlos = create_test_mechanic(&db, "Carlos").await?;
        let luis = create_test_mechanic(&db, "Luis").await?;
        let luis_item = record_test_labor(&db, luis.id, test_date(), 40.0).await?;

        let result = settle(&db, carlos.id, vec![luis_item.id]).await;
        assert!(matches!(result, Err(Error::StaleSettlementItems { .. })));

        // Luis's item is untouched
        let luis_item = LedgerItem::find_by_id(luis_item.id).one(&db).await?.unwrap();
        assert!(luis_item.settlement_id.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_settlement_validation() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;

        let result = settle(&db, mechanic.id, vec![]).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_adjustment_sweep_ignores_period() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        let item = record_test_labor(&db, mechanic.id, test_date(), 100.0).await?;

        // Adjustment dated far outside the settled period
        let far_away = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        add_pending_adjustment(
            &db,
            NewAdjustment {
                mechanic_id: mechanic.id,
                kind: AdjustmentKind::Income,
                category: "Bono".to_string(),
                description: None,
                amount: 7.5,
                date: far_away,
            },
        )
        .await?;

        let header = settle(&db, mechanic.id, vec![item.id]).await?;
        assert_eq!(header.total_income, 7.5);
        assert!(list_pending_adjustments(&db, mechanic.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_settlement_arithmetic_with_rounding() -> Result<()> {
        let db = setup_test_db().await?;
        let mechanic = crate::test_utils::create_custom_mechanic(&db, "Rosa", 15.0).await?;
        // 33.33 * 15% = 4.9995 -> 5.00 per row, summed after rounding
        let item_a = record_test_labor(&db, mechanic.id, test_date(), 33.33).await?;
        let item_b = record_test_labor(&db, mechanic.id, test_date(), 33.33).await?;

        let header = settle(&db, mechanic.id, vec![item_a.id, item_b.id]).await?;
        assert_eq!(header.total_commissions, 10.0);
        assert_eq!(
            header.net_payable,
            round2(header.total_commissions + header.total_income - header.total_deductions)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rate_change_does_not_rewrite_history() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        let item = record_test_labor(&db, mechanic.id, test_date(), 100.0).await?;
        let header = settle(&db, mechanic.id, vec![item.id]).await?;
        assert_eq!(header.total_commissions, 10.0);

        update_commission_rate(&db, mechanic.id, 50.0).await?;

        let detail = get_settlement_detail(&db, header.id).await?;
        assert_eq!(detail.settlement.total_commissions, 10.0);
        assert_eq!(detail.labor[0].commission_rate, 10.0);
        assert_eq!(detail.labor[0].commission_amount, 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_and_detail() -> Result<()> {
        let (db, mechanic) = setup_with_mechanic().await?;
        let item = record_test_labor(&db, mechanic.id, test_date(), 80.0).await?;
        add_pending_adjustment(&db, adjustment(mechanic.id, AdjustmentKind::Income, 3.0)).await?;
        let header = settle(&db, mechanic.id, vec![item.id]).await?;

        let history = get_settlement_history(&db).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, header.id);
        assert_eq!(history[0].mechanic, "Test Mechanic");
        assert_eq!(history[0].net_payable, 11.0);

        let detail = get_settlement_detail(&db, header.id).await?;
        assert_eq!(detail.labor.len(), 1);
        assert_eq!(detail.labor[0].date, Some(test_date()));
        assert_eq!(detail.labor[0].description.as_deref(), Some("Test line"));
        assert_eq!(detail.adjustments.len(), 1);
        assert_eq!(detail.adjustments[0].amount, 3.0);

        let result = get_settlement_detail(&db, 999).await;
        assert!(matches!(result, Err(Error::SettlementNotFound { id: 999 })));
        Ok(())
    }
}
