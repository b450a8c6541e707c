//! Supplier purchases and accounts payable business logic.
//!
//! Mirrors the receivable side from the other direction: a purchase
//! tracks what the shop owes a supplier, paid down by partial payments
//! until the balance reaches zero. Status is always derived from paid
//! against total. Cash purchases (`"contado"` terms) self-settle at
//! creation time.

use crate::{
    entities::{
        Purchase, PurchaseItem, PurchasePayment, PurchaseStatus, Supplier, purchase,
        purchase_item, purchase_payment, supplier,
    },
    errors::{Error, Result},
    money::round2,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::info;

/// Payment terms for purchases paid in full on receipt.
pub const TERMS_CASH: &str = "contado";
/// Payment terms for purchases settled later.
pub const TERMS_CREDIT: &str = "credito";

/// Derives a purchase status from its total and amount paid so far.
#[must_use]
pub fn status_for(total: f64, paid: f64) -> PurchaseStatus {
    if paid <= 0.0 {
        PurchaseStatus::Pending
    } else if paid < total {
        PurchaseStatus::Partial
    } else {
        PurchaseStatus::Paid
    }
}

/// A new supplier, as submitted by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplier {
    /// Supplier name
    pub name: String,
    /// Tax identifier
    pub tax_id: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Street address
    pub address: Option<String>,
}

/// Retrieves all active suppliers, ordered alphabetically by name.
pub async fn get_active_suppliers(db: &DatabaseConnection) -> Result<Vec<supplier::Model>> {
    Supplier::find()
        .filter(supplier::Column::Active.eq(true))
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new supplier.
pub async fn create_supplier(
    db: &DatabaseConnection,
    new: NewSupplier,
) -> Result<supplier::Model> {
    if new.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Supplier name cannot be empty".to_string(),
        });
    }

    let model = supplier::ActiveModel {
        name: Set(new.name.trim().to_string()),
        tax_id: Set(new.tax_id),
        phone: Set(new.phone),
        email: Set(new.email),
        address: Set(new.address),
        active: Set(true),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Updates a supplier's contact details. Purchases are untouched.
pub async fn update_supplier(
    db: &DatabaseConnection,
    supplier_id: i64,
    update: NewSupplier,
) -> Result<supplier::Model> {
    if update.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Supplier name cannot be empty".to_string(),
        });
    }

    let existing = Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;

    let mut active: supplier::ActiveModel = existing.into();
    active.name = Set(update.name.trim().to_string());
    active.tax_id = Set(update.tax_id);
    active.phone = Set(update.phone);
    active.email = Set(update.email);
    active.address = Set(update.address);
    active.update(db).await.map_err(Into::into)
}

/// Deactivates a supplier (soft delete). Purchase history is preserved.
pub async fn deactivate_supplier(db: &DatabaseConnection, supplier_id: i64) -> Result<()> {
    let existing = Supplier::find_by_id(supplier_id)
        .one(db)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;

    let mut active: supplier::ActiveModel = existing.into();
    active.active = Set(false);
    active.update(db).await?;
    Ok(())
}

/// One line of a new purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchaseItem {
    /// What was bought
    pub description: String,
    /// Units bought
    pub quantity: i32,
    /// Price per unit
    pub unit_price: f64,
    /// Where the line came from, if imported
    pub origin: Option<String>,
    /// Source ledger line, if imported
    pub ledger_item_id: Option<i64>,
}

/// A new purchase with its line items.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchase {
    /// Supplier the purchase is owed to
    pub supplier_id: i64,
    /// Supplier invoice reference
    pub invoice_number: Option<String>,
    /// Date the goods were received
    pub received_on: NaiveDate,
    /// `"contado"` or `"credito"`
    pub payment_terms: String,
    /// Line items; at least one is required
    pub items: Vec<NewPurchaseItem>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Creates a purchase with its items atomically.
///
/// The total is computed from the line items; client-supplied totals are
/// never trusted. Cash-terms purchases get a same-day payment for the full
/// amount and come out already settled.
pub async fn create_purchase(
    db: &DatabaseConnection,
    new: NewPurchase,
) -> Result<purchase::Model> {
    if new.items.is_empty() {
        return Err(Error::Validation {
            message: "At least one purchase item is required".to_string(),
        });
    }
    for item in &new.items {
        if item.quantity <= 0 {
            return Err(Error::Validation {
                message: format!("Invalid quantity {} for '{}'", item.quantity, item.description),
            });
        }
        if item.unit_price < 0.0 || !item.unit_price.is_finite() {
            return Err(Error::InvalidAmount {
                amount: item.unit_price,
            });
        }
    }

    let txn = db.begin().await?;

    let supplier = Supplier::find_by_id(new.supplier_id)
        .filter(supplier::Column::Active.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::SupplierNotFound {
            id: new.supplier_id,
        })?;

    let subtotals: Vec<f64> = new
        .items
        .iter()
        .map(|i| round2(f64::from(i.quantity) * i.unit_price))
        .collect();
    let total = round2(subtotals.iter().sum());
    let cash_terms = new.payment_terms.eq_ignore_ascii_case(TERMS_CASH);
    let paid = if cash_terms { total } else { 0.0 };

    let header = purchase::ActiveModel {
        supplier_id: Set(supplier.id),
        invoice_number: Set(new.invoice_number),
        received_on: Set(new.received_on),
        payment_terms: Set(new.payment_terms.to_lowercase()),
        total: Set(total),
        paid: Set(paid),
        balance: Set(round2(total - paid)),
        status: Set(status_for(total, paid)),
        notes: Set(new.notes),
        ..Default::default()
    };
    let header = header.insert(&txn).await?;

    for (item, subtotal) in new.items.into_iter().zip(subtotals) {
        purchase_item::ActiveModel {
            purchase_id: Set(header.id),
            description: Set(item.description),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            subtotal: Set(subtotal),
            origin: Set(item.origin),
            ledger_item_id: Set(item.ledger_item_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    if cash_terms && total > 0.0 {
        purchase_payment::ActiveModel {
            purchase_id: Set(header.id),
            date: Set(header.received_on),
            amount: Set(total),
            payment_method: Set(Some("Efectivo".to_string())),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(
        purchase_id = header.id,
        supplier_id = header.supplier_id,
        total,
        "purchase recorded"
    );
    Ok(header)
}

/// Replaces an unpaid purchase's header fields and line items atomically.
///
/// Once any payment exists the purchase is frozen and edits are rejected,
/// so payment history always reconciles against the totals it was made
/// under.
pub async fn update_purchase(
    db: &DatabaseConnection,
    purchase_id: i64,
    update: NewPurchase,
) -> Result<purchase::Model> {
    if update.items.is_empty() {
        return Err(Error::Validation {
            message: "At least one purchase item is required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let existing = Purchase::find_by_id(purchase_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseNotFound { id: purchase_id })?;
    if existing.status != PurchaseStatus::Pending {
        return Err(Error::PurchaseNotEditable { id: purchase_id });
    }

    let subtotals: Vec<f64> = update
        .items
        .iter()
        .map(|i| round2(f64::from(i.quantity) * i.unit_price))
        .collect();
    let total = round2(subtotals.iter().sum());

    PurchaseItem::delete_many()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .exec(&txn)
        .await?;
    for (item, subtotal) in update.items.into_iter().zip(subtotals) {
        purchase_item::ActiveModel {
            purchase_id: Set(purchase_id),
            description: Set(item.description),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            subtotal: Set(subtotal),
            origin: Set(item.origin),
            ledger_item_id: Set(item.ledger_item_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let mut active: purchase::ActiveModel = existing.into();
    active.invoice_number = Set(update.invoice_number);
    active.received_on = Set(update.received_on);
    active.payment_terms = Set(update.payment_terms.to_lowercase());
    active.total = Set(total);
    active.balance = Set(total);
    active.notes = Set(update.notes);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// A new payment against a purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchasePayment {
    /// The purchase being paid down
    pub purchase_id: i64,
    /// Payment date
    pub date: NaiveDate,
    /// Positive payment amount
    pub amount: f64,
    /// How the payment was made
    pub payment_method: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Records a payment to a supplier and rolls the purchase forward.
///
/// Same arithmetic as receivable payments: the balance floors at zero and
/// a fully paid purchase accepts no further payments.
pub async fn record_purchase_payment(
    db: &DatabaseConnection,
    payment: NewPurchasePayment,
) -> Result<(purchase_payment::Model, purchase::Model)> {
    if payment.amount <= 0.0 || !payment.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: payment.amount,
        });
    }

    let txn = db.begin().await?;

    let existing = Purchase::find_by_id(payment.purchase_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseNotFound {
            id: payment.purchase_id,
        })?;
    if existing.status == PurchaseStatus::Paid {
        return Err(Error::Validation {
            message: format!("Purchase {} is already paid in full", existing.id),
        });
    }

    let created = purchase_payment::ActiveModel {
        purchase_id: Set(existing.id),
        date: Set(payment.date),
        amount: Set(round2(payment.amount)),
        payment_method: Set(payment.payment_method),
        notes: Set(payment.notes),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let paid = round2(existing.paid + created.amount).min(existing.total);
    let balance = round2(existing.total - paid).max(0.0);
    let status = status_for(existing.total, paid);
    let mut active: purchase::ActiveModel = existing.into();
    active.paid = Set(paid);
    active.balance = Set(balance);
    active.status = Set(status);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok((created, updated))
}

/// Optional filters for the purchase listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseFilter {
    /// Match a single supplier
    pub supplier_id: Option<i64>,
    /// Match a single status
    pub status: Option<PurchaseStatus>,
}

/// Lists purchases with their supplier names, most recent first.
pub async fn list_purchases(
    db: &DatabaseConnection,
    filter: PurchaseFilter,
) -> Result<Vec<(purchase::Model, Option<supplier::Model>)>> {
    let mut query = Purchase::find().find_also_related(Supplier);
    if let Some(supplier_id) = filter.supplier_id {
        query = query.filter(purchase::Column::SupplierId.eq(supplier_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(purchase::Column::Status.eq(status));
    }

    query
        .order_by_desc(purchase::Column::ReceivedOn)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Purchases still owing, oldest receipt first, for the payment queue view.
pub async fn list_open_payables(
    db: &DatabaseConnection,
) -> Result<Vec<(purchase::Model, Option<supplier::Model>)>> {
    Purchase::find()
        .find_also_related(Supplier)
        .filter(purchase::Column::Status.ne(PurchaseStatus::Paid))
        .order_by_asc(purchase::Column::ReceivedOn)
        .order_by_asc(purchase::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A purchase with its supplier, line items, and payment history.
#[derive(Debug, Clone)]
pub struct PurchaseDetail {
    /// The purchase header
    pub purchase: purchase::Model,
    /// Supplier name at read time
    pub supplier: String,
    /// Line items in insertion order
    pub items: Vec<purchase_item::Model>,
    /// Payments in chronological order
    pub payments: Vec<purchase_payment::Model>,
}

/// Retrieves a purchase with its items and payment history.
pub async fn get_purchase_detail(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<PurchaseDetail> {
    let header = Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or(Error::PurchaseNotFound { id: purchase_id })?;

    let supplier_name = Supplier::find_by_id(header.supplier_id)
        .one(db)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();

    let items = PurchaseItem::find()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_item::Column::Id)
        .all(db)
        .await?;

    let payments = PurchasePayment::find()
        .filter(purchase_payment::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_payment::Column::Date)
        .order_by_asc(purchase_payment::Column::Id)
        .all(db)
        .await?;

    Ok(PurchaseDetail {
        purchase: header,
        supplier: supplier_name,
        items,
        payments,
    })
}

/// Creates a supplier inside an existing transaction or connection.
/// Used by the initial seeding path.
pub async fn ensure_supplier<C>(db: &C, name: &str) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = Supplier::find()
        .filter(supplier::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }
    supplier::ActiveModel {
        name: Set(name.to_string()),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
