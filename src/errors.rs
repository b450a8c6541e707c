//! Unified error types for the back-office engine.
//!
//! Variants are grouped by how callers should react: validation errors are
//! rejected before any transaction is opened, conflict errors mean the
//! caller's view of the world is stale and must be refreshed, not-found
//! errors identify a missing entity, and database errors surface as-is
//! (every mutation path is transactional, so a failed operation can be
//! resubmitted in full).

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the back-office core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Malformed or missing input, rejected before any write.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// Amount is zero, negative, or not a finite number.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// Date range where `from` is after `to`.
    #[error("Invalid date range: {from} to {to}")]
    InvalidDateRange {
        /// Start of the requested range
        from: NaiveDate,
        /// End of the requested range
        to: NaiveDate,
    },

    /// Mechanic id does not reference an active mechanic.
    #[error("Mechanic not found: {id}")]
    MechanicNotFound {
        /// The requested mechanic id
        id: i64,
    },

    /// Pending adjustment id does not exist.
    #[error("Pending adjustment not found: {id}")]
    AdjustmentNotFound {
        /// The requested adjustment id
        id: i64,
    },

    /// Settlement id does not exist.
    #[error("Settlement not found: {id}")]
    SettlementNotFound {
        /// The requested settlement id
        id: i64,
    },

    /// Receivable account id does not exist.
    #[error("Receivable not found: {id}")]
    ReceivableNotFound {
        /// The requested receivable id
        id: i64,
    },

    /// Payment (abono) id does not exist on the given account.
    #[error("Payment not found: {id}")]
    PaymentNotFound {
        /// The requested payment id
        id: i64,
    },

    /// Supplier id does not exist or is inactive.
    #[error("Supplier not found: {id}")]
    SupplierNotFound {
        /// The requested supplier id
        id: i64,
    },

    /// Purchase id does not exist.
    #[error("Purchase not found: {id}")]
    PurchaseNotFound {
        /// The requested purchase id
        id: i64,
    },

    /// The settlement request references labor items that are no longer
    /// pending for this mechanic (consumed by another settlement, or foreign
    /// ids). The caller must re-fetch the preview and retry.
    #[error("Stale settlement request: {requested} items requested, {matched} still pending")]
    StaleSettlementItems {
        /// Number of item ids the caller submitted
        requested: usize,
        /// Number of those ids still unconsumed for this mechanic
        matched: usize,
    },

    /// A cash register was already opened for this date.
    #[error("A register is already open for {date}")]
    RegisterAlreadyOpen {
        /// The register date
        date: NaiveDate,
    },

    /// No cash register has been opened for this date.
    #[error("No open register for {date}")]
    RegisterNotOpen {
        /// The register date
        date: NaiveDate,
    },

    /// The register for this date has already been closed; closing is a
    /// terminal transition and cannot be repeated.
    #[error("The register for {date} is already closed")]
    RegisterAlreadyClosed {
        /// The register date
        date: NaiveDate,
    },

    /// Register close with a cash difference but no explanation.
    #[error("Variance of {variance:.2} requires a justification")]
    VarianceNeedsJustification {
        /// Physical minus expected amount
        variance: f64,
    },

    /// Purchases can only be edited while still pending.
    #[error("Purchase {id} is not pending and cannot be edited")]
    PurchaseNotEditable {
        /// The purchase id
        id: i64,
    },

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (configuration file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
