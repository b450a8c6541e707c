//! Core business logic for the garage back-office.
//!
//! Each submodule owns one engine and exposes framework-agnostic async
//! functions taking a database connection plus typed request structs. The
//! serving layer (HTTP routes, exports) is a thin caller of these modules.

/// Commission engine: previews, pending adjustments, settlement generation
pub mod commission;
/// Monthly labor targets per mechanic
pub mod goal;
/// Daily transaction ledger: headers, line items, movement classification
pub mod ledger;
/// Mechanic roster management
pub mod mechanic;
/// Supplier purchases and accounts payable
pub mod payable;
/// Customer receivables with partial payments
pub mod receivable;
/// Cash register open/summary/close reconciliation
pub mod register;
