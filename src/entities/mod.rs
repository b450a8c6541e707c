//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod ledger_entry;
pub mod ledger_item;
pub mod mechanic;
pub mod mechanic_goal;
pub mod pending_adjustment;
pub mod purchase;
pub mod purchase_item;
pub mod purchase_payment;
pub mod receivable;
pub mod receivable_payment;
pub mod register_day;
pub mod settlement;
pub mod settlement_adjustment;
pub mod settlement_labor;
pub mod supplier;

// Re-export specific types to avoid conflicts
pub use ledger_entry::{
    Column as LedgerEntryColumn, Entity as LedgerEntry, Model as LedgerEntryModel,
};
pub use ledger_item::{Column as LedgerItemColumn, Entity as LedgerItem, Model as LedgerItemModel};
pub use mechanic::{Column as MechanicColumn, Entity as Mechanic, Model as MechanicModel};
pub use mechanic_goal::{
    Column as MechanicGoalColumn, Entity as MechanicGoal, Model as MechanicGoalModel,
};
pub use pending_adjustment::{
    AdjustmentKind, Column as PendingAdjustmentColumn, Entity as PendingAdjustment,
    Model as PendingAdjustmentModel,
};
pub use purchase::{
    Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel, PurchaseStatus,
};
pub use purchase_item::{
    Column as PurchaseItemColumn, Entity as PurchaseItem, Model as PurchaseItemModel,
};
pub use purchase_payment::{
    Column as PurchasePaymentColumn, Entity as PurchasePayment, Model as PurchasePaymentModel,
};
pub use receivable::{
    Column as ReceivableColumn, Entity as Receivable, Model as ReceivableModel, ReceivableStatus,
};
pub use receivable_payment::{
    Column as ReceivablePaymentColumn, Entity as ReceivablePayment,
    Model as ReceivablePaymentModel,
};
pub use register_day::{
    Column as RegisterDayColumn, Entity as RegisterDay, Model as RegisterDayModel,
};
pub use settlement::{Column as SettlementColumn, Entity as Settlement, Model as SettlementModel};
pub use settlement_adjustment::{
    Column as SettlementAdjustmentColumn, Entity as SettlementAdjustment,
    Model as SettlementAdjustmentModel,
};
pub use settlement_labor::{
    Column as SettlementLaborColumn, Entity as SettlementLabor, Model as SettlementLaborModel,
};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
