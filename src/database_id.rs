//! Integer ID aliases for the rows in the application database.
//!
//! The aliases make function signatures self-describing without the overhead
//! of newtype wrappers for every table.

/// The integer ID of a row in the application database.
pub type DatabaseId = i64;

/// The ID of a customer.
pub type CustomerId = DatabaseId;

/// The ID of a product.
pub type ProductId = DatabaseId;

/// The ID of a service order.
pub type ServiceId = DatabaseId;

/// The ID of a financial transaction.
pub type TransactionId = DatabaseId;

/// The ID of a receivable.
pub type ReceivableId = DatabaseId;

/// The ID of a revenue target.
pub type TargetId = DatabaseId;
