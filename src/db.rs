//! Database initialization for the application.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, auth::create_user_table, customer::create_customer_table,
    product::create_product_table, receivable::create_receivable_table,
    service::create_service_table, target::create_target_table,
    transaction::create_transaction_table,
};

/// Create the tables for the application's domain models if they do not exist.
///
/// All tables are created in a single exclusive transaction so that a partial
/// schema is never left behind.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_customer_table(&transaction)?;
    create_product_table(&transaction)?;
    create_service_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_receivable_table(&transaction)?;
    create_target_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
