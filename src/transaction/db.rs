//! Defines the core data models and database queries for financial transactions.

use std::fmt;

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CustomerId, ProductId, TransactionId},
};

/// The kind of a financial transaction.
///
/// Income and sale transactions count toward revenue targets; expenses do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned outside of a product sale, e.g. a completed service.
    Income,
    /// Money spent, e.g. buying parts from a supplier.
    Expense,
    /// A product sale.
    Sale,
}

impl TransactionKind {
    /// The string stored in the database for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Sale => "sale",
        }
    }

    /// Parse a kind from its database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "sale" => Some(Self::Sale),
            _ => None,
        }
    }

    /// Whether transactions of this kind count toward revenue targets.
    pub fn counts_toward_targets(self) -> bool {
        matches!(self, Self::Income | Self::Sale)
    }

    /// A human readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Sale => "Sale",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A financial event: money that was earned or spent on a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The kind of the transaction.
    pub kind: TransactionKind,
    /// The amount of money in dollars. Always positive; the kind determines
    /// the direction of the money flow.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The customer involved, if any.
    pub customer_id: Option<CustomerId>,
    /// The product sold, for sale transactions that reference a product.
    pub product_id: Option<ProductId>,
    /// The number of units sold, for sale transactions that reference a product.
    pub quantity: Option<i64>,
}

/// The data needed to record a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    pub description: String,
    pub customer_id: Option<CustomerId>,
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
}

impl NewTransaction {
    /// A new transaction with no customer or product attached.
    pub fn new(kind: TransactionKind, amount: f64, date: Date, description: &str) -> Self {
        Self {
            kind,
            amount,
            date,
            description: description.to_owned(),
            customer_id: None,
            product_id: None,
            quantity: None,
        }
    }
}

/// Deserialize an optional form field, treating the empty string as `None`.
///
/// HTML selects submit an empty string when no option is chosen, which serde
/// would otherwise fail to parse as a number.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Initialize the transaction table and indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            customer_id INTEGER,
            product_id INTEGER,
            quantity INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_kind ON \"transaction\"(kind);",
    )?;

    Ok(())
}

/// Record a new transaction.
///
/// Dates must be no later than `today`: transactions record events that have
/// already happened.
///
/// # Errors
/// Returns [Error::FutureDate] if the transaction is dated after `today`.
pub fn create_transaction(
    new_transaction: &NewTransaction,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if new_transaction.date > today {
        return Err(Error::FutureDate(new_transaction.date));
    }

    connection.execute(
        "INSERT INTO \"transaction\" (kind, amount, date, description, customer_id, product_id, quantity) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new_transaction.kind.as_str(),
            new_transaction.amount,
            new_transaction.date,
            new_transaction.description,
            new_transaction.customer_id,
            new_transaction.product_id,
            new_transaction.quantity,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id,
        kind: new_transaction.kind,
        amount: new_transaction.amount,
        date: new_transaction.date,
        description: new_transaction.description.clone(),
        customer_id: new_transaction.customer_id,
        product_id: new_transaction.product_id,
        quantity: new_transaction.quantity,
    })
}

/// Retrieve a single transaction by ID.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, kind, amount, date, description, customer_id, product_id, quantity \
            FROM \"transaction\" WHERE id = :id;",
        )?
        .query_row(&[(":id", &transaction_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve one page of transactions, most recent first.
pub fn get_transactions_page(
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let offset = page.saturating_sub(1) * page_size;

    connection
        .prepare(
            "SELECT id, kind, amount, date, description, customer_id, product_id, quantity \
            FROM \"transaction\" ORDER BY date DESC, id DESC LIMIT :limit OFFSET :offset;",
        )?
        .query_map(
            &[(":limit", &(page_size as i64)), (":offset", &(offset as i64))],
            map_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of transactions.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Delete a transaction by ID. Returns an error if the transaction doesn't exist.
pub fn delete_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [transaction_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Sum the amounts of income and sale transactions dated within the half-open
/// range `[start, end)`.
///
/// Expense transactions never count, and a transaction dated exactly `end`
/// belongs to the next window. Returns 0 when no transactions match.
pub fn sum_revenue_between(start: Date, end: Date, connection: &Connection) -> Result<f64, Error> {
    let mut statement = connection.prepare(
        "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" \
        WHERE kind IN ('income', 'sale') AND date >= :start AND date < :end",
    )?;

    let total: f64 = statement.query_row(&[(":start", &start), (":end", &end)], |row| row.get(0))?;

    Ok(total)
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_kind: String = row.get(1)?;
    let kind = TransactionKind::parse(&raw_kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            Box::from(format!("unknown transaction kind \"{raw_kind}\"")),
        )
    })?;

    Ok(Transaction {
        id,
        kind,
        amount: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        customer_id: row.get(5)?,
        product_id: row.get(6)?,
        quantity: row.get(7)?,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        transaction::{
            NewTransaction, TransactionKind, count_transactions, create_transaction,
            delete_transaction, get_transaction, get_transactions_page,
        },
    };

    use super::create_transaction_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_transaction_table(&connection).expect("Could not create transaction table");
        connection
    }

    const TODAY: time::Date = date!(2025 - 06 - 15);

    #[test]
    fn create_transaction_succeeds() {
        let connection = get_test_db_connection();
        let new_transaction = NewTransaction::new(
            TransactionKind::Sale,
            125.0,
            date!(2025 - 06 - 14),
            "Helmet",
        );

        let transaction = create_transaction(&new_transaction, TODAY, &connection)
            .expect("Could not create transaction");

        assert!(transaction.id > 0);
        assert_eq!(transaction.kind, TransactionKind::Sale);
        assert_eq!(transaction.amount, 125.0);
        assert_eq!(transaction.date, date!(2025 - 06 - 14));
    }

    #[test]
    fn create_transaction_rejects_future_date() {
        let connection = get_test_db_connection();
        let new_transaction = NewTransaction::new(
            TransactionKind::Income,
            50.0,
            date!(2025 - 06 - 16),
            "Time travel",
        );

        let result = create_transaction(&new_transaction, TODAY, &connection);

        assert_eq!(result, Err(Error::FutureDate(date!(2025 - 06 - 16))));
    }

    #[test]
    fn get_transaction_round_trips() {
        let connection = get_test_db_connection();
        let inserted = create_transaction(
            &NewTransaction::new(
                TransactionKind::Expense,
                42.5,
                date!(2025 - 06 - 01),
                "Workshop rags",
            ),
            TODAY,
            &connection,
        )
        .unwrap();

        let selected = get_transaction(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_transaction_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_transaction(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn transactions_page_is_most_recent_first() {
        let connection = get_test_db_connection();
        create_transaction(
            &NewTransaction::new(TransactionKind::Income, 1.0, date!(2025 - 06 - 01), "old"),
            TODAY,
            &connection,
        )
        .unwrap();
        create_transaction(
            &NewTransaction::new(TransactionKind::Income, 2.0, date!(2025 - 06 - 10), "new"),
            TODAY,
            &connection,
        )
        .unwrap();

        let transactions = get_transactions_page(1, 10, &connection).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].description, "new");
        assert_eq!(transactions[1].description, "old");
    }

    #[test]
    fn transactions_page_respects_page_size() {
        let connection = get_test_db_connection();
        for day in 1..=3u8 {
            create_transaction(
                &NewTransaction::new(
                    TransactionKind::Income,
                    day as f64,
                    date!(2025 - 06 - 01).replace_day(day).unwrap(),
                    "txn",
                ),
                TODAY,
                &connection,
            )
            .unwrap();
        }

        let first_page = get_transactions_page(1, 2, &connection).unwrap();
        let second_page = get_transactions_page(2, 2, &connection).unwrap();

        assert_eq!(first_page.len(), 2);
        assert_eq!(second_page.len(), 1);
        assert_eq!(count_transactions(&connection), Ok(3));
    }

    #[test]
    fn delete_transaction_succeeds() {
        let connection = get_test_db_connection();
        let transaction = create_transaction(
            &NewTransaction::new(TransactionKind::Income, 1.0, date!(2025 - 06 - 01), "gone"),
            TODAY,
            &connection,
        )
        .unwrap();

        delete_transaction(transaction.id, &connection).expect("Could not delete transaction");

        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_transaction_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        assert_eq!(
            delete_transaction(42, &connection),
            Err(Error::DeleteMissingTransaction)
        );
    }
}

#[cfg(test)]
mod sum_revenue_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::transaction::{
        NewTransaction, TransactionKind, create_transaction, create_transaction_table,
        sum_revenue_between,
    };

    const TODAY: time::Date = date!(2025 - 06 - 15);

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_transaction_table(&connection).expect("Could not create transaction table");
        connection
    }

    fn insert(kind: TransactionKind, amount: f64, date: time::Date, connection: &Connection) {
        create_transaction(
            &NewTransaction::new(kind, amount, date, "test"),
            TODAY,
            connection,
        )
        .expect("Could not create transaction");
    }

    #[test]
    fn sums_income_and_sales_only() {
        let connection = get_test_db_connection();
        insert(TransactionKind::Sale, 600.0, date!(2025 - 06 - 05), &connection);
        insert(TransactionKind::Income, 500.0, date!(2025 - 06 - 10), &connection);
        insert(TransactionKind::Expense, 5000.0, date!(2025 - 06 - 07), &connection);

        let total =
            sum_revenue_between(date!(2025 - 06 - 01), date!(2025 - 07 - 01), &connection).unwrap();

        assert_eq!(total, 1100.0);
    }

    #[test]
    fn returns_zero_when_no_transactions_match() {
        let connection = get_test_db_connection();
        insert(TransactionKind::Income, 500.0, date!(2025 - 05 - 31), &connection);

        let total =
            sum_revenue_between(date!(2025 - 06 - 01), date!(2025 - 07 - 01), &connection).unwrap();

        assert_eq!(total, 0.0);
    }

    #[test]
    fn start_is_inclusive_and_end_is_exclusive() {
        let connection = get_test_db_connection();
        insert(TransactionKind::Income, 10.0, date!(2025 - 06 - 01), &connection);
        insert(TransactionKind::Income, 20.0, date!(2025 - 06 - 30), &connection);
        // Dated exactly on the end of the range, so belongs to the next window.
        insert(TransactionKind::Income, 40.0, date!(2025 - 07 - 01), &connection);

        let total =
            sum_revenue_between(date!(2025 - 06 - 01), date!(2025 - 07 - 01), &connection).unwrap();

        assert_eq!(total, 30.0);
    }
}
