//! Database operations for receivables (money owed by customers).

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{
    Error,
    database_id::{CustomerId, ReceivableId},
};

/// The lifecycle status of a receivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceivableStatus {
    /// The customer still owes the money.
    Outstanding,
    /// The receivable has been settled and the income recorded.
    Paid,
}

impl ReceivableStatus {
    /// The string stored in the database for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outstanding => "outstanding",
            Self::Paid => "paid",
        }
    }

    /// Parse a status from its database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "outstanding" => Some(Self::Outstanding),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// A human readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::Paid => "Paid",
        }
    }
}

impl std::fmt::Display for ReceivableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money a customer owes the shop, e.g. an unpaid repair bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Receivable {
    /// The ID of the receivable.
    pub id: ReceivableId,
    /// The customer who owes the money.
    pub customer_id: CustomerId,
    /// The amount owed in dollars.
    pub amount: f64,
    /// When the money is due.
    pub due_on: Date,
    /// The lifecycle status of the receivable.
    pub status: ReceivableStatus,
    /// Free-form notes, may be empty.
    pub notes: String,
    /// When the receivable was settled, if it has been.
    pub settled_on: Option<Date>,
}

/// The form data for creating a receivable.
#[derive(Debug, serde::Deserialize)]
pub struct ReceivableFormData {
    /// The customer who owes the money.
    pub customer_id: CustomerId,
    /// The amount owed in dollars.
    pub amount: f64,
    /// When the money is due.
    pub due_on: Date,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// Initialize the receivable table.
pub fn create_receivable_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS receivable (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            due_on TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'outstanding',
            notes TEXT NOT NULL DEFAULT '',
            settled_on TEXT,
            FOREIGN KEY(customer_id) REFERENCES customer(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Create a receivable and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidReceivableAmount] if the amount is zero or negative.
pub fn create_receivable(
    form: &ReceivableFormData,
    connection: &Connection,
) -> Result<Receivable, Error> {
    if form.amount <= 0.0 {
        return Err(Error::InvalidReceivableAmount);
    }

    connection.execute(
        "INSERT INTO receivable (customer_id, amount, due_on, status, notes) \
        VALUES (?1, ?2, ?3, 'outstanding', ?4)",
        params![form.customer_id, form.amount, form.due_on, form.notes],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Receivable {
        id,
        customer_id: form.customer_id,
        amount: form.amount,
        due_on: form.due_on,
        status: ReceivableStatus::Outstanding,
        notes: form.notes.clone(),
        settled_on: None,
    })
}

/// Retrieve a single receivable by ID.
pub fn get_receivable(
    receivable_id: ReceivableId,
    connection: &Connection,
) -> Result<Receivable, Error> {
    connection
        .prepare(
            "SELECT id, customer_id, amount, due_on, status, notes, settled_on \
            FROM receivable WHERE id = :id;",
        )?
        .query_row(&[(":id", &receivable_id)], map_row)
        .map_err(|error| error.into())
}

/// A receivable together with its customer's name, for the receivables page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivableListEntry {
    pub receivable: Receivable,
    pub customer_name: String,
}

/// Retrieve all receivables with their customer names, outstanding first and
/// then by due date.
pub fn get_all_receivables(connection: &Connection) -> Result<Vec<ReceivableListEntry>, Error> {
    connection
        .prepare(
            "SELECT r.id, r.customer_id, r.amount, r.due_on, r.status, r.notes, r.settled_on, \
            c.name \
            FROM receivable r INNER JOIN customer c ON r.customer_id = c.id \
            ORDER BY r.status ASC, r.due_on ASC;",
        )?
        .query_map([], |row| {
            let receivable = map_row(row)?;
            let customer_name: String = row.get(7)?;

            Ok(ReceivableListEntry {
                receivable,
                customer_name,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Mark a receivable as paid as of `today`.
///
/// The caller is responsible for recording the matching income transaction
/// and refreshing targets afterwards.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if the receivable doesn't exist.
/// - [Error::ReceivableAlreadySettled] if it has already been paid.
pub fn settle_receivable(
    receivable_id: ReceivableId,
    today: Date,
    connection: &Connection,
) -> Result<Receivable, Error> {
    let receivable = get_receivable(receivable_id, connection)?;

    if receivable.status == ReceivableStatus::Paid {
        return Err(Error::ReceivableAlreadySettled);
    }

    connection.execute(
        "UPDATE receivable SET status = 'paid', settled_on = ?1 WHERE id = ?2",
        params![today, receivable_id],
    )?;

    Ok(Receivable {
        status: ReceivableStatus::Paid,
        settled_on: Some(today),
        ..receivable
    })
}

/// Delete a receivable by ID. Returns an error if the receivable doesn't exist.
pub fn delete_receivable(
    receivable_id: ReceivableId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM receivable WHERE id = ?1", [receivable_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingReceivable);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Receivable, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_status: String = row.get(4)?;
    let status = ReceivableStatus::parse(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::from(format!("unknown receivable status \"{raw_status}\"")),
        )
    })?;

    Ok(Receivable {
        id,
        customer_id: row.get(1)?,
        amount: row.get(2)?,
        due_on: row.get(3)?,
        status,
        notes: row.get(5)?,
        settled_on: row.get(6)?,
    })
}
