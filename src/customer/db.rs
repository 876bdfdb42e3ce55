//! Database operations for customers.

use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::CustomerId};

/// The name of a customer.
///
/// The name is guaranteed to be non-blank when created with [CustomerName::new].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerName(String);

impl CustomerName {
    /// Create a customer name, rejecting blank strings.
    ///
    /// # Errors
    /// Returns [Error::EmptyCustomerName] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyCustomerName);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a customer name without validation.
    ///
    /// The caller should ensure that `name` is not blank.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A customer of the shop.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// The ID of the customer.
    pub id: CustomerId,
    /// The customer's name.
    pub name: CustomerName,
    /// The customer's phone number. Unique across customers.
    pub phone: String,
    /// The customer's email address, may be empty.
    pub email: String,
    /// The customer's street address, may be empty.
    pub address: String,
    /// Free-form notes about the customer, may be empty.
    pub notes: String,
}

/// The form data for creating or updating a customer.
#[derive(Debug, serde::Deserialize)]
pub struct CustomerFormData {
    /// The customer's name.
    pub name: String,
    /// The customer's phone number.
    pub phone: String,
    /// The customer's email address.
    #[serde(default)]
    pub email: String,
    /// The customer's street address.
    #[serde(default)]
    pub address: String,
    /// Free-form notes about the customer.
    #[serde(default)]
    pub notes: String,
}

/// Initialize the customer table and indexes.
pub fn create_customer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS customer (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_customer_name ON customer(name);",
    )?;

    Ok(())
}

/// Create a customer and return it with its generated ID.
///
/// # Errors
/// Returns:
/// - [Error::EmptyCustomerName] if the name is blank.
/// - [Error::DuplicateCustomerPhone] if the phone number is already in use.
pub fn create_customer(form: &CustomerFormData, connection: &Connection) -> Result<Customer, Error> {
    let name = CustomerName::new(&form.name)?;

    connection
        .execute(
            "INSERT INTO customer (name, phone, email, address, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name.as_ref(), form.phone, form.email, form.address, form.notes],
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
                Error::DuplicateCustomerPhone(form.phone.clone())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Customer {
        id,
        name,
        phone: form.phone.clone(),
        email: form.email.clone(),
        address: form.address.clone(),
        notes: form.notes.clone(),
    })
}

/// Retrieve a single customer by ID.
pub fn get_customer(customer_id: CustomerId, connection: &Connection) -> Result<Customer, Error> {
    connection
        .prepare(
            "SELECT id, name, phone, email, address, notes FROM customer WHERE id = :id;",
        )?
        .query_row(&[(":id", &customer_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all customers ordered alphabetically by name.
pub fn get_all_customers(connection: &Connection) -> Result<Vec<Customer>, Error> {
    connection
        .prepare("SELECT id, name, phone, email, address, notes FROM customer ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_customer| maybe_customer.map_err(|error| error.into()))
        .collect()
}

/// Update a customer's details. Returns an error if the customer doesn't exist.
pub fn update_customer(
    customer_id: CustomerId,
    form: &CustomerFormData,
    connection: &Connection,
) -> Result<(), Error> {
    let name = CustomerName::new(&form.name)?;

    let rows_affected = connection
        .execute(
            "UPDATE customer SET name = ?1, phone = ?2, email = ?3, address = ?4, notes = ?5 \
            WHERE id = ?6",
            params![
                name.as_ref(),
                form.phone,
                form.email,
                form.address,
                form.notes,
                customer_id
            ],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
                Error::DuplicateCustomerPhone(form.phone.clone())
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCustomer);
    }

    Ok(())
}

/// Delete a customer by ID. Returns an error if the customer doesn't exist.
pub fn delete_customer(customer_id: CustomerId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM customer WHERE id = ?1", [customer_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCustomer);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Customer, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;

    Ok(Customer {
        id,
        name: CustomerName::new_unchecked(&raw_name),
        phone: row.get(2)?,
        email: row.get(3)?,
        address: row.get(4)?,
        notes: row.get(5)?,
    })
}
