//! Database operations for products.

use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::ProductId};

/// The name of a product.
///
/// The name is guaranteed to be non-blank when created with [ProductName::new].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductName(String);

impl ProductName {
    /// Create a product name, rejecting blank strings.
    ///
    /// # Errors
    /// Returns [Error::EmptyProductName] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyProductName);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a product name without validation.
    ///
    /// The caller should ensure that `name` is not blank.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A product sold by the shop, e.g. a part or an accessory.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// The ID of the product.
    pub id: ProductId,
    /// The product's name.
    pub name: ProductName,
    /// The product's barcode. Unique across products.
    pub barcode: String,
    /// The price of one unit in dollars.
    pub price: f64,
    /// The number of units in stock.
    pub stock: i64,
}

/// The form data for creating or updating a product.
#[derive(Debug, serde::Deserialize)]
pub struct ProductFormData {
    /// The product's name.
    pub name: String,
    /// The product's barcode.
    pub barcode: String,
    /// The price of one unit in dollars.
    pub price: f64,
    /// The number of units in stock.
    pub stock: i64,
}

/// Initialize the product table and indexes.
pub fn create_product_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS product (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            barcode TEXT NOT NULL UNIQUE,
            price REAL NOT NULL,
            stock INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_product_name ON product(name);",
    )?;

    Ok(())
}

/// Create a product and return it with its generated ID.
///
/// # Errors
/// Returns:
/// - [Error::EmptyProductName] if the name is blank.
/// - [Error::DuplicateProductBarcode] if the barcode is already in use.
pub fn create_product(form: &ProductFormData, connection: &Connection) -> Result<Product, Error> {
    let name = ProductName::new(&form.name)?;

    connection
        .execute(
            "INSERT INTO product (name, barcode, price, stock) VALUES (?1, ?2, ?3, ?4)",
            params![name.as_ref(), form.barcode, form.price, form.stock],
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
                Error::DuplicateProductBarcode(form.barcode.clone())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Product {
        id,
        name,
        barcode: form.barcode.clone(),
        price: form.price,
        stock: form.stock,
    })
}

/// Retrieve a single product by ID.
pub fn get_product(product_id: ProductId, connection: &Connection) -> Result<Product, Error> {
    connection
        .prepare("SELECT id, name, barcode, price, stock FROM product WHERE id = :id;")?
        .query_row(&[(":id", &product_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all products ordered alphabetically by name.
pub fn get_all_products(connection: &Connection) -> Result<Vec<Product>, Error> {
    connection
        .prepare("SELECT id, name, barcode, price, stock FROM product ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_product| maybe_product.map_err(|error| error.into()))
        .collect()
}

/// Update a product's details. Returns an error if the product doesn't exist.
pub fn update_product(
    product_id: ProductId,
    form: &ProductFormData,
    connection: &Connection,
) -> Result<(), Error> {
    let name = ProductName::new(&form.name)?;

    let rows_affected = connection
        .execute(
            "UPDATE product SET name = ?1, barcode = ?2, price = ?3, stock = ?4 WHERE id = ?5",
            params![name.as_ref(), form.barcode, form.price, form.stock, product_id],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 2067 => {
                Error::DuplicateProductBarcode(form.barcode.clone())
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingProduct);
    }

    Ok(())
}

/// Delete a product by ID. Returns an error if the product doesn't exist.
pub fn delete_product(product_id: ProductId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM product WHERE id = ?1", [product_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingProduct);
    }

    Ok(())
}

/// Reduce a product's stock by `quantity` units for a sale.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if `product_id` does not refer to a product.
/// - [Error::InsufficientStock] if fewer than `quantity` units are in stock.
pub fn decrement_stock(
    product_id: ProductId,
    quantity: i64,
    connection: &Connection,
) -> Result<(), Error> {
    let product = get_product(product_id, connection)?;

    if product.stock < quantity {
        return Err(Error::InsufficientStock(product.stock));
    }

    connection.execute(
        "UPDATE product SET stock = stock - ?1 WHERE id = ?2",
        params![quantity, product_id],
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Product, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;

    Ok(Product {
        id,
        name: ProductName::new_unchecked(&raw_name),
        barcode: row.get(2)?,
        price: row.get(3)?,
        stock: row.get(4)?,
    })
}
