//! Motodesk is a web app for running a small scooter shop: customers,
//! products, repair services, financial transactions, receivables, and
//! recurring revenue targets.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod customer;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod product;
mod receivable;
mod routing;
mod service;
mod target;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, count_users, create_user, create_user_table,
    get_user_by_id, set_user_password,
};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{
    alert::AlertTemplate,
    html::render,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A struct could not be serialized as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// A target period string did not match any of the known recurrence
    /// periods (daily, weekly, monthly, yearly).
    #[error("\"{0}\" is not a valid target period")]
    InvalidPeriod(String),

    /// A target was given an amount of zero or less.
    #[error("target amount must be greater than zero")]
    InvalidTargetAmount,

    /// An empty string was used for a target title.
    #[error("Target title cannot be empty")]
    EmptyTargetTitle,

    /// A receivable was given an amount of zero or less.
    #[error("receivable amount must be greater than zero")]
    InvalidReceivableAmount,

    /// An empty string was used for a customer name.
    #[error("Customer name cannot be empty")]
    EmptyCustomerName,

    /// An empty string was used for a product name.
    #[error("Product name cannot be empty")]
    EmptyProductName,

    /// An empty string was used for the vehicle on a service order.
    #[error("Vehicle cannot be empty")]
    EmptyVehicle,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The specified customer phone number already exists in the database.
    #[error("a customer with the phone number \"{0}\" already exists")]
    DuplicateCustomerPhone(String),

    /// The specified product barcode already exists in the database.
    #[error("a product with the barcode \"{0}\" already exists")]
    DuplicateProductBarcode(String),

    /// A sale asked for more units than the product has in stock.
    #[error("only {0} units left in stock")]
    InsufficientStock(i64),

    /// Tried to complete a service order that is already completed or
    /// cancelled.
    #[error("the service order has already been closed")]
    ServiceAlreadyClosed,

    /// Tried to settle a receivable that has already been paid.
    #[error("the receivable has already been settled")]
    ReceivableAlreadySettled,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a customer that does not exist
    #[error("tried to update a customer that is not in the database")]
    UpdateMissingCustomer,

    /// Tried to delete a customer that does not exist
    #[error("tried to delete a customer that is not in the database")]
    DeleteMissingCustomer,

    /// Tried to update a product that does not exist
    #[error("tried to update a product that is not in the database")]
    UpdateMissingProduct,

    /// Tried to delete a product that does not exist
    #[error("tried to delete a product that is not in the database")]
    DeleteMissingProduct,

    /// Tried to update a service order that does not exist
    #[error("tried to update a service order that is not in the database")]
    UpdateMissingService,

    /// Tried to delete a service order that does not exist
    #[error("tried to delete a service order that is not in the database")]
    DeleteMissingService,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a receivable that does not exist
    #[error("tried to update a receivable that is not in the database")]
    UpdateMissingReceivable,

    /// Tried to delete a receivable that does not exist
    #[error("tried to delete a receivable that is not in the database")]
    DeleteMissingReceivable,

    /// Tried to update a target that does not exist
    #[error("tried to update a target that is not in the database")]
    UpdateMissingTarget,

    /// Tried to delete a target that does not exist
    #[error("tried to delete a target that is not in the database")]
    DeleteMissingTarget,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidPeriod(period) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid target period",
                    &format!(
                        "\"{period}\" is not a recognised period. \
                        Choose one of daily, weekly, monthly or yearly."
                    ),
                ),
            ),
            Error::InvalidTargetAmount => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid target amount",
                    "The target amount must be greater than zero.",
                ),
            ),
            Error::InvalidReceivableAmount => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid receivable amount",
                    "The receivable amount must be greater than zero.",
                ),
            ),
            Error::FutureDate(date) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Invalid transaction date",
                    &format!(
                        "{date} is a date in the future, which is not allowed. Change the date to \
                        today or earlier."
                    ),
                ),
            ),
            Error::DuplicateCustomerPhone(phone) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Duplicate Phone Number",
                    &format!(
                        "A customer with the phone number {phone} already exists. \
                        Check the customers page, or edit or delete the existing customer.",
                    ),
                ),
            ),
            Error::DuplicateProductBarcode(barcode) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Duplicate Barcode",
                    &format!(
                        "A product with the barcode {barcode} already exists. \
                        Check the products page, or edit or delete the existing product.",
                    ),
                ),
            ),
            Error::InsufficientStock(available) => render(
                StatusCode::BAD_REQUEST,
                AlertTemplate::error(
                    "Not enough stock",
                    &format!("Only {available} units are left in stock."),
                ),
            ),
            Error::ServiceAlreadyClosed => render(
                StatusCode::CONFLICT,
                AlertTemplate::error(
                    "Service already closed",
                    "The service order has already been completed or cancelled. \
                    Try refreshing the page.",
                ),
            ),
            Error::ReceivableAlreadySettled => render(
                StatusCode::CONFLICT,
                AlertTemplate::error(
                    "Receivable already settled",
                    "The receivable has already been marked as paid. Try refreshing the page.",
                ),
            ),
            Error::UpdateMissingCustomer => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update customer",
                    "The customer could not be found.",
                ),
            ),
            Error::DeleteMissingCustomer => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete customer",
                    "The customer could not be found. \
                    Try refreshing the page to see if the customer has already been deleted.",
                ),
            ),
            Error::UpdateMissingProduct => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error("Could not update product", "The product could not be found."),
            ),
            Error::DeleteMissingProduct => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete product",
                    "The product could not be found. \
                    Try refreshing the page to see if the product has already been deleted.",
                ),
            ),
            Error::UpdateMissingService => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update service order",
                    "The service order could not be found.",
                ),
            ),
            Error::DeleteMissingService => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete service order",
                    "The service order could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::DeleteMissingTransaction => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            ),
            Error::UpdateMissingReceivable => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not update receivable",
                    "The receivable could not be found.",
                ),
            ),
            Error::DeleteMissingReceivable => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete receivable",
                    "The receivable could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::UpdateMissingTarget => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error("Could not update target", "The target could not be found."),
            ),
            Error::DeleteMissingTarget => render(
                StatusCode::NOT_FOUND,
                AlertTemplate::error(
                    "Could not delete target",
                    "The target could not be found. \
                    Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::InvalidTimezoneError(timezone) => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            ),
            _ => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                AlertTemplate::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
