//! The endpoint for deleting a customer.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, customer::delete_customer, database_id::CustomerId};

/// The state needed for deleting a customer.
#[derive(Debug, Clone)]
pub struct DeleteCustomerEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the customer with `customer_id`.
///
/// Returns 200 OK on success so that htmx removes the customer's table row.
pub async fn delete_customer_endpoint(
    State(state): State<DeleteCustomerEndpointState>,
    Path(customer_id): Path<CustomerId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_customer(customer_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a customer: {error}");

            error.into_alert_response()
        }
    }
}
