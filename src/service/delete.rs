//! The endpoint for deleting a service order.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ServiceId, service::delete_service};

/// The state needed for deleting a service order.
#[derive(Debug, Clone)]
pub struct DeleteServiceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the service order with `service_id`.
///
/// Returns 200 OK on success so that htmx removes the order's table row.
pub async fn delete_service_endpoint(
    State(state): State<DeleteServiceEndpointState>,
    Path(service_id): Path<ServiceId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_service(service_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a service: {error}");

            error.into_alert_response()
        }
    }
}
