//! The endpoint for deleting a receivable.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ReceivableId, receivable::delete_receivable};

/// The state needed for deleting a receivable.
#[derive(Debug, Clone)]
pub struct DeleteReceivableEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteReceivableEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the receivable with `receivable_id`.
///
/// Returns 200 OK on success so that htmx removes the receivable's table row.
pub async fn delete_receivable_endpoint(
    State(state): State<DeleteReceivableEndpointState>,
    Path(receivable_id): Path<ReceivableId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_receivable(receivable_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a receivable: {error}");

            error.into_alert_response()
        }
    }
}
