//! The endpoint for deleting a target.
//!
//! Targets are never deleted automatically; expiry only changes their status.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::TargetId, target::delete_target};

/// The state needed for deleting a target.
#[derive(Debug, Clone)]
pub struct DeleteTargetEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTargetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the target with `target_id`.
///
/// Returns 200 OK on success so that htmx removes the target's card.
pub async fn delete_target_endpoint(
    State(state): State<DeleteTargetEndpointState>,
    Path(target_id): Path<TargetId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_target(target_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a target: {error}");

            error.into_alert_response()
        }
    }
}
