//! The endpoint for deleting a product.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ProductId, product::delete_product};

/// The state needed for deleting a product.
#[derive(Debug, Clone)]
pub struct DeleteProductEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteProductEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the product with `product_id`.
///
/// Returns 200 OK on success so that htmx removes the product's table row.
pub async fn delete_product_endpoint(
    State(state): State<DeleteProductEndpointState>,
    Path(product_id): Path<ProductId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_product(product_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a product: {error}");

            error.into_alert_response()
        }
    }
}
