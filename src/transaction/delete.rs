//! The endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::TransactionId, transaction::delete_transaction};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the transaction with `transaction_id`.
///
/// Target progress is not recomputed here; the next listing or qualifying
/// financial event refreshes it against the remaining transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionEndpointState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting a transaction: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        transaction::{
            NewTransaction, TransactionKind, create_transaction, create_transaction_table,
            get_transaction,
        },
    };

    use super::{DeleteTransactionEndpointState, delete_transaction_endpoint};

    fn get_state() -> DeleteTransactionEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_transaction_table(&connection).expect("Could not create transaction table");

        DeleteTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_delete_transaction() {
        let state = get_state();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                &NewTransaction::new(
                    TransactionKind::Income,
                    10.0,
                    date!(2025 - 06 - 01),
                    "gone",
                ),
                date!(2025 - 06 - 15),
                &connection,
            )
            .expect("Could not create transaction")
        };

        let response = delete_transaction_endpoint(State(state.clone()), Path(transaction.id)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_transaction_returns_not_found() {
        let state = get_state();

        let response = delete_transaction_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
