//! The endpoint for settling a receivable.
//!
//! Settlement records the amount as an income transaction, which makes it a
//! target engine trigger point: every target is refreshed before the response
//! is sent.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ReceivableId,
    endpoints,
    receivable::settle_receivable,
    target::refresh_all_targets,
    timezone::local_date_today,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// The state needed for settling a receivable.
#[derive(Debug, Clone)]
pub struct SettleReceivableEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettleReceivableEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Settle the receivable with `receivable_id`, record its income and refresh
/// every revenue target.
pub async fn settle_receivable_endpoint(
    State(state): State<SettleReceivableEndpointState>,
    Path(receivable_id): Path<ReceivableId>,
) -> Response {
    let today = match local_date_today(&state.local_timezone) {
        Some(today) => today,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let receivable = match settle_receivable(receivable_id, today, &connection) {
        Ok(receivable) => receivable,
        Err(error) => {
            tracing::error!("Could not settle receivable {receivable_id}: {error}");
            return error.into_alert_response();
        }
    };

    let income = NewTransaction {
        kind: TransactionKind::Income,
        amount: receivable.amount,
        date: today,
        description: "Receivable settled".to_owned(),
        customer_id: Some(receivable.customer_id),
        product_id: None,
        quantity: None,
    };

    if let Err(error) = create_transaction(&income, today, &connection) {
        tracing::error!(
            "Could not record income for settled receivable {receivable_id}: {error}"
        );
        return error.into_alert_response();
    }

    if let Err(error) = refresh_all_targets(today, &connection) {
        tracing::error!(
            "could not refresh targets after settling receivable {receivable_id}: {error}"
        );
    }

    (
        HxRedirect(endpoints::RECEIVABLES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod settle_receivable_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        customer::{CustomerFormData, create_customer},
        db::initialize,
        endpoints,
        receivable::{ReceivableFormData, ReceivableStatus, create_receivable, get_receivable},
        target::{TargetFormData, TargetStatus, create_target, get_target},
        test_utils::assert_hx_redirect,
        transaction::{TransactionKind, get_transactions_page},
    };

    use super::{SettleReceivableEndpointState, settle_receivable_endpoint};

    fn get_state() -> (SettleReceivableEndpointState, i64) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        let customer = create_customer(
            &CustomerFormData {
                name: "Mere Brown".to_owned(),
                phone: "0211234567".to_owned(),
                email: "".to_owned(),
                address: "".to_owned(),
                notes: "".to_owned(),
            },
            &connection,
        )
        .expect("Could not create customer");

        (
            SettleReceivableEndpointState {
                local_timezone: "Etc/UTC".to_owned(),
                db_connection: Arc::new(Mutex::new(connection)),
            },
            customer.id,
        )
    }

    #[tokio::test]
    async fn settling_records_income_and_refreshes_targets() {
        let (state, customer_id) = get_state();
        let today = OffsetDateTime::now_utc().date();
        let (receivable, target) = {
            let connection = state.db_connection.lock().unwrap();
            let receivable = create_receivable(
                &ReceivableFormData {
                    customer_id,
                    amount: 120.0,
                    due_on: today + Duration::days(14),
                    notes: "".to_owned(),
                },
                &connection,
            )
            .expect("Could not create receivable");

            let target = create_target(
                &TargetFormData {
                    title: "Daily takings".to_owned(),
                    target_amount: 100.0,
                    period: "daily".to_owned(),
                    description: "".to_owned(),
                },
                today,
                &connection,
            )
            .expect("Could not create target");

            (receivable, target)
        };

        let response = settle_receivable_endpoint(State(state.clone()), Path(receivable.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::RECEIVABLES_VIEW);

        let connection = state.db_connection.lock().unwrap();

        let settled = get_receivable(receivable.id, &connection).unwrap();
        assert_eq!(settled.status, ReceivableStatus::Paid);

        let transactions = get_transactions_page(1, 10, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].kind, TransactionKind::Income);
        assert_eq!(transactions[0].amount, 120.0);

        let refreshed = get_target(target.id, &connection).unwrap();
        assert_eq!(refreshed.current_amount, 120.0);
        assert_eq!(refreshed.status, TargetStatus::Completed);
    }

    #[tokio::test]
    async fn settling_twice_returns_conflict_and_no_double_income() {
        let (state, customer_id) = get_state();
        let today = OffsetDateTime::now_utc().date();
        let receivable = {
            let connection = state.db_connection.lock().unwrap();
            create_receivable(
                &ReceivableFormData {
                    customer_id,
                    amount: 120.0,
                    due_on: today + Duration::days(14),
                    notes: "".to_owned(),
                },
                &connection,
            )
            .expect("Could not create receivable")
        };

        settle_receivable_endpoint(State(state.clone()), Path(receivable.id)).await;
        let response = settle_receivable_endpoint(State(state.clone()), Path(receivable.id)).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_page(1, 10, &connection).unwrap();
        assert_eq!(transactions.len(), 1, "income must be recorded exactly once");
    }

    #[tokio::test]
    async fn settling_missing_receivable_returns_not_found() {
        let (state, _) = get_state();

        let response = settle_receivable_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
