//! The endpoint for completing a service order.
//!
//! Completion records the order's cost as an income transaction and is one of
//! the target engine's trigger points: every target is refreshed before the
//! response is sent.

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
    database_id::ServiceId,
    endpoints,
    service::complete_service,
    target::refresh_all_targets,
    timezone::local_date_today,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// The state needed for completing a service order.
#[derive(Debug, Clone)]
pub struct CompleteServiceEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CompleteServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Complete the service order with `service_id`, record its income and
/// refresh every revenue target.
pub async fn complete_service_endpoint(
    State(state): State<CompleteServiceEndpointState>,
    Path(service_id): Path<ServiceId>,
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

    let service = match complete_service(service_id, today, &connection) {
        Ok(service) => service,
        Err(error) => {
            tracing::error!("Could not complete service {service_id}: {error}");
            return error.into_alert_response();
        }
    };

    let income = NewTransaction {
        kind: TransactionKind::Income,
        amount: service.cost,
        date: today,
        description: format!("Service: {}", service.vehicle),
        customer_id: Some(service.customer_id),
        product_id: None,
        quantity: None,
    };

    if let Err(error) = create_transaction(&income, today, &connection) {
        tracing::error!(
            "Could not record income for completed service {service_id}: {error}"
        );
        return error.into_alert_response();
    }

    if let Err(error) = refresh_all_targets(today, &connection) {
        tracing::error!(
            "could not refresh targets after completing service {service_id}: {error}"
        );
    }

    (
        HxRedirect(endpoints::SERVICES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod complete_service_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        customer::{CustomerFormData, create_customer},
        db::initialize,
        endpoints,
        service::{ServiceFormData, ServiceStatus, create_service, get_service},
        target::{TargetFormData, TargetStatus, create_target, get_target},
        test_utils::assert_hx_redirect,
        transaction::{TransactionKind, get_transactions_page},
    };

    use super::{CompleteServiceEndpointState, complete_service_endpoint};

    fn get_state() -> (CompleteServiceEndpointState, i64) {
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
            CompleteServiceEndpointState {
                local_timezone: "Etc/UTC".to_owned(),
                db_connection: Arc::new(Mutex::new(connection)),
            },
            customer.id,
        )
    }

    #[tokio::test]
    async fn completing_a_service_records_income_and_refreshes_targets() {
        let (state, customer_id) = get_state();
        let today = OffsetDateTime::now_utc().date();
        let (service, target) = {
            let connection = state.db_connection.lock().unwrap();
            let service = create_service(
                &ServiceFormData {
                    customer_id,
                    vehicle: "Vespa GTS 300".to_owned(),
                    problem: "Won't start".to_owned(),
                    cost: 180.0,
                    status: None,
                },
                today,
                &connection,
            )
            .expect("Could not create service");

            let target = create_target(
                &TargetFormData {
                    title: "Daily takings".to_owned(),
                    target_amount: 150.0,
                    period: "daily".to_owned(),
                    description: "".to_owned(),
                },
                today,
                &connection,
            )
            .expect("Could not create target");

            (service, target)
        };

        let response = complete_service_endpoint(State(state.clone()), Path(service.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SERVICES_VIEW);

        let connection = state.db_connection.lock().unwrap();

        let completed = get_service(service.id, &connection).unwrap();
        assert_eq!(completed.status, ServiceStatus::Completed);

        let transactions = get_transactions_page(1, 10, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].kind, TransactionKind::Income);
        assert_eq!(transactions[0].amount, 180.0);
        assert_eq!(transactions[0].customer_id, Some(customer_id));

        let refreshed = get_target(target.id, &connection).unwrap();
        assert_eq!(refreshed.current_amount, 180.0);
        assert_eq!(refreshed.status, TargetStatus::Completed);
    }

    #[tokio::test]
    async fn completing_twice_returns_conflict_and_no_double_income() {
        let (state, customer_id) = get_state();
        let today = OffsetDateTime::now_utc().date();
        let service = {
            let connection = state.db_connection.lock().unwrap();
            create_service(
                &ServiceFormData {
                    customer_id,
                    vehicle: "Vespa GTS 300".to_owned(),
                    problem: "Won't start".to_owned(),
                    cost: 180.0,
                    status: None,
                },
                today,
                &connection,
            )
            .expect("Could not create service")
        };

        complete_service_endpoint(State(state.clone()), Path(service.id)).await;
        let response = complete_service_endpoint(State(state.clone()), Path(service.id)).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_page(1, 10, &connection).unwrap();
        assert_eq!(transactions.len(), 1, "income must be recorded exactly once");
    }

    #[tokio::test]
    async fn completing_missing_service_returns_not_found() {
        let (state, _) = get_state();

        let response = complete_service_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
