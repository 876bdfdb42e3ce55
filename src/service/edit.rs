//! Service order edit page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    customer::{Customer, get_all_customers},
    database_id::ServiceId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    service::{Service, ServiceFormData, ServiceStatus, get_service, update_service},
};

/// The state needed for editing a service order.
#[derive(Debug, Clone)]
pub struct EditServiceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the service order edit page.
pub async fn get_edit_service_page(
    State(state): State<EditServiceEndpointState>,
    Path(service_id): Path<ServiceId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let service = match get_service(service_id, &connection) {
        Ok(service) => service,
        Err(error) => return error.into_response(),
    };
    let customers = match get_all_customers(&connection) {
        Ok(customers) => customers,
        Err(error) => return error.into_response(),
    };

    edit_service_view(&service, &customers).into_response()
}

/// Handle service order edit form submission.
pub async fn edit_service_endpoint(
    State(state): State<EditServiceEndpointState>,
    Path(service_id): Path<ServiceId>,
    Form(form): Form<ServiceFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_service(service_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::SERVICES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a service: {error}");

            error.into_alert_response()
        }
    }
}

/// The statuses offered in the edit form; completion has its own endpoint so
/// that the income is recorded exactly once.
const EDITABLE_STATUSES: [ServiceStatus; 3] = [
    ServiceStatus::Pending,
    ServiceStatus::InProgress,
    ServiceStatus::Cancelled,
];

fn edit_service_view(service: &Service, customers: &[Customer]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SERVICES_VIEW).into_html();
    let edit_endpoint = endpoints::format_endpoint(endpoints::PUT_SERVICE, service.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(edit_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="customer_id" class=(FORM_LABEL_STYLE) { "Customer" }

                    select id="customer_id" name="customer_id" required class=(FORM_SELECT_STYLE)
                    {
                        @for customer in customers {
                            option
                                value=(customer.id)
                                selected[customer.id == service.customer_id]
                            {
                                (customer.name)
                            }
                        }
                    }
                }

                div
                {
                    label for="vehicle" class=(FORM_LABEL_STYLE) { "Vehicle" }

                    input
                        id="vehicle"
                        type="text"
                        name="vehicle"
                        value=(service.vehicle)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="problem" class=(FORM_LABEL_STYLE) { "Problem" }

                    input
                        id="problem"
                        type="text"
                        name="problem"
                        value=(service.problem)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="cost" class=(FORM_LABEL_STYLE) { "Quoted cost" }

                    input
                        id="cost"
                        type="number"
                        name="cost"
                        step="0.01"
                        min="0"
                        value=(service.cost)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                    select id="status" name="status" class=(FORM_SELECT_STYLE)
                    {
                        @for status in EDITABLE_STATUSES {
                            option
                                value=(status.as_str())
                                selected[status == service.status]
                            {
                                (status.label())
                            }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Service" }
            }
        }
    };

    base("Edit Service", &content)
}

#[cfg(test)]
mod edit_service_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        customer::{CustomerFormData, create_customer},
        db::initialize,
        endpoints,
        service::{
            ServiceFormData, ServiceStatus, complete_service, create_service, get_service,
        },
        test_utils::{
            assert_form_input_with_value, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{EditServiceEndpointState, edit_service_endpoint, get_edit_service_page};

    const TODAY: time::Date = date!(2025 - 06 - 15);

    fn get_state() -> (EditServiceEndpointState, i64) {
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
            EditServiceEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            customer.id,
        )
    }

    fn test_form(customer_id: i64, cost: f64, status: Option<&str>) -> ServiceFormData {
        ServiceFormData {
            customer_id,
            vehicle: "Vespa GTS 300".to_owned(),
            problem: "Won't start".to_owned(),
            cost,
            status: status.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn edit_page_prefills_service_details() {
        let (state, customer_id) = get_state();
        let service = {
            let connection = state.db_connection.lock().unwrap();
            create_service(&test_form(customer_id, 180.0, None), TODAY, &connection)
                .expect("Could not create service")
        };

        let response = get_edit_service_page(State(state), Path(service.id)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "vehicle", "text", "Vespa GTS 300");
        assert_form_input_with_value(&form, "cost", "number", "180");
    }

    #[tokio::test]
    async fn edit_page_returns_not_found_for_missing_service() {
        let (state, _) = get_state();

        let response = get_edit_service_page(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_endpoint_updates_service() {
        let (state, customer_id) = get_state();
        let service = {
            let connection = state.db_connection.lock().unwrap();
            create_service(&test_form(customer_id, 180.0, None), TODAY, &connection)
                .expect("Could not create service")
        };

        let response = edit_service_endpoint(
            State(state.clone()),
            Path(service.id),
            Form(test_form(customer_id, 220.0, Some("in_progress"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SERVICES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_service(service.id, &connection).unwrap();
        assert_eq!(updated.cost, 220.0);
        assert_eq!(updated.status, ServiceStatus::InProgress);
    }

    #[tokio::test]
    async fn edit_endpoint_rejects_completed_service() {
        let (state, customer_id) = get_state();
        let service = {
            let connection = state.db_connection.lock().unwrap();
            let service = create_service(&test_form(customer_id, 180.0, None), TODAY, &connection)
                .expect("Could not create service");
            complete_service(service.id, TODAY, &connection).unwrap();
            service
        };

        let response = edit_service_endpoint(
            State(state),
            Path(service.id),
            Form(test_form(customer_id, 500.0, None)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
