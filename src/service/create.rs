//! Service order creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    customer::{Customer, get_all_customers},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    service::{ServiceFormData, create_service},
    timezone::local_date_today,
};

/// The state needed for creating a service order.
#[derive(Debug, Clone)]
pub struct CreateServiceEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the service order creation page.
pub async fn get_new_service_page(State(state): State<CreateServiceEndpointState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_customers(&connection) {
        Ok(customers) => new_service_view(&customers).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle service order creation form submission.
pub async fn create_service_endpoint(
    State(state): State<CreateServiceEndpointState>,
    Form(form): Form<ServiceFormData>,
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

    match create_service(&form, today, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::SERVICES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a service: {error}");

            error.into_alert_response()
        }
    }
}

fn new_service_view(customers: &[Customer]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_SERVICE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_SERVICE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="customer_id" class=(FORM_LABEL_STYLE) { "Customer" }

                    select id="customer_id" name="customer_id" required class=(FORM_SELECT_STYLE)
                    {
                        @for customer in customers {
                            option value=(customer.id) { (customer.name) }
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
                        placeholder="Vespa GTS 300"
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
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Open Service Order" }
            }
        }
    };

    base("New Service", &content)
}


#[cfg(test)]
mod create_service_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        customer::{CustomerFormData, create_customer},
        db::initialize,
        endpoints,
        service::{ServiceFormData, ServiceStatus, get_service},
        test_utils::assert_hx_redirect,
    };

    use super::{CreateServiceEndpointState, create_service_endpoint};

    fn get_state() -> (CreateServiceEndpointState, i64) {
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
            CreateServiceEndpointState {
                local_timezone: "Etc/UTC".to_owned(),
                db_connection: Arc::new(Mutex::new(connection)),
            },
            customer.id,
        )
    }

    #[tokio::test]
    async fn can_create_service() {
        let (state, customer_id) = get_state();

        let response = create_service_endpoint(
            State(state.clone()),
            Form(ServiceFormData {
                customer_id,
                vehicle: "Vespa GTS 300".to_owned(),
                problem: "Won't start".to_owned(),
                cost: 180.0,
                status: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SERVICES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let service = get_service(1, &connection).expect("could not get service from database");
        assert_eq!(service.vehicle, "Vespa GTS 300");
        assert_eq!(service.status, ServiceStatus::Pending);
    }
}
