//! Customer creation page and endpoint.

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
    AppState, Error, endpoints,
    customer::{CustomerFormData, create_customer},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the customer creation page.
pub async fn get_new_customer_page() -> Response {
    new_customer_view().into_response()
}

/// Handle customer creation form submission.
pub async fn create_customer_endpoint(
    State(state): State<CreateCustomerEndpointState>,
    Form(new_customer): Form<CustomerFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_customer(&new_customer, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::EmptyCustomerName) => {
            new_customer_form_view(&format!("Error: {error}")).into_response()
        }
        Err(error @ Error::DuplicateCustomerPhone(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a customer: {error}");

            error.into_alert_response()
        }
    }
}

fn new_customer_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CUSTOMER_VIEW).into_html();
    let form = new_customer_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("New Customer", &content)
}

fn new_customer_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CUSTOMER)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Customer Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="phone" class=(FORM_LABEL_STYLE) { "Phone" }

                input
                    id="phone"
                    type="tel"
                    name="phone"
                    placeholder="021 123 4567"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    id="email"
                    type="email"
                    name="email"
                    placeholder="name@example.com"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="address" class=(FORM_LABEL_STYLE) { "Address" }

                input
                    id="address"
                    type="text"
                    name="address"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                input
                    id="notes"
                    type="text"
                    name="notes"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Customer" }
        }
    }
}


#[cfg(test)]
mod create_customer_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        customer::{
            CustomerFormData, create::CreateCustomerEndpointState, create_customer_endpoint,
            create_customer_table, get_customer,
        },
        endpoints,
        test_utils::{assert_form_error_message, assert_hx_redirect, must_get_form,
            parse_html_fragment},
    };

    fn get_customer_state() -> CreateCustomerEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_customer_table(&connection).expect("Could not create customer table");

        CreateCustomerEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn test_form(name: &str, phone: &str) -> CustomerFormData {
        CustomerFormData {
            name: name.to_owned(),
            phone: phone.to_owned(),
            email: "".to_owned(),
            address: "".to_owned(),
            notes: "".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_customer() {
        let state = get_customer_state();

        let response = create_customer_endpoint(
            State(state.clone()),
            Form(test_form("Mere Brown", "0211234567")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CUSTOMERS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let customer = get_customer(1, &connection).expect("could not get customer from database");
        assert_eq!(customer.name.as_ref(), "Mere Brown");
        assert_eq!(customer.phone, "0211234567");
    }

    #[tokio::test]
    async fn create_customer_fails_on_empty_name() {
        let state = get_customer_state();

        let response =
            create_customer_endpoint(State(state), Form(test_form("", "0211234567")))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Customer name cannot be empty");
    }

    #[tokio::test]
    async fn create_customer_fails_on_duplicate_phone() {
        let state = get_customer_state();

        create_customer_endpoint(
            State(state.clone()),
            Form(test_form("Mere Brown", "0211234567")),
        )
        .await;

        let response = create_customer_endpoint(
            State(state),
            Form(test_form("Hemi Grey", "0211234567")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
