//! Customer edit page and endpoint.

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
    customer::{Customer, CustomerFormData, get_customer, update_customer},
    database_id::CustomerId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for editing a customer.
#[derive(Debug, Clone)]
pub struct EditCustomerEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the customer edit page.
pub async fn get_edit_customer_page(
    State(state): State<EditCustomerEndpointState>,
    Path(customer_id): Path<CustomerId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_customer(customer_id, &connection) {
        Ok(customer) => edit_customer_view(&customer).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle customer edit form submission.
pub async fn edit_customer_endpoint(
    State(state): State<EditCustomerEndpointState>,
    Path(customer_id): Path<CustomerId>,
    Form(form): Form<CustomerFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_customer(customer_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a customer: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_customer_view(customer: &Customer) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let edit_endpoint = endpoints::format_endpoint(endpoints::PUT_CUSTOMER, customer.id);

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
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(customer.name)
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
                        value=(customer.phone)
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
                        value=(customer.email)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="address" class=(FORM_LABEL_STYLE) { "Address" }

                    input
                        id="address"
                        type="text"
                        name="address"
                        value=(customer.address)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                    input
                        id="notes"
                        type="text"
                        name="notes"
                        value=(customer.notes)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Customer" }
            }
        }
    };

    base("Edit Customer", &content)
}
