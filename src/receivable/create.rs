//! Receivable creation page and endpoint.

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
    receivable::{ReceivableFormData, create_receivable},
};

/// The state needed for creating a receivable.
#[derive(Debug, Clone)]
pub struct CreateReceivableEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateReceivableEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the receivable creation page.
pub async fn get_new_receivable_page(
    State(state): State<CreateReceivableEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_customers(&connection) {
        Ok(customers) => new_receivable_view(&customers).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle receivable creation form submission.
pub async fn create_receivable_endpoint(
    State(state): State<CreateReceivableEndpointState>,
    Form(form): Form<ReceivableFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_receivable(&form, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::RECEIVABLES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a receivable: {error}");

            error.into_alert_response()
        }
    }
}

fn new_receivable_view(customers: &[Customer]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_RECEIVABLE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_RECEIVABLE)
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
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        id="amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        min="0.01"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="due_on" class=(FORM_LABEL_STYLE) { "Due date" }

                    input
                        id="due_on"
                        type="date"
                        name="due_on"
                        required
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

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Receivable" }
            }
        }
    };

    base("New Receivable", &content)
}

#[cfg(test)]
mod new_receivable_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        customer::{CustomerFormData, create_customer},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::{CreateReceivableEndpointState, get_new_receivable_page};

    #[tokio::test]
    async fn render_page() {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        create_customer(
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

        let state = CreateReceivableEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_receivable_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_RECEIVABLE, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "due_on", "date");
        assert_form_submit_button(&form);
    }
}
