//! The page listing all customers.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    customer::{Customer, get_all_customers},
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the customers page.
#[derive(Debug, Clone)]
pub struct CustomersPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CustomersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page listing all customers.
pub async fn get_customers_page(State(state): State<CustomersPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_customers(&connection) {
        Ok(customers) => customers_view(&customers).into_response(),
        Err(error) => {
            tracing::error!("could not fetch customers: {error}");
            error.into_response()
        }
    }
}

fn customers_view(customers: &[Customer]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-2xl font-bold" { "Customers" }

                    a href=(endpoints::NEW_CUSTOMER_VIEW) class=(LINK_STYLE) { "New customer" }
                }

                @if customers.is_empty() {
                    p { "No customers yet. Add your first customer to get started." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Phone" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Email" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for customer in customers {
                                (customer_row(customer))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Customers", &content)
}

fn customer_row(customer: &Customer) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CUSTOMER_VIEW, customer.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_CUSTOMER, customer.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (customer.name) }
            td class=(TABLE_CELL_STYLE) { (customer.phone) }
            td class=(TABLE_CELL_STYLE) { (customer.email) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                " "
                button
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this customer?"
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}
