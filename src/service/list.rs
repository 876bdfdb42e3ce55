//! The page listing all service orders.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    service::{ServiceListEntry, ServiceStatus, get_all_services},
};

/// The state needed for the services page.
#[derive(Debug, Clone)]
pub struct ServicesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ServicesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page listing all service orders.
pub async fn get_services_page(State(state): State<ServicesPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_services(&connection) {
        Ok(entries) => services_view(&entries).into_response(),
        Err(error) => {
            tracing::error!("could not fetch services: {error}");
            error.into_response()
        }
    }
}

fn status_badge(status: ServiceStatus) -> Markup {
    let colour_style = match status {
        ServiceStatus::Pending => {
            "text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300"
        }
        ServiceStatus::InProgress => {
            "text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300"
        }
        ServiceStatus::Completed => {
            "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        }
        ServiceStatus::Cancelled => "text-gray-800 bg-gray-100 dark:bg-gray-700 dark:text-gray-300",
    };

    html! {
        span class={(STATUS_BADGE_STYLE) " " (colour_style)} { (status.label()) }
    }
}

fn services_view(entries: &[ServiceListEntry]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SERVICES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-2xl font-bold" { "Services" }

                    a href=(endpoints::NEW_SERVICE_VIEW) class=(LINK_STYLE) { "New service" }
                }

                @if entries.is_empty() {
                    p { "No service orders yet. Open one when a scooter comes in." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Vehicle" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Problem" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Cost" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for entry in entries {
                                (service_row(entry))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Services", &content)
}

fn service_row(entry: &ServiceListEntry) -> Markup {
    let service = &entry.service;
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_SERVICE_VIEW, service.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_SERVICE, service.id);
    let complete_url = endpoints::format_endpoint(endpoints::COMPLETE_SERVICE, service.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (entry.customer_name) }
            td class=(TABLE_CELL_STYLE) { (service.vehicle) }
            td class=(TABLE_CELL_STYLE) { (service.problem) }
            td class=(TABLE_CELL_STYLE) { (format_currency(service.cost)) }
            td class=(TABLE_CELL_STYLE) { (status_badge(service.status)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if !service.status.is_closed() {
                    button
                        hx-post=(complete_url)
                        hx-confirm="Complete this service and record its income?"
                        hx-target-error="#alert-container"
                        class=(LINK_STYLE)
                    {
                        "Complete"
                    }
                    " "
                }

                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                " "
                button
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this service order?"
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

#[cfg(test)]
mod services_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        customer::{CustomerFormData, create_customer},
        db::initialize,
        service::{ServiceFormData, create_service},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{ServicesPageState, get_services_page};

    #[tokio::test]
    async fn page_lists_services_with_customer_names() {
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
        create_service(
            &ServiceFormData {
                customer_id: customer.id,
                vehicle: "Vespa GTS 300".to_owned(),
                problem: "Won't start".to_owned(),
                cost: 180.0,
                status: None,
            },
            date!(2025 - 06 - 15),
            &connection,
        )
        .expect("Could not create service");

        let state = ServicesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_services_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_selector = scraper::Selector::parse("tbody tr").unwrap();
        let rows: Vec<_> = html.select(&row_selector).collect();
        assert_eq!(rows.len(), 1);

        let row_text = rows[0].text().collect::<String>();
        assert!(row_text.contains("Mere Brown"));
        assert!(row_text.contains("Vespa GTS 300"));
        assert!(row_text.contains("Pending"));
    }

    #[tokio::test]
    async fn page_shows_empty_state() {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let state = ServicesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_services_page(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let table_selector = scraper::Selector::parse("table").unwrap();
        assert_eq!(html.select(&table_selector).count(), 0);
    }
}
