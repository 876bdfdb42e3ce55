//! The page listing all receivables.

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
    receivable::{ReceivableListEntry, ReceivableStatus, get_all_receivables},
};

/// The state needed for the receivables page.
#[derive(Debug, Clone)]
pub struct ReceivablesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReceivablesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page listing all receivables.
pub async fn get_receivables_page(State(state): State<ReceivablesPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_receivables(&connection) {
        Ok(entries) => receivables_view(&entries).into_response(),
        Err(error) => {
            tracing::error!("could not fetch receivables: {error}");
            error.into_response()
        }
    }
}

fn status_badge(status: ReceivableStatus) -> Markup {
    let colour_style = match status {
        ReceivableStatus::Outstanding => {
            "text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300"
        }
        ReceivableStatus::Paid => {
            "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        }
    };

    html! {
        span class={(STATUS_BADGE_STYLE) " " (colour_style)} { (status.label()) }
    }
}

fn receivables_view(entries: &[ReceivableListEntry]) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECEIVABLES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-2xl font-bold" { "Receivables" }

                    a href=(endpoints::NEW_RECEIVABLE_VIEW) class=(LINK_STYLE) { "New receivable" }
                }

                @if entries.is_empty() {
                    p { "No receivables. Nobody owes you anything right now." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Due" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for entry in entries {
                                (receivable_row(entry))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Receivables", &content)
}

fn receivable_row(entry: &ReceivableListEntry) -> Markup {
    let receivable = &entry.receivable;
    let settle_url = endpoints::format_endpoint(endpoints::SETTLE_RECEIVABLE, receivable.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_RECEIVABLE, receivable.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (entry.customer_name) }
            td class=(TABLE_CELL_STYLE) { (format_currency(receivable.amount)) }
            td class=(TABLE_CELL_STYLE) { (receivable.due_on) }
            td class=(TABLE_CELL_STYLE) { (status_badge(receivable.status)) }
            td class=(TABLE_CELL_STYLE) { (receivable.notes) }
            td class=(TABLE_CELL_STYLE)
            {
                @if receivable.status == ReceivableStatus::Outstanding {
                    button
                        hx-post=(settle_url)
                        hx-confirm="Mark this receivable as paid and record the income?"
                        hx-target-error="#alert-container"
                        class=(LINK_STYLE)
                    {
                        "Settle"
                    }
                    " "
                }

                button
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this receivable?"
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
