//! The paginated page listing transactions, most recent first.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators},
    transaction::{Transaction, TransactionKind, count_transactions, get_transactions_page},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the transactions page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// The page number to display.
    pub page: Option<u64>,
}

/// Render the transactions page.
pub async fn get_transactions_list_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let page_size = state.pagination_config.default_page_size;

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let transaction_count = match count_transactions(&connection) {
        Ok(count) => count,
        Err(error) => return error.into_response(),
    };
    let page_count = transaction_count.div_ceil(page_size).max(1);
    let page = page.min(page_count);

    match get_transactions_page(page, page_size, &connection) {
        Ok(transactions) => {
            let indicators =
                create_pagination_indicators(page, page_count, state.pagination_config.max_pages);

            transactions_view(&transactions, &indicators).into_response()
        }
        Err(error) => {
            tracing::error!("could not fetch transactions: {error}");
            error.into_response()
        }
    }
}

fn kind_badge(kind: TransactionKind) -> Markup {
    let colour_style = match kind {
        TransactionKind::Income => {
            "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        }
        TransactionKind::Expense => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
        TransactionKind::Sale => "text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300",
    };

    html! {
        span class={(STATUS_BADGE_STYLE) " " (colour_style)} { (kind.label()) }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    indicators: &[PaginationIndicator],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-2xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "New transaction" }
                }

                @if transactions.is_empty() {
                    p { "No transactions yet. Record your first transaction to get started." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }

                    (pagination_view(indicators))
                }
            }
        }
    };

    base("Transactions", &content)
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let delete_url =
        endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    // Expenses display negative so the direction of money is obvious at a glance.
    let display_amount = match transaction.kind {
        TransactionKind::Expense => -transaction.amount,
        _ => transaction.amount,
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) { (format_currency(display_amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this transaction?"
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

fn pagination_view(indicators: &[PaginationIndicator]) -> Markup {
    let page_link_style = "px-3 py-1 rounded border border-gray-300 dark:border-gray-600 \
        hover:bg-gray-100 dark:hover:bg-gray-700";
    let current_page_style = "px-3 py-1 rounded border border-blue-600 bg-blue-600 text-white";

    let page_href = |page: u64| format!("{}?page={page}", endpoints::TRANSACTIONS_VIEW);

    html! {
        nav class="flex gap-2 justify-center mt-4" aria-label="Pagination"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_href(*page)) class=(page_link_style) { "Back" }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(page_href(*page)) class=(page_link_style) { (page) }
                    }
                    PaginationIndicator::CurrPage(page) => {
                        span class=(current_page_style) aria-current="page" { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span class="px-3 py-1" { "…" }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_href(*page)) class=(page_link_style) { "Next" }
                    }
                }
            }
        }
    }
}
