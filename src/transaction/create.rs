//! Transaction creation page and endpoint.
//!
//! Posting an income or sale transaction is one of the target engine's
//! trigger points: every target is refreshed synchronously after the
//! transaction is recorded.

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
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    customer::{Customer, get_all_customers},
    database_id::{CustomerId, ProductId},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    product::{Product, decrement_stock, get_all_products},
    target::refresh_all_targets,
    timezone::local_date_today,
    transaction::{
        NewTransaction, TransactionKind, create_transaction, db::empty_string_as_none,
    },
};

/// The state needed for the new transaction page and endpoint.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionFormData {
    /// The kind of the transaction.
    pub kind: TransactionKind,
    /// The amount of money in dollars.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: String,
    /// The customer involved, if any.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub customer_id: Option<CustomerId>,
    /// The product sold, for sale transactions.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product_id: Option<ProductId>,
    /// The number of units sold, for sale transactions.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub quantity: Option<i64>,
}

/// Render the transaction creation page.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let customers = match get_all_customers(&connection) {
        Ok(customers) => customers,
        Err(error) => return error.into_response(),
    };
    let products = match get_all_products(&connection) {
        Ok(products) => products,
        Err(error) => return error.into_response(),
    };

    new_transaction_view(&customers, &products).into_response()
}

/// Handle transaction creation form submission.
///
/// Sales that reference a product reduce its stock. After an income or sale
/// transaction is recorded, every revenue target is refreshed before the
/// response is sent.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let today = match local_date_today(&state.local_timezone) {
        Some(today) => today,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_alert_response(),
    };

    if form.date > today {
        return Error::FutureDate(form.date).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    // Only sales move stock; a product picked on another kind is ignored.
    let (product_id, quantity) = match (form.kind, form.product_id) {
        (TransactionKind::Sale, Some(product_id)) => {
            let quantity = form.quantity.unwrap_or(1).max(1);

            if let Err(error) = decrement_stock(product_id, quantity, &connection) {
                return error.into_alert_response();
            }

            (Some(product_id), Some(quantity))
        }
        _ => (None, None),
    };

    let new_transaction = NewTransaction {
        kind: form.kind,
        amount: form.amount,
        date: form.date,
        description: form.description.clone(),
        customer_id: form.customer_id,
        product_id,
        quantity,
    };

    match create_transaction(&new_transaction, today, &connection) {
        Ok(transaction) => {
            if transaction.kind.counts_toward_targets() {
                if let Err(error) = refresh_all_targets(today, &connection) {
                    tracing::error!(
                        "could not refresh targets after recording transaction {}: {error}",
                        transaction.id
                    );
                }
            }

            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");

            error.into_alert_response()
        }
    }
}

fn new_transaction_view(customers: &[Customer], products: &[Product]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Kind" }

                    select id="kind" name="kind" class=(FORM_SELECT_STYLE)
                    {
                        option value="income" { "Income" }
                        option value="expense" { "Expense" }
                        option value="sale" { "Sale" }
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
                        min="0"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        id="date"
                        type="date"
                        name="date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        id="description"
                        type="text"
                        name="description"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="customer_id" class=(FORM_LABEL_STYLE) { "Customer (optional)" }

                    select id="customer_id" name="customer_id" class=(FORM_SELECT_STYLE)
                    {
                        option value="" { "None" }

                        @for customer in customers {
                            option value=(customer.id) { (customer.name) }
                        }
                    }
                }

                div
                {
                    label for="product_id" class=(FORM_LABEL_STYLE) { "Product (sales only)" }

                    select id="product_id" name="product_id" class=(FORM_SELECT_STYLE)
                    {
                        option value="" { "None" }

                        @for product in products {
                            option value=(product.id)
                            {
                                (product.name) " (" (product.stock) " in stock)"
                            }
                        }
                    }
                }

                div
                {
                    label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity" }

                    input
                        id="quantity"
                        type="number"
                        name="quantity"
                        min="1"
                        value="1"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Record Transaction" }
            }
        }
    };

    base("New Transaction", &content)
}
