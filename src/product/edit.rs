//! Product edit page and endpoint.

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
    database_id::ProductId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    product::{Product, ProductFormData, get_product, update_product},
};

/// The state needed for editing a product.
#[derive(Debug, Clone)]
pub struct EditProductEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditProductEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the product edit page.
pub async fn get_edit_product_page(
    State(state): State<EditProductEndpointState>,
    Path(product_id): Path<ProductId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_product(product_id, &connection) {
        Ok(product) => edit_product_view(&product).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle product edit form submission.
pub async fn edit_product_endpoint(
    State(state): State<EditProductEndpointState>,
    Path(product_id): Path<ProductId>,
    Form(form): Form<ProductFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_product(product_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a product: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_product_view(product: &Product) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW).into_html();
    let edit_endpoint = endpoints::format_endpoint(endpoints::PUT_PRODUCT, product.id);

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
                        value=(product.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="barcode" class=(FORM_LABEL_STYLE) { "Barcode" }

                    input
                        id="barcode"
                        type="text"
                        name="barcode"
                        value=(product.barcode)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="price" class=(FORM_LABEL_STYLE) { "Price" }

                    input
                        id="price"
                        type="number"
                        name="price"
                        step="0.01"
                        min="0"
                        value=(product.price)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="stock" class=(FORM_LABEL_STYLE) { "Units in stock" }

                    input
                        id="stock"
                        type="number"
                        name="stock"
                        min="0"
                        value=(product.stock)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Product" }
            }
        }
    };

    base("Edit Product", &content)
}
