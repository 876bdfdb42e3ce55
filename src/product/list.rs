//! The page listing all products.

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
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    product::{Product, get_all_products},
};

/// The state needed for the products page.
#[derive(Debug, Clone)]
pub struct ProductsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProductsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page listing all products.
pub async fn get_products_page(State(state): State<ProductsPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_all_products(&connection) {
        Ok(products) => products_view(&products).into_response(),
        Err(error) => {
            tracing::error!("could not fetch products: {error}");
            error.into_response()
        }
    }
}

fn products_view(products: &[Product]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-2xl font-bold" { "Products" }

                    a href=(endpoints::NEW_PRODUCT_VIEW) class=(LINK_STYLE) { "New product" }
                }

                @if products.is_empty() {
                    p { "No products yet. Add your first product to get started." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Barcode" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Stock" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for product in products {
                                (product_row(product))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Products", &content)
}

fn product_row(product: &Product) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_PRODUCT_VIEW, product.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_PRODUCT, product.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (product.name) }
            td class=(TABLE_CELL_STYLE) { (product.barcode) }
            td class=(TABLE_CELL_STYLE) { (format_currency(product.price)) }
            td class=(TABLE_CELL_STYLE) { (product.stock) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                " "
                button
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this product?"
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
