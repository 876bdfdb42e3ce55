//! Product creation page and endpoint.

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
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    product::{ProductFormData, create_product},
};

/// The state needed for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateProductEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the product creation page.
pub async fn get_new_product_page() -> Response {
    new_product_view().into_response()
}

/// Handle product creation form submission.
pub async fn create_product_endpoint(
    State(state): State<CreateProductEndpointState>,
    Form(new_product): Form<ProductFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_product(&new_product, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::EmptyProductName) => {
            new_product_form_view(&format!("Error: {error}")).into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a product: {error}");

            error.into_alert_response()
        }
    }
}

fn new_product_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PRODUCT_VIEW).into_html();
    let form = new_product_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("New Product", &content)
}

fn new_product_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_PRODUCT)
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
                    placeholder="Product Name"
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
                    placeholder="9400100000000"
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
                    value="0"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Product" }
        }
    }
}


#[cfg(test)]
mod create_product_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        product::{
            ProductFormData, create::CreateProductEndpointState, create_product_endpoint,
            create_product_table, get_product,
        },
        test_utils::assert_hx_redirect,
    };

    fn get_product_state() -> CreateProductEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_product_table(&connection).expect("Could not create product table");

        CreateProductEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_product() {
        let state = get_product_state();
        let form = ProductFormData {
            name: "Brake pads".to_owned(),
            barcode: "9400100001".to_owned(),
            price: 19.99,
            stock: 12,
        };

        let response = create_product_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PRODUCTS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let product = get_product(1, &connection).expect("could not get product from database");
        assert_eq!(product.name.as_ref(), "Brake pads");
        assert_eq!(product.stock, 12);
    }

    #[tokio::test]
    async fn create_product_fails_on_duplicate_barcode() {
        let state = get_product_state();
        let form = ProductFormData {
            name: "Brake pads".to_owned(),
            barcode: "9400100001".to_owned(),
            price: 19.99,
            stock: 12,
        };
        create_product_endpoint(State(state.clone()), Form(form)).await;

        let duplicate = ProductFormData {
            name: "Drive belt".to_owned(),
            barcode: "9400100001".to_owned(),
            price: 34.50,
            stock: 2,
        };
        let response = create_product_endpoint(State(state), Form(duplicate)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
