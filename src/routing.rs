//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    customer::{
        create_customer_endpoint, delete_customer_endpoint, edit_customer_endpoint,
        get_customers_page, get_edit_customer_page, get_new_customer_page,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    product::{
        create_product_endpoint, delete_product_endpoint, edit_product_endpoint,
        get_edit_product_page, get_new_product_page, get_products_page,
    },
    receivable::{
        create_receivable_endpoint, delete_receivable_endpoint, get_new_receivable_page,
        get_receivables_page, settle_receivable_endpoint,
    },
    service::{
        complete_service_endpoint, create_service_endpoint, delete_service_endpoint,
        edit_service_endpoint, get_edit_service_page, get_new_service_page, get_services_page,
    },
    target::{
        create_target_endpoint, delete_target_endpoint, edit_target_endpoint,
        get_edit_target_page, get_new_target_page, get_targets_page,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_new_transaction_page,
        get_transactions_list_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TARGETS_VIEW, get(get_targets_page))
        .route(endpoints::NEW_TARGET_VIEW, get(get_new_target_page))
        .route(endpoints::EDIT_TARGET_VIEW, get(get_edit_target_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(get_transactions_list_page),
        )
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(endpoints::CUSTOMERS_VIEW, get(get_customers_page))
        .route(endpoints::NEW_CUSTOMER_VIEW, get(get_new_customer_page))
        .route(endpoints::EDIT_CUSTOMER_VIEW, get(get_edit_customer_page))
        .route(endpoints::PRODUCTS_VIEW, get(get_products_page))
        .route(endpoints::NEW_PRODUCT_VIEW, get(get_new_product_page))
        .route(endpoints::EDIT_PRODUCT_VIEW, get(get_edit_product_page))
        .route(endpoints::SERVICES_VIEW, get(get_services_page))
        .route(endpoints::NEW_SERVICE_VIEW, get(get_new_service_page))
        .route(endpoints::EDIT_SERVICE_VIEW, get(get_edit_service_page))
        .route(endpoints::RECEIVABLES_VIEW, get(get_receivables_page))
        .route(
            endpoints::NEW_RECEIVABLE_VIEW,
            get(get_new_receivable_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_TARGET, post(create_target_endpoint))
            .route(endpoints::PUT_TARGET, put(edit_target_endpoint))
            .route(endpoints::DELETE_TARGET, delete(delete_target_endpoint))
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::DELETE_TRANSACTION,
                delete(delete_transaction_endpoint),
            )
            .route(endpoints::POST_CUSTOMER, post(create_customer_endpoint))
            .route(endpoints::PUT_CUSTOMER, put(edit_customer_endpoint))
            .route(endpoints::DELETE_CUSTOMER, delete(delete_customer_endpoint))
            .route(endpoints::POST_PRODUCT, post(create_product_endpoint))
            .route(endpoints::PUT_PRODUCT, put(edit_product_endpoint))
            .route(endpoints::DELETE_PRODUCT, delete(delete_product_endpoint))
            .route(endpoints::POST_SERVICE, post(create_service_endpoint))
            .route(endpoints::PUT_SERVICE, put(edit_service_endpoint))
            .route(endpoints::DELETE_SERVICE, delete(delete_service_endpoint))
            .route(endpoints::COMPLETE_SERVICE, post(complete_service_endpoint))
            .route(endpoints::POST_RECEIVABLE, post(create_receivable_endpoint))
            .route(
                endpoints::DELETE_RECEIVABLE,
                delete(delete_receivable_endpoint),
            )
            .route(
                endpoints::SETTLE_RECEIVABLE,
                post(settle_receivable_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the targets page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TARGETS_VIEW)
}
