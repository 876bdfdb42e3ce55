//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/customers/{customer_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the targets or log in page.
pub const ROOT: &str = "/";
/// The page for displaying revenue targets and their progress.
pub const TARGETS_VIEW: &str = "/targets";
/// The page for creating a new revenue target.
pub const NEW_TARGET_VIEW: &str = "/targets/new";
/// The page for editing an existing revenue target.
pub const EDIT_TARGET_VIEW: &str = "/targets/{target_id}/edit";
/// The page for displaying transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for listing all customers.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The page for creating a new customer.
pub const NEW_CUSTOMER_VIEW: &str = "/customers/new";
/// The page for editing an existing customer.
pub const EDIT_CUSTOMER_VIEW: &str = "/customers/{customer_id}/edit";
/// The page for listing all products.
pub const PRODUCTS_VIEW: &str = "/products";
/// The page for creating a new product.
pub const NEW_PRODUCT_VIEW: &str = "/products/new";
/// The page for editing an existing product.
pub const EDIT_PRODUCT_VIEW: &str = "/products/{product_id}/edit";
/// The page for listing all service orders.
pub const SERVICES_VIEW: &str = "/services";
/// The page for creating a new service order.
pub const NEW_SERVICE_VIEW: &str = "/services/new";
/// The page for editing an existing service order.
pub const EDIT_SERVICE_VIEW: &str = "/services/{service_id}/edit";
/// The page for listing all receivables.
pub const RECEIVABLES_VIEW: &str = "/receivables";
/// The page for creating a new receivable.
pub const NEW_RECEIVABLE_VIEW: &str = "/receivables/new";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create a target.
pub const POST_TARGET: &str = "/api/targets";
/// The route to update a target.
pub const PUT_TARGET: &str = "/api/targets/{target_id}";
/// The route to delete a target.
pub const DELETE_TARGET: &str = "/api/targets/{target_id}";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a customer.
pub const POST_CUSTOMER: &str = "/api/customers";
/// The route to update a customer.
pub const PUT_CUSTOMER: &str = "/api/customers/{customer_id}";
/// The route to delete a customer.
pub const DELETE_CUSTOMER: &str = "/api/customers/{customer_id}";
/// The route to create a product.
pub const POST_PRODUCT: &str = "/api/products";
/// The route to update a product.
pub const PUT_PRODUCT: &str = "/api/products/{product_id}";
/// The route to delete a product.
pub const DELETE_PRODUCT: &str = "/api/products/{product_id}";
/// The route to create a service order.
pub const POST_SERVICE: &str = "/api/services";
/// The route to update a service order.
pub const PUT_SERVICE: &str = "/api/services/{service_id}";
/// The route to delete a service order.
pub const DELETE_SERVICE: &str = "/api/services/{service_id}";
/// The route to complete a service order and record its income.
pub const COMPLETE_SERVICE: &str = "/api/services/{service_id}/complete";
/// The route to create a receivable.
pub const POST_RECEIVABLE: &str = "/api/receivables";
/// The route to delete a receivable.
pub const DELETE_RECEIVABLE: &str = "/api/receivables/{receivable_id}";
/// The route to settle a receivable and record its income.
pub const SETTLE_RECEIVABLE: &str = "/api/receivables/{receivable_id}/settle";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/customers/{customer_id}/edit',
/// '{customer_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::TARGETS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TARGET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_TARGET_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_TRANSACTION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CUSTOMERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_CUSTOMER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_CUSTOMER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PRODUCTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_PRODUCT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_PRODUCT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SERVICES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_SERVICE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_SERVICE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::RECEIVABLES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_RECEIVABLE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::FORGOT_PASSWORD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::POST_TARGET);
        assert_endpoint_is_valid_uri(endpoints::PUT_TARGET);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TARGET);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::POST_CUSTOMER);
        assert_endpoint_is_valid_uri(endpoints::PUT_CUSTOMER);
        assert_endpoint_is_valid_uri(endpoints::DELETE_CUSTOMER);
        assert_endpoint_is_valid_uri(endpoints::POST_PRODUCT);
        assert_endpoint_is_valid_uri(endpoints::PUT_PRODUCT);
        assert_endpoint_is_valid_uri(endpoints::DELETE_PRODUCT);
        assert_endpoint_is_valid_uri(endpoints::POST_SERVICE);
        assert_endpoint_is_valid_uri(endpoints::PUT_SERVICE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_SERVICE);
        assert_endpoint_is_valid_uri(endpoints::COMPLETE_SERVICE);
        assert_endpoint_is_valid_uri(endpoints::POST_RECEIVABLE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_RECEIVABLE);
        assert_endpoint_is_valid_uri(endpoints::SETTLE_RECEIVABLE);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
