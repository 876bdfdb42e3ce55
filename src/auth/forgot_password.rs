//! The page with instructions for resetting the admin password.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
};

/// Display instructions for resetting the password with the `reset_password`
/// command line tool.
pub async fn get_forgot_password_page() -> Response {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Forgot your password?" }

            p class="mb-2 max-w-md"
            {
                "The password can be reset from the machine that hosts the \
                server by running the bundled command line tool:"
            }

            pre class="mb-4 p-2 rounded bg-gray-100 dark:bg-gray-800"
            {
                code { "reset_password --db-path <path to database>" }
            }

            a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Back to the log in page" }
        }
    };

    base("Forgot Password", &content).into_response()
}

#[cfg(test)]
mod forgot_password_tests {
    use axum::http::StatusCode;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_forgot_password_page;

    #[tokio::test]
    async fn renders_instructions() {
        let response = get_forgot_password_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
    }
}
