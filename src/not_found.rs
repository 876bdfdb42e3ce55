//! The 404 page.

use axum::{http::StatusCode, response::Response};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, render},
};

/// Route handler for unmatched paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Get a response containing the rendered 404 page.
pub fn get_404_not_found_response() -> Response {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-4xl font-bold mb-4" { "404" }

            p class="mb-4" { "The page you are looking for does not exist." }

            a href=(endpoints::ROOT) class=(LINK_STYLE) { "Back to the home page" }
        }
    };

    render(StatusCode::NOT_FOUND, base("Not Found", &content))
}
