//! Shared maud templates, Tailwind style constants and render helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_SELECT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600 focus:ring-blue-600 \
    focus:border-blue-600 focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Status badge style, completed by a colour class per status.
pub const STATUS_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold rounded-full";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// Render the shared HTML skeleton around `content`.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Motodesk" }
                link href="/static/main.css" rel="stylesheet";

                script src="/static/htmx-2.0.8-min.js" integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" integrity="sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }
            }

            body hx-ext="response-targets" class="bg-white dark:bg-gray-900"
            {
                div id="alert-container" {}

                (content)
            }
        }
    }
}

/// Render a maud template as an HTML response with `status_code`.
#[inline]
pub fn render(status_code: StatusCode, template: impl Into<Markup>) -> Response {
    (status_code, template.into()).into_response()
}

/// A spinning animation to indicate that the application is waiting for
/// something, e.g. waiting for a network request to complete.
pub fn loading_spinner() -> Markup {
    html! {
        span
            id="indicator"
            class="htmx-indicator animate-spin inline-block size-4 border-2 \
            border-current border-t-transparent rounded-full align-middle mr-1"
            role="status" aria-hidden="true" {}
    }
}

/// The container for the log-in and registration forms.
pub fn log_in_register(heading: &str, form: &Markup) -> Markup {
    html! {
        section class="bg-gray-50 dark:bg-gray-900"
        {
            div
                class="flex flex-col items-center justify-center px-6 py-8 \
                mx-auto md:h-screen lg:py-0"
            {
                div
                    class="w-full bg-white rounded-lg shadow dark:border \
                    md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
                {
                    div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                    {
                        h1
                            class="text-xl font-bold leading-tight tracking-tight \
                            text-gray-900 md:text-2xl dark:text-white"
                        {
                            (heading)
                        }

                        (form)
                    }
                }
            }
        }
    }
}

/// An input for a password with an optional error message.
pub fn password_input(value: &str, min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="password"
                class=(FORM_LABEL_STYLE)
            {
                "Password"
            }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=[(min_length > 0).then_some(min_length)]
                autofocus[error_message.is_none()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// Format a dollar amount for display, e.g. `1234.5` becomes `"$1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    let mut formatter = Formatter::new()
        .separator(',')
        .expect("comma is a valid separator")
        .precision(Precision::Decimals(2));

    let formatted = formatter.fmt2(amount.abs());

    if amount < 0.0 {
        format!("-${formatted}")
    } else {
        format!("${formatted}")
    }
}
