//! Alert fragments for displaying success and error messages to the user.
//!
//! Alerts are rendered into the `#alert-container` element by htmx using the
//! response-targets extension, so endpoints can return one of these fragments
//! with an error status code and the page will show it without navigating.

use maud::{Markup, Render, html};

/// Alert message types for styling
#[derive(Debug, Clone)]
pub enum AlertType {
    #[allow(dead_code)]
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert
    #[allow(dead_code)]
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }
}

impl Render for AlertTemplate<'_> {
    fn render(&self) -> Markup {
        let colour_style = match self.alert_type {
            AlertType::Success => {
                "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400"
            }
            AlertType::Error => "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
        };

        html! {
            div
                class={"p-4 mb-4 text-sm rounded-lg " (colour_style)}
                role="alert"
            {
                span class="font-semibold" { (self.message) }

                @if !self.details.is_empty() {
                    " " (self.details)
                }
            }
        }
    }
}

impl From<AlertTemplate<'_>> for Markup {
    fn from(template: AlertTemplate<'_>) -> Self {
        template.render()
    }
}
