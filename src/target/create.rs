//! Target creation page and endpoint.

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
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    target::{Period, TargetFormData, create_target},
    timezone::local_date_today,
};

/// The state needed for creating a target.
#[derive(Debug, Clone)]
pub struct CreateTargetEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTargetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the target creation page.
pub async fn get_new_target_page() -> Response {
    new_target_view().into_response()
}

/// Handle target creation form submission.
pub async fn create_target_endpoint(
    State(state): State<CreateTargetEndpointState>,
    Form(new_target): Form<TargetFormData>,
) -> Response {
    let today = match local_date_today(&state.local_timezone) {
        Some(today) => today,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_target(&new_target, today, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TARGETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::EmptyTargetTitle) => {
            new_target_form_view(&format!("Error: {error}")).into_response()
        }
        Err(error @ (Error::InvalidPeriod(_) | Error::InvalidTargetAmount)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a target: {error}");

            error.into_alert_response()
        }
    }
}

fn new_target_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TARGET_VIEW).into_html();
    let form = new_target_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("New Target", &content)
}

fn new_target_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_TARGET)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                input
                    id="title"
                    type="text"
                    name="title"
                    placeholder="Monthly revenue"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="target_amount" class=(FORM_LABEL_STYLE) { "Target amount" }

                input
                    id="target_amount"
                    type="number"
                    name="target_amount"
                    step="0.01"
                    min="0.01"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Period" }

                select id="period" name="period" class=(FORM_SELECT_STYLE)
                {
                    @for period in Period::ALL {
                        option value=(period.as_str()) selected[period == Period::Monthly]
                        {
                            (period.label())
                        }
                    }
                }
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

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Target" }
        }
    }
}


#[cfg(test)]
mod create_target_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        target::{
            TargetFormData, TargetStatus, create::CreateTargetEndpointState,
            create_target_endpoint, create_target_table, get_target,
        },
        test_utils::assert_hx_redirect,
    };

    fn get_target_state() -> CreateTargetEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_target_table(&connection).expect("Could not create target table");

        CreateTargetEndpointState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn test_form(title: &str, amount: f64, period: &str) -> TargetFormData {
        TargetFormData {
            title: title.to_owned(),
            target_amount: amount,
            period: period.to_owned(),
            description: "".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_target() {
        let state = get_target_state();

        let response = create_target_endpoint(
            State(state.clone()),
            Form(test_form("Monthly revenue", 1000.0, "monthly")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TARGETS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let target = get_target(1, &connection).expect("could not get target from database");
        assert_eq!(target.title.as_ref(), "Monthly revenue");
        assert_eq!(target.current_amount, 0.0);
        assert_eq!(target.status, TargetStatus::Active);
    }

    #[tokio::test]
    async fn create_target_rejects_unknown_period() {
        let state = get_target_state();

        let response = create_target_endpoint(
            State(state.clone()),
            Form(test_form("Monthly revenue", 1000.0, "fortnightly")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_target(1, &connection).is_err(), "target must not be persisted");
    }

    #[tokio::test]
    async fn create_target_rejects_non_positive_amount() {
        let state = get_target_state();

        let response = create_target_endpoint(
            State(state),
            Form(test_form("Monthly revenue", 0.0, "monthly")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
