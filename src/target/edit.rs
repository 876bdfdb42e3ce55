//! Target edit page and endpoint.

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
    database_id::TargetId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    target::{
        Period, Target, TargetFormData, get_target, progress::refresh_target, update_target,
    },
    timezone::local_date_today,
};

/// The state needed for editing a target.
#[derive(Debug, Clone)]
pub struct EditTargetEndpointState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTargetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the target edit page.
pub async fn get_edit_target_page(
    State(state): State<EditTargetEndpointState>,
    Path(target_id): Path<TargetId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_target(target_id, &connection) {
        Ok(target) => edit_target_view(&target).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Handle target edit form submission.
///
/// A period change moves the target onto a different window, so the target is
/// refreshed immediately after the update instead of waiting for the next
/// listing.
pub async fn edit_target_endpoint(
    State(state): State<EditTargetEndpointState>,
    Path(target_id): Path<TargetId>,
    Form(form): Form<TargetFormData>,
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

    if let Err(error) = update_target(target_id, &form, &connection) {
        tracing::error!("An unexpected error occurred while updating a target: {error}");
        return error.into_alert_response();
    }

    match get_target(target_id, &connection) {
        Ok(target) => {
            if let Err(error) = refresh_target(&target, today, &connection) {
                tracing::warn!(
                    "could not refresh target {target_id} after edit, \
                    it will be refreshed on the next listing: {error}"
                );
            }
        }
        Err(error) => {
            tracing::error!("could not re-read target {target_id} after edit: {error}");
        }
    }

    (
        HxRedirect(endpoints::TARGETS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

fn edit_target_view(target: &Target) -> Markup {
    let nav_bar = NavBar::new(endpoints::TARGETS_VIEW).into_html();
    let edit_endpoint = endpoints::format_endpoint(endpoints::PUT_TARGET, target.id);

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
                    label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                    input
                        id="title"
                        type="text"
                        name="title"
                        value=(target.title)
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
                        value=(target.target_amount)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="period" class=(FORM_LABEL_STYLE) { "Period" }

                    select id="period" name="period" class=(FORM_SELECT_STYLE)
                    {
                        @for period in Period::ALL {
                            option value=(period.as_str()) selected[period == target.period]
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
                        value=(target.description)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Target" }
            }
        }
    };

    base("Edit Target", &content)
}

#[cfg(test)]
mod edit_target_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        db::initialize,
        endpoints,
        target::{Period, TargetFormData, create_target, get_target},
        test_utils::{
            assert_form_input_with_value, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_document,
        },
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    use super::{EditTargetEndpointState, edit_target_endpoint, get_edit_target_page};

    fn get_target_state() -> EditTargetEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        EditTargetEndpointState {
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
    async fn edit_page_prefills_target_details() {
        let state = get_target_state();
        let today = OffsetDateTime::now_utc().date();
        let target = {
            let connection = state.db_connection.lock().unwrap();
            create_target(&test_form("Monthly revenue", 1000.0, "monthly"), today, &connection)
                .expect("Could not create target")
        };

        let response = get_edit_target_page(State(state), Path(target.id)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "title", "text", "Monthly revenue");
        assert_form_input_with_value(&form, "target_amount", "number", "1000");
    }

    #[tokio::test]
    async fn edit_page_returns_not_found_for_missing_target() {
        let state = get_target_state();

        let response = get_edit_target_page(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_endpoint_updates_and_refreshes_target() {
        let state = get_target_state();
        let today = OffsetDateTime::now_utc().date();
        let target = {
            let connection = state.db_connection.lock().unwrap();
            let target =
                create_target(&test_form("Monthly revenue", 1000.0, "monthly"), today, &connection)
                    .expect("Could not create target");

            create_transaction(
                &NewTransaction::new(TransactionKind::Income, 80.0, today, "Tune-up"),
                today,
                &connection,
            )
            .expect("Could not create transaction");

            target
        };

        let response = edit_target_endpoint(
            State(state.clone()),
            Path(target.id),
            Form(test_form("Daily takings", 50.0, "daily")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TARGETS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_target(target.id, &connection).unwrap();
        assert_eq!(updated.title.as_ref(), "Daily takings");
        assert_eq!(updated.period, Period::Daily);
        // The window and progress were refreshed for the new period.
        assert_eq!(updated.start_date, today);
        assert_eq!(updated.current_amount, 80.0);
    }

    #[tokio::test]
    async fn edit_endpoint_returns_not_found_for_missing_target() {
        let state = get_target_state();

        let response = edit_target_endpoint(
            State(state),
            Path(42),
            Form(test_form("Monthly revenue", 1000.0, "monthly")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
