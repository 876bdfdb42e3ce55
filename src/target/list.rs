//! The page listing all revenue targets with their progress.
//!
//! Listing is one of the engine's trigger points: every target is refreshed
//! against the current period window before the page is rendered.

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
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    target::{
        TargetStatus,
        progress::{TargetRefresh, refresh_all_targets},
    },
    timezone::local_date_today,
};

/// The state needed for the targets page.
#[derive(Debug, Clone)]
pub struct TargetsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TargetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Refresh every target's progress and render the targets page.
pub async fn get_targets_page(State(state): State<TargetsPageState>) -> Response {
    let today = match local_date_today(&state.local_timezone) {
        Some(today) => today,
        None => return Error::InvalidTimezoneError(state.local_timezone).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match refresh_all_targets(today, &connection) {
        Ok(refreshes) => targets_view(&refreshes).into_response(),
        Err(error) => {
            tracing::error!("could not fetch targets: {error}");
            error.into_response()
        }
    }
}

fn targets_view(refreshes: &[TargetRefresh]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TARGETS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                div class="flex justify-between items-center mb-4"
                {
                    h1 class="text-2xl font-bold" { "Revenue Targets" }

                    a href=(endpoints::NEW_TARGET_VIEW) class=(LINK_STYLE) { "New target" }
                }

                @if refreshes.is_empty() {
                    p { "No targets yet. Create a target to start tracking revenue." }
                } @else {
                    div class="space-y-4"
                    {
                        @for refresh in refreshes {
                            (target_card(refresh))
                        }
                    }
                }
            }
        }
    };

    base("Targets", &content)
}

fn status_badge(status: TargetStatus) -> Markup {
    let colour_style = match status {
        TargetStatus::Active => {
            "text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300"
        }
        TargetStatus::Completed => {
            "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        }
        TargetStatus::Expired => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
    };

    html! {
        span class={(STATUS_BADGE_STYLE) " " (colour_style)} { (status.label()) }
    }
}

fn target_card(refresh: &TargetRefresh) -> Markup {
    let target = &refresh.target;
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TARGET_VIEW, target.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TARGET, target.id);

    let percent = if target.target_amount > 0.0 {
        ((target.current_amount / target.target_amount) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let percent_style = format!("width: {percent:.0}%");

    html! {
        div class="p-4 rounded-lg border border-gray-200 bg-white shadow-sm \
            dark:border-gray-700 dark:bg-gray-800"
        {
            div class="flex justify-between items-center mb-1"
            {
                div class="flex items-center gap-x-2"
                {
                    h2 class="text-lg font-semibold" { (target.title) }

                    (status_badge(target.status))

                    @if !refresh.is_fresh() {
                        span class="text-xs text-gray-500 dark:text-gray-400"
                        {
                            "(as of " (target.updated_at) ")"
                        }
                    }
                }

                div
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                    " "
                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this target?"
                        hx-target="closest div"
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }

            p class="text-sm text-gray-500 dark:text-gray-400 mb-2"
            {
                (target.period.label())
                " · "
                (target.start_date)
                " to "
                (target.end_date)

                @if !target.description.is_empty() {
                    " · " (target.description)
                }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700 mb-1"
            {
                div
                    class="bg-blue-600 h-2.5 rounded-full dark:bg-blue-500"
                    style=(percent_style) {}
            }

            p class="text-sm"
            {
                (format_currency(target.current_amount))
                " of "
                (format_currency(target.target_amount))
            }
        }
    }
}
