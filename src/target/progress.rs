//! The progress engine for revenue targets.
//!
//! Recomputation is an explicit, idempotent operation: given a target and
//! today's date, derive the current period window, sum the qualifying
//! transactions inside it, derive the lifecycle status and persist the result.
//! It is triggered whenever targets are listed and after every qualifying
//! financial event (transaction posting, service completion, receivable
//! settlement), unconditionally for every target.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    target::{
        Target, TargetStatus,
        db::{get_all_targets, persist_progress},
        period::{PeriodWindow, period_window},
    },
    transaction::sum_revenue_between,
};

/// Derive a target's lifecycle status from its progress and window.
///
/// Completion takes precedence over expiry: a target that reached its amount
/// reports completed even when the window has passed.
pub fn derive_status(
    current_amount: f64,
    target_amount: f64,
    today: Date,
    window: &PeriodWindow,
) -> TargetStatus {
    if current_amount >= target_amount {
        TargetStatus::Completed
    } else if today >= window.end {
        TargetStatus::Expired
    } else {
        TargetStatus::Active
    }
}

/// Recompute a single target's progress against the transactions in its
/// current period window and persist the result.
///
/// The window is derived from `today` rather than the stored dates, so a
/// target's window silently advances as real time passes; progress from
/// earlier windows is overwritten.
///
/// # Errors
/// Returns an error if the transaction query or the update fails; the
/// target's stored values are left untouched in that case.
pub fn refresh_target(
    target: &Target,
    today: Date,
    connection: &Connection,
) -> Result<Target, Error> {
    let window = period_window(target.period, today);

    let current_amount = sum_revenue_between(window.start, window.end, connection)?;
    let status = derive_status(current_amount, target.target_amount, today, &window);

    persist_progress(target.id, current_amount, status, &window, today, connection)?;

    Ok(Target {
        current_amount,
        status,
        start_date: window.start,
        end_date: window.end,
        updated_at: today,
        ..target.clone()
    })
}

/// The outcome of recomputing one target in a batch refresh.
///
/// When `error` is set the refresh failed and `target` holds the previously
/// persisted values unchanged, so callers can distinguish "all fresh" from
/// "partial failure" while still having something to display.
#[derive(Debug)]
pub struct TargetRefresh {
    /// The refreshed target, or its stale state if the refresh failed.
    pub target: Target,
    /// The error that prevented the refresh, if any.
    pub error: Option<Error>,
}

impl TargetRefresh {
    /// Whether this target's values are fresh.
    pub fn is_fresh(&self) -> bool {
        self.error.is_none()
    }
}

/// Recompute every target's progress.
///
/// Recomputation is unconditional and idempotent: every target is refreshed
/// regardless of which window the triggering event fell into, and refreshing
/// twice in a row without intervening transactions yields the same result.
///
/// A failure while refreshing one target is logged and captured in its
/// [TargetRefresh]; it does not abort the remaining targets.
///
/// # Errors
/// Returns an error only if the list of targets cannot be fetched at all.
pub fn refresh_all_targets(
    today: Date,
    connection: &Connection,
) -> Result<Vec<TargetRefresh>, Error> {
    let targets = get_all_targets(connection)?;

    Ok(targets
        .into_iter()
        .map(|target| match refresh_target(&target, today, connection) {
            Ok(refreshed) => TargetRefresh {
                target: refreshed,
                error: None,
            },
            Err(error) => {
                tracing::warn!(
                    "could not refresh target {} (\"{}\"), keeping stale values: {error}",
                    target.id,
                    target.title
                );

                TargetRefresh {
                    target,
                    error: Some(error),
                }
            }
        })
        .collect())
}
