//! Database operations for revenue targets.

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{
    Error,
    database_id::TargetId,
    target::period::{Period, PeriodWindow, period_window},
};

/// The lifecycle status of a revenue target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The target's window is current and the target amount has not been reached.
    Active,
    /// The target amount has been reached.
    Completed,
    /// The window has passed without the target amount being reached.
    Expired,
}

impl TargetStatus {
    /// The string stored in the database for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    /// Parse a status from its database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// A human readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The title of a revenue target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTitle(String);

impl TargetTitle {
    /// Create a target title, rejecting blank strings.
    ///
    /// # Errors
    /// Returns [Error::EmptyTargetTitle] if `title` is empty or whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyTargetTitle);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Create a target title without validation.
    ///
    /// The caller should ensure that `title` is not blank.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_owned())
    }
}

impl AsRef<str> for TargetTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A recurring revenue goal.
///
/// The `current_amount`, `status`, `start_date` and `end_date` fields are
/// derived values: they are recomputed against the transactions in the current
/// period window whenever the target is listed and after every qualifying
/// financial event, so the stored values are only ever as fresh as the last
/// recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// The ID of the target.
    pub id: TargetId,
    /// The target's title.
    pub title: TargetTitle,
    /// The revenue amount to reach within one period window.
    pub target_amount: f64,
    /// The revenue accumulated within the current window, as of the last
    /// recomputation.
    pub current_amount: f64,
    /// How often the target resets.
    pub period: Period,
    /// The first date of the current window, as of the last recomputation.
    pub start_date: Date,
    /// The first date after the current window, as of the last recomputation.
    pub end_date: Date,
    /// The lifecycle status, as of the last recomputation.
    pub status: TargetStatus,
    /// Free-form description, may be empty.
    pub description: String,
    /// The date of the last recomputation.
    pub updated_at: Date,
}

/// The form data for creating or updating a target.
///
/// The period is kept as a raw string so that unrecognized values surface as
/// [Error::InvalidPeriod] validation errors instead of opaque form rejections.
#[derive(Debug, serde::Deserialize)]
pub struct TargetFormData {
    /// The target's title.
    pub title: String,
    /// The revenue amount to reach within one period window.
    pub target_amount: f64,
    /// How often the target resets, as entered in the form.
    pub period: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Initialize the target table.
pub fn create_target_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS target (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            target_amount REAL NOT NULL,
            current_amount REAL NOT NULL DEFAULT 0,
            period TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            description TEXT NOT NULL DEFAULT '',
            updated_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Create a target and return it with its generated ID.
///
/// New targets start with no progress and an active status; their window is
/// the period instance containing `today`.
///
/// # Errors
/// Returns:
/// - [Error::EmptyTargetTitle] if the title is blank.
/// - [Error::InvalidTargetAmount] if the target amount is zero or negative.
pub fn create_target(
    form: &TargetFormData,
    today: Date,
    connection: &Connection,
) -> Result<Target, Error> {
    let title = TargetTitle::new(&form.title)?;
    let period = Period::parse(&form.period)?;

    if form.target_amount <= 0.0 {
        return Err(Error::InvalidTargetAmount);
    }

    let window = period_window(period, today);

    connection.execute(
        "INSERT INTO target \
        (title, target_amount, current_amount, period, start_date, end_date, status, description, updated_at) \
        VALUES (?1, ?2, 0, ?3, ?4, ?5, 'active', ?6, ?7)",
        params![
            title.as_ref(),
            form.target_amount,
            period.as_str(),
            window.start,
            window.end,
            form.description,
            today,
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Target {
        id,
        title,
        target_amount: form.target_amount,
        current_amount: 0.0,
        period,
        start_date: window.start,
        end_date: window.end,
        status: TargetStatus::Active,
        description: form.description.clone(),
        updated_at: today,
    })
}

/// Retrieve a single target by ID.
pub fn get_target(target_id: TargetId, connection: &Connection) -> Result<Target, Error> {
    connection
        .prepare(
            "SELECT id, title, target_amount, current_amount, period, start_date, end_date, \
            status, description, updated_at FROM target WHERE id = :id;",
        )?
        .query_row(&[(":id", &target_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all targets in creation order.
pub fn get_all_targets(connection: &Connection) -> Result<Vec<Target>, Error> {
    connection
        .prepare(
            "SELECT id, title, target_amount, current_amount, period, start_date, end_date, \
            status, description, updated_at FROM target ORDER BY id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_target| maybe_target.map_err(|error| error.into()))
        .collect()
}

/// Update a target's user-editable fields. Returns an error if the target
/// doesn't exist.
///
/// The derived fields (progress, status, window) are left for the next
/// recomputation, which callers should trigger after a period change.
pub fn update_target(
    target_id: TargetId,
    form: &TargetFormData,
    connection: &Connection,
) -> Result<(), Error> {
    let title = TargetTitle::new(&form.title)?;
    let period = Period::parse(&form.period)?;

    if form.target_amount <= 0.0 {
        return Err(Error::InvalidTargetAmount);
    }

    let rows_affected = connection.execute(
        "UPDATE target SET title = ?1, target_amount = ?2, period = ?3, description = ?4 \
        WHERE id = ?5",
        params![
            title.as_ref(),
            form.target_amount,
            period.as_str(),
            form.description,
            target_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTarget);
    }

    Ok(())
}

/// Persist the outcome of a progress recomputation onto a target row.
pub fn persist_progress(
    target_id: TargetId,
    current_amount: f64,
    status: TargetStatus,
    window: &PeriodWindow,
    today: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE target SET current_amount = ?1, status = ?2, start_date = ?3, end_date = ?4, \
        updated_at = ?5 WHERE id = ?6",
        params![
            current_amount,
            status.as_str(),
            window.start,
            window.end,
            today,
            target_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTarget);
    }

    Ok(())
}

/// Delete a target by ID. Returns an error if the target doesn't exist.
pub fn delete_target(target_id: TargetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM target WHERE id = ?1", [target_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTarget);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Target, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_title: String = row.get(1)?;

    let raw_period: String = row.get(4)?;
    let period = Period::parse(&raw_period).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::from(format!("unknown target period \"{raw_period}\"")),
        )
    })?;

    let raw_status: String = row.get(7)?;
    let status = TargetStatus::parse(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            Box::from(format!("unknown target status \"{raw_status}\"")),
        )
    })?;

    Ok(Target {
        id,
        title: TargetTitle::new_unchecked(&raw_title),
        target_amount: row.get(2)?,
        current_amount: row.get(3)?,
        period,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        status,
        description: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
