//! Recurrence periods for revenue targets and the window calculator that maps
//! a period onto the current date range.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::Error;

/// How often a revenue target resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// The string stored in the database for this period.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parse a period from its database or form representation.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] for unrecognized values, so invalid
    /// periods are rejected before anything is persisted.
    pub fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(Error::InvalidPeriod(value.to_owned())),
        }
    }

    /// A human readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// All periods, in the order they should appear in a form select.
    pub const ALL: [Period; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current instance of a target's recurrence period as a half-open date
/// range `[start, end)`.
///
/// `end` is exclusive: a transaction dated exactly `end` belongs to the next
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    /// The first date inside the window.
    pub start: Date,
    /// The first date after the window.
    pub end: Date,
}

/// Compute the window of the period instance that contains `today`.
///
/// The result always satisfies `start <= today < end`. Weeks start on Sunday.
pub fn period_window(period: Period, today: Date) -> PeriodWindow {
    match period {
        Period::Daily => PeriodWindow {
            start: today,
            end: today + Duration::days(1),
        },
        Period::Weekly => {
            let days_from_sunday = today.weekday().number_days_from_sunday() as i64;
            let start = today - Duration::days(days_from_sunday);

            PeriodWindow {
                start,
                end: start + Duration::days(7),
            }
        }
        Period::Monthly => {
            let start = today.replace_day(1).expect("day 1 is valid for any month");

            PeriodWindow {
                start,
                end: first_of_next_month(today.year(), today.month()),
            }
        }
        Period::Yearly => PeriodWindow {
            start: Date::from_calendar_date(today.year(), Month::January, 1)
                .expect("Jan 1 is valid for any year"),
            end: Date::from_calendar_date(today.year() + 1, Month::January, 1)
                .expect("Jan 1 is valid for any year"),
        },
    }
}

fn first_of_next_month(year: i32, month: Month) -> Date {
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };

    Date::from_calendar_date(next_year, next_month, 1).expect("day 1 is valid for any month")
}


#[cfg(test)]
mod period_window_tests {
    use time::{Duration, macros::date};

    use super::{Period, period_window};

    #[test]
    fn today_always_falls_inside_its_own_window() {
        // A spread of dates including month, year and leap-year boundaries.
        let dates = [
            date!(2024 - 01 - 01),
            date!(2024 - 02 - 29),
            date!(2024 - 12 - 31),
            date!(2025 - 01 - 08),
            date!(2025 - 06 - 15),
            date!(2025 - 07 - 31),
        ];

        for period in Period::ALL {
            for today in dates {
                let window = period_window(period, today);

                assert!(
                    window.start <= today && today < window.end,
                    "{period} window {:?} does not contain {today}",
                    window
                );
            }
        }
    }

    #[test]
    fn daily_window_is_one_day() {
        let window = period_window(Period::Daily, date!(2025 - 06 - 15));

        assert_eq!(window.start, date!(2025 - 06 - 15));
        assert_eq!(window.end, date!(2025 - 06 - 16));
    }

    #[test]
    fn weekly_window_starts_on_sunday() {
        // 2025-01-08 is a Wednesday; the week began on Sunday 2025-01-05.
        let window = period_window(Period::Weekly, date!(2025 - 01 - 08));

        assert_eq!(window.start, date!(2025 - 01 - 05));
        assert_eq!(window.end, date!(2025 - 01 - 12));
    }

    #[test]
    fn weekly_window_on_a_sunday_starts_that_day() {
        let window = period_window(Period::Weekly, date!(2025 - 01 - 05));

        assert_eq!(window.start, date!(2025 - 01 - 05));
        assert_eq!(window.end, date!(2025 - 01 - 12));
    }

    #[test]
    fn weekly_window_is_seven_days() {
        let window = period_window(Period::Weekly, date!(2025 - 06 - 15));

        assert_eq!(window.end - window.start, Duration::days(7));
    }

    #[test]
    fn monthly_window_spans_the_calendar_month() {
        let window = period_window(Period::Monthly, date!(2025 - 06 - 15));

        assert_eq!(window.start, date!(2025 - 06 - 01));
        assert_eq!(window.end, date!(2025 - 07 - 01));
    }

    #[test]
    fn monthly_window_rolls_over_year_boundary() {
        let window = period_window(Period::Monthly, date!(2024 - 12 - 15));

        assert_eq!(window.start, date!(2024 - 12 - 01));
        assert_eq!(window.end, date!(2025 - 01 - 01));
    }

    #[test]
    fn monthly_window_handles_leap_february() {
        let window = period_window(Period::Monthly, date!(2024 - 02 - 10));

        assert_eq!(window.start, date!(2024 - 02 - 01));
        assert_eq!(window.end, date!(2024 - 03 - 01));
    }

    #[test]
    fn yearly_window_spans_the_calendar_year() {
        let window = period_window(Period::Yearly, date!(2025 - 06 - 15));

        assert_eq!(window.start, date!(2025 - 01 - 01));
        assert_eq!(window.end, date!(2026 - 01 - 01));
    }
}
