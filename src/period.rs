//! Date windows for the analytics periods.
//!
//! A [Period] is resolved against "today" into an inclusive [DateWindow]:
//! - daily: the trailing 7 days ending today,
//! - weekly: Monday to Sunday of the current week,
//! - monthly: the first to the last day of the current month.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::{
    Error,
    transaction::{Transaction, TransactionKind},
};

/// The analytics period selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The last 7 days, including today.
    Daily,
    /// The current Monday to Sunday week.
    Weekly,
    /// The current calendar month.
    Monthly,
}

impl Period {
    /// The value used in query strings and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// A heading for totals over this period.
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Last 7 Days",
            Self::Weekly => "This Week",
            Self::Monthly => "This Month",
        }
    }

    /// The number of daily buckets in the chart for this period.
    pub fn bucket_count(self) -> usize {
        match self {
            Self::Daily | Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(Error::InvalidPeriod(s.to_owned())),
        }
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// The first day in the window.
    pub start: Date,
    /// The last day in the window.
    pub end: Date,
}

impl DateWindow {
    /// Whether `date` falls within the window, including both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// A label such as "5 Jan 2024 - 11 Jan 2024".
    pub fn label(&self) -> String {
        let start = format_date_label(self.start);
        let end = format_date_label(self.end);

        format!("{start} - {end}")
    }
}

/// Compute the window for `period` as seen on `today`.
pub fn window_for(period: Period, today: Date) -> DateWindow {
    match period {
        Period::Daily => trailing_week_bounds(today),
        Period::Weekly => week_bounds(today),
        Period::Monthly => month_bounds(today),
    }
}

/// Select the transactions dated within `window`, preserving their order.
pub fn filter_by_window(transactions: &[Transaction], window: DateWindow) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| window.contains(transaction.date))
        .cloned()
        .collect()
}

/// Select the transactions of `kind`, preserving their order.
///
/// `None` keeps every transaction.
pub fn filter_by_kind(transactions: &[Transaction], kind: Option<TransactionKind>) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| kind.is_none_or(|kind| transaction.kind() == kind))
        .cloned()
        .collect()
}

/// `date` moved back `days` days, clamped to [Date::MIN].
pub(crate) fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

/// `date` moved forward `days` days, clamped to [Date::MAX].
pub(crate) fn days_after(date: Date, days: i64) -> Date {
    date.checked_add(Duration::days(days)).unwrap_or(Date::MAX)
}

fn trailing_week_bounds(today: Date) -> DateWindow {
    DateWindow {
        start: days_before(today, 6),
        end: today,
    }
}

fn week_bounds(anchor_date: Date) -> DateWindow {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = days_before(anchor_date, weekday_number - 1);
    let end = days_after(start, 6);

    DateWindow { start, end }
}

fn month_bounds(anchor_date: Date) -> DateWindow {
    let start = days_before(anchor_date, anchor_date.day() as i64 - 1);
    let length = last_day_of_month(anchor_date.year(), anchor_date.month());
    let end = days_after(start, length as i64 - 1);

    DateWindow { start, end }
}

pub(crate) fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub(crate) fn format_date_label(date: Date) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_abbrev(date.month()),
        date.year()
    )
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
