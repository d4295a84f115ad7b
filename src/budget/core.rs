//! Defines the core data models for monthly budgets.

use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize, ser::SerializeStruct};
use time::{Date, Month, OffsetDateTime};

use crate::{Error, amount::parse_amount, database_id::BudgetId, owner::OwnerId};

/// The calendar month a budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BudgetPeriod {
    /// The month of the year.
    pub month: Month,
    /// The year.
    pub year: i32,
}

impl BudgetPeriod {
    /// Create a budget period.
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// The budget period that `date` falls in.
    pub fn containing(date: Date) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    /// The lowercase English month name used in the store, e.g. "january".
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl Ord for BudgetPeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| (self.month as u8).cmp(&(other.month as u8)))
    }
}

impl PartialOrd for BudgetPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

impl Serialize for BudgetPeriod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("BudgetPeriod", 2)?;
        state.serialize_field("month", self.month_name())?;
        state.serialize_field("year", &self.year)?;
        state.end()
    }
}

/// A spending limit for one owner and one calendar month.
///
/// There is at most one budget per owner and period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user account the budget belongs to.
    #[serde(rename = "user_id")]
    pub owner_id: OwnerId,
    /// The most the owner intends to spend in the period.
    pub amount: f64,
    /// The month the budget applies to.
    #[serde(flatten)]
    pub period: BudgetPeriod,
    /// When the budget was first set.
    pub created_at: OffsetDateTime,
}

/// A partial update to a budget, `None` fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BudgetUpdate {
    /// The new amount.
    pub amount: Option<f64>,
    /// The new period.
    pub period: Option<BudgetPeriod>,
}

/// The fields of the "set monthly budget" form as the user typed them.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BudgetForm {
    /// The amount as text.
    pub amount: String,
}

impl BudgetForm {
    /// Validate the form and return the budget amount.
    ///
    /// # Errors
    /// Returns a validation error if the amount is blank, not a number or negative.
    pub fn validate(&self) -> Result<f64, Error> {
        parse_amount(&self.amount, "amount")
    }
}

/// The lowercase English name for `month`.
pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "january",
        Month::February => "february",
        Month::March => "march",
        Month::April => "april",
        Month::May => "may",
        Month::June => "june",
        Month::July => "july",
        Month::August => "august",
        Month::September => "september",
        Month::October => "october",
        Month::November => "november",
        Month::December => "december",
    }
}

/// Parse an English month name, ignoring case.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `name` is not a month name.
pub fn parse_month_name(name: &str) -> Result<Month, Error> {
    let month = match name.trim().to_lowercase().as_str() {
        "january" => Month::January,
        "february" => Month::February,
        "march" => Month::March,
        "april" => Month::April,
        "may" => Month::May,
        "june" => Month::June,
        "july" => Month::July,
        "august" => Month::August,
        "september" => Month::September,
        "october" => Month::October,
        "november" => Month::November,
        "december" => Month::December,
        _ => return Err(Error::InvalidMonth(name.to_owned())),
    };

    Ok(month)
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::Error;

    use super::{BudgetForm, BudgetPeriod, month_name, parse_month_name};

    #[test]
    fn month_names_round_trip() {
        let mut month = Month::January;
        for _ in 0..12 {
            assert_eq!(parse_month_name(month_name(month)), Ok(month));
            month = month.next();
        }
    }

    #[test]
    fn parses_capitalised_month_name() {
        assert_eq!(parse_month_name("March"), Ok(Month::March));
    }

    #[test]
    fn rejects_unknown_month_name() {
        assert_eq!(
            parse_month_name("Smarch"),
            Err(Error::InvalidMonth("Smarch".to_owned()))
        );
    }

    #[test]
    fn period_containing_date() {
        assert_eq!(
            BudgetPeriod::containing(date!(2024 - 01 - 31)),
            BudgetPeriod::new(Month::January, 2024)
        );
    }

    #[test]
    fn periods_order_by_year_then_month() {
        let mut periods = vec![
            BudgetPeriod::new(Month::February, 2024),
            BudgetPeriod::new(Month::December, 2023),
            BudgetPeriod::new(Month::January, 2024),
        ];

        periods.sort();

        assert_eq!(
            periods,
            vec![
                BudgetPeriod::new(Month::December, 2023),
                BudgetPeriod::new(Month::January, 2024),
                BudgetPeriod::new(Month::February, 2024),
            ]
        );
    }

    #[test]
    fn serializes_lowercase_month() {
        let json = serde_json::to_value(BudgetPeriod::new(Month::May, 2024)).unwrap();

        assert_eq!(json, serde_json::json!({"month": "may", "year": 2024}));
    }

    #[test]
    fn form_rejects_blank_amount() {
        let form = BudgetForm {
            amount: String::new(),
        };

        assert_eq!(form.validate(), Err(Error::MissingField("amount")));
    }
}
