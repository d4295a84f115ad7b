//! Validation of raw transaction form input.

use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    Error,
    amount::parse_amount,
    owner::OwnerId,
    transaction::{Category, Transaction, TransactionBuilder, TransactionKind},
};

/// The fields of the "add transaction" form as the user typed them.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionForm {
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The amount as text, e.g. "1000" or "12.50".
    pub amount: String,
    /// A category name from the set matching `kind`.
    pub category: String,
    /// Free text, may be empty.
    #[serde(default)]
    pub description: String,
    /// The date as YYYY-MM-DD.
    pub date: String,
}

impl TransactionForm {
    /// Validate the form and turn it into a [TransactionBuilder] for `owner_id`.
    ///
    /// # Errors
    /// Returns a validation error if a required field is blank, the amount is
    /// not a non-negative number, the kind is unknown, the category does not
    /// belong to the kind, or the date is not a valid calendar date.
    pub fn validate(self, owner_id: OwnerId) -> Result<TransactionBuilder, Error> {
        if self.kind.trim().is_empty() {
            return Err(Error::MissingField("type"));
        }
        let kind: TransactionKind = self.kind.parse()?;

        let amount = parse_amount(&self.amount, "amount")?;

        if self.category.trim().is_empty() {
            return Err(Error::MissingField("category"));
        }
        let category = Category::parse(kind, &self.category)?;

        let date = parse_date(&self.date)?;

        Ok(Transaction::build(owner_id, amount, category, date).description(self.description.trim()))
    }
}

/// Parse an ISO 8601 calendar date such as "2024-01-05".
///
/// # Errors
/// Returns [Error::MissingField] for blank input and [Error::InvalidDate] if
/// the text is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Err(Error::MissingField("date"));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}
