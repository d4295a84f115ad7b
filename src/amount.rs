//! Validation for money amounts entered by users.

use crate::Error;

/// Check that `amount` is a finite, non-negative number.
///
/// # Errors
/// Returns [Error::InvalidAmount] for NaN or infinite values and
/// [Error::NegativeAmount] for values below zero.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if !amount.is_finite() {
        Err(Error::InvalidAmount(amount.to_string()))
    } else if amount < 0.0 {
        Err(Error::NegativeAmount(amount))
    } else {
        Ok(amount)
    }
}

/// Parse a form field as an amount.
///
/// `field` names the field in the [Error::MissingField] returned for blank input.
///
/// # Errors
/// Returns an error if the text is blank, not a number, or not a valid amount
/// according to [validate_amount].
pub fn parse_amount(text: &str, field: &'static str) -> Result<f64, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Err(Error::MissingField(field));
    }

    let amount: f64 = text
        .parse()
        .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

    validate_amount(amount)
}
