//! Formatting of money amounts for display.

use numfmt::{Formatter, Precision};

use crate::Error;

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Formats amounts as whole currency units with thousands separators,
/// e.g. "₹1,235" or "-₹50".
pub struct CurrencyFormatter {
    symbol: String,
    positive: Formatter,
    negative: Formatter,
}

impl CurrencyFormatter {
    /// Create a formatter that prefixes amounts with `symbol`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCurrencySymbol] if the symbol is too long to use
    /// as a number prefix.
    pub fn new(symbol: &str) -> Result<Self, Error> {
        let invalid = |_| Error::InvalidCurrencySymbol(symbol.to_owned());

        let positive = Formatter::currency(symbol)
            .map_err(invalid)?
            .precision(Precision::Decimals(0));
        let negative = Formatter::currency(&format!("-{symbol}"))
            .map_err(invalid)?
            .precision(Precision::Decimals(0));

        Ok(Self {
            symbol: symbol.to_owned(),
            positive,
            negative,
        })
    }

    /// The symbol amounts are prefixed with.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Format `amount` rounded to the nearest whole unit.
    pub fn format(&self, amount: f64) -> String {
        let amount = amount.round();

        if amount < 0.0 {
            self.negative.fmt_string(amount.abs())
        } else if amount > 0.0 {
            self.positive.fmt_string(amount)
        } else {
            // numfmt renders zero without the prefix.
            format!("{}0", self.symbol)
        }
    }

    /// Format a percentage with one decimal place, e.g. "33.3%".
    pub fn format_percent(percent: f64) -> String {
        format!("{percent:.1}%")
    }
}

impl std::fmt::Debug for CurrencyFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyFormatter")
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{CurrencyFormatter, DEFAULT_CURRENCY_SYMBOL};

    #[test]
    fn formats_with_thousands_separator_and_rounding() {
        let formatter = CurrencyFormatter::new("$").unwrap();

        assert_eq!(formatter.format(1234.5), "$1,235");
    }

    #[test]
    fn formats_negative_amounts() {
        let formatter = CurrencyFormatter::new("$").unwrap();

        assert_eq!(formatter.format(-50.0), "-$50");
    }

    #[test]
    fn formats_zero() {
        let formatter = CurrencyFormatter::new("$").unwrap();

        assert_eq!(formatter.format(0.0), "$0");
        assert_eq!(formatter.format(0.4), "$0");
    }

    #[test]
    fn default_uses_rupee_symbol() {
        let formatter = CurrencyFormatter::new(DEFAULT_CURRENCY_SYMBOL).unwrap();

        assert_eq!(formatter.symbol(), "₹");
        assert_eq!(formatter.format(700.0), "₹700");
    }

    #[test]
    fn rejects_overlong_symbol() {
        let symbol = "a-very-long-currency-symbol";

        assert_eq!(
            CurrencyFormatter::new(symbol).map(|_| ()),
            Err(Error::InvalidCurrencySymbol(symbol.to_owned()))
        );
    }

    #[test]
    fn formats_percent() {
        assert_eq!(CurrencyFormatter::format_percent(33.333), "33.3%");
    }
}
