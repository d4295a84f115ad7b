//! Transaction kinds and the closed category sets for each kind.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize, ser::SerializeStruct};

use crate::Error;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The value stored in the `type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::InvalidTransactionKind(s.to_owned())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Categories for income transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeCategory {
    /// Wages from an employer.
    Salary,
    /// Payment for contract work.
    Freelance,
    /// Dividends, interest and other returns.
    Investments,
    /// Money received as a gift.
    Gifts,
    /// Anything else.
    OtherIncome,
}

impl IncomeCategory {
    /// Every income category in display order.
    pub const ALL: [Self; 5] = [
        Self::Salary,
        Self::Freelance,
        Self::Investments,
        Self::Gifts,
        Self::OtherIncome,
    ];

    /// The display name, which is also the stored value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Investments => "Investments",
            Self::Gifts => "Gifts",
            Self::OtherIncome => "Other Income",
        }
    }
}

/// Categories for expense transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    /// Groceries and eating out.
    Food,
    /// Rent, mortgage and home maintenance.
    Housing,
    /// Fuel, fares and vehicle costs.
    Transportation,
    /// Events, subscriptions and hobbies.
    Entertainment,
    /// Clothing and general purchases.
    Shopping,
    /// Power, water, internet and phone bills.
    Utilities,
    /// Doctor visits, medicine and insurance.
    Healthcare,
    /// Tuition, courses and books.
    Education,
    /// Haircuts, toiletries and the like.
    PersonalCare,
    /// Flights, accommodation and holidays.
    Travel,
    /// Anything else.
    OtherExpenses,
}

impl ExpenseCategory {
    /// Every expense category in display order.
    pub const ALL: [Self; 11] = [
        Self::Food,
        Self::Housing,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::Utilities,
        Self::Healthcare,
        Self::Education,
        Self::PersonalCare,
        Self::Travel,
        Self::OtherExpenses,
    ];

    /// The display name, which is also the stored value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Housing => "Housing",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Utilities => "Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::PersonalCare => "Personal Care",
            Self::Travel => "Travel",
            Self::OtherExpenses => "Other Expenses",
        }
    }
}

/// The category of a transaction.
///
/// The variant determines the transaction kind, so an income transaction can
/// never carry an expense category and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A category for money earned.
    Income(IncomeCategory),
    /// A category for money spent.
    Expense(ExpenseCategory),
}

impl Category {
    /// Look up the category called `name` in the category set for `kind`.
    ///
    /// Matching ignores case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if `name` is not in the set for `kind`.
    pub fn parse(kind: TransactionKind, name: &str) -> Result<Self, Error> {
        let wanted = name.trim();
        let matches = |candidate: &str| candidate.eq_ignore_ascii_case(wanted);

        let found = Self::all_for(kind)
            .into_iter()
            .find(|category| matches(category.name()));

        found.ok_or_else(|| Error::InvalidCategory {
            kind,
            category: name.to_owned(),
        })
    }

    /// The categories available for `kind`, in display order.
    pub fn all_for(kind: TransactionKind) -> Vec<Self> {
        match kind {
            TransactionKind::Income => IncomeCategory::ALL.into_iter().map(Self::Income).collect(),
            TransactionKind::Expense => ExpenseCategory::ALL
                .into_iter()
                .map(Self::Expense)
                .collect(),
        }
    }

    /// The kind of transaction this category belongs to.
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Income(_) => TransactionKind::Income,
            Self::Expense(_) => TransactionKind::Expense,
        }
    }

    /// The display name, which is also the stored value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Income(category) => category.name(),
            Self::Expense(category) => category.name(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialized as `{"type": "expense", "category": "Food"}` so it can be
/// flattened into the transaction record.
impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Category", 2)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("category", self.name())?;
        state.end()
    }
}
