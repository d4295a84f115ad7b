//! Defines the savings goal model and the validation of user input for it.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    amount::{parse_amount, validate_amount},
    database_id::SavingsGoalId,
    owner::OwnerId,
};

/// The title of a savings goal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GoalTitle(String);

impl GoalTitle {
    /// Create a goal title.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTitle] if `title` is empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else {
            Ok(Self(title.to_owned()))
        }
    }
}

impl AsRef<str> for GoalTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GoalTitle {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<GoalTitle> for String {
    fn from(title: GoalTitle) -> Self {
        title.0
    }
}

impl Display for GoalTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for GoalTitle {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for GoalTitle {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        String::column_result(value).and_then(|title| {
            Self::new(&title).map_err(|error| FromSqlError::Other(Box::new(error)))
        })
    }
}

/// Money being put aside towards a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsGoal {
    /// The ID of the goal.
    pub id: SavingsGoalId,
    /// The user account the goal belongs to.
    #[serde(rename = "user_id")]
    pub owner_id: OwnerId,
    /// The amount saved so far.
    pub amount: f64,
    /// The amount the owner wants to reach.
    pub target: f64,
    /// What the owner is saving for.
    pub title: GoalTitle,
    /// When the goal was created.
    pub created_at: OffsetDateTime,
}

/// A savings goal that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavingsGoal {
    /// The user account the goal will belong to.
    pub owner_id: OwnerId,
    /// The amount saved so far.
    pub amount: f64,
    /// The amount the owner wants to reach.
    pub target: f64,
    /// What the owner is saving for.
    pub title: GoalTitle,
}

impl NewSavingsGoal {
    /// Create a new savings goal.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] or [Error::NegativeAmount] if either
    /// amount is not a finite, non-negative number.
    pub fn new(owner_id: OwnerId, title: GoalTitle, amount: f64, target: f64) -> Result<Self, Error> {
        Ok(Self {
            owner_id,
            amount: validate_amount(amount)?,
            target: validate_amount(target)?,
            title,
        })
    }
}

/// A partial update to a savings goal, `None` fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SavingsGoalUpdate {
    /// The new saved amount.
    pub amount: Option<f64>,
    /// The new target.
    pub target: Option<f64>,
    /// The new title.
    pub title: Option<GoalTitle>,
}

/// The fields of the "add savings goal" form as the user typed them.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SavingsForm {
    /// What the owner is saving for.
    pub title: String,
    /// The amount saved so far as text.
    pub amount: String,
    /// The target amount as text.
    pub target: String,
}

impl SavingsForm {
    /// Validate the form and turn it into a [NewSavingsGoal] for `owner_id`.
    ///
    /// # Errors
    /// Returns [Error::EmptyTitle] for a blank title, or a validation error if
    /// either amount is blank, not a number or negative.
    pub fn validate(&self, owner_id: OwnerId) -> Result<NewSavingsGoal, Error> {
        let title = GoalTitle::new(&self.title)?;
        let amount = parse_amount(&self.amount, "amount")?;
        let target = parse_amount(&self.target, "target")?;

        NewSavingsGoal::new(owner_id, title, amount, target)
    }
}
