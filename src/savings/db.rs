//! Database operations for savings goals.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    amount::validate_amount,
    database_id::SavingsGoalId,
    owner::OwnerId,
    savings::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate},
};

/// Store a new savings goal and return it with its generated ID and timestamp.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_savings_goal(
    goal: NewSavingsGoal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let amount = validate_amount(goal.amount)?;
    let target = validate_amount(goal.target)?;

    let goal = connection
        .prepare(
            "INSERT INTO savings (user_id, amount, target, title, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, amount, target, title, created_at",
        )?
        .query_row(
            (
                &goal.owner_id,
                amount,
                target,
                &goal.title,
                OffsetDateTime::now_utc(),
            ),
            map_savings_row,
        )?;

    Ok(goal)
}

/// Retrieve an owner's savings goals, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_savings_goals(
    owner_id: &OwnerId,
    connection: &Connection,
) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, target, title, created_at FROM savings
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map((owner_id,), map_savings_row)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Apply `update` to the savings goal `id` owned by `owner_id` and return the result.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::NegativeAmount] if a new amount is not valid,
/// - [Error::UpdateMissingSavingsGoal] if `id` does not refer to a goal owned by `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_savings_goal(
    owner_id: &OwnerId,
    id: SavingsGoalId,
    update: SavingsGoalUpdate,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    let amount = update.amount.map(validate_amount).transpose()?;
    let target = update.target.map(validate_amount).transpose()?;

    connection
        .prepare(
            "UPDATE savings SET
                amount = COALESCE(?1, amount),
                target = COALESCE(?2, target),
                title = COALESCE(?3, title)
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, user_id, amount, target, title, created_at",
        )?
        .query_row(
            (amount, target, update.title, id, owner_id),
            map_savings_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingSavingsGoal,
            error => error.into(),
        })
}

/// Delete the savings goal `id` owned by `owner_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingSavingsGoal] if `id` does not refer to a goal owned by `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_savings_goal(
    owner_id: &OwnerId,
    id: SavingsGoalId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM savings WHERE id = ?1 AND user_id = ?2",
        (id, owner_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingSavingsGoal);
    }

    Ok(())
}

/// Create the savings table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_savings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            target REAL NOT NULL CHECK (target >= 0),
            title TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_savings_row(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        amount: row.get(2)?,
        target: row.get(3)?,
        title: row.get(4)?,
        created_at: row.get(5)?,
    })
}
