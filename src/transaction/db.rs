//! Database operations for transactions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    amount::validate_amount,
    database_id::TransactionId,
    owner::OwnerId,
    period::DateWindow,
    transaction::{Category, Transaction, TransactionBuilder, TransactionKind, TransactionUpdate},
};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, amount, type, category, description, date, created_at FROM transactions";

/// Newest first, with insertion order breaking ties between same-day transactions.
const NEWEST_FIRST: &str = "ORDER BY date DESC, created_at DESC, id DESC";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::NegativeAmount] if the amount is not valid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = validate_amount(builder.amount)?;

    let transaction = connection
        .prepare(
            "INSERT INTO transactions (user_id, amount, type, category, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, amount, type, category, description, date, created_at",
        )?
        .query_row(
            (
                &builder.owner_id,
                amount,
                builder.category.kind(),
                builder.category.name(),
                &builder.description,
                builder.date,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `owner_id` by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `owner_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    owner_id: &OwnerId,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2"))?
        .query_row((id, owner_id), map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all of an owner's transactions, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    owner_id: &OwnerId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE user_id = ?1 {NEWEST_FIRST}"))?
        .query_map((owner_id,), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve an owner's transactions dated within `window` (inclusive), newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_transactions_in_window(
    owner_id: &OwnerId,
    window: DateWindow,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 {NEWEST_FIRST}"
        ))?
        .query_map((owner_id, window.start, window.end), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to the transaction `id` owned by `owner_id` and return the result.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::NegativeAmount] if the new amount is not valid,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    owner_id: &OwnerId,
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if update.is_empty() {
        return get_transaction(owner_id, id, connection).map_err(|error| match error {
            Error::NotFound => Error::UpdateMissingTransaction,
            error => error,
        });
    }

    let amount = update.amount.map(validate_amount).transpose()?;
    let kind = update.category.map(Category::kind);
    let category = update.category.map(Category::name);

    connection
        .prepare(
            "UPDATE transactions SET
                amount = COALESCE(?1, amount),
                type = COALESCE(?2, type),
                category = COALESCE(?3, category),
                description = COALESCE(?4, description),
                date = COALESCE(?5, date)
             WHERE id = ?6 AND user_id = ?7
             RETURNING id, user_id, amount, type, category, description, date, created_at",
        )?
        .query_row(
            (
                amount,
                kind,
                category,
                update.description,
                update.date,
                id,
                owner_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete the transaction `id` owned by `owner_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    owner_id: &OwnerId,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
        (id, owner_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = row.get(1)?;
    let amount = row.get(2)?;
    let kind: TransactionKind = row.get(3)?;
    let raw_category: String = row.get(4)?;
    let category = Category::parse(kind, &raw_category).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let description = row.get(5)?;
    let date = row.get(6)?;
    let created_at = row.get(7)?;

    Ok(Transaction {
        id,
        owner_id,
        amount,
        category,
        description,
        date,
        created_at,
    })
}
