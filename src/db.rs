//! Sets up the SQLite schema for transactions, budgets and savings goals.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, budget::create_budget_table, savings::create_savings_table,
    transaction::create_transaction_table,
};

/// Create all of the application's tables if they do not exist yet.
///
/// The tables are created in a single exclusive transaction, so a failure
/// leaves the database unchanged.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_savings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
