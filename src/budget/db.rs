//! Database operations for budgets.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    amount::validate_amount,
    budget::{Budget, BudgetPeriod, BudgetUpdate, parse_month_name},
    database_id::BudgetId,
    owner::OwnerId,
};

const SELECT_COLUMNS: &str = "SELECT id, user_id, amount, month, year, created_at FROM budgets";

/// Set the budget for `owner_id` and `period` to `amount`.
///
/// Inserts a new budget if the period has none, otherwise overwrites the
/// amount of the existing one. This is a single statement keyed on the
/// (owner, month, year) uniqueness constraint, so concurrent calls for the
/// same period can never create two budgets.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::NegativeAmount] if the amount is not valid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn upsert_budget(
    owner_id: &OwnerId,
    period: BudgetPeriod,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    let amount = validate_amount(amount)?;

    let budget = connection
        .prepare(
            "INSERT INTO budgets (user_id, amount, month, year, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, month, year) DO UPDATE SET amount = excluded.amount
             RETURNING id, user_id, amount, month, year, created_at",
        )?
        .query_row(
            (
                owner_id,
                amount,
                period.month_name(),
                period.year,
                OffsetDateTime::now_utc(),
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Create a budget for a period that does not have one yet.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::NegativeAmount] if the amount is not valid,
/// - [Error::DuplicateBudgetPeriod] if the owner already has a budget for `period`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    owner_id: &OwnerId,
    period: BudgetPeriod,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    let amount = validate_amount(amount)?;

    connection
        .prepare(
            "INSERT INTO budgets (user_id, amount, month, year, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, amount, month, year, created_at",
        )?
        .query_row(
            (
                owner_id,
                amount,
                period.month_name(),
                period.year,
                OffsetDateTime::now_utc(),
            ),
            map_budget_row,
        )
        .map_err(|error| map_unique_violation(error, period))
}

/// Retrieve the owner's budget for `period`, if one has been set.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_budget_for_period(
    owner_id: &OwnerId,
    period: BudgetPeriod,
    connection: &Connection,
) -> Result<Option<Budget>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 AND month = ?2 AND year = ?3"
        ))?
        .query_row((owner_id, period.month_name(), period.year), map_budget_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all of an owner's budgets, most recent period first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_budgets(owner_id: &OwnerId, connection: &Connection) -> Result<Vec<Budget>, Error> {
    let mut budgets = connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE user_id = ?1"))?
        .query_map((owner_id,), map_budget_row)?
        .collect::<Result<Vec<Budget>, rusqlite::Error>>()?;

    // Month names do not sort chronologically in SQL.
    budgets.sort_by(|a, b| b.period.cmp(&a.period).then_with(|| b.id.cmp(&a.id)));

    Ok(budgets)
}

/// Apply `update` to the budget `id` owned by `owner_id` and return the result.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::NegativeAmount] if the new amount is not valid,
/// - [Error::UpdateMissingBudget] if `id` does not refer to a budget owned by `owner_id`,
/// - [Error::DuplicateBudgetPeriod] if moving the budget would clash with another budget,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_budget(
    owner_id: &OwnerId,
    id: BudgetId,
    update: BudgetUpdate,
    connection: &Connection,
) -> Result<Budget, Error> {
    let amount = update.amount.map(validate_amount).transpose()?;
    let month = update.period.map(|period| period.month_name());
    let year = update.period.map(|period| period.year);

    connection
        .prepare(
            "UPDATE budgets SET
                amount = COALESCE(?1, amount),
                month = COALESCE(?2, month),
                year = COALESCE(?3, year)
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, user_id, amount, month, year, created_at",
        )?
        .query_row((amount, month, year, id, owner_id), map_budget_row)
        .map_err(|error| match (error, update.period) {
            (rusqlite::Error::QueryReturnedNoRows, _) => Error::UpdateMissingBudget,
            (error, Some(period)) => map_unique_violation(error, period),
            (error, None) => error.into(),
        })
}

/// Delete the budget `id` owned by `owner_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if `id` does not refer to a budget owned by `owner_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_budget(owner_id: &OwnerId, id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budgets WHERE id = ?1 AND user_id = ?2",
        (id, owner_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budgets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            month TEXT NOT NULL,
            year INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, month, year)
        )",
        (),
    )?;

    Ok(())
}

fn map_unique_violation(error: rusqlite::Error, period: BudgetPeriod) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateBudgetPeriod(period),
        error => error.into(),
    }
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;
    let owner_id = row.get(1)?;
    let amount = row.get(2)?;
    let raw_month: String = row.get(3)?;
    let month = parse_month_name(&raw_month).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(error))
    })?;
    let year = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Budget {
        id,
        owner_id,
        amount,
        period: BudgetPeriod { month, year },
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::Month;

    use crate::{
        Error, OwnerId,
        budget::{BudgetPeriod, BudgetUpdate},
        db::initialize,
    };

    use super::{
        create_budget, delete_budget, get_budget_for_period, list_budgets, update_budget,
        upsert_budget,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn owner() -> OwnerId {
        OwnerId::new("owner-1").unwrap()
    }

    fn other_owner() -> OwnerId {
        OwnerId::new("owner-2").unwrap()
    }

    fn january() -> BudgetPeriod {
        BudgetPeriod::new(Month::January, 2024)
    }

    fn count_budgets(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn upsert_inserts_when_absent() {
        let conn = get_test_connection();

        let budget = upsert_budget(&owner(), january(), 5000.0, &conn).unwrap();

        assert!(budget.id > 0);
        assert_eq!(budget.amount, 5000.0);
        assert_eq!(budget.period, january());
        assert_eq!(budget.owner_id, owner());
    }

    #[test]
    fn upsert_twice_keeps_one_row_with_second_amount() {
        let conn = get_test_connection();

        let first = upsert_budget(&owner(), january(), 5000.0, &conn).unwrap();
        let second = upsert_budget(&owner(), january(), 6500.0, &conn).unwrap();

        assert_eq!(count_budgets(&conn), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(
            get_budget_for_period(&owner(), january(), &conn)
                .unwrap()
                .map(|budget| budget.amount),
            Some(6500.0)
        );
    }

    #[test]
    fn upsert_is_scoped_by_owner_and_period() {
        let conn = get_test_connection();

        upsert_budget(&owner(), january(), 1.0, &conn).unwrap();
        upsert_budget(&other_owner(), january(), 2.0, &conn).unwrap();
        upsert_budget(&owner(), BudgetPeriod::new(Month::February, 2024), 3.0, &conn).unwrap();
        upsert_budget(&owner(), BudgetPeriod::new(Month::January, 2025), 4.0, &conn).unwrap();

        assert_eq!(count_budgets(&conn), 4);
    }

    #[test]
    fn upsert_rejects_negative_amount() {
        let conn = get_test_connection();

        let result = upsert_budget(&owner(), january(), -10.0, &conn);

        assert_eq!(result, Err(Error::NegativeAmount(-10.0)));
        assert_eq!(count_budgets(&conn), 0);
    }

    #[test]
    fn create_rejects_duplicate_period() {
        let conn = get_test_connection();
        create_budget(&owner(), january(), 100.0, &conn).unwrap();

        let result = create_budget(&owner(), january(), 200.0, &conn);

        assert_eq!(result, Err(Error::DuplicateBudgetPeriod(january())));
    }

    #[test]
    fn get_for_period_without_budget_is_none() {
        let conn = get_test_connection();
        upsert_budget(&other_owner(), january(), 100.0, &conn).unwrap();

        assert_eq!(get_budget_for_period(&owner(), january(), &conn), Ok(None));
    }

    #[test]
    fn list_orders_by_period_newest_first() {
        let conn = get_test_connection();
        for (month, year) in [
            (Month::December, 2023),
            (Month::February, 2024),
            (Month::September, 2023),
            (Month::January, 2024),
        ] {
            upsert_budget(&owner(), BudgetPeriod::new(month, year), 1.0, &conn).unwrap();
        }
        upsert_budget(&other_owner(), january(), 1.0, &conn).unwrap();

        let periods: Vec<_> = list_budgets(&owner(), &conn)
            .unwrap()
            .into_iter()
            .map(|budget| budget.period)
            .collect();

        assert_eq!(
            periods,
            vec![
                BudgetPeriod::new(Month::February, 2024),
                BudgetPeriod::new(Month::January, 2024),
                BudgetPeriod::new(Month::December, 2023),
                BudgetPeriod::new(Month::September, 2023),
            ]
        );
    }

    #[test]
    fn update_changes_amount() {
        let conn = get_test_connection();
        let budget = upsert_budget(&owner(), january(), 100.0, &conn).unwrap();

        let updated = update_budget(
            &owner(),
            budget.id,
            BudgetUpdate {
                amount: Some(250.0),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.amount, 250.0);
        assert_eq!(updated.period, january());
    }

    #[test]
    fn update_into_taken_period_is_duplicate() {
        let conn = get_test_connection();
        let february = BudgetPeriod::new(Month::February, 2024);
        upsert_budget(&owner(), january(), 100.0, &conn).unwrap();
        let budget = upsert_budget(&owner(), february, 100.0, &conn).unwrap();

        let result = update_budget(
            &owner(),
            budget.id,
            BudgetUpdate {
                period: Some(january()),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::DuplicateBudgetPeriod(january())));
    }

    #[test]
    fn update_foreign_budget_fails() {
        let conn = get_test_connection();
        let budget = upsert_budget(&owner(), january(), 100.0, &conn).unwrap();

        let result = update_budget(
            &other_owner(),
            budget.id,
            BudgetUpdate {
                amount: Some(1.0),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingBudget));
    }

    #[test]
    fn delete_removes_budget() {
        let conn = get_test_connection();
        let budget = upsert_budget(&owner(), january(), 100.0, &conn).unwrap();

        assert_eq!(
            delete_budget(&other_owner(), budget.id, &conn),
            Err(Error::DeleteMissingBudget)
        );
        assert_eq!(delete_budget(&owner(), budget.id, &conn), Ok(()));
        assert_eq!(count_budgets(&conn), 0);
        assert_eq!(
            delete_budget(&owner(), budget.id, &conn),
            Err(Error::DeleteMissingBudget)
        );
    }
}
