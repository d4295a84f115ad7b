//! Async access to the store for transactions, budgets and savings goals.
//!
//! Every operation takes the owner explicitly and runs on tokio's blocking
//! thread pool against a single shared SQLite connection.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    Error,
    budget::{self, Budget, BudgetPeriod, BudgetUpdate},
    database_id::{BudgetId, SavingsGoalId, TransactionId},
    db::initialize,
    owner::OwnerId,
    period::DateWindow,
    savings::{self, NewSavingsGoal, SavingsGoal, SavingsGoalUpdate},
    transaction::{self, Transaction, TransactionBuilder, TransactionUpdate},
};

/// The default time limit for a single store operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a [Gateway].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// How long to wait for a store operation before giving up with
    /// [Error::StoreTimeout].
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The store gateway.
///
/// Cloning a gateway is cheap, clones share the same connection.
#[derive(Debug, Clone)]
pub struct Gateway {
    connection: Arc<Mutex<Connection>>,
    config: GatewayConfig,
}

impl Gateway {
    /// Create a new [Gateway] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(connection: Connection, config: GatewayConfig) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            config,
        })
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
    {
        tracing::debug!(operation, "running store operation");

        let connection = Arc::clone(&self.connection);
        let task = tokio::task::spawn_blocking(move || {
            let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
            f(&connection)
        });

        match tokio::time::timeout(self.config.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                tracing::error!(operation, "store task failed: {join_error}");
                Err(Error::TaskFailed(join_error.to_string()))
            }
            Err(_) => {
                tracing::warn!(
                    operation,
                    "store operation timed out after {:?}",
                    self.config.timeout
                );
                Err(Error::StoreTimeout(operation))
            }
        }
    }

    /// All of an owner's transactions, newest first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn list_transactions(&self, owner_id: &OwnerId) -> Result<Vec<Transaction>, Error> {
        let owner_id = owner_id.clone();

        self.run("list_transactions", move |connection| {
            transaction::list_transactions(&owner_id, connection)
        })
        .await
    }

    /// An owner's transactions dated within `window`, newest first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn list_transactions_in_window(
        &self,
        owner_id: &OwnerId,
        window: DateWindow,
    ) -> Result<Vec<Transaction>, Error> {
        let owner_id = owner_id.clone();

        self.run("list_transactions_in_window", move |connection| {
            transaction::list_transactions_in_window(&owner_id, window, connection)
        })
        .await
    }

    /// A single transaction owned by `owner_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the owner has no transaction `id`.
    pub async fn get_transaction(
        &self,
        owner_id: &OwnerId,
        id: TransactionId,
    ) -> Result<Transaction, Error> {
        let owner_id = owner_id.clone();

        self.run("get_transaction", move |connection| {
            transaction::get_transaction(&owner_id, id, connection)
        })
        .await
    }

    /// Store a new transaction.
    ///
    /// # Errors
    /// Returns a validation error for an invalid amount, or an error if the
    /// store cannot be written to.
    pub async fn insert_transaction(
        &self,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let transaction = self
            .run("insert_transaction", move |connection| {
                transaction::create_transaction(builder, connection)
            })
            .await?;

        tracing::info!(
            owner_id = %transaction.owner_id,
            id = transaction.id,
            "created transaction"
        );

        Ok(transaction)
    }

    /// Change the fields of a transaction set in `update`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransaction] if the owner has no transaction `id`.
    pub async fn update_transaction(
        &self,
        owner_id: &OwnerId,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let owner = owner_id.clone();
        let transaction = self
            .run("update_transaction", move |connection| {
                transaction::update_transaction(&owner, id, update, connection)
            })
            .await?;

        tracing::info!(%owner_id, id, "updated transaction");

        Ok(transaction)
    }

    /// Delete a transaction.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if the owner has no transaction `id`.
    pub async fn delete_transaction(
        &self,
        owner_id: &OwnerId,
        id: TransactionId,
    ) -> Result<(), Error> {
        let owner = owner_id.clone();
        self.run("delete_transaction", move |connection| {
            transaction::delete_transaction(&owner, id, connection)
        })
        .await?;

        tracing::info!(%owner_id, id, "deleted transaction");

        Ok(())
    }

    /// All of an owner's budgets, most recent period first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn list_budgets(&self, owner_id: &OwnerId) -> Result<Vec<Budget>, Error> {
        let owner_id = owner_id.clone();

        self.run("list_budgets", move |connection| {
            budget::list_budgets(&owner_id, connection)
        })
        .await
    }

    /// Create a budget for a period that does not have one yet.
    ///
    /// # Errors
    /// Returns [Error::DuplicateBudgetPeriod] if the period already has a
    /// budget, see [Gateway::upsert_budget_for_period] to overwrite it instead.
    pub async fn insert_budget(
        &self,
        owner_id: &OwnerId,
        period: BudgetPeriod,
        amount: f64,
    ) -> Result<Budget, Error> {
        let owner = owner_id.clone();
        let budget = self
            .run("insert_budget", move |connection| {
                budget::create_budget(&owner, period, amount, connection)
            })
            .await?;

        tracing::info!(%owner_id, id = budget.id, %period, "created budget");

        Ok(budget)
    }

    /// Change the fields of a budget set in `update`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingBudget] if the owner has no budget `id`, or
    /// [Error::DuplicateBudgetPeriod] if the new period already has a budget.
    pub async fn update_budget(
        &self,
        owner_id: &OwnerId,
        id: BudgetId,
        update: BudgetUpdate,
    ) -> Result<Budget, Error> {
        let owner = owner_id.clone();
        let budget = self
            .run("update_budget", move |connection| {
                budget::update_budget(&owner, id, update, connection)
            })
            .await?;

        tracing::info!(%owner_id, id, "updated budget");

        Ok(budget)
    }

    /// Delete a budget.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingBudget] if the owner has no budget `id`.
    pub async fn delete_budget(&self, owner_id: &OwnerId, id: BudgetId) -> Result<(), Error> {
        let owner = owner_id.clone();
        self.run("delete_budget", move |connection| {
            budget::delete_budget(&owner, id, connection)
        })
        .await?;

        tracing::info!(%owner_id, id, "deleted budget");

        Ok(())
    }

    /// The owner's budget for `month` of `year`, if one is set.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn get_budget_for_period(
        &self,
        owner_id: &OwnerId,
        month: Month,
        year: i32,
    ) -> Result<Option<Budget>, Error> {
        let owner_id = owner_id.clone();
        let period = BudgetPeriod::new(month, year);

        self.run("get_budget_for_period", move |connection| {
            budget::get_budget_for_period(&owner_id, period, connection)
        })
        .await
    }

    /// The owner's budget for the month containing `today`, if one is set.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn get_current_budget(
        &self,
        owner_id: &OwnerId,
        today: Date,
    ) -> Result<Option<Budget>, Error> {
        self.get_budget_for_period(owner_id, today.month(), today.year())
            .await
    }

    /// Set the owner's budget for `month` of `year`, replacing any existing amount.
    ///
    /// # Errors
    /// Returns a validation error for an invalid amount, or an error if the
    /// store cannot be written to.
    pub async fn upsert_budget_for_period(
        &self,
        owner_id: &OwnerId,
        month: Month,
        year: i32,
        amount: f64,
    ) -> Result<Budget, Error> {
        let owner = owner_id.clone();
        let period = BudgetPeriod::new(month, year);
        let budget = self
            .run("upsert_budget_for_period", move |connection| {
                budget::upsert_budget(&owner, period, amount, connection)
            })
            .await?;

        tracing::info!(%owner_id, id = budget.id, %period, amount, "set budget");

        Ok(budget)
    }

    /// All of an owner's savings goals, newest first.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub async fn list_savings_goals(&self, owner_id: &OwnerId) -> Result<Vec<SavingsGoal>, Error> {
        let owner_id = owner_id.clone();

        self.run("list_savings_goals", move |connection| {
            savings::list_savings_goals(&owner_id, connection)
        })
        .await
    }

    /// Store a new savings goal.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written to.
    pub async fn insert_savings_goal(&self, goal: NewSavingsGoal) -> Result<SavingsGoal, Error> {
        let goal = self
            .run("insert_savings_goal", move |connection| {
                savings::create_savings_goal(goal, connection)
            })
            .await?;

        tracing::info!(owner_id = %goal.owner_id, id = goal.id, "created savings goal");

        Ok(goal)
    }

    /// Change the fields of a savings goal set in `update`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingSavingsGoal] if the owner has no goal `id`.
    pub async fn update_savings_goal(
        &self,
        owner_id: &OwnerId,
        id: SavingsGoalId,
        update: SavingsGoalUpdate,
    ) -> Result<SavingsGoal, Error> {
        let owner = owner_id.clone();
        let goal = self
            .run("update_savings_goal", move |connection| {
                savings::update_savings_goal(&owner, id, update, connection)
            })
            .await?;

        tracing::info!(%owner_id, id, "updated savings goal");

        Ok(goal)
    }

    /// Delete a savings goal.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingSavingsGoal] if the owner has no goal `id`.
    pub async fn delete_savings_goal(
        &self,
        owner_id: &OwnerId,
        id: SavingsGoalId,
    ) -> Result<(), Error> {
        let owner = owner_id.clone();
        self.run("delete_savings_goal", move |connection| {
            savings::delete_savings_goal(&owner, id, connection)
        })
        .await?;

        tracing::info!(%owner_id, id, "deleted savings goal");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        Error, OwnerId,
        budget::BudgetUpdate,
        period::{Period, window_for},
        savings::{GoalTitle, NewSavingsGoal, SavingsGoalUpdate},
        transaction::{Category, ExpenseCategory, IncomeCategory, Transaction, TransactionUpdate},
    };

    use super::{Gateway, GatewayConfig};

    fn get_test_gateway() -> Gateway {
        let conn = Connection::open_in_memory().unwrap();
        Gateway::new(conn, GatewayConfig::default()).unwrap()
    }

    fn owner() -> OwnerId {
        OwnerId::new("owner-1").unwrap()
    }

    fn intruder() -> OwnerId {
        OwnerId::new("owner-2").unwrap()
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(GatewayConfig::default().timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn insert_then_list_transactions() {
        let gateway = get_test_gateway();
        let food = Transaction::build(
            owner(),
            300.0,
            Category::Expense(ExpenseCategory::Food),
            date!(2024 - 01 - 05),
        );
        let salary = Transaction::build(
            owner(),
            1000.0,
            Category::Income(IncomeCategory::Salary),
            date!(2024 - 01 - 06),
        )
        .description("January pay");

        let food = gateway.insert_transaction(food).await.unwrap();
        let salary = gateway.insert_transaction(salary).await.unwrap();

        let got = gateway.list_transactions(&owner()).await.unwrap();

        assert_eq!(got, vec![salary, food]);
        assert_eq!(gateway.list_transactions(&intruder()).await, Ok(vec![]));
    }

    #[tokio::test]
    async fn list_transactions_in_window_filters_by_date() {
        let gateway = get_test_gateway();
        for day in [date!(2024 - 01 - 03), date!(2024 - 01 - 04), date!(2024 - 01 - 10)] {
            gateway
                .insert_transaction(Transaction::build(
                    owner(),
                    1.0,
                    Category::Expense(ExpenseCategory::Food),
                    day,
                ))
                .await
                .unwrap();
        }

        let window = window_for(Period::Daily, date!(2024 - 01 - 10));
        let dates: Vec<_> = gateway
            .list_transactions_in_window(&owner(), window)
            .await
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.date)
            .collect();

        assert_eq!(dates, vec![date!(2024 - 01 - 10), date!(2024 - 01 - 04)]);
    }

    #[tokio::test]
    async fn update_and_delete_are_scoped_by_owner() {
        let gateway = get_test_gateway();
        let transaction = gateway
            .insert_transaction(Transaction::build(
                owner(),
                10.0,
                Category::Expense(ExpenseCategory::Travel),
                date!(2024 - 02 - 01),
            ))
            .await
            .unwrap();
        let update = TransactionUpdate {
            amount: Some(20.0),
            ..Default::default()
        };

        assert_eq!(
            gateway
                .update_transaction(&intruder(), transaction.id, update.clone())
                .await,
            Err(Error::UpdateMissingTransaction)
        );
        assert_eq!(
            gateway.delete_transaction(&intruder(), transaction.id).await,
            Err(Error::DeleteMissingTransaction)
        );

        let updated = gateway
            .update_transaction(&owner(), transaction.id, update)
            .await
            .unwrap();
        assert_eq!(updated.amount, 20.0);
        assert_eq!(
            gateway.get_transaction(&owner(), transaction.id).await,
            Ok(updated)
        );
        assert_eq!(
            gateway.get_transaction(&intruder(), transaction.id).await,
            Err(Error::NotFound)
        );

        assert_eq!(gateway.delete_transaction(&owner(), transaction.id).await, Ok(()));
        assert_eq!(gateway.list_transactions(&owner()).await, Ok(vec![]));
    }

    fn open_shared_file(path: &std::path::Path) -> Gateway {
        let conn = Connection::open(path).unwrap();
        conn.busy_timeout(Duration::from_secs(5)).unwrap();
        Gateway::new(conn, GatewayConfig::default()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_budget_upserts_from_two_connections_leave_one_row() {
        let path = std::env::temp_dir().join(format!(
            "spendwise-concurrent-upserts-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let first_gateway = open_shared_file(&path);
        let second_gateway = open_shared_file(&path);
        let owner = owner();

        let (first, second, third, fourth) = tokio::join!(
            first_gateway.upsert_budget_for_period(&owner, Month::March, 2024, 100.0),
            second_gateway.upsert_budget_for_period(&owner, Month::March, 2024, 200.0),
            first_gateway.upsert_budget_for_period(&owner, Month::March, 2024, 300.0),
            second_gateway.upsert_budget_for_period(&owner, Month::March, 2024, 400.0),
        );
        let results = [first, second, third, fourth];

        let budgets = first_gateway.list_budgets(&owner).await;
        drop(first_gateway);
        drop(second_gateway);
        std::fs::remove_file(&path).unwrap();

        for result in results {
            result.unwrap();
        }
        let budgets = budgets.unwrap();
        assert_eq!(budgets.len(), 1);
        assert!([100.0, 200.0, 300.0, 400.0].contains(&budgets[0].amount));
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_budget() {
        let gateway = get_test_gateway();

        gateway
            .upsert_budget_for_period(&owner(), Month::January, 2024, 5000.0)
            .await
            .unwrap();
        gateway
            .upsert_budget_for_period(&owner(), Month::January, 2024, 4000.0)
            .await
            .unwrap();

        let current = gateway
            .get_current_budget(&owner(), date!(2024 - 01 - 20))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.amount, 4000.0);
        assert_eq!(gateway.list_budgets(&owner()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn current_budget_is_none_for_other_months() {
        let gateway = get_test_gateway();
        gateway
            .upsert_budget_for_period(&owner(), Month::January, 2024, 5000.0)
            .await
            .unwrap();

        assert_eq!(
            gateway
                .get_current_budget(&owner(), date!(2024 - 02 - 01))
                .await,
            Ok(None)
        );
    }

    #[tokio::test]
    async fn budget_crud() {
        let gateway = get_test_gateway();
        let january = crate::BudgetPeriod::new(Month::January, 2024);

        let budget = gateway.insert_budget(&owner(), january, 100.0).await.unwrap();
        assert_eq!(
            gateway.insert_budget(&owner(), january, 200.0).await,
            Err(Error::DuplicateBudgetPeriod(january))
        );

        let update = BudgetUpdate {
            amount: Some(150.0),
            ..Default::default()
        };
        assert_eq!(
            gateway
                .update_budget(&intruder(), budget.id, update.clone())
                .await,
            Err(Error::UpdateMissingBudget)
        );
        let updated = gateway
            .update_budget(&owner(), budget.id, update)
            .await
            .unwrap();
        assert_eq!(updated.amount, 150.0);

        assert_eq!(
            gateway.delete_budget(&intruder(), budget.id).await,
            Err(Error::DeleteMissingBudget)
        );
        assert_eq!(gateway.delete_budget(&owner(), budget.id).await, Ok(()));
    }

    #[tokio::test]
    async fn savings_goal_crud() {
        let gateway = get_test_gateway();
        let new_goal =
            NewSavingsGoal::new(owner(), GoalTitle::new("Holiday").unwrap(), 50.0, 100.0)
                .unwrap();

        let goal = gateway.insert_savings_goal(new_goal).await.unwrap();
        assert_eq!(
            gateway.list_savings_goals(&owner()).await,
            Ok(vec![goal.clone()])
        );

        let update = SavingsGoalUpdate {
            amount: Some(75.0),
            ..Default::default()
        };
        assert_eq!(
            gateway
                .update_savings_goal(&intruder(), goal.id, update.clone())
                .await,
            Err(Error::UpdateMissingSavingsGoal)
        );
        let updated = gateway
            .update_savings_goal(&owner(), goal.id, update)
            .await
            .unwrap();
        assert_eq!(updated.amount, 75.0);

        assert_eq!(
            gateway.delete_savings_goal(&intruder(), goal.id).await,
            Err(Error::DeleteMissingSavingsGoal)
        );
        assert_eq!(gateway.delete_savings_goal(&owner(), goal.id).await, Ok(()));
        assert_eq!(gateway.list_savings_goals(&owner()).await, Ok(vec![]));
    }

    #[tokio::test]
    async fn held_lock_times_out() {
        let conn = Connection::open_in_memory().unwrap();
        let gateway = Gateway::new(
            conn,
            GatewayConfig {
                timeout: Duration::from_millis(50),
            },
        )
        .unwrap();

        let guard = gateway.connection.lock().unwrap();
        let result = gateway.list_budgets(&owner()).await;
        drop(guard);

        assert_eq!(result, Err(Error::StoreTimeout("list_budgets")));
    }

    #[tokio::test]
    async fn poisoned_lock_is_a_lock_error() {
        let gateway = get_test_gateway();
        let connection = gateway.connection.clone();

        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(
            gateway.list_transactions(&owner()).await,
            Err(Error::DatabaseLockError)
        );
    }
}
