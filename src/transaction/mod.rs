//! Income and expense transactions: the domain model, input validation and
//! store queries.

mod category;
mod core;
mod db;
mod form;

pub use category::{Category, ExpenseCategory, IncomeCategory, TransactionKind};
pub use core::{Transaction, TransactionBuilder, TransactionUpdate};
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    list_transactions, list_transactions_in_window, update_transaction,
};
pub use form::{TransactionForm, parse_date};
