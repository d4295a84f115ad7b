use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::Duration;

use spendwise::{
    BudgetForm, Gateway, GatewayConfig, OwnerId, SavingsForm, TransactionForm, today_in,
};

/// A utility for creating a test database for spendwise.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the user that owns the demo records.
    #[arg(long, default_value = "test-user")]
    owner: String,

    /// The local timezone the demo dates are relative to.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

/// Demo transactions as (type, amount, category, description, days before today).
const DEMO_TRANSACTIONS: [(&str, &str, &str, &str, i64); 12] = [
    ("income", "85000", "Salary", "Monthly pay", 1),
    ("income", "12000", "Freelance", "Website for a friend", 9),
    ("income", "85000", "Salary", "Monthly pay", 31),
    ("expense", "25000", "Housing", "Rent", 2),
    ("expense", "3200", "Food", "Groceries", 0),
    ("expense", "450", "Food", "Lunch", 3),
    ("expense", "1800", "Transportation", "Fuel", 4),
    ("expense", "2100", "Utilities", "Electricity", 6),
    ("expense", "999", "Entertainment", "Streaming", 12),
    ("expense", "5400", "Shopping", "Shoes", 16),
    ("expense", "25000", "Housing", "Rent", 32),
    ("expense", "1500", "Healthcare", "Pharmacy", 35),
];

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let owner_id = OwnerId::new(&args.owner)?;
    let today = today_in(&args.timezone)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let gateway = Gateway::new(conn, GatewayConfig::default())?;

    println!("Creating demo transactions for {owner_id}...");
    for (kind, amount, category, description, days_ago) in DEMO_TRANSACTIONS {
        let form = TransactionForm {
            kind: kind.to_owned(),
            amount: amount.to_owned(),
            category: category.to_owned(),
            description: description.to_owned(),
            date: (today - Duration::days(days_ago)).to_string(),
        };

        gateway
            .insert_transaction(form.validate(owner_id.clone())?)
            .await?;
    }

    println!("Setting this month's budget...");
    let budget = BudgetForm {
        amount: "60000".to_owned(),
    }
    .validate()?;
    gateway
        .upsert_budget_for_period(&owner_id, today.month(), today.year(), budget)
        .await?;

    println!("Creating savings goals...");
    for (title, amount, target) in [
        ("Emergency fund", "40000", "100000"),
        ("Holiday", "15000", "15000"),
    ] {
        let form = SavingsForm {
            title: title.to_owned(),
            amount: amount.to_owned(),
            target: target.to_owned(),
        };

        gateway
            .insert_savings_goal(form.validate(owner_id.clone())?)
            .await?;
    }

    println!("Success!");

    Ok(())
}
