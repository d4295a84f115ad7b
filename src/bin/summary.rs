use std::error::Error;

use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendwise::{
    CurrencyFormatter, DEFAULT_CURRENCY_SYMBOL, Gateway, GatewayConfig, OwnerId, Period,
    TransactionKind, build_analytics, build_dashboard, filter_by_kind, render_analytics,
    render_dashboard, today_in, window_for,
};

/// Print the dashboard and analytics summary for one owner of a spendwise database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "SPENDWISE_DB_PATH")]
    db_path: String,

    /// The ID of the user whose records to summarise.
    #[arg(long, env = "SPENDWISE_OWNER")]
    owner: String,

    /// The analytics period: daily, weekly or monthly.
    #[arg(long, default_value = "monthly", env = "SPENDWISE_PERIOD")]
    period: Period,

    /// Only include income or expense transactions in the analytics.
    #[arg(long, env = "SPENDWISE_KIND")]
    kind: Option<TransactionKind>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    #[arg(long, default_value = "Etc/UTC", env = "SPENDWISE_TIMEZONE")]
    timezone: String,

    /// The number of recent transactions to show.
    #[arg(long, default_value_t = 5, env = "SPENDWISE_RECENT")]
    recent: usize,

    /// The symbol to prefix amounts with.
    #[arg(long, default_value = DEFAULT_CURRENCY_SYMBOL, env = "SPENDWISE_CURRENCY_SYMBOL")]
    currency_symbol: String,

    /// Seconds to wait for a database operation before giving up.
    #[arg(long, default_value_t = 10, env = "SPENDWISE_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let owner_id = OwnerId::new(&args.owner)?;
    let today = today_in(&args.timezone)?;
    let currency = CurrencyFormatter::new(&args.currency_symbol)?;
    let config = GatewayConfig {
        timeout: std::time::Duration::from_secs(args.timeout_secs),
    };

    tracing::info!(db_path = %args.db_path, %owner_id, %today, "summarising");

    let conn = Connection::open(&args.db_path)?;
    let gateway = Gateway::new(conn, config)?;

    let dashboard = build_dashboard(&gateway, &owner_id, today, args.recent).await?;
    let transactions = gateway
        .list_transactions_in_window(&owner_id, window_for(args.period, today))
        .await?;
    let transactions = filter_by_kind(&transactions, args.kind);
    let analytics = build_analytics(&transactions, args.period, today);

    if args.json {
        let json = serde_json::json!({
            "dashboard": dashboard,
            "analytics": analytics,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", render_dashboard(&dashboard, &currency));
        print!("{}", render_analytics(&analytics, &currency));
    }

    Ok(())
}

fn setup_logging() {
    let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(stderr_log)
        .init();
}
