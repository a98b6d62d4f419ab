use anyhow::Result;
use clap::{Parser, Subcommand};
use coinbridge_btce::{BtceAdapter, BtceConfig};
use coinbridge_core::{ExchangeAdapter, OrderSpec};
use rust_decimal::Decimal;
use serde_json::to_string_pretty;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "coinbridge")]
#[command(about = "Query exchanges through the normalized coinbridge adapters")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// API key for private operations
    #[arg(long, env = "BTCE_KEY")]
    key: Option<String>,

    /// API secret for private operations
    #[arg(long, env = "BTCE_SECRET")]
    secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Last/bid/ask/volume for a pair
    Ticker {
        /// Canonical pair (e.g. "XBT_USD")
        #[arg(short, long)]
        pair: String,
    },

    /// Last-trade rate for a pair
    Rate {
        #[arg(short, long)]
        pair: String,
    },

    /// Full order book snapshot
    Orderbook {
        #[arg(short, long)]
        pair: String,
    },

    /// Maker/taker fee fractions
    Fee {
        #[arg(short, long)]
        pair: String,
    },

    /// The account's trades over the last 24 hours (private)
    Trades {
        #[arg(short, long)]
        pair: String,
    },

    /// Orders resting on the exchange (private)
    Orders {
        #[arg(short, long)]
        pair: String,
    },

    /// Available funds per currency (private)
    Balance,

    /// Place a buy order (private)
    Buy {
        #[arg(short, long)]
        pair: Option<String>,

        #[arg(short, long)]
        rate: Option<Decimal>,

        #[arg(short, long)]
        amount: Option<Decimal>,
    },

    /// Place a sell order (private)
    Sell {
        #[arg(short, long)]
        pair: Option<String>,

        #[arg(short, long)]
        rate: Option<Decimal>,

        #[arg(short, long)]
        amount: Option<Decimal>,
    },

    /// Cancel a resting order by id (private)
    Cancel {
        #[arg(short, long)]
        order_id: String,
    },

    /// Print the adapter's capability descriptor
    Properties,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    let adapter = BtceAdapter::new(BtceConfig {
        key: cli.key,
        secret: cli.secret,
        base_url: None,
    });

    let output = match cli.command {
        Commands::Ticker { pair } => {
            info!("Fetching ticker for {}", pair);
            to_string_pretty(&adapter.ticker(Some(&pair)).await)?
        }
        Commands::Rate { pair } => {
            info!("Fetching rate for {}", pair);
            to_string_pretty(&adapter.rate(Some(&pair)).await)?
        }
        Commands::Orderbook { pair } => {
            info!("Fetching order book for {}", pair);
            to_string_pretty(&adapter.order_book(Some(&pair)).await)?
        }
        Commands::Fee { pair } => {
            info!("Fetching fee for {}", pair);
            to_string_pretty(&adapter.fee(Some(&pair)).await)?
        }
        Commands::Trades { pair } => {
            info!("Fetching trade history for {}", pair);
            to_string_pretty(&adapter.trades(Some(&pair)).await)?
        }
        Commands::Orders { pair } => {
            info!("Fetching open orders for {}", pair);
            to_string_pretty(&adapter.open_orders(Some(&pair)).await)?
        }
        Commands::Balance => {
            info!("Fetching balance");
            to_string_pretty(&adapter.balance().await)?
        }
        Commands::Buy { pair, rate, amount } => {
            info!("Placing buy order on {:?}", pair);
            to_string_pretty(&adapter.buy_order(&OrderSpec { pair, rate, amount }).await)?
        }
        Commands::Sell { pair, rate, amount } => {
            info!("Placing sell order on {:?}", pair);
            to_string_pretty(&adapter.sell_order(&OrderSpec { pair, rate, amount }).await)?
        }
        Commands::Cancel { order_id } => {
            info!("Cancelling order {}", order_id);
            to_string_pretty(&adapter.cancel_order(&order_id).await)?
        }
        Commands::Properties => to_string_pretty(&adapter.properties())?,
    };

    println!("{}", output);
    Ok(())
}
