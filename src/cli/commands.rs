use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tradedesk", about = "Trade records with staged editing and CSV export")]
pub struct Cli {
    /// Record store backend (memory, sqlite, http). Overrides TRADEDESK_STORE.
    #[arg(long, global = true)]
    pub store: Option<String>,
    /// SQLite database path. Overrides TRADEDESK_DB.
    #[arg(long, global = true)]
    pub db: Option<String>,
    /// Base URL of a remote trades API. Overrides TRADEDESK_URL.
    #[arg(long, global = true)]
    pub url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Free text matched against counterparty, SKU and item name
    #[arg(long)]
    pub q: Option<String>,
    /// Status filter (NEW, CONFIRMED, CANCELLED); anything else is ignored
    #[arg(long)]
    pub status: Option<String>,
    /// Earliest trade date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest trade date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List trades, newest trade date first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Zero-based page
        #[arg(long, default_value = "0")]
        page: usize,
        #[arg(long, default_value = "50")]
        page_size: usize,
    },
    /// Show one trade
    Get { id: String },
    /// Add a trade
    Add {
        /// JSON with tradeDate, counterparty, type, itemSku, itemName, quantity, price, status, notes
        json: String,
    },
    /// Replace a trade
    Update {
        id: String,
        /// Full trade JSON, same shape as for add
        json: String,
    },
    /// Delete a trade
    Delete { id: String },
    /// Export trades as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file (default: trades_YYYYMMDD_HHMMSS.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Stage a batch of edits and save them in one go
    Apply {
        /// JSON array of {"op": "add"|"edit"|"delete", ...} actions
        json: String,
    },
    /// Insert the sample trades
    Seed,
    /// Serve the trades HTTP API over the configured store
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}
