//! CLI argument definitions for PricePulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sync` | Ingest a full catalog snapshot from the product API |
//! | `update-prices` | Sweep all products and adopt lower external prices |
//! | `compare` | Compare two or more products by id |
//! | `prices` | Compare internal and external prices for one product |
//! | `recommend` | Rank products by value score |
//! | `search` | Search products by name or description |
//! | `health` | Probe the configured upstream APIs |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--mock` | `false` | Use deterministic offline sources |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Ingest the demo catalog and rank it
//! pricepulse --mock sync
//! pricepulse --mock recommend --category smartphones
//!
//! # Compare two products
//! pricepulse --mock compare 1 2 --pretty
//! ```

use clap::{Args, Parser, Subcommand};

/// PricePulse - resilient product price comparison CLI
///
/// Aggregates internal catalog data with external retailer quotes behind
/// circuit breakers, with retries and graceful degradation.
#[derive(Debug, Parser)]
#[command(
    name = "pricepulse",
    author,
    version,
    about = "Resilient product price comparison CLI",
    long_about = "PricePulse aggregates an internal product catalog with external retailer \
quotes. Features include:\n\
\n\
  • Circuit-breaker protected upstream clients\n\
  • Exponential-backoff retries for transient failures\n\
  • Graceful degradation to internal prices\n\
  • Value-score recommendations\n\
\n\
Use 'pricepulse <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Use deterministic offline sources and a seeded demo catalog.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a full catalog snapshot from the product API.
    ///
    /// Upstream failures never abort the command; they are reported in the
    /// sync report's error list.
    ///
    /// # Examples
    ///
    ///   pricepulse sync
    ///   pricepulse --mock sync --retries 3
    Sync(SyncArgs),

    /// Sweep all products and adopt strictly lower external prices.
    ///
    /// Per-product failures are accumulated; one bad product never blocks
    /// updates to the others.
    UpdatePrices,

    /// Compare two or more products by id.
    ///
    /// Unknown ids are skipped and reported; at least two ids must resolve.
    ///
    /// # Examples
    ///
    ///   pricepulse compare 1 2 3
    Compare(CompareArgs),

    /// Compare internal and external prices for one product.
    ///
    /// When external sources are down the result degrades to the internal
    /// quote with a warning (exit code 3).
    Prices(PricesArgs),

    /// Rank products by value score (cheaper scores higher, max 10).
    Recommend(RecommendArgs),

    /// Search products by name or description.
    Search(SearchArgs),

    /// Probe the configured upstream APIs.
    Health,
}

/// Arguments for the `sync` command.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Retry attempts for the catalog fetch (0 disables retries).
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}

/// Arguments for the `compare` command.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Two or more product ids.
    #[arg(required = true, num_args = 2..)]
    pub ids: Vec<u64>,
}

/// Arguments for the `prices` command.
#[derive(Debug, Args)]
pub struct PricesArgs {
    /// Product id to compare prices for.
    pub id: u64,
}

/// Arguments for the `recommend` command.
#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Restrict to one category (case-insensitive).
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price, inclusive.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price, inclusive.
    #[arg(long)]
    pub max_price: Option<f64>,
}

/// Arguments for the `search` command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-form query matched against names and descriptions.
    pub query: String,
}
