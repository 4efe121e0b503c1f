mod compare;
mod health;
mod prices;
mod recommend;
mod search;
mod sync;
mod update_prices;

use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::context::AppContext;
use crate::error::CliError;

/// Rendered command output plus a degradation marker.
///
/// `degraded` maps to exit code 3: the command produced usable data but some
/// part of it is partial (upstream failures, unhealthy endpoints).
pub struct CommandOutcome {
    pub data: Value,
    pub degraded: bool,
}

impl CommandOutcome {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            degraded: false,
        }
    }

    pub fn degraded(data: Value) -> Self {
        Self {
            data,
            degraded: true,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutcome, CliError> {
    let context = AppContext::build(cli.mock)?;

    match &cli.command {
        Command::Sync(args) => sync::run(args, &context).await,
        Command::UpdatePrices => update_prices::run(&context).await,
        Command::Compare(args) => compare::run(args, &context),
        Command::Prices(args) => prices::run(args, &context).await,
        Command::Recommend(args) => recommend::run(args, &context),
        Command::Search(args) => search::run(args, &context),
        Command::Health => health::run(&context).await,
    }
}
