use serde::Serialize;

use pricepulse_core::Product;

use crate::cli::SearchArgs;
use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

#[derive(Debug, Serialize)]
struct SearchResponseData {
    products: Vec<Product>,
}

pub fn run(args: &SearchArgs, context: &AppContext) -> Result<CommandOutcome, CliError> {
    let products = context.repo.search(&args.query);
    let data = serde_json::to_value(SearchResponseData { products })?;

    Ok(CommandOutcome::ok(data))
}
