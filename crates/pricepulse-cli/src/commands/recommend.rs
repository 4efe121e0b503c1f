use serde::Serialize;

use pricepulse_core::{ProductFilters, RecommendationEntry};

use crate::cli::RecommendArgs;
use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

#[derive(Debug, Serialize)]
struct RecommendResponseData {
    recommendations: Vec<RecommendationEntry>,
}

pub fn run(args: &RecommendArgs, context: &AppContext) -> Result<CommandOutcome, CliError> {
    let filters = ProductFilters {
        category: args.category.clone(),
        min_price: args.min_price,
        max_price: args.max_price,
    };

    let recommendations = context.engine().recommendations(&filters);
    let data = serde_json::to_value(RecommendResponseData { recommendations })?;

    Ok(CommandOutcome::ok(data))
}
