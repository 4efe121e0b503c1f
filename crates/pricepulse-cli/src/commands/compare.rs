use pricepulse_core::ProductId;

use crate::cli::CompareArgs;
use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

pub fn run(args: &CompareArgs, context: &AppContext) -> Result<CommandOutcome, CliError> {
    let ids: Vec<ProductId> = args.ids.iter().copied().map(ProductId::new).collect();

    let result = context.engine().compare_products(&ids)?;
    let degraded = !result.skipped_ids.is_empty();
    let data = serde_json::to_value(result)?;

    Ok(if degraded {
        CommandOutcome::degraded(data)
    } else {
        CommandOutcome::ok(data)
    })
}
