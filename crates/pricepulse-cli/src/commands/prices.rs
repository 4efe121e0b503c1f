use pricepulse_core::ProductId;

use crate::cli::PricesArgs;
use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

pub async fn run(args: &PricesArgs, context: &AppContext) -> Result<CommandOutcome, CliError> {
    let result = context
        .engine()
        .compare_prices(ProductId::new(args.id))
        .await?;
    let degraded = !result.warnings.is_empty();
    let data = serde_json::to_value(result)?;

    Ok(if degraded {
        CommandOutcome::degraded(data)
    } else {
        CommandOutcome::ok(data)
    })
}
