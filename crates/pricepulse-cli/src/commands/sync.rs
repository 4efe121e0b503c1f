use std::time::Duration;

use pricepulse_core::RetryPolicy;

use crate::cli::SyncArgs;
use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

pub async fn run(args: &SyncArgs, context: &AppContext) -> Result<CommandOutcome, CliError> {
    let retry = if args.retries == 0 {
        RetryPolicy::none()
    } else {
        RetryPolicy::new(args.retries, Duration::from_secs(1))
    };

    let report = context.orchestrator(retry).sync_products().await;
    let degraded = !report.errors.is_empty();
    let data = serde_json::to_value(report)?;

    Ok(if degraded {
        CommandOutcome::degraded(data)
    } else {
        CommandOutcome::ok(data)
    })
}
