use pricepulse_core::{CancelFlag, RetryPolicy};

use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

pub async fn run(context: &AppContext) -> Result<CommandOutcome, CliError> {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    // First Ctrl-C aborts between products; applied updates are kept.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.cancel();
        }
    });

    let report = context
        .orchestrator(RetryPolicy::none())
        .update_prices(&cancel)
        .await;
    let degraded = !report.errors.is_empty() || report.cancelled;
    let data = serde_json::to_value(report)?;

    Ok(if degraded {
        CommandOutcome::degraded(data)
    } else {
        CommandOutcome::ok(data)
    })
}
