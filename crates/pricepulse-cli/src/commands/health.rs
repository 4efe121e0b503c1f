use pricepulse_core::{HealthState, RetryPolicy};

use crate::context::AppContext;
use crate::error::CliError;

use super::CommandOutcome;

pub async fn run(context: &AppContext) -> Result<CommandOutcome, CliError> {
    let report = context
        .orchestrator(RetryPolicy::none())
        .check_external_apis()
        .await;
    let degraded = report.catalog.status == HealthState::Unhealthy
        || report.prices.status == HealthState::Unhealthy;
    let data = serde_json::to_value(report)?;

    Ok(if degraded {
        CommandOutcome::degraded(data)
    } else {
        CommandOutcome::ok(data)
    })
}
