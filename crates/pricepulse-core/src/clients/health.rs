use std::sync::Arc;
use std::time::Instant;

use super::{transport_error, HealthProbe, SourceFuture};
use crate::error::SourceError;
use crate::http_client::{HttpClient, HttpRequest};

const PROBE_TIMEOUT_MS: u64 = 5_000;

/// Reachability probe against an upstream's `/health` endpoint.
///
/// Deliberately not breaker-protected: health checks must always attempt the
/// network so they observe true upstream state, even while a breaker has the
/// endpoint excluded from regular traffic.
pub struct HttpHealthProbe {
    http: Arc<dyn HttpClient>,
}

impl HttpHealthProbe {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }
}

impl HealthProbe for HttpHealthProbe {
    fn ping<'a>(&'a self, base_url: &'a str) -> SourceFuture<'a, u64> {
        Box::pin(async move {
            let url = format!("{}/health", base_url.trim_end_matches('/'));
            let request = HttpRequest::get(url).with_timeout_ms(PROBE_TIMEOUT_MS);

            let started = Instant::now();
            let response = self
                .http
                .execute(request)
                .await
                .map_err(|e| transport_error("health probe", e))?;

            if !response.is_success() {
                return Err(SourceError::network(format!(
                    "health endpoint returned status {}",
                    response.status
                )));
            }

            Ok(started.elapsed().as_millis() as u64)
        })
    }
}
