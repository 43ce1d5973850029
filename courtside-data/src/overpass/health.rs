//! Background endpoint health checks.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::client::OverpassClient;
use super::transport::OverpassTransport;

/// Shortest interval between probe rounds.
pub const MIN_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest interval between probe rounds.
pub const MAX_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Handle to a running health-check task.
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct HealthCheckHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl HealthCheckHandle {
    /// Stop the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Err(err) = (&mut self.task).await {
            debug!("health-check task ended abnormally: {err}");
        }
    }

    /// Whether the task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for HealthCheckHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Probe every endpoint of `client` once per `interval` until cancelled.
///
/// The first round runs one full interval after spawning. `interval` is
/// clamped to [`MIN_HEALTH_CHECK_INTERVAL`]..=[`MAX_HEALTH_CHECK_INTERVAL`].
/// Must be called from within a Tokio runtime.
pub fn spawn_health_checks<T>(client: Arc<OverpassClient<T>>, interval: Duration) -> HealthCheckHandle
where
    T: OverpassTransport + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();
    let period = interval.clamp(MIN_HEALTH_CHECK_INTERVAL, MAX_HEALTH_CHECK_INTERVAL);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancelled.cancelled() => break,
                _ = ticker.tick() => {
                    let outcomes = client.probe_all().await;
                    let healthy = outcomes.iter().filter(|outcome| outcome.result.is_ok()).count();
                    debug!("health check: {healthy}/{} endpoints answered", outcomes.len());
                }
            }
        }
    });
    HealthCheckHandle { token, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointUrl, IngestionConfig};
    use crate::overpass::endpoints::MAX_ERRORS;
    use crate::overpass::test_support::StubTransport;
    use rstest::{fixture, rstest};

    const INTERVAL: Duration = Duration::from_secs(300);

    #[fixture]
    fn client() -> Arc<OverpassClient<StubTransport>> {
        let config = IngestionConfig::default()
            .with_endpoints(["http://a.example/api"])
            .expect("endpoint parses");
        Arc::new(OverpassClient::new(&config, StubTransport::new()))
    }

    fn break_endpoint(client: &OverpassClient<StubTransport>) -> EndpointUrl {
        let target = EndpointUrl::parse("http://a.example/api").expect("endpoint parses");
        for _ in 0..MAX_ERRORS {
            client.registry().record_failure(&target);
        }
        target
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn probes_after_each_interval(client: Arc<OverpassClient<StubTransport>>) {
        break_endpoint(&client);
        let handle = spawn_health_checks(Arc::clone(&client), INTERVAL);

        tokio::time::sleep(INTERVAL - Duration::from_secs(1)).await;
        assert!(!client.endpoint_status()[0].is_healthy, "no probe yet");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(client.endpoint_status()[0].is_healthy, "probe restored endpoint");

        handle.shutdown().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn failed_probes_keep_endpoint_unhealthy(client: Arc<OverpassClient<StubTransport>>) {
        let target = break_endpoint(&client);
        client.transport().take_down(&target);
        let handle = spawn_health_checks(Arc::clone(&client), INTERVAL);

        tokio::time::sleep(INTERVAL * 2 + Duration::from_secs(1)).await;
        assert!(!client.endpoint_status()[0].is_healthy);
        let probes = client.transport().calls().iter().filter(|call| call.is_probe()).count();
        assert_eq!(probes, 2);

        handle.shutdown().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_task(client: Arc<OverpassClient<StubTransport>>) {
        let handle = spawn_health_checks(Arc::clone(&client), INTERVAL);
        handle.shutdown().await;

        tokio::time::sleep(INTERVAL * 3).await;
        assert!(client.transport().calls().is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn zero_interval_runs_at_the_minimum(client: Arc<OverpassClient<StubTransport>>) {
        break_endpoint(&client);
        let handle = spawn_health_checks(Arc::clone(&client), Duration::ZERO);

        tokio::time::sleep(MIN_HEALTH_CHECK_INTERVAL + Duration::from_millis(500)).await;
        assert!(!handle.is_finished(), "the task keeps running");
        assert!(client.endpoint_status()[0].is_healthy);

        handle.shutdown().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn oversized_interval_is_capped(client: Arc<OverpassClient<StubTransport>>) {
        let handle = spawn_health_checks(Arc::clone(&client), Duration::MAX);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!handle.is_finished());
        assert!(client.transport().calls().is_empty());

        handle.shutdown().await;
    }
}
