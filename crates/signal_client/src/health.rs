//! Startup health check with a bounded timeout and cooperative cancellation.

use crate::rest::SignalRestClient;
use common::{Error, HealthState, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Probe upstream health, giving up after `timeout`.
///
/// Both the timeout and a fired `cancel` token drop the in-flight request,
/// so a late response can never surface after the caller has moved on. A
/// timeout is reported as a transport failure — the same display class as
/// an unreachable upstream.
pub async fn check_health(
    client: &SignalRestClient,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<HealthState> {
    with_deadline(client.health(), timeout, cancel).await
}

async fn with_deadline<F>(
    probe: F,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<HealthState>
where
    F: Future<Output = Result<HealthState>>,
{
    tokio::select! {
        _ = cancel.cancelled() => {
            debug!("health check cancelled before completion");
            Err(Error::Transport("health check cancelled".into()))
        }
        outcome = tokio::time::timeout(timeout, probe) => match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::Transport(format!(
                "health check timed out after {}s",
                timeout.as_secs()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> HealthState {
        HealthState {
            status: "ok".into(),
            server_time: None,
            version: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_probe_passes_through() {
        let cancel = CancellationToken::new();
        let state = with_deadline(
            async { Ok(healthy()) },
            Duration::from_secs(10),
            &cancel,
        )
        .await
        .unwrap();
        assert_eq!(state.status, "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_passes_through() {
        let cancel = CancellationToken::new();
        let outcome = with_deadline(
            async { Err(Error::Transport("connection refused".into())) },
            Duration::from_secs(10),
            &cancel,
        )
        .await;
        assert!(matches!(outcome, Err(Error::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_probe_times_out_as_transport_failure() {
        let cancel = CancellationToken::new();
        let outcome = with_deadline(
            std::future::pending::<Result<HealthState>>(),
            Duration::from_secs(10),
            &cancel,
        )
        .await;
        match outcome {
            Err(Error::Transport(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected transport failure, got {:?}", other.err()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_suppresses_late_result() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        // Even a probe that would hang forever returns immediately once the
        // token has fired, and no health state leaks out.
        let outcome = with_deadline(
            std::future::pending::<Result<HealthState>>(),
            Duration::from_secs(10),
            &cancel,
        )
        .await;
        match outcome {
            Err(Error::Transport(msg)) => assert!(msg.contains("cancelled")),
            other => panic!("expected cancellation, got {:?}", other.err()),
        }
    }
}
