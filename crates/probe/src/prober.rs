use crate::backend::{ServerHandle, StatusBackend};
use crate::normalize::normalize;
use crate::response::StatusResponse;
use crate::timeout::{call_with_timeout, MIN_PROBE_TIMEOUT};
use crate::ProbeError;
use craftwatch_models::{ServerTarget, StatusResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

const DEFAULT_DEADLINE_SLACK: Duration = Duration::from_millis(250);

/// Runs one status check per call and folds every failure into
/// [`StatusResult::Down`]
#[derive(Clone)]
pub struct Prober {
    backend: Arc<dyn StatusBackend>,
    deadline_slack: Duration,
}

impl Prober {
    pub fn new(backend: Arc<dyn StatusBackend>) -> Self {
        Self {
            backend,
            deadline_slack: DEFAULT_DEADLINE_SLACK,
        }
    }

    /// Extra time allowed on top of the probe timeout before giving up
    pub fn with_deadline_slack(mut self, slack: Duration) -> Self {
        self.deadline_slack = slack;
        self
    }

    pub async fn probe(&self, target: &ServerTarget, timeout: Duration) -> StatusResult {
        let timeout = timeout.max(MIN_PROBE_TIMEOUT);
        let deadline = Instant::now() + timeout + self.deadline_slack;
        tracing::debug!(server = %target, ?timeout, "probing server");

        let (handle, response) = match timeout_at(deadline, self.query(target, timeout)).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                tracing::debug!(server = %target, error = %e, "status query failed");
                return StatusResult::down(e.to_string());
            }
            Err(_) => return StatusResult::down(ProbeError::Timeout(timeout).to_string()),
        };

        let mut status = normalize(&response);

        if status.latency_ms.is_none() {
            // Latency is best effort: ping failures leave it unknown
            status.latency_ms =
                match timeout_at(deadline, call_with_timeout(timeout, |t| handle.ping(t))).await {
                    Ok(Ok(ms)) => Some(ms),
                    Ok(Err(e)) => {
                        tracing::debug!(server = %target, error = %e, "secondary ping failed");
                        None
                    }
                    Err(_) => None,
                };
        }

        StatusResult::up(
            target.edition,
            status.latency_ms,
            status.players,
            status.version_name,
            status.motd,
        )
    }

    async fn query(
        &self,
        target: &ServerTarget,
        timeout: Duration,
    ) -> Result<(Box<dyn ServerHandle>, StatusResponse), ProbeError> {
        let handle = self.backend.lookup(target.edition, &target.address()).await?;
        let response = call_with_timeout(timeout, |t| handle.status(t)).await?;
        Ok((handle, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{JavaPlayers, JavaStatus};
    use crate::timeout::{ambient_timeout, TEST_SERIAL};
    use crate::MotdSource;
    use craftwatch_models::{Edition, Players, TargetDefaults};
    use std::time::Instant as StdInstant;

    /// Scripted handle: how it reacts to timeouts and what it returns
    #[derive(Clone)]
    struct FakeHandle {
        accepts_timeout: bool,
        status_latency: Option<f64>,
        status_error: Option<&'static str>,
        ping: Result<f64, &'static str>,
        hang: bool,
    }

    impl Default for FakeHandle {
        fn default() -> Self {
            Self {
                accepts_timeout: true,
                status_latency: Some(20.0),
                status_error: None,
                ping: Ok(7.0),
                hang: false,
            }
        }
    }

    impl FakeHandle {
        fn effective_timeout(&self, timeout: Option<Duration>) -> Result<Duration, ProbeError> {
            match (self.accepts_timeout, timeout) {
                (false, Some(_)) => Err(ProbeError::TimeoutUnsupported),
                (true, Some(t)) => Ok(t),
                (_, None) => Ok(ambient_timeout().unwrap_or(Duration::from_secs(3600))),
            }
        }

        // Sleeps past the timeout like an unresponsive server would
        async fn maybe_hang(&self, timeout: Duration) -> Result<(), ProbeError> {
            if self.hang {
                tokio::time::sleep(timeout).await;
                return Err(ProbeError::Timeout(timeout));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl ServerHandle for FakeHandle {
        async fn status(&self, timeout: Option<Duration>) -> Result<StatusResponse, ProbeError> {
            let timeout = self.effective_timeout(timeout)?;
            self.maybe_hang(timeout).await?;
            if let Some(error) = self.status_error {
                return Err(ProbeError::Protocol(error.to_string()));
            }
            Ok(StatusResponse::Java(JavaStatus {
                players: Some(JavaPlayers { online: Some(4), max: Some(20) }),
                description: Some(MotdSource::from("§aHello §lWorld")),
                latency_ms: self.status_latency,
                ..Default::default()
            }))
        }

        async fn ping(&self, timeout: Option<Duration>) -> Result<f64, ProbeError> {
            self.effective_timeout(timeout)?;
            self.ping.map_err(|e| ProbeError::Protocol(e.to_string()))
        }
    }

    struct FakeBackend {
        handle: FakeHandle,
        lookup_error: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl StatusBackend for FakeBackend {
        async fn lookup(
            &self,
            _edition: Edition,
            address: &str,
        ) -> Result<Box<dyn ServerHandle>, ProbeError> {
            assert!(address.contains(':'));
            match self.lookup_error {
                Some(error) => Err(ProbeError::Resolve(error.to_string())),
                None => Ok(Box::new(self.handle.clone())),
            }
        }
    }

    fn prober(handle: FakeHandle) -> Prober {
        Prober::new(Arc::new(FakeBackend { handle, lookup_error: None }))
    }

    fn target() -> ServerTarget {
        ServerTarget::default_for(&TargetDefaults::new("mc.example.org", Edition::Java))
    }

    #[tokio::test]
    async fn test_up_result_carries_normalized_fields() {
        let result = prober(FakeHandle::default())
            .probe(&target(), Duration::from_millis(500))
            .await;

        match result {
            StatusResult::Up { edition, latency_ms, players, motd, version_name, .. } => {
                assert_eq!(edition, Edition::Java);
                assert_eq!(latency_ms, Some(20.0));
                assert_eq!(players, Players { online: Some(4), max: Some(20) });
                assert_eq!(motd.as_deref(), Some("Hello World"));
                assert_eq!(version_name, None);
            }
            other => panic!("expected up, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_latency_uses_ping() {
        let handle = FakeHandle {
            status_latency: None,
            ping: Ok(7.0),
            ..Default::default()
        };
        let result = prober(handle).probe(&target(), Duration::from_millis(500)).await;
        assert!(result.is_up());
        assert_eq!(result.latency_ms(), Some(7.0));
    }

    #[tokio::test]
    async fn test_failed_ping_leaves_latency_unknown() {
        let handle = FakeHandle {
            status_latency: None,
            ping: Err("pong mismatch"),
            ..Default::default()
        };
        let result = prober(handle).probe(&target(), Duration::from_millis(500)).await;
        assert!(result.is_up());
        assert_eq!(result.latency_ms(), None);
    }

    #[tokio::test]
    async fn test_status_error_is_down() {
        let handle = FakeHandle {
            status_error: Some("connection refused"),
            ..Default::default()
        };
        let result = prober(handle).probe(&target(), Duration::from_millis(500)).await;
        assert!(!result.is_up());
        assert!(result.error().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_lookup_error_is_down() {
        let prober = Prober::new(Arc::new(FakeBackend {
            handle: FakeHandle::default(),
            lookup_error: Some("nx.example.org"),
        }));
        let result = prober.probe(&target(), Duration::from_millis(500)).await;
        let error = result.error().unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("nx.example.org"));
    }

    #[tokio::test]
    async fn test_timeout_rejecting_handle_uses_ambient_override() {
        let _serial = TEST_SERIAL.lock();
        let handle = FakeHandle {
            accepts_timeout: false,
            status_latency: None,
            ..Default::default()
        };

        let result = prober(handle).probe(&target(), Duration::from_millis(500)).await;

        assert!(result.is_up());
        assert_eq!(result.latency_ms(), Some(7.0));
        assert_eq!(ambient_timeout(), None);
    }

    #[tokio::test]
    async fn test_hanging_server_respects_timeout() {
        let _serial = TEST_SERIAL.lock();
        for accepts_timeout in [true, false] {
            let handle = FakeHandle {
                accepts_timeout,
                hang: true,
                ..Default::default()
            };

            let started = StdInstant::now();
            let result = prober(handle).probe(&target(), Duration::from_millis(150)).await;
            let elapsed = started.elapsed();

            assert!(!result.is_up());
            assert!(elapsed < Duration::from_millis(1000), "took {:?}", elapsed);
            assert_eq!(ambient_timeout(), None);
        }
    }

    #[tokio::test]
    async fn test_outer_deadline_bounds_unbounded_handles() {
        let _serial = TEST_SERIAL.lock();
        // Ignores the timeout entirely and sleeps for an hour
        struct Stuck;

        #[async_trait::async_trait]
        impl ServerHandle for Stuck {
            async fn status(
                &self,
                _timeout: Option<Duration>,
            ) -> Result<StatusResponse, ProbeError> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProbeError::Protocol("unreachable".to_string()))
            }

            async fn ping(&self, _timeout: Option<Duration>) -> Result<f64, ProbeError> {
                Ok(1.0)
            }
        }

        struct StuckBackend;

        #[async_trait::async_trait]
        impl StatusBackend for StuckBackend {
            async fn lookup(
                &self,
                _edition: Edition,
                _address: &str,
            ) -> Result<Box<dyn ServerHandle>, ProbeError> {
                Ok(Box::new(Stuck))
            }
        }

        let prober =
            Prober::new(Arc::new(StuckBackend)).with_deadline_slack(Duration::from_millis(50));
        let started = StdInstant::now();
        let result = prober.probe(&target(), Duration::from_millis(100)).await;

        assert_eq!(result.error(), Some("timed out after 100ms"));
        assert!(started.elapsed() < Duration::from_millis(1000));
    }
}
