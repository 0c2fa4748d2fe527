use crate::ProbeError;
use craftwatch_models::MIN_TIMEOUT_MS;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;

/// Floor applied to every probe timeout
pub const MIN_PROBE_TIMEOUT: Duration = Duration::from_millis(MIN_TIMEOUT_MS);

/// Process-wide default used by handles that take no per-call timeout
static AMBIENT_TIMEOUT: Mutex<Option<Duration>> = parking_lot::const_mutex(None);

// Serializes override scopes so concurrent requests never interleave them
static OVERRIDE_SCOPE: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Converts a millisecond timeout into a probe duration, floored at 100ms
pub fn probe_timeout(timeout_ms: u64) -> Duration {
    Duration::from_millis(timeout_ms).max(MIN_PROBE_TIMEOUT)
}

/// Current ambient timeout, if an override is installed
pub fn ambient_timeout() -> Option<Duration> {
    *AMBIENT_TIMEOUT.lock()
}

/// Installs an ambient timeout for as long as the guard lives.
///
/// The previous value is restored on drop, whether the guarded call
/// succeeded, failed, or was cancelled.
pub struct AmbientTimeoutGuard {
    previous: Option<Duration>,
    _scope: tokio::sync::MutexGuard<'static, ()>,
}

impl AmbientTimeoutGuard {
    pub async fn install(timeout: Duration) -> Self {
        let scope = OVERRIDE_SCOPE.lock().await;
        let previous = AMBIENT_TIMEOUT.lock().replace(timeout);
        tracing::trace!(?timeout, ?previous, "ambient timeout installed");
        Self {
            previous,
            _scope: scope,
        }
    }
}

impl Drop for AmbientTimeoutGuard {
    fn drop(&mut self) {
        *AMBIENT_TIMEOUT.lock() = self.previous;
    }
}

/// Serializes tests that observe the process-wide ambient timeout
#[cfg(test)]
pub(crate) static TEST_SERIAL: Mutex<()> = parking_lot::const_mutex(());

/// Runs `call` with an explicit timeout, falling back to an ambient
/// override when the callee rejects the argument
pub(crate) async fn call_with_timeout<T, F, Fut>(
    timeout: Duration,
    call: F,
) -> Result<T, ProbeError>
where
    F: Fn(Option<Duration>) -> Fut,
    Fut: Future<Output = Result<T, ProbeError>>,
{
    match call(Some(timeout)).await {
        Err(ProbeError::TimeoutUnsupported) => {
            let _guard = AmbientTimeoutGuard::install(timeout).await;
            call(None).await
        }
        other => other,
    }
}
