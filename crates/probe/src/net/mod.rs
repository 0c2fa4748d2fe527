//! Built-in status query over the network: Server List Ping for Java,
//! RakNet unconnected ping for Bedrock.

mod bedrock;
mod codec;
mod java;

pub use bedrock::BedrockHandle;
pub use java::JavaHandle;

use crate::timeout::ambient_timeout;
use crate::{ProbeError, ServerHandle, StatusBackend};
use craftwatch_models::Edition;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Used when neither the caller nor an ambient override sets a timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkBackend;

impl NetworkBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl StatusBackend for NetworkBackend {
    async fn lookup(
        &self,
        edition: Edition,
        address: &str,
    ) -> Result<Box<dyn ServerHandle>, ProbeError> {
        let (host, port) = parse_address(address, edition.default_port())?;
        Ok(match edition {
            Edition::Java => Box::new(JavaHandle::new(host, port)),
            Edition::Bedrock => Box::new(BedrockHandle::new(host, port)),
        })
    }
}

/// Splits `host`, `host:port`, `[v6]` or `[v6]:port`
pub fn parse_address(address: &str, default_port: u16) -> Result<(String, u16), ProbeError> {
    let address = address.trim();
    let invalid = || ProbeError::InvalidAddress(address.to_string());

    let (host, port) = if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        match tail {
            "" => (host, None),
            _ => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
        }
    } else {
        match address.rsplit_once(':') {
            // More than one colon without brackets: bare IPv6 literal
            Some((host, _)) if host.contains(':') => (address, None),
            Some((host, port)) => (host, Some(port)),
            None => (address, None),
        }
    };

    if host.is_empty() {
        return Err(invalid());
    }

    let port = match port {
        Some(p) => p.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(invalid)?,
        None => default_port,
    };

    Ok((host.to_string(), port))
}

pub(crate) async fn resolve(host: &str, port: u16) -> Result<SocketAddr, ProbeError> {
    let mut addrs = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| ProbeError::Resolve(format!("{}: {}", host, e)))?;
    addrs.next().ok_or_else(|| ProbeError::Resolve(host.to_string()))
}

pub(crate) fn effective_timeout(timeout: Option<Duration>) -> Duration {
    timeout.or_else(ambient_timeout).unwrap_or(DEFAULT_TIMEOUT)
}

pub(crate) fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
