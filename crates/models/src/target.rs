use crate::Edition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preset values the dashboard falls back to and resets to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDefaults {
    pub host: String,
    pub edition: Edition,
}

impl TargetDefaults {
    pub fn new(host: impl Into<String>, edition: Edition) -> Self {
        Self {
            host: host.into(),
            edition,
        }
    }

    pub fn port(&self) -> u16 {
        self.edition.default_port()
    }
}

/// The server being probed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTarget {
    pub host: String,
    pub port: u16,
    pub edition: Edition,
}

impl ServerTarget {
    pub fn default_for(defaults: &TargetDefaults) -> Self {
        Self {
            host: defaults.host.clone(),
            port: defaults.port(),
            edition: defaults.edition,
        }
    }

    /// Builds a target from raw form input.
    ///
    /// Blank hosts fall back to the default host. Ports that are blank,
    /// non-numeric, zero or above 65535 fall back to the default port of
    /// the selected edition.
    pub fn from_input(
        host: Option<&str>,
        port: Option<&str>,
        edition: Edition,
        defaults: &TargetDefaults,
    ) -> Self {
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(&defaults.host)
            .to_string();

        Self {
            host,
            port: coerce_port(port, edition),
            edition,
        }
    }

    /// Overwrites every field with the presets
    pub fn reset(&mut self, defaults: &TargetDefaults) {
        *self = Self::default_for(defaults);
    }

    /// Address handed to the status query: `host:port`
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // Bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for ServerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.edition, self.host, self.port)
    }
}

fn coerce_port(raw: Option<&str>, edition: Edition) -> u16 {
    let parsed = raw
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .and_then(|p| {
            // Number inputs may submit "25565.0"
            p.parse::<i64>()
                .ok()
                .or_else(|| {
                    p.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
        });

    match parsed {
        Some(port) if (1..=i64::from(u16::MAX)).contains(&port) => port as u16,
        _ => edition.default_port(),
    }
}
