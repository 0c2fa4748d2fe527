use crate::MotdSource;
use serde::Deserialize;
use serde_json::Value;

/// Response returned by a [`ServerHandle`](crate::ServerHandle).
///
/// Different status-query implementations hand back differently shaped
/// payloads; `normalize` knows how to read each of them.
#[derive(Debug, Clone)]
pub enum StatusResponse {
    Java(JavaStatus),
    Bedrock(BedrockStatus),
    /// Loosely shaped payload (third-party APIs, older query formats)
    Json(Value),
}

/// Java Server List Ping status document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JavaStatus {
    #[serde(default)]
    pub version: Option<VersionInfo>,
    #[serde(default)]
    pub players: Option<JavaPlayers>,
    #[serde(default)]
    pub description: Option<MotdSource>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(skip)]
    pub latency_ms: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JavaPlayers {
    #[serde(default)]
    pub online: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

/// Bedrock unconnected pong advertisement
#[derive(Debug, Clone, Default)]
pub struct BedrockStatus {
    pub players_online: Option<i64>,
    pub players_max: Option<i64>,
    pub version: Option<VersionInfo>,
    pub motd: Option<MotdSource>,
    pub map_name: Option<String>,
    pub gamemode: Option<String>,
    pub latency_ms: Option<f64>,
}

/// Version as reported by the server: a `{name, protocol}` object, a bare
/// string, or anything else
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VersionInfo {
    Named {
        name: String,
        /// Any JSON value; a malformed protocol must not hide the name
        #[serde(default)]
        protocol: Option<Value>,
    },
    Text(String),
    Other(Value),
}

impl VersionInfo {
    /// Display name, falling back to the string form of the value
    pub fn display_name(&self) -> Option<String> {
        match self {
            VersionInfo::Named { name, protocol } => {
                if !name.trim().is_empty() {
                    Some(name.clone())
                } else {
                    protocol.as_ref().and_then(protocol_label)
                }
            }
            VersionInfo::Text(text) => Some(text.clone()).filter(|t| !t.trim().is_empty()),
            VersionInfo::Other(Value::Null) => None,
            VersionInfo::Other(value) => Some(value.to_string()),
        }
    }
}

fn protocol_label(protocol: &Value) -> Option<String> {
    match protocol {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(format!("protocol {}", s.trim())),
        other => Some(format!("protocol {}", other)),
    }
}

impl StatusResponse {
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            StatusResponse::Java(status) => status.latency_ms,
            StatusResponse::Bedrock(status) => status.latency_ms,
            StatusResponse::Json(value) => ["latency", "latency_ms", "ping"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_f64)),
        }
    }
}
