use crate::Edition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Players {
    pub online: Option<i64>,
    pub max: Option<i64>,
}

/// Outcome of a single status check.
///
/// Serialized with an `up` flag so API consumers can branch without
/// inspecting the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusResult {
    Up {
        up: UpFlag,
        edition: Edition,
        latency_ms: Option<f64>,
        players: Players,
        version_name: Option<String>,
        motd: Option<String>,
    },
    Down {
        up: DownFlag,
        error: String,
    },
}

/// Serializes as `true`; only deserializes from `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpFlag;

/// Serializes as `false`; only deserializes from `false`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownFlag;

macro_rules! bool_flag {
    ($ty:ident, $value:expr) => {
        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bool($value)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if bool::deserialize(deserializer)? == $value {
                    Ok($ty)
                } else {
                    Err(serde::de::Error::custom(concat!("expected up = ", stringify!($value))))
                }
            }
        }
    };
}

bool_flag!(UpFlag, true);
bool_flag!(DownFlag, false);

impl StatusResult {
    pub fn up(
        edition: Edition,
        latency_ms: Option<f64>,
        players: Players,
        version_name: Option<String>,
        motd: Option<String>,
    ) -> Self {
        StatusResult::Up {
            up: UpFlag,
            edition,
            latency_ms,
            players,
            version_name,
            motd,
        }
    }

    pub fn down(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unreachable".to_string()
        } else {
            error
        };
        StatusResult::Down {
            up: DownFlag,
            error,
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, StatusResult::Up { .. })
    }

    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            StatusResult::Up { latency_ms, .. } => *latency_ms,
            StatusResult::Down { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StatusResult::Up { .. } => None,
            StatusResult::Down { error, .. } => Some(error),
        }
    }
}
