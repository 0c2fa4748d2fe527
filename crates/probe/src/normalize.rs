use crate::motd::{clean, MotdSource};
use crate::response::{BedrockStatus, JavaStatus, StatusResponse, VersionInfo};
use craftwatch_models::Players;
use serde_json::Value;

/// Fields the dashboard displays, independent of the response shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedStatus {
    pub latency_ms: Option<f64>,
    pub players: Players,
    pub version_name: Option<String>,
    pub motd: Option<String>,
}

type Adapter = fn(&StatusResponse) -> Option<NormalizedStatus>;

// Tried in order; the first adapter that recognizes the shape wins
const ADAPTERS: &[Adapter] = &[from_java, from_bedrock, from_json];

pub fn normalize(response: &StatusResponse) -> NormalizedStatus {
    ADAPTERS
        .iter()
        .find_map(|adapter| adapter(response))
        .unwrap_or_default()
}

fn from_java(response: &StatusResponse) -> Option<NormalizedStatus> {
    let StatusResponse::Java(JavaStatus {
        version,
        players,
        description,
        latency_ms,
        ..
    }) = response
    else {
        return None;
    };

    Some(NormalizedStatus {
        latency_ms: *latency_ms,
        players: players
            .as_ref()
            .map(|p| Players { online: p.online, max: p.max })
            .unwrap_or_default(),
        version_name: version.as_ref().and_then(VersionInfo::display_name),
        motd: display_motd(description.as_ref()),
    })
}

fn from_bedrock(response: &StatusResponse) -> Option<NormalizedStatus> {
    let StatusResponse::Bedrock(BedrockStatus {
        players_online,
        players_max,
        version,
        motd,
        latency_ms,
        ..
    }) = response
    else {
        return None;
    };

    Some(NormalizedStatus {
        latency_ms: *latency_ms,
        players: Players {
            online: *players_online,
            max: *players_max,
        },
        version_name: version.as_ref().and_then(VersionInfo::display_name),
        motd: display_motd(motd.as_ref()),
    })
}

/// Reads loosely shaped payloads, trying the key names used by the
/// various status formats in the wild
fn from_json(response: &StatusResponse) -> Option<NormalizedStatus> {
    let StatusResponse::Json(value) = response else {
        return None;
    };

    let players = Players {
        online: first_int(
            value,
            &[&["players", "online"], &["players_online"], &["online_players"], &["online"]],
        ),
        max: first_int(
            value,
            &[&["players", "max"], &["players_max"], &["max_players"], &["max"]],
        ),
    };

    let version_name = ["version", "version_name"]
        .iter()
        .filter_map(|key| value.get(*key))
        .filter_map(|v| serde_json::from_value::<VersionInfo>(v.clone()).ok())
        .find_map(|v| v.display_name());

    let motd = ["description", "motd"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| MotdSource::from_value(v.clone()))
        .and_then(|source| display_motd(Some(&source)));

    Some(NormalizedStatus {
        latency_ms: response.latency_ms(),
        players,
        version_name,
        motd,
    })
}

fn first_int(value: &Value, paths: &[&[&str]]) -> Option<i64> {
    paths.iter().find_map(|path| {
        let found = path.iter().try_fold(value, |v, key| v.get(*key))?;
        match found {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    })
}

fn display_motd(source: Option<&MotdSource>) -> Option<String> {
    clean(source).filter(|m| !m.is_empty())
}
