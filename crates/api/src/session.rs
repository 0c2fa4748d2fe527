use crate::models::CheckForm;
use axum::http::{header, HeaderMap};
use craftwatch_config::DashboardSettings;
use craftwatch_models::{Edition, ServerTarget, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "craftwatch_session";

/// Per-browser dashboard state, carried in a session cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSession {
    pub target: ServerTarget,
    pub auto_refresh: bool,
    pub timeout_ms: u64,
}

impl DashboardSession {
    pub fn new(settings: &DashboardSettings) -> Self {
        Self {
            target: ServerTarget::default_for(&settings.target_defaults()),
            auto_refresh: settings.auto_refresh,
            timeout_ms: settings.timeout_ms,
        }
    }

    /// Restores the session from the request cookie, or starts a fresh one
    pub fn from_headers(headers: &HeaderMap, settings: &DashboardSettings) -> Self {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Self::decode(value, settings))
            .unwrap_or_else(|| Self::new(settings))
    }

    fn decode(value: &str, settings: &DashboardSettings) -> Option<Self> {
        let raw = hex::decode(value.trim()).ok()?;
        let session: DashboardSession = serde_json::from_slice(&raw).ok()?;

        // Cookies are client-controlled: run them through the same coercion as form input
        let port = session.target.port.to_string();
        Some(Self {
            target: ServerTarget::from_input(
                Some(&session.target.host),
                Some(&port),
                session.target.edition,
                &settings.target_defaults(),
            ),
            auto_refresh: session.auto_refresh,
            timeout_ms: session.timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS),
        })
    }

    pub fn encode(&self) -> String {
        // Serializing plain structs to JSON cannot fail
        hex::encode(serde_json::to_vec(self).unwrap_or_default())
    }

    /// `Set-Cookie` value; no expiry so it lives for the browser session
    pub fn cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.encode()
        )
    }

    /// Applies submitted form fields, coercing invalid input to defaults
    pub fn apply_form(&mut self, form: &CheckForm, settings: &DashboardSettings) {
        let edition = form
            .edition
            .as_deref()
            .and_then(|e| e.parse::<Edition>().ok())
            .unwrap_or(self.target.edition);

        self.target = ServerTarget::from_input(
            form.host.as_deref(),
            form.port.as_deref(),
            edition,
            &settings.target_defaults(),
        );
        self.auto_refresh = form.auto.is_some();

        if settings.timeout_control {
            self.timeout_ms =
                parse_timeout_ms(form.timeout_ms.as_deref()).unwrap_or(settings.timeout_ms);
        }
    }

    /// Overwrites host, port and edition with the configured presets
    pub fn reset(&mut self, settings: &DashboardSettings) {
        self.target.reset(&settings.target_defaults());
    }

    /// Timeout to probe with: the session's own value only when the UI exposes it
    pub fn effective_timeout_ms(&self, settings: &DashboardSettings) -> u64 {
        if settings.timeout_control {
            self.timeout_ms
        } else {
            settings.timeout_ms
        }
    }
}

/// Parses a timeout field, clamped to the accepted range
pub fn parse_timeout_ms(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse::<u64>().ok())
        .map(|t| t.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn settings() -> DashboardSettings {
        DashboardSettings {
            default_host: "xaprosmp.xyz".to_string(),
            default_edition: Edition::Java,
            timeout_ms: 2500,
            timeout_control: false,
            auto_refresh: true,
            refresh_interval_secs: 30,
        }
    }

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_new_session_uses_defaults() {
        let session = DashboardSession::from_headers(&HeaderMap::new(), &settings());
        assert_eq!(session.target.host, "xaprosmp.xyz");
        assert_eq!(session.target.port, 25565);
        assert!(session.auto_refresh);
    }

    #[test]
    fn test_cookie_restores_session() {
        let mut session = DashboardSession::new(&settings());
        session.target = ServerTarget {
            host: "bedrock.example.org".to_string(),
            port: 19133,
            edition: Edition::Bedrock,
        };
        session.auto_refresh = false;

        let headers = headers_with(&format!("theme=dark; {}={}", SESSION_COOKIE, session.encode()));
        assert_eq!(DashboardSession::from_headers(&headers, &settings()), session);
    }

    #[test]
    fn test_garbage_cookie_starts_fresh() {
        let headers = headers_with(&format!("{}=not-hex", SESSION_COOKIE));
        assert_eq!(
            DashboardSession::from_headers(&headers, &settings()),
            DashboardSession::new(&settings())
        );
    }

    #[test]
    fn test_tampered_cookie_is_coerced() {
        let forged = serde_json::json!({
            "target": {"host": "  ", "port": 0, "edition": "bedrock"},
            "auto_refresh": true,
            "timeout_ms": 1
        });
        let cookie = format!("{}={}", SESSION_COOKIE, hex::encode(forged.to_string()));

        let session = DashboardSession::from_headers(&headers_with(&cookie), &settings());
        assert_eq!(session.target.host, "xaprosmp.xyz");
        assert_eq!(session.target.port, 19132);
        assert_eq!(session.timeout_ms, MIN_TIMEOUT_MS);
    }

    #[test]
    fn test_apply_form_coerces_blank_port() {
        let mut session = DashboardSession::new(&settings());
        let form = CheckForm {
            edition: Some("Bedrock".to_string()),
            host: Some(" play.example.org ".to_string()),
            port: Some(String::new()),
            timeout_ms: Some("50".to_string()),
            auto: None,
        };

        session.apply_form(&form, &settings());

        assert_eq!(session.target.host, "play.example.org");
        assert_eq!(session.target.edition, Edition::Bedrock);
        assert_eq!(session.target.port, 19132);
        assert!(!session.auto_refresh);
        // Timeout field ignored while the control is hidden
        assert_eq!(session.timeout_ms, 2500);
    }

    #[test]
    fn test_apply_form_reads_timeout_when_exposed() {
        let mut settings = settings();
        settings.timeout_control = true;
        let mut session = DashboardSession::new(&settings);

        let form = CheckForm {
            timeout_ms: Some("50".to_string()),
            auto: Some("on".to_string()),
            ..Default::default()
        };
        session.apply_form(&form, &settings);

        assert_eq!(session.timeout_ms, MIN_TIMEOUT_MS);
        assert_eq!(session.effective_timeout_ms(&settings), MIN_TIMEOUT_MS);
        assert!(session.auto_refresh);
    }

    #[test]
    fn test_reset_restores_presets() {
        let mut session = DashboardSession::new(&settings());
        session.target = ServerTarget {
            host: "elsewhere.example".to_string(),
            port: 19133,
            edition: Edition::Bedrock,
        };
        session.auto_refresh = false;

        session.reset(&settings());

        assert_eq!(session.target, ServerTarget::default_for(&settings().target_defaults()));
        assert!(!session.auto_refresh);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = DashboardSession::new(&settings()).cookie();
        assert!(cookie.starts_with("craftwatch_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Max-Age"));
    }
}
