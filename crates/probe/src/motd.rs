use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// §x§R§R§G§G§B§B extended colors must go before the single-code pass
static HEX_COLOR_SEQ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"§x(?:§[0-9a-fA-F]){6}").expect("valid hex color pattern"));
static LEGACY_CODE_SEQ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[§&][0-9a-fk-orA-FK-OR]").expect("valid legacy code pattern"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Raw message-of-the-day as returned by a status query
#[derive(Debug, Clone, PartialEq)]
pub enum MotdSource {
    Plain(String),
    Rich(RichText),
}

/// Structured MOTD: a chat component or a pre-processed payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichText {
    /// Already stripped of formatting by the producer
    pub clean: Option<String>,
    /// Plain text with formatting codes possibly still embedded
    pub text: Option<String>,
    pub raw: Option<Value>,
}

impl RichText {
    /// Best textual rendering: `clean`, then `text`, then the raw value
    fn best_text(&self) -> Option<String> {
        if let Some(clean) = self.clean.as_deref().filter(|c| !c.is_empty()) {
            return Some(clean.to_string());
        }
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        match self.raw.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => serde_json::to_string(other).ok(),
        }
    }
}

impl MotdSource {
    /// Interprets a JSON MOTD: plain strings, chat components, or objects
    /// carrying `clean`/`text` keys
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(MotdSource::Plain(s)),
            other => {
                let clean = other.get("clean").and_then(joined_text);
                let text = flatten_component(&other);
                Some(MotdSource::Rich(RichText {
                    clean,
                    text,
                    raw: Some(other),
                }))
            }
        }
    }
}

impl From<&str> for MotdSource {
    fn from(s: &str) -> Self {
        MotdSource::Plain(s.to_string())
    }
}

impl From<String> for MotdSource {
    fn from(s: String) -> Self {
        MotdSource::Plain(s)
    }
}

impl<'de> Deserialize<'de> for MotdSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        MotdSource::from_value(value).ok_or_else(|| serde::de::Error::custom("empty MOTD"))
    }
}

/// Concatenates chat component text (`text` followed by `extra` children)
fn flatten_component(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(parts) => Some(parts.iter().filter_map(flatten_component).collect()),
        Value::Object(map) => {
            let is_component = map.contains_key("text") || map.contains_key("extra");
            if map.contains_key("clean") && !is_component {
                // Pre-processed payload, not a chat component
                return map.get("raw").and_then(flatten_component);
            }
            let head = map
                .get("text")
                .and_then(flatten_component)
                .or_else(|| map.get("translate").and_then(Value::as_str).map(str::to_string));
            let extra = map.get("extra").and_then(flatten_component);

            // Neither text nor children: not a chat component
            match (head, extra) {
                (None, None) => None,
                (head, extra) => {
                    let mut out = head.unwrap_or_default();
                    out.push_str(extra.as_deref().unwrap_or_default());
                    Some(out)
                }
            }
        }
    }
}

/// `clean` may be a single string or one string per MOTD line
fn joined_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(lines) => Some(
            lines
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => None,
    }
}

/// Removes legacy formatting codes and collapses whitespace
pub fn strip_codes(s: &str) -> String {
    let s = HEX_COLOR_SEQ.replace_all(s, "");
    let s = LEGACY_CODE_SEQ.replace_all(&s, "");
    WHITESPACE_RUN.replace_all(&s, " ").trim().to_string()
}

/// Plain-text MOTD for display, or `None` when there is nothing to show
pub fn clean(raw: Option<&MotdSource>) -> Option<String> {
    let text = match raw? {
        MotdSource::Plain(s) => s.clone(),
        MotdSource::Rich(rich) => rich.best_text()?,
    };
    Some(strip_codes(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_none() {
        assert_eq!(clean(None), None);
    }

    #[test]
    fn test_strips_legacy_codes() {
        let motd = MotdSource::from("§4Hello §lWorld§r");
        assert_eq!(clean(Some(&motd)), Some("Hello World".to_string()));
    }

    #[test]
    fn test_strips_hex_sequence() {
        let motd = MotdSource::from("§x§1§2§3§4§5§6Fancy");
        assert_eq!(clean(Some(&motd)), Some("Fancy".to_string()));
    }

    #[test]
    fn test_strips_ampersand_codes_case_insensitive() {
        assert_eq!(strip_codes("&aGreen &LBold &Rreset"), "Green Bold reset");
        assert_eq!(strip_codes("§AUpper§Kmagic"), "Uppermagic");
    }

    #[test]
    fn test_keeps_non_code_characters() {
        // 'g' and 'z' are not formatting codes
        assert_eq!(strip_codes("&g and §z stay"), "&g and §z stay");
        assert_eq!(strip_codes("Tom & Jerry"), "Tom & Jerry");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(strip_codes("  §6A   Survival\n§7Server  "), "A Survival Server");
    }

    #[test]
    fn test_prefers_clean_attribute() {
        let motd = MotdSource::Rich(RichText {
            clean: Some("Already clean".to_string()),
            text: Some("§aAlready §bclean".to_string()),
            raw: None,
        });
        assert_eq!(clean(Some(&motd)), Some("Already clean".to_string()));
    }

    #[test]
    fn test_empty_clean_falls_back_to_text() {
        let motd = MotdSource::Rich(RichText {
            clean: Some(String::new()),
            text: Some("§aFrom text".to_string()),
            raw: None,
        });
        assert_eq!(clean(Some(&motd)), Some("From text".to_string()));
    }

    #[test]
    fn test_falls_back_to_raw_value() {
        let motd = MotdSource::Rich(RichText {
            clean: None,
            text: None,
            raw: Some(json!(42)),
        });
        assert_eq!(clean(Some(&motd)), Some("42".to_string()));

        let empty = MotdSource::Rich(RichText::default());
        assert_eq!(clean(Some(&empty)), None);
    }

    #[test]
    fn test_chat_component_is_flattened() {
        let motd = MotdSource::from_value(json!({
            "text": "",
            "extra": [
                {"text": "A ", "color": "gold"},
                {"text": "§lMinecraft", "bold": true},
                " Server"
            ]
        }))
        .unwrap();
        assert_eq!(clean(Some(&motd)), Some("A Minecraft Server".to_string()));
    }

    #[test]
    fn test_unknown_object_uses_string_form() {
        let motd = MotdSource::from_value(json!({"color": "red"})).unwrap();
        assert_eq!(
            motd,
            MotdSource::Rich(RichText {
                clean: None,
                text: None,
                raw: Some(json!({"color": "red"})),
            })
        );
        assert_eq!(clean(Some(&motd)), Some(r#"{"color":"red"}"#.to_string()));
    }

    #[test]
    fn test_empty_text_component_stays_empty() {
        let motd = MotdSource::from_value(json!({"text": ""})).unwrap();
        assert_eq!(clean(Some(&motd)), Some(String::new()));
    }

    #[test]
    fn test_clean_lines_are_joined() {
        let motd = MotdSource::from_value(json!({
            "raw": ["§aLine one", "§bLine two"],
            "clean": ["Line one", "Line two"]
        }))
        .unwrap();
        assert_eq!(clean(Some(&motd)), Some("Line one Line two".to_string()));
    }
}
