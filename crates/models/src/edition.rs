use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_JAVA_PORT: u16 = 25565;
pub const DEFAULT_BEDROCK_PORT: u16 = 19132;

/// Minecraft protocol family of the probed server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Java,
    Bedrock,
}

impl Edition {
    pub fn default_port(self) -> u16 {
        match self {
            Edition::Java => DEFAULT_JAVA_PORT,
            Edition::Bedrock => DEFAULT_BEDROCK_PORT,
        }
    }

    /// Transport used by the status query ("TCP" or "UDP")
    pub fn transport(self) -> &'static str {
        match self {
            Edition::Java => "TCP",
            Edition::Bedrock => "UDP",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Edition::Java => "java",
            Edition::Bedrock => "bedrock",
        }
    }

    /// Human-facing label used by the dashboard
    pub fn label(self) -> &'static str {
        match self {
            Edition::Java => "Java",
            Edition::Bedrock => "Bedrock",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "java" => Ok(Edition::Java),
            "bedrock" => Ok(Edition::Bedrock),
            other => Err(format!("unknown edition '{}'", other)),
        }
    }
}
