use crate::banners::MOTD;
use serde::Deserialize;

/// Host-supplied settings. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub user: String,
    pub host: String,
    pub home: String,
    /// First line of every new session.
    pub motd: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        SandboxConfig {
            user: "sandbox".into(),
            host: "android".into(),
            home: "/home/sandbox".into(),
            motd: MOTD.into(),
        }
    }
}

impl SandboxConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
