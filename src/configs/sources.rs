use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Upper bound for a single metadata (player) request.
    pub timeout_secs: u64,
    /// User agent for media downloads; defaults to the InnerTube client's own.
    pub user_agent: Option<String>,
    /// Sent as the `Cookie` header to skip the EU consent interstitial.
    pub consent_cookie: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: None,
            consent_cookie: "CONSENT=YES+1".to_string(),
        }
    }
}
