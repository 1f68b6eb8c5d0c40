use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid YouTube URL format")]
pub struct InvalidUrl;

/// Canonical YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Extracts the id from a `/shorts/<id>`, `youtu.be/<id>` or `youtube.com/...?v=<id>` URL.
    pub fn parse(url: &str) -> Result<Self, InvalidUrl> {
        let url = url.trim();

        let id = if let Some((_, rest)) = url.split_once("/shorts/") {
            path_segment(rest)
        } else if let Some((_, rest)) = url.split_once("youtu.be/") {
            path_segment(rest)
        } else if url.contains("youtube.com/") {
            let parsed = reqwest::Url::parse(url).map_err(|_| InvalidUrl)?;
            parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default()
        } else {
            return Err(InvalidUrl);
        };

        if id.is_empty() {
            return Err(InvalidUrl);
        }
        Ok(Self(id))
    }

    /// Whether the id has the 11-character shape YouTube assigns.
    pub fn is_well_formed(&self) -> bool {
        ID_PATTERN.is_match(&self.0)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

fn path_segment(rest: &str) -> String {
    rest.split(['?', '#']).next().unwrap_or_default().to_string()
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::ops::Deref for VideoId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
