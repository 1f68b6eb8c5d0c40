use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{audio::TranscodeError, sources::ProviderError, sources::youtube::InvalidUrl};

/// JSON error body returned by the download endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Everything a request handler can fail with.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A required request parameter was absent or empty.
    #[error("{0}")]
    MissingParams(&'static str),

    /// The URL matched none of the recognized YouTube shapes.
    #[error("Invalid YouTube URL format")]
    InvalidUrl,

    /// The URL had a recognizable shape but the provider refused it.
    #[error("Invalid YouTube URL")]
    RejectedUrl,

    #[error("Format not found")]
    FormatNotFound,

    #[error("{context}: {source}")]
    Provider {
        context: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("Audio conversion failed: {0}")]
    Transcode(#[from] TranscodeError),
}

impl DownloadError {
    pub fn provider(context: &'static str, source: ProviderError) -> Self {
        Self::Provider { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParams(_) | Self::InvalidUrl | Self::RejectedUrl => StatusCode::BAD_REQUEST,
            Self::FormatNotFound => StatusCode::NOT_FOUND,
            Self::Provider { .. } | Self::Transcode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Provider { context, source } => ErrorBody::with_details(*context, source.to_string()),
            Self::Transcode(e) => ErrorBody::with_details("Audio conversion failed", e.to_string()),
            other => ErrorBody::new(other.to_string()),
        }
    }
}

impl From<InvalidUrl> for DownloadError {
    fn from(_: InvalidUrl) -> Self {
        Self::InvalidUrl
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DownloadError::InvalidUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(DownloadError::RejectedUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            DownloadError::MissingParams("Missing URL or itag").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(DownloadError::FormatNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            DownloadError::provider("Download failed", ProviderError::Malformed("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_not_found_body() {
        let body = serde_json::to_value(DownloadError::FormatNotFound.body()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Format not found" }));
    }

    #[test]
    fn test_provider_failure_surfaces_details() {
        let err = DownloadError::provider(
            "Failed to process video",
            ProviderError::Malformed("missing videoDetails".into()),
        );
        let body = err.body();
        assert_eq!(body.error, "Failed to process video");
        assert!(body.details.unwrap().contains("missing videoDetails"));
    }
}
