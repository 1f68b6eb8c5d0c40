use std::time::Duration;

use reqwest::{RequestBuilder, header};
use serde_json::{Value, json};

use crate::{
    common::http::HttpClient, configs::YouTubeConfig, sources::ProviderError,
    sources::youtube::VideoId,
};

/// InnerTube API base endpoint.
pub const INNERTUBE_API: &str = "https://youtubei.googleapis.com";

// ANDROID_VR receives plain stream URLs, so no signature deciphering is needed.
const CLIENT_NAME: &str = "ANDROID_VR";
const CLIENT_ID: &str = "28";
const CLIENT_VERSION: &str = "1.61.48";
const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8 Pro Build/UQ1A.240205.002; wv) \
     AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 \
     Chrome/121.0.6167.164 Mobile Safari/537.36 YouTubeVR/1.61.48 (gzip)";

pub struct InnerTubeClient {
    http: reqwest::Client,
    consent_cookie: String,
    /// Sent on media downloads; the player call always identifies as ANDROID_VR.
    media_user_agent: String,
    timeout: Duration,
}

impl InnerTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: HttpClient::new(config)?,
            consent_cookie: config.consent_cookie.clone(),
            media_user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| USER_AGENT.to_string()),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn build_context(&self) -> Value {
        json!({
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
                "userAgent": USER_AGENT,
                "androidSdkVersion": 34,
                "deviceMake": "Google",
                "deviceModel": "Pixel 8 Pro",
                "osName": "Android",
                "osVersion": "14",
                "hl": "en",
                "gl": "US"
            },
            "user": { "lockedSafetyMode": false },
            "request": { "useSsl": true }
        })
    }

    fn player_request(&self, video_id: &VideoId) -> RequestBuilder {
        let body = json!({
            "context": self.build_context(),
            "videoId": video_id.0.as_str(),
            "contentCheckOk": true,
            "racyCheckOk": true
        });

        self.http
            .post(format!("{}/youtubei/v1/player?prettyPrint=false", INNERTUBE_API))
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &self.consent_cookie)
            .header("X-YouTube-Client-Name", CLIENT_ID)
            .header("X-YouTube-Client-Version", CLIENT_VERSION)
            .timeout(self.timeout)
            .json(&body)
    }

    fn media_request(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .header(header::USER_AGENT, &self.media_user_agent)
            .header(header::COOKIE, &self.consent_cookie)
    }

    /// Calls the `player` endpoint and returns the raw JSON body.
    pub async fn player(&self, video_id: &VideoId) -> Result<Value, ProviderError> {
        tracing::debug!("InnerTube player request for {} via {}", video_id, CLIENT_NAME);
        let res = self.player_request(video_id).send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!("InnerTube player request for {} returned {}", video_id, status);
            return Err(ProviderError::Status(status.as_u16()));
        }

        Ok(res.json().await?)
    }

    /// Starts a media download; the body is left unread for streaming.
    pub async fn media(&self, url: &str) -> Result<reqwest::Response, ProviderError> {
        let res = self.media_request(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        Ok(res)
    }
}
