use std::time::Duration;

use reqwest::{Client, Error};

use crate::configs::YouTubeConfig;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

pub struct HttpClient;

impl HttpClient {
  pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
  }

  /// Builds the shared client used for both metadata and media requests.
  /// Only the connect phase is bounded; metadata calls set their own timeout.
  pub fn new(config: &YouTubeConfig) -> Result<Client, Error> {
    let user_agent = config
      .user_agent
      .clone()
      .unwrap_or_else(Self::default_user_agent);

    Client::builder()
      .user_agent(user_agent)
      .connect_timeout(Duration::from_secs(config.timeout_secs))
      .build()
  }
}
