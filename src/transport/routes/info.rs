use axum::response::Json;
use serde::Serialize;

use crate::common::banner::BuildInfo;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
  pub version: String,
  pub build_time: u64,
  pub git: GitInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
  pub branch: String,
  pub commit: String,
  pub commit_time: u64,
}

impl From<&BuildInfo> for VersionInfo {
  fn from(info: &BuildInfo) -> Self {
    Self {
      version: info.version.to_string(),
      build_time: info.build_time,
      git: GitInfo {
        branch: info.branch.to_string(),
        commit: info.commit.to_string(),
        commit_time: info.commit_time,
      },
    }
  }
}

/// GET /version
pub async fn get_version() -> Json<VersionInfo> {
  tracing::debug!("GET /version");
  Json(VersionInfo::from(&BuildInfo::default()))
}
