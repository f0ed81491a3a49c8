//! GitHub release API: wire models and the capability trait the sync
//! workflow is written against.

mod client;

pub use client::{DEFAULT_BASE_URL, DEFAULT_UPLOAD_URL, GitHubClient};

use crate::error::GitHubApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Result type for raw API calls
pub type ApiResult<T> = std::result::Result<T, GitHubApiError>;

/// Repository identity (owner account and repository name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Owning user or organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl Repository {
    /// Create a repository identity
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A release record. Does not contain all fields.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Release {
    /// Release identifier
    pub id: u64,
    /// Tag the release is attached to
    pub tag_name: String,
    /// Web page of the release
    #[serde(default)]
    pub html_url: Option<String>,
    /// Whether the release is an unpublished draft
    #[serde(default)]
    pub draft: bool,
    /// Whether the release is marked as a prerelease
    #[serde(default)]
    pub prerelease: bool,
}

/// A release asset. Does not contain all fields.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Asset {
    /// Asset identifier, used for deletion
    pub id: u64,
    /// File name, used for matching against local artifacts
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// MIME type recorded by the service
    #[serde(default)]
    pub content_type: Option<String>,
    /// Public download link
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// Payload for creating a release
#[derive(Debug, Serialize)]
pub(crate) struct CreateRelease<'a> {
    pub tag_name: &'a str,
}

/// An upload request: the asset name plus the open file to stream
#[derive(Debug)]
pub struct AssetUpload {
    /// Asset name (the local file's basename)
    pub name: String,
    /// MIME type sent as `Content-Type`
    pub content_type: &'static str,
    /// Body length in bytes
    pub size: u64,
    /// Source file, consumed by the upload
    pub file: tokio::fs::File,
}

/// The five remote operations the sync workflow needs.
///
/// `GitHubClient` talks to the real service; tests provide in-memory fakes.
pub trait ReleaseApi {
    /// Look up the release for a tag. A missing release is `GitHubApiError::NotFound`.
    fn get_release_by_tag(
        &self,
        repo: &Repository,
        tag: &str,
    ) -> impl Future<Output = ApiResult<Release>>;

    /// Create a release for a tag
    fn create_release(
        &self,
        repo: &Repository,
        tag: &str,
    ) -> impl Future<Output = ApiResult<Release>>;

    /// List every asset attached to a release
    fn list_release_assets(
        &self,
        repo: &Repository,
        release_id: u64,
    ) -> impl Future<Output = ApiResult<Vec<Asset>>>;

    /// Delete an asset by its identifier
    fn delete_release_asset(
        &self,
        repo: &Repository,
        asset_id: u64,
    ) -> impl Future<Output = ApiResult<()>>;

    /// Upload a new asset to a release
    fn upload_release_asset(
        &self,
        repo: &Repository,
        release_id: u64,
        upload: AssetUpload,
    ) -> impl Future<Output = ApiResult<Asset>>;
}

/// Detect MIME type for an artifact from its file name
pub fn detect_content_type(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension {
        "deb" => "application/vnd.debian.binary-package",
        "rpm" => "application/x-rpm",
        "exe" | "msi" => "application/x-msdownload",
        "dmg" => "application/x-apple-diskimage",
        "AppImage" => "application/x-executable",
        "zip" => "application/zip",
        "tar" => "application/x-tar",
        "gz" | "tgz" => "application/gzip",
        "json" => "application/json",
        "txt" | "sha256" | "sha512" | "md5" | "asc" | "sig" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_content_type() {
        assert_eq!(detect_content_type("app.tar.gz"), "application/gzip");
        assert_eq!(detect_content_type("app.sha256"), "text/plain");
        assert_eq!(detect_content_type("kodegen_0.1.0_amd64.deb"), "application/vnd.debian.binary-package");
        assert_eq!(detect_content_type("Kodegen.AppImage"), "application/x-executable");
        assert_eq!(detect_content_type("LICENSE"), "application/octet-stream");
    }

    #[test]
    fn test_release_decodes_without_optional_fields() {
        let release: Release =
            serde_json::from_str(r#"{"id": 7, "tag_name": "v1.2.0"}"#).expect("valid release");
        assert_eq!(release.id, 7);
        assert_eq!(release.tag_name, "v1.2.0");
        assert!(release.html_url.is_none());
        assert!(!release.draft);
    }

    #[test]
    fn test_repository_display() {
        assert_eq!(Repository::new("cyrup-ai", "kodegen").to_string(), "cyrup-ai/kodegen");
    }
}
