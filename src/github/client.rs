//! reqwest-backed implementation of [`ReleaseApi`].

use super::{ApiResult, Asset, AssetUpload, CreateRelease, Release, ReleaseApi, Repository};
use crate::error::GitHubApiError;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use url::Url;

/// Public GitHub metadata API root
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/";

/// Public GitHub upload API root
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.github.com/";

const API_VERSION: &str = "2022-11-28";

const ASSETS_PER_PAGE: usize = 100;

/// Error body returned by the API on failure
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the GitHub releases API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
    upload_url: Url,
}

impl GitHubClient {
    /// Create a client authenticated with `token`.
    ///
    /// `base_url` and `upload_url` are expected to be normalized (trailing slash).
    pub fn new(base_url: Url, upload_url: Url, token: &str) -> ApiResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GitHubApiError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            upload_url,
        })
    }
}

/// Append percent-encoded path segments to an API root
fn endpoint(root: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = root.clone();
    url.path_segments_mut()
        .map_err(|()| GitHubApiError::InvalidUrl(root.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map non-success responses to [`GitHubApiError`]
async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    if status == StatusCode::NOT_FOUND {
        return Err(GitHubApiError::NotFound { url });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(GitHubApiError::Status {
        status: status.as_u16(),
        url,
        message,
    })
}

impl ReleaseApi for GitHubClient {
    async fn get_release_by_tag(&self, repo: &Repository, tag: &str) -> ApiResult<Release> {
        let url = endpoint(
            &self.base_url,
            &["repos", &repo.owner, &repo.name, "releases", "tags", tag],
        )?;
        log::debug!("GET {url}");

        let response = check(self.http.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create_release(&self, repo: &Repository, tag: &str) -> ApiResult<Release> {
        let url = endpoint(&self.base_url, &["repos", &repo.owner, &repo.name, "releases"])?;
        log::debug!("POST {url} (tag_name={tag})");

        let response = check(
            self.http
                .post(url)
                .json(&CreateRelease { tag_name: tag })
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn list_release_assets(&self, repo: &Repository, release_id: u64) -> ApiResult<Vec<Asset>> {
        let id = release_id.to_string();
        let mut assets = Vec::new();
        let mut page = 1u32;

        loop {
            let mut url = endpoint(
                &self.base_url,
                &["repos", &repo.owner, &repo.name, "releases", &id, "assets"],
            )?;
            url.query_pairs_mut()
                .append_pair("per_page", &ASSETS_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            log::debug!("GET {url}");

            let batch: Vec<Asset> = check(self.http.get(url).send().await?).await?.json().await?;
            let last_page = batch.len() < ASSETS_PER_PAGE;
            assets.extend(batch);

            if last_page {
                break;
            }
            page += 1;
        }

        Ok(assets)
    }

    async fn delete_release_asset(&self, repo: &Repository, asset_id: u64) -> ApiResult<()> {
        let id = asset_id.to_string();
        let url = endpoint(
            &self.base_url,
            &["repos", &repo.owner, &repo.name, "releases", "assets", &id],
        )?;
        log::debug!("DELETE {url}");

        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn upload_release_asset(
        &self,
        repo: &Repository,
        release_id: u64,
        upload: AssetUpload,
    ) -> ApiResult<Asset> {
        let id = release_id.to_string();
        let mut url = endpoint(
            &self.upload_url,
            &["repos", &repo.owner, &repo.name, "releases", &id, "assets"],
        )?;
        url.query_pairs_mut().append_pair("name", &upload.name);
        log::debug!("POST {url} ({} bytes, {})", upload.size, upload.content_type);

        let body = reqwest::Body::wrap_stream(ReaderStream::new(upload.file));
        let response = check(
            self.http
                .post(url)
                .header(CONTENT_TYPE, upload.content_type)
                .header(CONTENT_LENGTH, upload.size)
                .body(body)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::io::Write;

    fn root_of(server: &Server) -> Url {
        Url::parse(&format!("{}/", server.url())).expect("mock server url")
    }

    /// Client whose metadata and upload roots are distinct mock servers
    fn client_for(api: &Server, uploads: &Server) -> GitHubClient {
        GitHubClient::new(root_of(api), root_of(uploads), "test-token").expect("client")
    }

    fn repo() -> Repository {
        Repository::new("octo", "widgets")
    }

    #[test]
    fn test_endpoint_keeps_api_prefix() {
        let root = Url::parse("https://ghe.example.com/api/v3/").unwrap();
        let url = endpoint(&root, &["repos", "octo", "widgets", "releases"]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/octo/widgets/releases");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let root = Url::parse(DEFAULT_BASE_URL).unwrap();
        let url = endpoint(&root, &["repos", "octo", "widgets", "releases", "tags", "v1.0.0+build 5"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/widgets/releases/tags/v1.0.0+build%205"
        );
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let root = Url::parse(DEFAULT_BASE_URL).unwrap();
        let result = GitHubClient::new(root.clone(), root, "bad\ntoken");
        assert!(matches!(result, Err(GitHubApiError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_get_release_by_tag_not_found() {
        let mut server = Server::new_async().await;
        let uploads = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/widgets/releases/tags/v1.2.0")
            .match_header("authorization", "Bearer test-token")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let err = client_for(&server, &uploads)
            .get_release_by_tag(&repo(), "v1.2.0")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_release_by_tag_found() {
        let mut server = Server::new_async().await;
        let mut uploads = Server::new_async().await;
        let stray = uploads
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/widgets/releases/tags/v1.2.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": 42, "tag_name": "v1.2.0", "draft": false}).to_string())
            .create_async()
            .await;

        let release = client_for(&server, &uploads)
            .get_release_by_tag(&repo(), "v1.2.0")
            .await
            .unwrap();

        assert_eq!(release.id, 42);
        assert_eq!(release.tag_name, "v1.2.0");
        stray.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_release_sends_tag_name() {
        let mut server = Server::new_async().await;
        let mut uploads = Server::new_async().await;
        let stray = uploads
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let mock = server
            .mock("POST", "/repos/octo/widgets/releases")
            .match_body(Matcher::Json(json!({"tag_name": "v1.2.0"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": 7, "tag_name": "v1.2.0"}).to_string())
            .create_async()
            .await;

        let release = client_for(&server, &uploads).create_release(&repo(), "v1.2.0").await.unwrap();

        assert_eq!(release.id, 7);
        mock.assert_async().await;
        stray.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_carries_message() {
        let mut server = Server::new_async().await;
        let uploads = Server::new_async().await;
        server
            .mock("POST", "/repos/octo/widgets/releases")
            .with_status(422)
            .with_body(r#"{"message": "Validation Failed"}"#)
            .create_async()
            .await;

        let err = client_for(&server, &uploads).create_release(&repo(), "v1.2.0").await.unwrap_err();

        match err {
            GitHubApiError::Status { status, message, .. } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Validation Failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_release_assets_follows_pages() {
        let mut server = Server::new_async().await;
        let uploads = Server::new_async().await;
        let full_page: Vec<_> = (0..100)
            .map(|i| json!({"id": i, "name": format!("file-{i}.bin")}))
            .collect();

        let first = server
            .mock("GET", "/repos/octo/widgets/releases/7/assets")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(serde_json::Value::Array(full_page).to_string())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/repos/octo/widgets/releases/7/assets")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(json!([{"id": 100, "name": "app.tar.gz", "size": 3}]).to_string())
            .create_async()
            .await;

        let assets = client_for(&server, &uploads).list_release_assets(&repo(), 7).await.unwrap();

        assert_eq!(assets.len(), 101);
        assert_eq!(assets[100].name, "app.tar.gz");
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_release_asset() {
        let mut server = Server::new_async().await;
        let uploads = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/repos/octo/widgets/releases/assets/99")
            .with_status(204)
            .create_async()
            .await;

        client_for(&server, &uploads).delete_release_asset(&repo(), 99).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_release_asset_goes_to_upload_root() {
        let mut server = Server::new_async().await;
        let mut uploads = Server::new_async().await;
        let stray = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let mock = uploads
            .mock("POST", "/repos/octo/widgets/releases/7/assets")
            .match_query(Matcher::UrlEncoded("name".into(), "app.sha256".into()))
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "text/plain")
            .match_body("deadbeef  app.tar.gz\n")
            .with_status(201)
            .with_body(json!({"id": 5, "name": "app.sha256", "size": 21}).to_string())
            .create_async()
            .await;

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"deadbeef  app.tar.gz\n").unwrap();
        let file = tokio::fs::File::open(tmp.path()).await.unwrap();

        let upload = AssetUpload {
            name: "app.sha256".to_string(),
            content_type: "text/plain",
            size: 21,
            file,
        };
        let asset = client_for(&server, &uploads)
            .upload_release_asset(&repo(), 7, upload)
            .await
            .unwrap();

        assert_eq!(asset.id, 5);
        assert_eq!(asset.name, "app.sha256");
        mock.assert_async().await;
        stray.assert_async().await;
    }
}
