//! GitHub contents API adapter implementing `ContentStore`

use async_trait::async_trait;
use base64::Engine;
use bridge_traits::content::{ContentStore, PutOutcome, PutRequest, RemoteObject};
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use core_runtime::logging::{truncate_for_log, DEFAULT_BODY_LOG_LIMIT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::error::{GitHubError, Result as GitHubResult};
use crate::types::{ContentEntry, PutContentsBody};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("meeting-sync/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Repository contents on one branch, addressed by path.
///
/// `fetch` reads the blob sha of a path; `put` creates or replaces the file,
/// presenting the sha when one is known. Writes go out exactly once: a 409 or
/// 422 is reported back as [`PutOutcome::Rejected`] for the next run to redo.
pub struct GitHubContentStore {
    http_client: Arc<dyn HttpClient>,
    token: String,
    owner: String,
    repo: String,
    branch: String,
    api_base: String,
    request_timeout: Duration,
}

impl GitHubContentStore {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            api_base: GITHUB_API_BASE.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Point at a GitHub Enterprise API root, e.g. `https://ghe.example.com/api/v3`
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn contents_url(&self, path: &str) -> GitHubResult<String> {
        if path.is_empty() || path.starts_with('/') || path.split('/').any(|s| s.is_empty()) {
            return Err(GitHubError::InvalidPath(path.to_string()));
        }

        let encoded = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Ok(format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            encoded
        ))
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .bearer_token(&self.token)
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header("User-Agent", USER_AGENT)
            .timeout(self.request_timeout)
    }
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> Result<Option<RemoteObject>> {
        let url = format!(
            "{}?ref={}",
            self.contents_url(path)?,
            urlencoding::encode(&self.branch)
        );

        let response = self
            .http_client
            .execute(self.request(HttpMethod::Get, url))
            .await?;

        match response.status {
            200 => {}
            404 => {
                debug!("No current version");
                return Ok(None);
            }
            status => {
                return Err(GitHubError::ApiError {
                    status_code: status,
                    message: truncate_for_log(&response.body_lossy(), DEFAULT_BODY_LOG_LIMIT),
                }
                .into());
            }
        }

        let entry: ContentEntry = response
            .json()
            .map_err(|e| GitHubError::ParseError(format!("Failed to parse content entry: {}", e)))?;

        debug!(sha = %entry.sha, "Found current version");
        Ok(Some(RemoteObject {
            path: path.to_string(),
            version: entry.sha,
        }))
    }

    #[instrument(
        skip(self, request),
        fields(path = %request.path, has_version = request.version.is_some())
    )]
    async fn put(&self, request: PutRequest) -> Result<PutOutcome> {
        let body = PutContentsBody {
            message: &request.message,
            content: base64::engine::general_purpose::STANDARD.encode(&request.content),
            branch: &self.branch,
            sha: request.version.as_deref(),
        };

        let http_request = self
            .request(HttpMethod::Put, self.contents_url(&request.path)?)
            .json(&body)?;

        let response = self
            .http_client
            .execute_with_retry(http_request, RetryPolicy::single_attempt())
            .await?;

        let outcome = match response.status {
            201 => PutOutcome::Created,
            200 => PutOutcome::Updated,
            status => PutOutcome::Rejected {
                status,
                body: response.body_lossy(),
            },
        };

        info!(status = response.status, "Content write answered");
        Ok(outcome)
    }
}
