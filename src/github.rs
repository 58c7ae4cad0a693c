use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::{
    config::RepositoryConfig,
    error::{ContentError, Result},
    source::ContentSource,
    types::{DirectoryEntry, DirectoryListing, EntryType, FileContent},
};

/// Media type asking the contents API for entry metadata
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Media type asking the contents API for the file bytes themselves
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// GitHub-backed content source
///
/// Both directory listings and file downloads go through the REST
/// contents API, so a single token and ref apply to every request.
#[derive(Clone)]
pub struct GitHubSource {
    client: Client,
    api_url: String,
    owner: String,
    repo: String,
    base_path: String,
    git_ref: Option<String>,
    token: Option<String>,
}

#[derive(Deserialize)]
struct GitHubApiEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

impl GitHubSource {
    /// Create an unauthenticated source for the default branch
    ///
    /// # Arguments
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `base_path` - Base path inside the repository (empty string for root)
    pub fn new(owner: String, repo: String, base_path: String) -> Self {
        Self::from_config(&RepositoryConfig {
            owner,
            repo,
            base_path,
            ..RepositoryConfig::default()
        })
    }

    /// Create a source from the loaded repository configuration
    pub fn from_config(config: &RepositoryConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("repo-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            base_path: config.base_path.trim_matches('/').to_string(),
            git_ref: config.git_ref.clone(),
            token: config.token.clone(),
        }
    }

    /// Build the contents API URL for a path below base_path
    ///
    /// Every path segment is percent-encoded, so names containing `#`,
    /// `?` or `%` address the file itself.
    fn contents_url(&self, path: &str) -> Result<Url> {
        let invalid = || ContentError::InvalidConfig {
            message: format!("API URL cannot be used as a base: {}", self.api_url),
        };

        let mut url = Url::parse(&self.api_url).map_err(|_| invalid())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
            segments
                .pop_if_empty()
                .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
                .extend(self.base_path.split('/').filter(|s| !s.is_empty()))
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        if let Some(git_ref) = &self.git_ref {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }
        Ok(url)
    }

    /// Strip base_path from an absolute repository path
    ///
    /// GitHub reports entry paths from the repository root; entries are
    /// stored relative to base_path so they can be passed back to
    /// `fetch_file`.
    fn strip_base_path(&self, path: &str) -> String {
        if self.base_path.is_empty() {
            return path.to_string();
        }

        let path_trimmed = path.trim_start_matches('/');
        match path_trimmed.strip_prefix(self.base_path.as_str()) {
            Some(relative) if relative.is_empty() || relative.starts_with('/') => {
                relative.trim_start_matches('/').to_string()
            }
            _ => path.to_string(),
        }
    }

    /// Check if an error is a rate limit error
    fn is_rate_limit_error(&self, status: StatusCode) -> bool {
        status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// GET request with the accept and auth headers every call needs
    fn get(&self, url: Url, accept: &str) -> RequestBuilder {
        let request = self.client.get(url).header(header::ACCEPT, accept);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Convert a non-2xx response into the matching error
    async fn status_error(&self, path: &str, response: Response) -> ContentError {
        match response.status() {
            StatusCode::NOT_FOUND => ContentError::NotFound {
                path: path.to_string(),
            },
            status if self.is_rate_limit_error(status) => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "GitHub API rate limit exceeded".to_string());
                ContentError::RateLimited { message }
            }
            status => ContentError::UnexpectedStatus {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            },
        }
    }
}

#[async_trait]
impl ContentSource for GitHubSource {
    async fn fetch_file(&self, path: &str) -> Result<FileContent> {
        let url = self.contents_url(path)?;
        let source_path = url.to_string();

        let response = self.get(url, RAW_MEDIA_TYPE).send().await?;

        if !response.status().is_success() {
            return Err(self.status_error(path, response).await);
        }

        let etag = response
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let content = response.bytes().await?;

        Ok(FileContent {
            content,
            source_path,
            etag,
        })
    }

    async fn list_directory(&self, path: &str) -> Result<DirectoryListing> {
        let url = self.contents_url(path)?;

        let response = self.get(url, JSON_MEDIA_TYPE).send().await?;

        if !response.status().is_success() {
            return Err(self.status_error(path, response).await);
        }

        let api_entries: Vec<GitHubApiEntry> = response.json().await?;

        let entries = api_entries
            .into_iter()
            .map(|e| DirectoryEntry {
                name: e.name,
                path: self.strip_base_path(&e.path),
                entry_type: match e.entry_type.as_str() {
                    "file" => EntryType::File,
                    "dir" => EntryType::Dir,
                    _ => EntryType::Other,
                },
            })
            .collect();

        Ok(DirectoryListing {
            path: path.to_string(),
            entries,
        })
    }

    fn identifier(&self) -> String {
        match &self.git_ref {
            Some(git_ref) => format!(
                "github://{}/{}@{}/{}",
                self.owner, self.repo, git_ref, self.base_path
            ),
            None => format!("github://{}/{}/{}", self.owner, self.repo, self.base_path),
        }
    }
}
