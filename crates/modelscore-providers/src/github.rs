//! GitHub adapter: contributor listings, repository trees and raw files.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use modelscore_core::{
    ConfigError, LinkSource, SourceFile, SourceForge, SubjectIdentifier, UpstreamError,
    UpstreamResult,
};

use crate::config::{ProviderConfig, GITHUB_TOKEN_VAR};
use crate::http_error;

const SERVICE: &str = "source-forge";
const PAGE_SIZE: usize = 100;
const MAX_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
struct Contributor {
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl Contributor {
    /// Login for registered users; email, then name, for anonymous ones.
    fn identity(self) -> Option<String> {
        self.login.or(self.email).or(self.name)
    }
}

#[derive(Debug, Deserialize)]
struct Tree {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// HTTP client for the GitHub REST API and raw content host.
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    raw_url: String,
    token: Option<String>,
    download_concurrency: usize,
}

impl GithubClient {
    pub fn new(config: &ProviderConfig) -> UpstreamResult<Self> {
        Ok(Self {
            client: config.http_client()?,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            raw_url: config.github_raw_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
            download_concurrency: config.download_concurrency.max(1),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn owner_repo(repo: &SubjectIdentifier) -> UpstreamResult<(&str, &str)> {
        match (repo.source(), repo.owner(), repo.name()) {
            (Some(LinkSource::GitHub), Some(owner), Some(name)) => Ok((owner, name)),
            _ => Err(UpstreamError::unsupported(format!(
                "{repo} is not a GitHub repository"
            ))),
        }
    }

    /// Check the configured token against the API.
    ///
    /// A missing token or an HTTP 401 is a configuration error; an
    /// unreachable API is logged and tolerated.
    pub async fn verify_token(&self) -> Result<(), ConfigError> {
        if self.token.is_none() {
            return Err(ConfigError::MissingCredential {
                variable: GITHUB_TOKEN_VAR,
            });
        }
        let url = format!("{}/user", self.api_url);
        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                Err(ConfigError::InvalidCredential {
                    variable: GITHUB_TOKEN_VAR,
                    reason: "the source forge answered 401 Unauthorized".to_string(),
                })
            }
            Ok(response) if !response.status().is_success() => {
                warn!(status = response.status().as_u16(), "token check returned non-success status");
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "could not reach the source forge to verify the token");
                Ok(())
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> UpstreamResult<Option<T>> {
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| http_error(SERVICE, e))?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => response
                .json()
                .await
                .map(Some)
                .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string())),
            status => Err(UpstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
            }),
        }
    }

    async fn raw_file(&self, owner: &str, name: &str, path: String) -> UpstreamResult<SourceFile> {
        let url = format!("{}/{}/{}/HEAD/{}", self.raw_url, owner, name, path);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| http_error(SERVICE, e))?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }
        let contents = response.text().await.map_err(|e| http_error(SERVICE, e))?;
        Ok(SourceFile::new(path, contents))
    }
}

#[async_trait]
impl SourceForge for GithubClient {
    async fn contributors(&self, repo: &SubjectIdentifier) -> UpstreamResult<Vec<String>> {
        let (owner, name) = Self::owner_repo(repo)?;
        let mut seen = HashSet::new();
        let mut identities = Vec::new();

        for page in 1..=MAX_PAGES {
            let url = format!(
                "{}/repos/{}/{}/contributors?per_page={}&anon=1&page={}",
                self.api_url, owner, name, PAGE_SIZE, page
            );
            let Some(batch) = self.get_json::<Vec<Contributor>>(&url).await? else {
                break;
            };
            let full_page = batch.len() == PAGE_SIZE;
            for identity in batch.into_iter().filter_map(Contributor::identity) {
                if seen.insert(identity.clone()) {
                    identities.push(identity);
                }
            }
            if !full_page {
                break;
            }
        }

        debug!(repo = %repo, contributors = identities.len(), "listed contributors");
        Ok(identities)
    }

    async fn source_files(
        &self,
        repo: &SubjectIdentifier,
        extension: &str,
        limit: usize,
    ) -> UpstreamResult<Vec<SourceFile>> {
        let (owner, name) = Self::owner_repo(repo)?;
        let url = format!(
            "{}/repos/{}/{}/git/trees/HEAD?recursive=1",
            self.api_url, owner, name
        );
        let Some(tree) = self.get_json::<Tree>(&url).await? else {
            return Ok(Vec::new());
        };
        if tree.truncated {
            debug!(repo = %repo, "repository tree listing was truncated");
        }

        let suffix = format!(".{extension}");
        let paths: Vec<String> = tree
            .tree
            .into_iter()
            .filter(|e| e.kind == "blob" && e.path.ends_with(&suffix))
            .map(|e| e.path)
            .take(limit)
            .collect();

        let downloads: Vec<UpstreamResult<SourceFile>> = stream::iter(paths)
            .map(|path| self.raw_file(owner, name, path))
            .buffer_unordered(self.download_concurrency)
            .collect()
            .await;

        let mut files = Vec::with_capacity(downloads.len());
        for download in downloads {
            match download {
                Ok(file) => files.push(file),
                Err(e) => debug!(repo = %repo, error = %e, "skipping source file"),
            }
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}
