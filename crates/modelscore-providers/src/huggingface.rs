//! Hugging Face Hub adapter.
//!
//! Model metadata comes from `GET {endpoint}/api/models/{repo_id}`; README
//! text from the raw `main` revision of the model or dataset repository.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use modelscore_core::{
    LinkSource, ModelHub, ModelInfo, SubjectIdentifier, SubjectKind, UpstreamError,
    UpstreamResult,
};

use crate::config::ProviderConfig;
use crate::http_error;

const SERVICE: &str = "model-hub";

/// Subset of the hub's model payload that scoring uses.
#[derive(Debug, Default, Deserialize)]
pub struct HubModel {
    #[serde(default)]
    pub safetensors: Option<WeightIndex>,
    #[serde(default)]
    pub gguf: Option<WeightIndex>,
    #[serde(default, rename = "cardData")]
    pub card_data: Option<CardData>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub downloads: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub siblings: Option<Vec<Sibling>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeightIndex {
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardData {
    #[serde(default)]
    pub license_name: Option<String>,
    #[serde(default)]
    pub license: Option<LicenseField>,
}

/// Card licenses appear either as one identifier or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct Sibling {
    pub rfilename: String,
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl HubModel {
    /// Card `license_name`, else card `license` (first if a list), else a
    /// `license:<id>` tag.
    pub fn license(&self) -> Option<String> {
        let card = self.card_data.as_ref();
        card.and_then(|c| c.license_name.as_deref().and_then(non_blank))
            .or_else(|| match card.and_then(|c| c.license.as_ref()) {
                Some(LicenseField::One(id)) => non_blank(id),
                Some(LicenseField::Many(ids)) => ids.iter().find_map(|id| non_blank(id)),
                None => None,
            })
            .or_else(|| {
                self.tags
                    .iter()
                    .flatten()
                    .find_map(|t| t.strip_prefix("license:").and_then(non_blank))
            })
    }

    /// Total parameters from the safetensors index, else the GGUF header.
    pub fn parameters(&self) -> Option<u64> {
        self.safetensors
            .as_ref()
            .and_then(|w| w.total)
            .or_else(|| self.gguf.as_ref().and_then(|w| w.total))
            .filter(|total| *total > 0)
    }
}

impl From<HubModel> for ModelInfo {
    fn from(model: HubModel) -> Self {
        ModelInfo {
            parameters: model.parameters(),
            license: model.license(),
            downloads: model.downloads,
            likes: model.likes,
            files: model
                .siblings
                .unwrap_or_default()
                .into_iter()
                .map(|s| s.rfilename)
                .collect(),
        }
    }
}

/// HTTP client for the Hugging Face Hub.
pub struct HfHubClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HfHubClient {
    pub fn new(config: &ProviderConfig) -> UpstreamResult<Self> {
        Ok(Self {
            client: config.http_client()?,
            endpoint: config.hf_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn hub_repo_id(id: &SubjectIdentifier) -> UpstreamResult<String> {
        match (id.source(), id.repo_id()) {
            (Some(LinkSource::HuggingFace), Some(repo_id)) => Ok(repo_id),
            _ => Err(UpstreamError::unsupported(format!(
                "{id} is not hosted on the model hub"
            ))),
        }
    }
}

#[async_trait]
impl ModelHub for HfHubClient {
    async fn model_info(&self, model: &SubjectIdentifier) -> UpstreamResult<ModelInfo> {
        let repo_id = Self::hub_repo_id(model)?;
        let url = format!("{}/api/models/{}", self.endpoint, repo_id);
        debug!(url = %url, "fetching model metadata");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| http_error(SERVICE, e))?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: SERVICE,
                status: response.status().as_u16(),
            });
        }
        let body: HubModel = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(SERVICE, e.to_string()))?;
        Ok(body.into())
    }

    async fn readme(&self, subject: &SubjectIdentifier) -> UpstreamResult<Option<String>> {
        let repo_id = Self::hub_repo_id(subject)?;
        let url = match subject.kind() {
            SubjectKind::Model => format!("{}/{}/raw/main/README.md", self.endpoint, repo_id),
            SubjectKind::Dataset => {
                format!("{}/datasets/{}/raw/main/README.md", self.endpoint, repo_id)
            }
            SubjectKind::Code => {
                return Err(UpstreamError::unsupported("README of a code repository"))
            }
        };
        debug!(url = %url, "fetching README");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| http_error(SERVICE, e))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let text = response.text().await.map_err(|e| http_error(SERVICE, e))?;
                Ok(Some(text))
            }
            status => Err(UpstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
            }),
        }
    }
}
