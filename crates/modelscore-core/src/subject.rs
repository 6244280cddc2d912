//! Typed subject identifiers and link classification.
//!
//! A raw link is classified into exactly one of model, dataset or code by
//! matching the known link grammars in a fixed order. Identifiers are
//! immutable once built.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kind of artifact a link refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Model,
    Dataset,
    Code,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubjectKind::Model => "model",
            SubjectKind::Dataset => "dataset",
            SubjectKind::Code => "code",
        };
        f.write_str(s)
    }
}

/// Host whose grammar matched the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    HuggingFace,
    HuggingFaceSpaces,
    GitHub,
    GitLab,
    ImageNet,
}

static HF_DATASET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://huggingface\.co/datasets/(?P<owner>[^/?#]+)/(?P<name>[^/?#]+)")
        .expect("valid dataset regex")
});

static IMAGENET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.image-net\.org/data/").expect("valid imagenet regex")
});

static GITHUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/(?P<owner>[^/?#]+)/(?P<name>[^/?#]+)")
        .expect("valid github regex")
});

static GITLAB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://gitlab\.com/(?P<owner>[^/?#]+)/(?P<name>[^/?#]+)")
        .expect("valid gitlab regex")
});

static HF_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://huggingface\.co/spaces/(?P<owner>[^/?#]+)/(?P<name>[^/?#]+)")
        .expect("valid spaces regex")
});

static HF_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://huggingface\.co/(?:(?P<owner>[^/?#]+)/)?(?P<name>[^/?#]+)")
        .expect("valid model regex")
});

/// A classified reference to a model, dataset or code repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentifier {
    raw: String,
    kind: SubjectKind,
    source: Option<LinkSource>,
    owner: Option<String>,
    name: Option<String>,
}

impl SubjectIdentifier {
    /// Classify `raw` against every known grammar. Returns `None` when no
    /// grammar matches.
    pub fn classify(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if HF_DATASET.is_match(raw) || IMAGENET.is_match(raw) {
            return Some(Self::dataset(raw));
        }
        if GITHUB.is_match(raw) || GITLAB.is_match(raw) || HF_SPACES.is_match(raw) {
            return Some(Self::code(raw));
        }
        if HF_MODEL.is_match(raw) {
            return Some(Self::model(raw));
        }
        None
    }

    /// Parse `raw` as a model link. Unrecognized links yield an
    /// unvalidated identifier with no owner or name.
    pub fn model(raw: &str) -> Self {
        let mut id = Self::unvalidated(raw, SubjectKind::Model);
        if let Some(caps) = HF_MODEL.captures(&id.raw) {
            id.source = Some(LinkSource::HuggingFace);
            id.owner = caps.name("owner").map(|m| m.as_str().to_string());
            id.name = caps.name("name").map(|m| m.as_str().to_string());
        }
        id
    }

    /// Parse `raw` as a dataset link.
    pub fn dataset(raw: &str) -> Self {
        let mut id = Self::unvalidated(raw, SubjectKind::Dataset);
        if let Some(caps) = HF_DATASET.captures(&id.raw) {
            id.source = Some(LinkSource::HuggingFace);
            id.owner = Some(caps["owner"].to_string());
            id.name = Some(caps["name"].to_string());
        } else if IMAGENET.is_match(&id.raw) {
            id.source = Some(LinkSource::ImageNet);
            id.owner = Some("imagenet".to_string());
            id.name = Some("imagenet".to_string());
        }
        id
    }

    /// Parse `raw` as a code-repository link.
    pub fn code(raw: &str) -> Self {
        let mut id = Self::unvalidated(raw, SubjectKind::Code);
        let grammars: [(&Regex, LinkSource); 3] = [
            (&*GITHUB, LinkSource::GitHub),
            (&*GITLAB, LinkSource::GitLab),
            (&*HF_SPACES, LinkSource::HuggingFaceSpaces),
        ];
        for (grammar, source) in grammars {
            if let Some(caps) = grammar.captures(&id.raw) {
                let name = caps["name"].trim_end_matches(".git").to_string();
                id.source = Some(source);
                id.owner = Some(caps["owner"].to_string());
                id.name = Some(name);
                break;
            }
        }
        id
    }

    fn unvalidated(raw: &str, kind: SubjectKind) -> Self {
        Self {
            raw: raw.trim().to_string(),
            kind,
            source: None,
            owner: None,
            name: None,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn source(&self) -> Option<LinkSource> {
        self.source
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the link matched a recognized grammar for its kind.
    pub fn is_validated(&self) -> bool {
        self.name.is_some()
    }

    /// `owner/name`, or just `name` for legacy root-level model ids.
    pub fn repo_id(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        Some(match self.owner.as_deref() {
            Some(owner) => format!("{owner}/{name}"),
            None => name.to_string(),
        })
    }

    /// Name shown in output records: the parsed name, else the raw link.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.raw)
    }
}

impl fmt::Display for SubjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repo_id() {
            Some(id) => write!(f, "{}:{}", self.kind, id),
            None => write!(f, "{}:{}", self.kind, self.raw),
        }
    }
}

/// The unit of work handed to the orchestrator: a mandatory model plus
/// optional linked code and dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSubject {
    model: SubjectIdentifier,
    code: Option<SubjectIdentifier>,
    dataset: Option<SubjectIdentifier>,
}

impl EvaluationSubject {
    pub fn new(model: SubjectIdentifier) -> Self {
        Self {
            model,
            code: None,
            dataset: None,
        }
    }

    pub fn with_code(mut self, code: SubjectIdentifier) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_dataset(mut self, dataset: SubjectIdentifier) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn model(&self) -> &SubjectIdentifier {
        &self.model
    }

    pub fn code(&self) -> Option<&SubjectIdentifier> {
        self.code.as_ref()
    }

    pub fn dataset(&self) -> Option<&SubjectIdentifier> {
        self.dataset.as_ref()
    }

    pub fn display_name(&self) -> &str {
        self.model.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_link_with_owner() {
        let id = SubjectIdentifier::model("https://huggingface.co/google/bert-base-uncased");
        assert_eq!(id.kind(), SubjectKind::Model);
        assert!(id.is_validated());
        assert_eq!(id.owner(), Some("google"));
        assert_eq!(id.name(), Some("bert-base-uncased"));
        assert_eq!(id.repo_id().as_deref(), Some("google/bert-base-uncased"));
    }

    #[test]
    fn model_link_with_trailing_path() {
        let id = SubjectIdentifier::model("https://huggingface.co/openai/whisper-tiny/tree/main");
        assert_eq!(id.owner(), Some("openai"));
        assert_eq!(id.name(), Some("whisper-tiny"));
        assert_eq!(id.raw(), "https://huggingface.co/openai/whisper-tiny/tree/main");
    }

    #[test]
    fn legacy_single_segment_model() {
        let id = SubjectIdentifier::model("https://huggingface.co/bert-base-uncased");
        assert_eq!(id.owner(), None);
        assert_eq!(id.name(), Some("bert-base-uncased"));
        assert_eq!(id.repo_id().as_deref(), Some("bert-base-uncased"));
    }

    #[test]
    fn model_grammar_rejects_code_host() {
        let id = SubjectIdentifier::model("https://github.com/google/bert");
        assert!(!id.is_validated());
        assert_eq!(id.owner(), None);
        assert_eq!(id.name(), None);
        assert_eq!(id.display_name(), "https://github.com/google/bert");
    }

    #[test]
    fn dataset_links() {
        let id = SubjectIdentifier::dataset("https://huggingface.co/datasets/bookcorpus/bookcorpus");
        assert_eq!(id.source(), Some(LinkSource::HuggingFace));
        assert_eq!(id.repo_id().as_deref(), Some("bookcorpus/bookcorpus"));

        let id = SubjectIdentifier::dataset("https://www.image-net.org/data/imagenet_data.tar.gz");
        assert_eq!(id.source(), Some(LinkSource::ImageNet));
        assert_eq!(id.repo_id().as_deref(), Some("imagenet/imagenet"));

        let id = SubjectIdentifier::dataset("https://github.com/someorg/somerepo");
        assert!(!id.is_validated());
    }

    #[test]
    fn code_links() {
        let id = SubjectIdentifier::code("https://github.com/google-research/bert.git");
        assert_eq!(id.source(), Some(LinkSource::GitHub));
        assert_eq!(id.repo_id().as_deref(), Some("google-research/bert"));

        let id = SubjectIdentifier::code("https://gitlab.com/myorg/myrepo");
        assert_eq!(id.source(), Some(LinkSource::GitLab));

        let id = SubjectIdentifier::code("https://huggingface.co/spaces/user/demo-app");
        assert_eq!(id.source(), Some(LinkSource::HuggingFaceSpaces));
        assert_eq!(id.display_name(), "demo-app");

        let id = SubjectIdentifier::code("https://huggingface.co/google/bert-base-uncased");
        assert!(!id.is_validated());
    }

    #[test]
    fn classify_picks_exactly_one_kind() {
        let cases = [
            ("https://huggingface.co/google/bert-base-uncased", SubjectKind::Model),
            ("https://huggingface.co/datasets/bookcorpus/bookcorpus", SubjectKind::Dataset),
            ("https://www.image-net.org/data/imagenet_data.tar.gz", SubjectKind::Dataset),
            ("https://github.com/google-research/bert", SubjectKind::Code),
            ("https://gitlab.com/org/repo", SubjectKind::Code),
            ("https://huggingface.co/spaces/user/demo-app", SubjectKind::Code),
        ];
        for (raw, kind) in cases {
            let id = SubjectIdentifier::classify(raw).expect(raw);
            assert_eq!(id.kind(), kind, "{raw}");
            assert!(id.is_validated(), "{raw}");
        }
    }

    #[test]
    fn classify_rejects_unknown_hosts() {
        assert!(SubjectIdentifier::classify("https://example.com/not-a-valid-url").is_none());
        assert!(SubjectIdentifier::classify("   ").is_none());
    }

    #[test]
    fn subject_display_name_comes_from_model() {
        let subject = EvaluationSubject::new(SubjectIdentifier::model(
            "https://huggingface.co/google/bert-base-uncased",
        ))
        .with_code(SubjectIdentifier::code("https://github.com/google-research/bert"));
        assert_eq!(subject.display_name(), "bert-base-uncased");
        assert!(subject.code().is_some());
        assert!(subject.dataset().is_none());
    }
}
