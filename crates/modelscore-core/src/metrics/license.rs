use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use super::LICENSE;
use crate::error::UpstreamResult;
use crate::metric::MetricUnit;
use crate::providers::ModelHub;
use crate::score::{RawData, Score};
use crate::subject::EvaluationSubject;

/// Score for a license that is present but matches no known token.
const UNKNOWN_LICENSE: f64 = 0.2;

/// Placeholder identifiers the hub publishes when no license is declared.
const UNDECLARED: [&str; 2] = ["unknown", "none"];

/// Ordered token rules; the first match wins, so restrictive variants
/// (`cc-by-nc`, `lgpl`) are listed before the tokens they contain.
static LICENSE_TIERS: LazyLock<Vec<(f64, Regex)>> = LazyLock::new(|| {
    [
        (
            0.6,
            r"\b(?:cc-by-nc|non-commercial|noncommercial|research|evaluation)\b",
        ),
        (0.2, r"\b(?:proprietary|closed|llama\w*|gemma\w*|other)\b"),
        (
            1.0,
            r"\b(?:apache-2|mit|bsd|isc|unlicense|cc0|zlib|bsl-1\.0)\b",
        ),
        (0.8, r"\b(?:lgpl|mpl|epl|cc-by)\b"),
        (
            0.4,
            r"\b(?:gpl|agpl|openrail|creativeml|bigscience|bigcode)\b",
        ),
    ]
    .into_iter()
    .map(|(score, pattern)| {
        let regex = Regex::new(&format!("(?i){pattern}")).expect("valid license pattern");
        (score, regex)
    })
    .collect()
});

/// Map a free-text license identifier to its tier score.
///
/// Blank, `unknown` and `none` count as no license at all.
pub fn license_score(license: Option<&str>) -> f64 {
    let Some(license) = license.map(str::trim).filter(|l| {
        !l.is_empty() && !UNDECLARED.iter().any(|u| l.eq_ignore_ascii_case(u))
    }) else {
        return 0.0;
    };
    LICENSE_TIERS
        .iter()
        .find(|(_, regex)| regex.is_match(license))
        .map(|(score, _)| *score)
        .unwrap_or(UNKNOWN_LICENSE)
}

/// License permissiveness of the model card's declared license.
pub struct LicenseMetric {
    hub: Arc<dyn ModelHub>,
}

impl LicenseMetric {
    pub fn new(hub: Arc<dyn ModelHub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl MetricUnit for LicenseMetric {
    fn name(&self) -> &'static str {
        LICENSE
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData> {
        let info = self.hub.model_info(subject.model()).await?;
        Ok(RawData::new().with("license", info.license))
    }

    fn score(&self, raw: &RawData) -> Score {
        Score::Scalar(license_score(raw.get_str("license")))
    }
}
