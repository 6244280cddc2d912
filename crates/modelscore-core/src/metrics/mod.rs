//! The eight standard scoring dimensions.
//!
//! Every unit receives the full [`EvaluationSubject`](crate::EvaluationSubject)
//! and picks the identifiers it needs; a unit whose optional identifier is
//! absent fetches empty raw data and scores zero.

use std::sync::Arc;

use crate::metric::MetricUnit;
use crate::providers::{CompletionService, ModelHub, SourceForge, StaticAnalyzer};

mod bus_factor;
mod code_quality;
mod dataset_and_code;
mod dataset_quality;
mod judge;
mod license;
mod performance_claims;
mod ramp_up_time;
mod size;

pub use bus_factor::{bus_factor_score, BusFactorMetric};
pub use code_quality::{code_quality_score, CodeQualityMetric, MAX_SOURCE_FILES};
pub use dataset_and_code::DatasetAndCodeMetric;
pub use dataset_quality::DatasetQualityMetric;
pub use judge::{parse_judgment, truncate_readme, README_CHAR_LIMIT};
pub use license::{license_score, LicenseMetric};
pub use performance_claims::{performance_claims_score, PerformanceClaimsMetric};
pub use ramp_up_time::RampUpTimeMetric;
pub use size::{size_score, SizeMetric};

pub const RAMP_UP_TIME: &str = "ramp_up_time";
pub const BUS_FACTOR: &str = "bus_factor";
pub const PERFORMANCE_CLAIMS: &str = "performance_claims";
pub const LICENSE: &str = "license";
pub const SIZE_SCORE: &str = "size_score";
pub const DATASET_AND_CODE_SCORE: &str = "dataset_and_code_score";
pub const DATASET_QUALITY: &str = "dataset_quality";
pub const CODE_QUALITY: &str = "code_quality";

/// Standard metric names in registration (and output) order.
pub const STANDARD_METRICS: [&str; 8] = [
    RAMP_UP_TIME,
    BUS_FACTOR,
    PERFORMANCE_CLAIMS,
    LICENSE,
    SIZE_SCORE,
    DATASET_AND_CODE_SCORE,
    DATASET_QUALITY,
    CODE_QUALITY,
];

/// Shared, read-only handles to every upstream collaborator.
#[derive(Clone)]
pub struct Collaborators {
    pub hub: Arc<dyn ModelHub>,
    pub forge: Arc<dyn SourceForge>,
    pub completion: Arc<dyn CompletionService>,
    pub analyzer: Arc<dyn StaticAnalyzer>,
}

/// Build the eight standard units in registration order.
pub fn standard_units(collab: &Collaborators) -> Vec<Arc<dyn MetricUnit>> {
    vec![
        Arc::new(RampUpTimeMetric::new(
            Arc::clone(&collab.hub),
            Arc::clone(&collab.completion),
        )),
        Arc::new(BusFactorMetric::new(
            Arc::clone(&collab.hub),
            Arc::clone(&collab.forge),
        )),
        Arc::new(PerformanceClaimsMetric::new(Arc::clone(&collab.hub))),
        Arc::new(LicenseMetric::new(Arc::clone(&collab.hub))),
        Arc::new(SizeMetric::new(Arc::clone(&collab.hub))),
        Arc::new(DatasetAndCodeMetric::new(
            Arc::clone(&collab.hub),
            Arc::clone(&collab.completion),
        )),
        Arc::new(DatasetQualityMetric::new(
            Arc::clone(&collab.hub),
            Arc::clone(&collab.completion),
        )),
        Arc::new(CodeQualityMetric::new(
            Arc::clone(&collab.forge),
            Arc::clone(&collab.analyzer),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FixedAnalyzer, ScriptedCompletion, StaticModelHub, StaticSourceForge};
    use crate::score::ScoreShape;

    #[test]
    fn standard_units_follow_registration_order() {
        let collab = Collaborators {
            hub: Arc::new(StaticModelHub::new()),
            forge: Arc::new(StaticSourceForge::new()),
            completion: Arc::new(ScriptedCompletion::unavailable()),
            analyzer: Arc::new(FixedAnalyzer::new(0)),
        };
        let units = standard_units(&collab);
        let names: Vec<&str> = units.iter().map(|u| u.name()).collect();
        assert_eq!(names, STANDARD_METRICS);

        let tiered: Vec<&str> = units
            .iter()
            .filter(|u| u.shape() == ScoreShape::Tiers)
            .map(|u| u.name())
            .collect();
        assert_eq!(tiered, [SIZE_SCORE]);
    }
}
