//! The `MetricUnit` contract shared by every scoring dimension.

use async_trait::async_trait;

use crate::error::UpstreamResult;
use crate::score::{RawData, Score, ScoreShape};
use crate::subject::EvaluationSubject;

/// One independently runnable scoring dimension.
///
/// Guarantees expected of implementors:
/// - `name()` is stable across runs; it keys both the output field and
///   the weight table.
/// - `fetch` is the only place network or process I/O happens and shares
///   no mutable state with other units. A missing optional identifier is
///   not an error: return empty [`RawData`].
/// - `score` is pure and never fails; absent or malformed fields map to
///   the lowest bucket.
#[async_trait]
pub trait MetricUnit: Send + Sync {
    fn name(&self) -> &'static str;

    /// Declared score shape, used for the zero-equivalent on failure.
    fn shape(&self) -> ScoreShape {
        ScoreShape::Scalar
    }

    async fn fetch(&self, subject: &EvaluationSubject) -> UpstreamResult<RawData>;

    fn score(&self, raw: &RawData) -> Score;
}
