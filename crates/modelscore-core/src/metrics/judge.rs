//! Shared plumbing for metrics scored by a hosted language model.

use crate::error::UpstreamResult;
use crate::providers::CompletionService;
use crate::score::RawData;

/// README text beyond this many characters is dropped from prompts.
pub const README_CHAR_LIMIT: usize = 6_000;

const REPLY_KEY: &str = "reply";

pub fn truncate_readme(readme: &str) -> String {
    readme.chars().take(README_CHAR_LIMIT).collect()
}

/// Extract a single float in `[0, 1]` from a completion reply.
///
/// Surrounding whitespace, quotes, backticks and one trailing period are
/// ignored; anything else makes the reply unusable.
pub fn parse_judgment(reply: &str) -> Option<f64> {
    let trimmed = reply
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
}

pub(crate) fn build_prompt(rubric: &str, context: &[(&str, String)]) -> String {
    let mut prompt = String::from(rubric.trim());
    prompt.push_str("\n\nRespond with a single number between 0 and 1 and nothing else.\n");
    for (label, value) in context {
        prompt.push_str("\n### ");
        prompt.push_str(label);
        prompt.push('\n');
        prompt.push_str(value);
        prompt.push('\n');
    }
    prompt
}

/// Ask the completion service and keep its raw reply.
pub(crate) async fn ask(
    completion: &dyn CompletionService,
    prompt: &str,
) -> UpstreamResult<RawData> {
    let reply = completion.complete(prompt).await?;
    Ok(RawData::new().with(REPLY_KEY, reply))
}

/// Score parsed from a stored reply; zero when absent or unparseable.
pub(crate) fn judged_score(raw: &RawData) -> f64 {
    raw.get_str(REPLY_KEY)
        .and_then(parse_judgment)
        .unwrap_or(0.0)
}

pub(crate) fn or_none(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(none)".to_string())
}
