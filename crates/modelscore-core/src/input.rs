//! Newline-delimited URL input: `<code_link>,<dataset_link>,<model_link>`.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::InputError;
use crate::subject::{EvaluationSubject, SubjectIdentifier, SubjectKind};

/// One parsed input line. Unrecognized or misplaced links are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlLine {
    pub line_no: usize,
    pub code: Option<SubjectIdentifier>,
    pub dataset: Option<SubjectIdentifier>,
    pub model: Option<SubjectIdentifier>,
}

impl UrlLine {
    /// Build the evaluation subject, if the line carries a usable model.
    pub fn into_subject(self) -> Option<EvaluationSubject> {
        let model = self.model.filter(SubjectIdentifier::is_validated)?;
        let mut subject = EvaluationSubject::new(model);
        if let Some(code) = self.code {
            subject = subject.with_code(code);
        }
        if let Some(dataset) = self.dataset {
            subject = subject.with_dataset(dataset);
        }
        Some(subject)
    }

    fn slot(&mut self, kind: SubjectKind) -> &mut Option<SubjectIdentifier> {
        match kind {
            SubjectKind::Code => &mut self.code,
            SubjectKind::Dataset => &mut self.dataset,
            SubjectKind::Model => &mut self.model,
        }
    }
}

const COLUMNS: [SubjectKind; 3] = [SubjectKind::Code, SubjectKind::Dataset, SubjectKind::Model];

/// Parse a single line. Returns `None` for blank and `#` comment lines.
pub fn parse_line(line_no: usize, line: &str) -> Option<UrlLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let positional = fields.len() == COLUMNS.len();
    let mut parsed = UrlLine {
        line_no,
        ..UrlLine::default()
    };

    for (idx, field) in fields.iter().enumerate() {
        if field.is_empty() {
            continue;
        }
        let Some(id) = SubjectIdentifier::classify(field) else {
            warn!(line = line_no, link = %field, "unrecognized link ignored");
            continue;
        };

        if positional && id.kind() != COLUMNS[idx] {
            warn!(
                line = line_no,
                link = %field,
                expected = %COLUMNS[idx],
                found = %id.kind(),
                "link does not match its column, ignored"
            );
            continue;
        }

        let slot = parsed.slot(id.kind());
        if slot.is_none() {
            *slot = Some(id);
        } else {
            debug!(line = line_no, link = %field, "duplicate link kind ignored");
        }
    }

    Some(parsed)
}

/// Parse every non-comment line of `text`.
pub fn parse_url_text(text: &str) -> Vec<UrlLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line(idx + 1, line))
        .collect()
}

/// Read and parse a URL file.
pub fn parse_url_file(path: &Path) -> Result<Vec<UrlLine>, InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(parse_url_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
https://github.com/google-research/bert, https://huggingface.co/datasets/bookcorpus/bookcorpus, https://huggingface.co/google-bert/bert-base-uncased
,,https://huggingface.co/parvk11/audience_classifier_model

# comment line
,,https://huggingface.co/openai/whisper-tiny/tree/main";

    #[test]
    fn parses_positional_lines() {
        let lines = parse_url_text(SAMPLE);
        assert_eq!(lines.len(), 3);

        let first = &lines[0];
        assert_eq!(first.line_no, 1);
        assert_eq!(first.code.as_ref().and_then(|c| c.name()), Some("bert"));
        assert_eq!(
            first.dataset.as_ref().and_then(|d| d.repo_id()).as_deref(),
            Some("bookcorpus/bookcorpus")
        );
        assert_eq!(
            first.model.as_ref().and_then(|m| m.repo_id()).as_deref(),
            Some("google-bert/bert-base-uncased")
        );

        let second = &lines[1];
        assert!(second.code.is_none());
        assert!(second.dataset.is_none());
        assert_eq!(
            second.model.as_ref().and_then(|m| m.name()),
            Some("audience_classifier_model")
        );

        let third = &lines[2];
        assert_eq!(third.line_no, 5);
        assert_eq!(third.model.as_ref().and_then(|m| m.name()), Some("whisper-tiny"));
    }

    #[test]
    fn unrecognized_field_becomes_absent() {
        let line = parse_line(1, "https://example.com/x,,https://huggingface.co/a/b").unwrap();
        assert!(line.code.is_none());
        assert!(line.model.is_some());
    }

    #[test]
    fn misplaced_link_is_dropped() {
        let line = parse_line(1, "https://huggingface.co/a/b,,").unwrap();
        assert!(line.code.is_none());
        assert!(line.model.is_none());
        assert!(line.into_subject().is_none());
    }

    #[test]
    fn single_link_is_placed_by_kind() {
        let line = parse_line(1, "https://huggingface.co/a/b").unwrap();
        let subject = line.into_subject().unwrap();
        assert_eq!(subject.model().repo_id().as_deref(), Some("a/b"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = parse_url_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let lines = parse_url_file(&path).unwrap();
        assert_eq!(lines.len(), 3);
    }
}
