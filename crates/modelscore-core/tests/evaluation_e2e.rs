//! End-to-end evaluation over the standard metric set with in-memory collaborators.

use std::sync::Arc;

use modelscore_core::fakes::{FixedAnalyzer, ScriptedCompletion, StaticModelHub, StaticSourceForge};
use modelscore_core::{
    parse_line, standard_units, Collaborators, ConfigError, ModelInfo, Orchestrator,
    OrchestratorConfig, OutputRecord, Score, SourceFile, WeightTable, STANDARD_METRICS,
};
use serde_json::Value;

const MODEL: &str = "https://huggingface.co/google/bert-base-uncased";

fn hub() -> StaticModelHub {
    StaticModelHub::new()
        .with_model(
            "google/bert-base-uncased",
            ModelInfo {
                parameters: Some(110_000_000),
                license: None,
                downloads: Some(100),
                likes: Some(30),
                files: vec!["config.json".into(), "model.safetensors".into()],
            },
        )
        .with_readme("google/bert-base-uncased", "# BERT\n\n```python\nfrom transformers import pipeline\n```")
}

fn collaborators(hub: StaticModelHub, completion: ScriptedCompletion) -> Collaborators {
    Collaborators {
        hub: Arc::new(hub),
        forge: Arc::new(StaticSourceForge::new()),
        completion: Arc::new(completion),
        analyzer: Arc::new(FixedAnalyzer::new(0)),
    }
}

fn orchestrator(collab: &Collaborators) -> Orchestrator {
    Orchestrator::new(
        standard_units(collab),
        &WeightTable::default(),
        OrchestratorConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn model_only_line_scores_available_metrics() {
    let subject = parse_line(1, &format!(",,{MODEL}"))
        .and_then(|line| line.into_subject())
        .unwrap();
    let collab = collaborators(hub(), ScriptedCompletion::replying("0.5"));
    let result = orchestrator(&collab).evaluate(&subject).await;

    let scalar = |name: &str| result.metric(name).unwrap().score.scalar();
    assert_eq!(scalar("license"), 0.0);
    assert_eq!(scalar("bus_factor"), 0.0);
    assert_eq!(scalar("code_quality"), 0.0);
    assert_eq!(scalar("dataset_quality"), 0.0);
    assert_eq!(scalar("performance_claims"), 0.6);
    assert_eq!(scalar("ramp_up_time"), 0.5);
    assert_eq!(scalar("dataset_and_code_score"), 0.5);
    assert!((scalar("size_score") - 0.95).abs() < 1e-12);

    // 0.1*0.5 + 0.1*0.6 + 0.1*0.95 + 0.15*0.5
    assert_eq!(result.net_score, 0.28);

    let line = OutputRecord::from_composite(&result).to_json_line().unwrap();
    assert!(!line.contains('\n'));
    let parsed: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed["name"], "bert-base-uncased");
    assert_eq!(parsed["license"], 0.0);
    for name in STANDARD_METRICS {
        assert!(parsed.get(name).is_some(), "{name} missing");
        assert!(parsed[format!("{name}_latency")].is_u64(), "{name}_latency missing");
    }
}

#[tokio::test]
async fn hub_reported_unknown_license_scores_zero() {
    let hub = StaticModelHub::new().with_model(
        "google/bert-base-uncased",
        ModelInfo {
            parameters: Some(110_000_000),
            license: Some("unknown".into()),
            ..ModelInfo::default()
        },
    );
    let collab = collaborators(hub, ScriptedCompletion::replying("0.5"));
    let subject = parse_line(1, &format!(",,{MODEL}"))
        .and_then(|line| line.into_subject())
        .unwrap();
    let result = orchestrator(&collab).evaluate(&subject).await;

    let line = OutputRecord::from_composite(&result).to_json_line().unwrap();
    let parsed: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed["license"], 0.0);
    assert_eq!(parsed["bus_factor"], 0.0);
    assert_eq!(parsed["code_quality"], 0.0);
    assert!(result.metric("license").is_some_and(|m| !m.failed));
}

#[tokio::test]
async fn every_metric_failing_still_yields_a_complete_record() {
    let collab = collaborators(StaticModelHub::new(), ScriptedCompletion::unavailable());
    let subject = parse_line(1, MODEL).and_then(|l| l.into_subject()).unwrap();
    let result = orchestrator(&collab).evaluate(&subject).await;

    assert_eq!(result.net_score, 0.0);
    assert_eq!(result.metrics.len(), STANDARD_METRICS.len());
    assert_eq!(
        result.metric("size_score").unwrap().score,
        Score::Tiers(Default::default())
    );

    let record = OutputRecord::from_composite(&result);
    assert_eq!(record.field_names().count(), 4 + 2 * STANDARD_METRICS.len());
}

#[tokio::test]
async fn code_link_enables_bus_factor_and_code_quality() {
    let forge = StaticSourceForge::new()
        .with_contributors("google-research/bert", &["a", "b", "c"])
        .with_files(
            "google-research/bert",
            vec![SourceFile::new("modeling.py", "x = 1\n".repeat(1000))],
        );
    let collab = Collaborators {
        hub: Arc::new(hub()),
        forge: Arc::new(forge),
        completion: Arc::new(ScriptedCompletion::replying("0.5")),
        analyzer: Arc::new(FixedAnalyzer::new(3)),
    };
    let subject = parse_line(
        1,
        &format!("https://github.com/google-research/bert,,{MODEL}"),
    )
    .and_then(|l| l.into_subject())
    .unwrap();
    let result = orchestrator(&collab).evaluate(&subject).await;

    assert_eq!(result.metric("bus_factor").unwrap().score.scalar(), 0.8);
    assert_eq!(result.metric("code_quality").unwrap().score.scalar(), 1.0);
}

#[tokio::test]
async fn repeated_evaluations_are_deterministic() {
    let collab = collaborators(hub(), ScriptedCompletion::replying("0.7"));
    let orchestrator = orchestrator(&collab);
    let subject = parse_line(1, MODEL).and_then(|l| l.into_subject()).unwrap();

    let first = orchestrator.evaluate(&subject).await;
    let second = orchestrator.evaluate(&subject).await;

    assert_eq!(first.net_score.to_bits(), second.net_score.to_bits());
    let scores = |r: &modelscore_core::CompositeResult| {
        r.metrics
            .iter()
            .map(|m| (m.name.clone(), m.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(scores(&first), scores(&second));

    let fields = |r: &modelscore_core::CompositeResult| {
        OutputRecord::from_composite(r)
            .field_names()
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    assert_eq!(fields(&first), fields(&second));
}

#[test]
fn missing_weight_fails_before_any_evaluation() {
    let collab = collaborators(hub(), ScriptedCompletion::unavailable());
    let weights = WeightTable::from_pairs(
        STANDARD_METRICS
            .iter()
            .filter(|n| **n != "code_quality")
            .map(|n| (*n, 0.1)),
    )
    .unwrap();

    let err = Orchestrator::new(standard_units(&collab), &weights, OrchestratorConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::MissingWeight { metric } if metric == "code_quality"));
}
