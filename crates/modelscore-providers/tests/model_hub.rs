//! Hugging Face Hub adapter against a mock HTTP server.

use modelscore_core::{ModelHub, SubjectIdentifier, UpstreamError};
use modelscore_providers::{HfHubClient, ProviderConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HfHubClient {
    HfHubClient::new(&ProviderConfig::default().with_hf_endpoint(&server.uri())).unwrap()
}

#[tokio::test]
async fn parses_model_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models/google-bert/bert-base-uncased"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "google-bert/bert-base-uncased",
            "downloads": 52_000_000u64,
            "likes": 2100,
            "tags": ["transformers", "license:apache-2.0"],
            "cardData": {"license": "apache-2.0"},
            "safetensors": {"parameters": {"F32": 110106428u64}, "total": 110106428u64},
            "siblings": [{"rfilename": "config.json"}, {"rfilename": "model.safetensors"}]
        })))
        .mount(&server)
        .await;

    let model = SubjectIdentifier::model("https://huggingface.co/google-bert/bert-base-uncased");
    let info = client(&server).model_info(&model).await.unwrap();
    assert_eq!(info.parameters, Some(110_106_428));
    assert_eq!(info.license.as_deref(), Some("apache-2.0"));
    assert_eq!(info.downloads, Some(52_000_000));
    assert_eq!(info.likes, Some(2100));
    assert_eq!(info.files, ["config.json", "model.safetensors"]);
}

#[tokio::test]
async fn unknown_model_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models/nobody/nothing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let model = SubjectIdentifier::model("https://huggingface.co/nobody/nothing");
    let err = client(&server).model_info(&model).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 404, .. }));
}

#[tokio::test]
async fn readme_for_models_and_datasets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openai/whisper-tiny/raw/main/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Whisper"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/datasets/bookcorpus/bookcorpus/raw/main/README.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let hub = client(&server);
    let model = SubjectIdentifier::model("https://huggingface.co/openai/whisper-tiny");
    assert_eq!(hub.readme(&model).await.unwrap().as_deref(), Some("# Whisper"));

    let dataset = SubjectIdentifier::dataset("https://huggingface.co/datasets/bookcorpus/bookcorpus");
    assert_eq!(hub.readme(&dataset).await.unwrap(), None);
}
