//! Gateway behavior against an in-process upstream.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use ai_llm_service::{
    config::{llm_model_config::LlmModelConfig, model_selection::ModelSelection},
    generation::{DegradedReason, GenerationResponse},
    services::inference_service::InferenceGateway,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;

#[derive(Default)]
struct Upstream {
    hits: Mutex<HashMap<String, usize>>,
    bodies: Mutex<Vec<Value>>,
    auth: Mutex<Vec<String>>,
}

impl Upstream {
    fn hits(&self, model: &str) -> usize {
        self.hits.lock().unwrap().get(model).copied().unwrap_or(0)
    }
}

async fn hosted_model(
    State(up): State<Arc<Upstream>>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *up.hits.lock().unwrap().entry(model.clone()).or_default() += 1;
    up.bodies.lock().unwrap().push(body);
    if let Some(v) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        up.auth.lock().unwrap().push(v.to_string());
    }

    match model.as_str() {
        "ok-array" => (StatusCode::OK, r#"[{"generated_text":"  from array  "}]"#).into_response(),
        "ok-object" => (StatusCode::OK, r#"{"generated_text":"from object"}"#).into_response(),
        "blank" => (StatusCode::OK, r#"[{"generated_text":"   "}]"#).into_response(),
        "loading" => (StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"loading"}"#).into_response(),
        "denied" => (StatusCode::UNAUTHORIZED, "").into_response(),
        "busy" => (StatusCode::TOO_MANY_REQUESTS, "").into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, r#"[{"generated_text":"late"}]"#).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn spawn_upstream() -> (String, Arc<Upstream>) {
    let up = Arc::new(Upstream::default());
    let app = Router::new()
        .route("/models/{model}", post(hosted_model))
        .with_state(up.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/models"), up)
}

fn gateway(endpoint: &str, selection: ModelSelection) -> InferenceGateway {
    let mut cfg = LlmModelConfig::new(endpoint, selection);
    cfg.api_token = Some("hf_test_token".into());
    InferenceGateway::new(cfg).unwrap()
}

#[tokio::test]
async fn upstream_statuses_map_to_outcomes() {
    let (endpoint, _up) = spawn_upstream().await;
    let gw = gateway(&endpoint, ModelSelection::Fixed("ok-array".into()));
    let timeout = Duration::from_secs(5);

    let cases = [
        ("ok-array", GenerationResponse::Success("from array".into())),
        ("ok-object", GenerationResponse::Success("from object".into())),
        ("blank", GenerationResponse::Degraded(DegradedReason::UnexpectedShape)),
        ("loading", GenerationResponse::Degraded(DegradedReason::ModelLoading)),
        ("unknown", GenerationResponse::Degraded(DegradedReason::NotFound)),
        ("denied", GenerationResponse::Degraded(DegradedReason::Unauthorized)),
        ("busy", GenerationResponse::Degraded(DegradedReason::RateLimited)),
        ("broken", GenerationResponse::Degraded(DegradedReason::OtherHttpError(500))),
    ];
    for (model, expected) in cases {
        let req = gw.request("Hi", 10);
        assert_eq!(gw.send(model, &req, timeout).await, expected, "model {model}");
    }
}

#[tokio::test]
async fn request_carries_parameters_and_bearer_token() {
    let (endpoint, up) = spawn_upstream().await;
    let gw = gateway(&endpoint, ModelSelection::Fixed("ok-array".into()));

    let out = gw.generate("What is endometriosis?", 150, 5).await;
    assert!(out.is_success());
    assert_eq!(up.hits("ok-array"), 1);

    let body = up.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["inputs"], "What is endometriosis?");
    assert_eq!(body["parameters"]["max_new_tokens"], 150);
    assert_eq!(body["parameters"]["do_sample"], true);
    assert_eq!(body["parameters"]["return_full_text"], false);
    assert_eq!(up.auth.lock().unwrap()[0], "Bearer hf_test_token");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (endpoint, _up) = spawn_upstream().await;
    let gw = gateway(&endpoint, ModelSelection::Fixed("slow".into()));

    let out = gw.generate("Hi", 10, 1).await;
    assert_eq!(out, GenerationResponse::Degraded(DegradedReason::Timeout));
}

#[tokio::test]
async fn unreachable_endpoint_is_connection_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gw = gateway(
        &format!("http://{addr}/models"),
        ModelSelection::Fixed("gpt2".into()),
    );
    let out = gw.generate("Hi", 10, 5).await;
    assert_eq!(
        out,
        GenerationResponse::Degraded(DegradedReason::ConnectionFailure)
    );
}

#[tokio::test]
async fn probe_pins_loading_model_once() {
    let (endpoint, up) = spawn_upstream().await;
    let gw = gateway(
        &endpoint,
        ModelSelection::probe(["unknown", "loading", "ok-array"], "ok-object"),
    );
    assert_eq!(gw.pinned_model(), None);

    let first = gw.generate("Hi", 10, 5).await;
    let second = gw.generate("Hi", 10, 5).await;

    assert_eq!(gw.pinned_model(), Some("loading"));
    assert_eq!(first, GenerationResponse::Degraded(DegradedReason::ModelLoading));
    assert_eq!(first, second);
    // one probe each for the first two candidates, then two generations
    assert_eq!(up.hits("unknown"), 1);
    assert_eq!(up.hits("loading"), 3);
    assert_eq!(up.hits("ok-array"), 0);
}

#[tokio::test]
async fn last_resort_is_pinned_when_no_candidate_answers() {
    let (endpoint, up) = spawn_upstream().await;
    let gw = gateway(
        &endpoint,
        ModelSelection::probe(["unknown", "denied"], "ok-object"),
    );

    let out = gw.generate("Hi", 10, 5).await;
    assert_eq!(out, GenerationResponse::Success("from object".into()));
    assert_eq!(gw.resolve_model().await, "ok-object");
    assert_eq!(up.hits("ok-object"), 1);
}
