/*!
 * HTTP client tests against in-process stub services
 *
 * Each test binds an axum stub on an ephemeral local port and points the real
 * client at it, so request encoding, response parsing and error mapping are
 * exercised without leaving the machine.
 */

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eduscript::app_config::{Config, GenerationProvider};
use eduscript::errors::ProviderError;
use eduscript::providers::google_translate::GoogleTranslate;
use eduscript::providers::wikipedia::Wikipedia;
use eduscript::providers::{GenerationClient, KnowledgeBase, TextGenerator, Translator};

/// Serve `router` on a free local port and return its base URL
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Default)]
struct TranslateStub {
    hits: AtomicUsize,
    delays: RandomState,
}

async fn translate_endpoint(
    State(stub): State<Arc<TranslateStub>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);

    let text = params.get("q").cloned().unwrap_or_default();
    if params.get("key").map(String::as_str) != Some("test-key")
        || params.get("source").map(String::as_str) != Some("en")
        || params.get("format").map(String::as_str) != Some("text")
    {
        return (StatusCode::BAD_REQUEST, "unexpected form").into_response();
    }

    // Answer in a shuffled order so only the client can restore the sequence
    let delay_ms = stub.delays.hash_one(&text) % 40;
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    if text.contains("FAIL") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "backend unavailable").into_response();
    }

    let target = params.get("target").cloned().unwrap_or_default();
    Json(json!({
        "data": { "translations": [ { "translatedText": format!("[{}] {}", target, text) } ] }
    }))
    .into_response()
}

async fn translate_stub() -> (Arc<TranslateStub>, String) {
    let stub = Arc::new(TranslateStub::default());
    let router = Router::new()
        .route("/translate", post(translate_endpoint))
        .with_state(stub.clone());
    let base = spawn_stub(router).await;
    (stub, format!("{}/translate", base))
}

fn paragraphs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn test_translateBatch_withConcurrentRequests_shouldKeepInputOrder() {
    let (stub, endpoint) = translate_stub().await;
    let client = GoogleTranslate::new(endpoint, "test-key", "text", 4, 5);
    let input: Vec<String> = (1..=12).map(|i| format!("Paragraph {}", i)).collect();

    let output = client.translate_batch(&input, "en", "fr").await.unwrap();

    let expected: Vec<String> = input.iter().map(|p| format!("[fr] {}", p)).collect();
    assert_eq!(output, expected);
    assert_eq!(stub.hits.load(Ordering::SeqCst), 12);
}

#[tokio::test]
async fn test_translateBatch_sequential_shouldStopAtFirstFailure() {
    let (stub, endpoint) = translate_stub().await;
    let client = GoogleTranslate::new(endpoint, "test-key", "text", 1, 5);
    let input = paragraphs(&["One", "Two FAIL", "Three", "Four"]);

    let err = client.translate_batch(&input, "en", "de").await.unwrap_err();

    assert!(matches!(err, ProviderError::ApiError { status_code: 500, .. }));
    assert_eq!(stub.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_translateBatch_withConcurrentFailure_shouldFailWholeBatch() {
    let (_stub, endpoint) = translate_stub().await;
    let client = GoogleTranslate::new(endpoint, "test-key", "text", 3, 5);
    let input = paragraphs(&["One", "Two", "Three FAIL", "Four", "Five"]);

    let result = client.translate_batch(&input, "en", "es").await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
}

#[tokio::test]
async fn test_translateBatch_withWrongKey_shouldReportStatus() {
    let (_stub, endpoint) = translate_stub().await;
    let client = GoogleTranslate::new(endpoint, "other-key", "text", 1, 5);

    let err = client
        .translate_batch(&paragraphs(&["One"]), "en", "fr")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError { status_code: 400, .. }));
}

async fn summary_endpoint(Path(title): Path<String>) -> Response {
    match title.as_str() {
        "Black_holes" => Json(json!({
            "title": "Black holes",
            "extract": " A black hole is a region of spacetime. "
        }))
        .into_response(),
        "Stub" => Json(json!({ "title": "Stub", "extract": "" })).into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn search_endpoint(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
    let titles: Vec<&str> = ["Black hole", "Black Hole (film)", "Black hole thermodynamics", "Quasar"]
        .into_iter()
        .take(limit)
        .collect();
    Json(json!([params.get("search").cloned().unwrap_or_default(), titles, [], []]))
}

async fn wikipedia_stub() -> Wikipedia {
    let router = Router::new()
        .route("/api/rest_v1/page/summary/:title", get(summary_endpoint))
        .route("/w/api.php", get(search_endpoint));
    let base = spawn_stub(router).await;
    Wikipedia::new(base, "EducationalScriptApp/1.0", 5)
}

#[tokio::test]
async fn test_wikipediaSummary_withExistingPage_shouldReturnTrimmedExtract() {
    let wikipedia = wikipedia_stub().await;
    let summary = wikipedia.summary("Black holes").await.unwrap();
    assert_eq!(summary.as_deref(), Some("A black hole is a region of spacetime."));
}

#[tokio::test]
async fn test_wikipediaSummary_withMissingOrEmptyPage_shouldReturnNone() {
    let wikipedia = wikipedia_stub().await;
    assert_eq!(wikipedia.summary("Nonexistent page").await.unwrap(), None);
    assert_eq!(wikipedia.summary("Stub").await.unwrap(), None);
}

#[tokio::test]
async fn test_wikipediaSearch_shouldRespectLimit() {
    let wikipedia = wikipedia_stub().await;
    let titles = wikipedia.search("black hole", 3).await.unwrap();
    assert_eq!(titles, vec!["Black hole", "Black Hole (film)", "Black hole thermodynamics"]);
}

/// Last request body and headers seen by a completion stub
#[derive(Default)]
struct CompletionStub {
    body: Mutex<Option<Value>>,
    headers: Mutex<Option<HeaderMap>>,
}

impl CompletionStub {
    fn record(&self, headers: HeaderMap, body: Value) {
        *self.body.lock().unwrap() = Some(body);
        *self.headers.lock().unwrap() = Some(headers);
    }

    fn body(&self) -> Value {
        self.body.lock().unwrap().clone().unwrap()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|h| h.get(name))
            .map(|v| v.to_str().unwrap().to_string())
    }
}

async fn chat_completions(
    State(stub): State<Arc<CompletionStub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(headers, body);
    Json(json!({
        "choices": [ { "message": { "role": "assistant", "content": "  Plants grow toward light.  " } } ],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
    }))
}

async fn messages(
    State(stub): State<Arc<CompletionStub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(headers, body);
    Json(json!({
        "content": [ { "type": "text", "text": "Plants grow toward light." } ],
        "usage": { "input_tokens": 12, "output_tokens": 5 }
    }))
}

async fn completion_stub() -> (Arc<CompletionStub>, String) {
    let stub = Arc::new(CompletionStub::default());
    let router = Router::new()
        .route("/chat/completions", post(chat_completions))
        .route("/v1/messages", post(messages))
        .with_state(stub.clone());
    (stub, spawn_stub(router).await)
}

fn generation_client(provider: GenerationProvider, endpoint: &str) -> GenerationClient {
    let mut config = Config::default();
    config.generation.provider = provider;
    config.generation.endpoint = endpoint.to_string();
    config.generation.api_key = "test-key".to_string();
    GenerationClient::from_config(&config.generation)
}

#[tokio::test]
async fn test_openAiGenerate_withDefaults_shouldSendNoTokenLimit() {
    let (stub, base) = completion_stub().await;
    let client = generation_client(GenerationProvider::Groq, &base);

    let text = client.generate("Be factual.", "Explain phototropism.").await.unwrap();

    assert_eq!(text, "Plants grow toward light.");
    let body = stub.body();
    assert!(body.get("max_tokens").is_none());
    assert_eq!(body["model"], json!("llama3-70b-8192"));
    assert_eq!(body["messages"][0], json!({ "role": "system", "content": "Be factual." }));
    assert_eq!(body["messages"][1]["content"], json!("Explain phototropism."));
    assert_eq!(stub.header("authorization").as_deref(), Some("Bearer test-key"));
}

#[tokio::test]
async fn test_anthropicGenerate_withDefaults_shouldSendProviderLimit() {
    let (stub, base) = completion_stub().await;
    let client = generation_client(GenerationProvider::Anthropic, &base);

    let text = client.generate("Be factual.", "Explain phototropism.").await.unwrap();

    assert_eq!(text, "Plants grow toward light.");
    let body = stub.body();
    assert_eq!(body["max_tokens"], json!(4096));
    assert_eq!(body["system"], json!("Be factual."));
    assert_eq!(stub.header("x-api-key").as_deref(), Some("test-key"));
}

#[tokio::test]
async fn test_testConnection_withStub_shouldSendSmallRequest() {
    let (stub, base) = completion_stub().await;
    let client = generation_client(GenerationProvider::OpenAI, &base);

    client.test_connection().await.unwrap();

    assert_eq!(stub.body()["max_tokens"], json!(10));
}
