//! Axum-based HTTP wrapper for the Intelix engine. Config-driven via
//! CoreConfig.
//!
//! The wrapper owns everything the engine treats as glue: routing, JSON
//! marshalling, request validation, process configuration, and logging
//! bootstrap. The engine itself is a single shared instance behind
//! [`AppState`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use intelix_core::{AnswerProvider, ConversationEngine, CoreConfig, PluginFlags};
use intelix_providers::{HttpAnswerProvider, ProviderMode, ScrapeAnswerProvider};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[intelix-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(CoreConfig::load().expect("load CoreConfig"));
    let provider = build_provider(&config);
    let engine = Arc::new(ConversationEngine::new(provider));
    tracing::info!(
        target: "intelix::gateway",
        provider_mode = %config.provider_mode,
        knowledge_entries = engine.knowledge_len(),
        "engine initialized"
    );

    let app = build_app(AppState {
        config: Arc::clone(&config),
        engine,
    });

    // PORT overrides the config file, matching the conventional container
    // contract.
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.port);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr).await.expect("bind gateway port"),
        app,
    )
    .await
    .expect("serve gateway");
}

/// Selects the answer provider from config: "scrape" drives the
/// fetch-and-extract variant, anything else the HTTP API client (which
/// itself falls back to mock mode without a URL).
fn build_provider(config: &CoreConfig) -> Arc<dyn AnswerProvider> {
    let timeout = Duration::from_secs(config.provider_timeout_secs);
    match config.provider_mode.as_str() {
        "scrape" => {
            let base_url = config
                .provider_url
                .clone()
                .unwrap_or_else(|| "https://html.duckduckgo.com/html/".to_string());
            match ScrapeAnswerProvider::new(base_url, "q", "div.result__snippet", timeout) {
                Ok(provider) => Arc::new(provider),
                Err(e) => {
                    tracing::warn!(
                        target: "intelix::gateway",
                        error = %e,
                        "scrape provider unavailable; falling back to mock"
                    );
                    Arc::new(HttpAnswerProvider::with_settings(
                        ProviderMode::Mock,
                        None,
                        timeout,
                    ))
                }
            }
        }
        "live" | "http" => Arc::new(HttpAnswerProvider::with_settings(
            ProviderMode::Live,
            config.provider_url.clone(),
            timeout,
        )),
        _ => Arc::new(HttpAnswerProvider::with_settings(
            ProviderMode::Mock,
            None,
            timeout,
        )),
    }
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/chat", post(chat))
        .route("/v1/status", get(status))
        .route("/api/v1/health", get(health))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[derive(Clone)]
struct AppState {
    config: Arc<CoreConfig>,
    engine: Arc<ConversationEngine>,
}

/// GET / – API self-documentation.
async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "API Documentation": {
            "Credits": "This API is developed by Rexeloft LLC.",
            "/chat": {
                "method": "POST",
                "description": "Chat with the Intelix chatbot.",
                "request_format": {
                    "message": "User's message as a string.",
                    "plugins": {
                        "history": "Enable conversation history (true or false).",
                        "emotion": "Enable emotion detection (true or false)."
                    }
                },
                "example_request": {
                    "message": "What is the capital of India?",
                    "plugins": { "history": true, "emotion": false }
                },
                "response_format": {
                    "response": "Chatbot response as a string.",
                    "emotion": "Detected emotion (if emotion plugin is enabled).",
                    "emotion_response": "Emotion-based response (if emotion plugin is enabled)."
                },
                "example_response": {
                    "response": "The capital of India is New Delhi."
                }
            }
        }
    }))
}

/// GET /api/v1/health – liveness check for scripts and orchestrators.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity and engine counters.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "provider_mode": state.config.provider_mode,
        "knowledge_entries": state.engine.knowledge_len(),
    }))
}

/// POST /chat – resolve one utterance through the engine.
///
/// Validation of the message field (present, string, non-empty) is the
/// wrapper's responsibility; the engine never sees invalid input.
async fn chat(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> Response {
    let message = match body
        .get("message")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
    {
        Some(message) => message,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Message must be a non-empty string" })),
            )
                .into_response();
        }
    };

    let plugins: PluginFlags = body
        .get("plugins")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let correlation_id = uuid::Uuid::new_v4();
    tracing::info!(
        target: "intelix::gateway",
        %correlation_id,
        chars = message.len(),
        history = plugins.history,
        emotion = plugins.emotion,
        "chat request received"
    );

    let reply = state.engine.chat(message, plugins).await;
    Json(reply).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use intelix_core::{CannedResponder, EmotionCategory, FALLBACK_ANSWER};
    use tower::ServiceExt;

    /// Provider double: a fixed optional answer plus a call counter, so
    /// tests can assert the knowledge base short-circuits the provider.
    struct StubProvider {
        answer: Option<String>,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl StubProvider {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                answer: None,
                calls: std::sync::atomic::AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AnswerProvider for StubProvider {
        fn name(&self) -> &str {
            "StubProvider"
        }

        async fn query(
            &self,
            _context: &str,
        ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    fn test_config() -> CoreConfig {
        CoreConfig {
            app_name: "Test Gateway".to_string(),
            port: 5000,
            provider_mode: "mock".to_string(),
            provider_url: None,
            provider_timeout_secs: 1,
        }
    }

    fn test_app(provider: Arc<dyn AnswerProvider>) -> Router {
        build_app(AppState {
            config: Arc::new(test_config()),
            engine: Arc::new(ConversationEngine::new(provider)),
        })
    }

    fn chat_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn response_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_home_documents_the_chat_contract() {
        let app = test_app(StubProvider::empty());
        let req = Request::builder().method("GET").uri("/").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(
            json["API Documentation"]["Credits"],
            "This API is developed by Rexeloft LLC."
        );
        assert_eq!(json["API Documentation"]["/chat"]["method"], "POST");
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let app = test_app(StubProvider::empty());
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(response_json(res).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_status_reports_identity_and_knowledge_size() {
        let app = test_app(StubProvider::empty());
        let req = Request::builder()
            .method("GET")
            .uri("/v1/status")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["app_name"], "Test Gateway");
        assert_eq!(json["provider_mode"], "mock");
        assert!(json["knowledge_entries"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_empty_and_non_string_messages() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({ "message": "" }),
            serde_json::json!({ "message": "   " }),
            serde_json::json!({ "message": 42 }),
        ] {
            let app = test_app(StubProvider::empty());
            let res = app.oneshot(chat_request(body.clone())).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json = response_json(res).await;
            assert_eq!(json["error"], "Message must be a non-empty string");
        }
    }

    #[tokio::test]
    async fn test_chat_resolves_seeded_question_without_provider_call() {
        let provider = StubProvider::empty();
        let app = test_app(provider.clone());
        let res = app
            .oneshot(chat_request(serde_json::json!({ "message": "who owns you" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["response"], "I am owned by Rexeloft LLC");
        assert!(json.get("emotion").is_none());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_chat_falls_back_when_provider_has_nothing() {
        let provider = StubProvider::empty();
        let app = test_app(provider.clone());
        let res = app
            .oneshot(chat_request(serde_json::json!({ "message": "zzz1 zzz2 zzz3" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["response"], FALLBACK_ANSWER);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_chat_emotion_plugin_attaches_fields() {
        let app = test_app(StubProvider::empty());
        let body = serde_json::json!({
            "message": "I love this, it is wonderful and amazing",
            "plugins": { "history": false, "emotion": true }
        });
        let res = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["emotion"], "happy");
        let line = json["emotion_response"].as_str().unwrap();
        assert!(CannedResponder::pool(EmotionCategory::Happy).contains(&line));
    }

    #[tokio::test]
    async fn test_chat_tolerates_malformed_plugins_object() {
        let app = test_app(StubProvider::empty());
        let body = serde_json::json!({ "message": "who owns you", "plugins": "nonsense" });
        let res = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = response_json(res).await;
        assert_eq!(json["response"], "I am owned by Rexeloft LLC");
    }
}
