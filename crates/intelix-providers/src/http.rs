//! HTTP answer provider: sends the conversation context to an external
//! answer API (mock or live) and returns its answer text.

use intelix_core::AnswerProvider;
use std::time::Duration;

const PROVIDER_NAME: &str = "HttpAnswerProvider";
const ENV_PROVIDER_MODE: &str = "INTELIX_PROVIDER_MODE";
const ENV_PROVIDER_URL: &str = "INTELIX_PROVIDER_URL";
const ENV_PROVIDER_KEY: &str = "INTELIX_PROVIDER_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ANSWER_FIELD: &str = "answer";

/// Mode for answer fetching: mock (returns simulated answers) or live
/// (calls the configured external API).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderMode {
    #[default]
    Mock,
    Live,
}

impl ProviderMode {
    fn from_env() -> Self {
        match std::env::var(ENV_PROVIDER_MODE).as_deref() {
            Ok("live") => ProviderMode::Live,
            _ => ProviderMode::Mock,
        }
    }
}

/// Queries a JSON answer API over HTTP.
///
/// The request deadline is fixed at construction; the engine defines no
/// timeout of its own, so this is where the caller-supplied deadline
/// lives. No retries: a failed call is a failed call.
pub struct HttpAnswerProvider {
    mode: ProviderMode,
    url: Option<String>,
    api_key: Option<String>,
    answer_field: String,
    client: reqwest::Client,
}

impl HttpAnswerProvider {
    /// Provider configured from the environment (`INTELIX_PROVIDER_MODE`,
    /// `INTELIX_PROVIDER_URL`, `INTELIX_PROVIDER_KEY`).
    pub fn new() -> Self {
        Self::with_settings(
            ProviderMode::from_env(),
            std::env::var(ENV_PROVIDER_URL).ok(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_settings(mode: ProviderMode, url: Option<String>, timeout: Duration) -> Self {
        Self {
            mode,
            url,
            api_key: std::env::var(ENV_PROVIDER_KEY).ok(),
            answer_field: DEFAULT_ANSWER_FIELD.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Overrides the JSON field the answer is read from (default
    /// `answer`).
    pub fn with_answer_field(mut self, field: impl Into<String>) -> Self {
        self.answer_field = field.into();
        self
    }

    /// Mock answer: deterministic text derived from the context, so the
    /// whole pipeline can be wired and demoed without network access.
    fn mock_answer(&self, context: &str) -> Option<String> {
        let preview: String = context.chars().take(80).collect();
        Some(format!(
            "[Mock answer] I looked that up for you: {preview}"
        ))
    }

    async fn live_answer(
        &self,
        context: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let url = self
            .url
            .as_deref()
            .ok_or("HttpAnswerProvider requires a provider URL in live mode")?;

        let mut request = self
            .client
            .post(url)
            .json(&serde_json::json!({ "question": context }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        let answer = extract_answer(&body, &self.answer_field);
        tracing::debug!(
            target: "intelix::provider",
            provider = PROVIDER_NAME,
            found = answer.is_some(),
            "live answer fetched"
        );
        Ok(answer)
    }
}

impl Default for HttpAnswerProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulls a non-empty answer string out of the API response body.
fn extract_answer(body: &serde_json::Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait::async_trait]
impl AnswerProvider for HttpAnswerProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn query(
        &self,
        context: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        match self.mode {
            ProviderMode::Mock => Ok(self.mock_answer(context)),
            ProviderMode::Live => self.live_answer(context).await,
        }
    }
}
