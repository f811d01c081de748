//! Generation oracle abstraction and the Ollama-backed client.
//!
//! The oracle is slow, fallible, and capacity-limited; callers own the
//! timeout (the engine wraps every call in `tokio::time::timeout`) and
//! the pacing between calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Cannot reach generation endpoint at {0}")]
    Connection(String),

    #[error("Generation endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Scripted failure")]
    Scripted,
}

/// External text-generation capability.
#[allow(async_fn_in_trait)]
pub trait GenerationOracle {
    async fn is_available(&self) -> bool;

    /// Generate text for a prompt. May be slow; callers apply their own
    /// timeout.
    async fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}

/// HTTP client for a local Ollama instance.
pub struct OllamaOracle {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaOracle {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Default local instance with the top preferred model.
    pub fn default_local() -> Self {
        Self::new(config::DEFAULT_ORACLE_URL, config::MODEL_PREFERENCES[0])
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Connect to an instance and pick the best installed model from the
    /// preference list.
    pub async fn autodetect(base_url: &str) -> Result<Self, OracleError> {
        let oracle = Self::new(base_url, config::MODEL_PREFERENCES[0]);
        let model = oracle.find_best_model().await?;
        Ok(Self { model, ..oracle })
    }

    /// Find the best available model from the preference list.
    pub async fn find_best_model(&self) -> Result<String, OracleError> {
        let available = self.list_models().await?;
        preferred_model(&available)
            .map(str::to_string)
            .ok_or_else(|| OracleError::ResponseParsing("no preferred model installed".into()))
    }

    async fn list_models(&self) -> Result<Vec<String>, OracleError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                OracleError::Connection(self.base_url.clone())
            } else {
                OracleError::ResponseParsing(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ResponseParsing(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// First entry of the preference list with an installed match. Installed
/// names carry tags ("medgemma:latest"), so matching is by prefix.
fn preferred_model(available: &[String]) -> Option<&'static str> {
    config::MODEL_PREFERENCES
        .iter()
        .find(|preferred| available.iter().any(|m| m.starts_with(*preferred)))
        .copied()
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

impl GenerationOracle for OllamaOracle {
    async fn is_available(&self) -> bool {
        match self.list_models().await {
            Ok(models) => models.iter().any(|m| m.starts_with(&self.model)),
            Err(_) => false,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                OracleError::Connection(self.base_url.clone())
            } else {
                OracleError::ResponseParsing(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::ResponseParsing(e.to_string()))?;
        Ok(parsed.response)
    }
}

/// One scripted mock step.
enum MockReply {
    Ok(String),
    Fail,
    /// Sleep past any reasonable engine timeout.
    Hang,
}

/// Mock oracle for tests — replays a script of replies, records prompts.
///
/// An exhausted script answers with a generic summary, so tests only
/// script the steps they care about.
pub struct MockOracle {
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    available: bool,
}

impl MockOracle {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        let mut oracle = Self::new();
        oracle.available = false;
        oracle
    }

    pub fn reply_ok(self, text: &str) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::Ok(text.to_string()));
        }
        self
    }

    pub fn reply_fail(self) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::Fail);
        }
        self
    }

    pub fn reply_hang(self) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(MockReply::Hang);
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationOracle for MockOracle {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        match reply {
            Some(MockReply::Ok(text)) => Ok(text),
            Some(MockReply::Fail) => Err(OracleError::Scripted),
            Some(MockReply::Hang) => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Err(OracleError::Scripted)
            }
            None => Ok("generated summary".to_string()),
        }
    }
}
