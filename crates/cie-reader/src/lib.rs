//! CIE Reader - Extractive QA client implementations
//!
//! Provides [`AnswerReader`] backends over HTTP:
//! - Hugging Face Inference API (hosted question-answering task)
//! - A local QA server wrapping a fine-tuned SQuAD2 checkpoint
//!
//! Both speak the same wire shape: a query plus a one-document context in,
//! a list of `{answer, score, start, end}` candidates out. An empty answer
//! string denotes the reader's "no answer" response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use cie_core::{AnswerReader, CieError, RawAnswer, ReaderConfig, ReaderProvider, Result};

// ============================================================================
// Wire Types
// ============================================================================

/// One candidate answer on the wire
#[derive(Debug, Deserialize)]
struct QaAnswer {
    answer: String,
    score: f32,
    start: usize,
    end: usize,
}

impl From<QaAnswer> for RawAnswer {
    fn from(wire: QaAnswer) -> Self {
        if wire.answer.is_empty() {
            // Impossible-answer responses carry zeroed offsets; drop them too
            RawAnswer::no_answer(wire.score)
        } else {
            RawAnswer::new(wire.answer, wire.score, wire.start, wire.end)
        }
    }
}

// ============================================================================
// Hugging Face Inference API Reader
// ============================================================================

/// Hugging Face Inference API question-answering client
pub struct HfApiReader {
    client: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
    top_k: usize,
    allow_no_answer: bool,
}

#[derive(Debug, Serialize)]
struct HfRequest<'a> {
    inputs: HfInputs<'a>,
    parameters: HfParameters,
}

#[derive(Debug, Serialize)]
struct HfInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    top_k: usize,
    handle_impossible_answer: bool,
}

/// The API returns a bare object for `top_k == 1`, an array otherwise
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HfResponse {
    Many(Vec<QaAnswer>),
    One(QaAnswer),
}

impl HfApiReader {
    /// Create a new Hugging Face reader
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, top_k: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_token: None,
            top_k,
            allow_no_answer: true,
        }
    }

    /// Create from config
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CieError::Reader(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_token: config.api_token.clone(),
            top_k: config.top_k,
            allow_no_answer: config.allow_no_answer,
        })
    }

    /// Set the API token
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[async_trait]
impl AnswerReader for HfApiReader {
    async fn read(&self, query: &str, document: &str) -> Result<Vec<RawAnswer>> {
        let request = HfRequest {
            inputs: HfInputs {
                question: query,
                context: document,
            },
            parameters: HfParameters {
                top_k: self.top_k,
                handle_impossible_answer: self.allow_no_answer,
            },
        };

        let mut builder = self
            .client
            .post(format!("{}/models/{}", self.base_url, self.model))
            .json(&request);

        if let Some(ref token) = self.api_token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CieError::Reader(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CieError::Reader(format!("HF API error: {error_text}")));
        }

        let result: HfResponse = response
            .json()
            .await
            .map_err(|e| CieError::Reader(format!("Failed to parse response: {e}")))?;

        let answers = match result {
            HfResponse::Many(answers) => answers,
            HfResponse::One(answer) => vec![answer],
        };

        Ok(answers.into_iter().map(RawAnswer::from).collect())
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

// ============================================================================
// Local QA Server Reader
// ============================================================================

/// Client for a self-hosted QA server exposing the fine-tuned checkpoint
pub struct LocalQaReader {
    client: Client,
    base_url: String,
    top_k: usize,
    allow_no_answer: bool,
}

#[derive(Debug, Serialize)]
struct LocalQaRequest<'a> {
    question: &'a str,
    context: &'a str,
    top_k: usize,
    handle_impossible_answer: bool,
}

#[derive(Debug, Deserialize)]
struct LocalQaResponse {
    answers: Vec<QaAnswer>,
}

impl LocalQaReader {
    /// Create a new local reader
    pub fn new(base_url: impl Into<String>, top_k: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            top_k,
            allow_no_answer: true,
        }
    }

    /// Create from config
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CieError::Reader(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            top_k: config.top_k,
            allow_no_answer: config.allow_no_answer,
        })
    }
}

#[async_trait]
impl AnswerReader for LocalQaReader {
    async fn read(&self, query: &str, document: &str) -> Result<Vec<RawAnswer>> {
        let request = LocalQaRequest {
            question: query,
            context: document,
            top_k: self.top_k,
            handle_impossible_answer: self.allow_no_answer,
        };

        let response = self
            .client
            .post(format!("{}/qa", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| CieError::Reader(format!("Local QA request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CieError::Reader(format!("Local QA error: {error_text}")));
        }

        let result: LocalQaResponse = response
            .json()
            .await
            .map_err(|e| CieError::Reader(format!("Failed to parse local QA response: {e}")))?;

        Ok(result.answers.into_iter().map(RawAnswer::from).collect())
    }

    fn name(&self) -> &str {
        "local"
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an answer reader from config
pub fn create_reader(config: &ReaderConfig) -> Result<Box<dyn AnswerReader>> {
    match config.provider {
        ReaderProvider::HuggingFace => Ok(Box::new(HfApiReader::from_config(config)?)),
        ReaderProvider::Local => Ok(Box::new(LocalQaReader::from_config(config)?)),
    }
}

// ============================================================================
// Tests
// ============================================================================
