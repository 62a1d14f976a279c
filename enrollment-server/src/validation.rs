//! Collaborator lookups for student and course identifiers
//!
//! Provides:
//! - `Validator` trait (testable seam)
//! - `HttpValidator` using reqwest with a per-call timeout
//! - `MockValidator` scripted per URL for tests
//! - `LookupTargets` building the per-identifier URLs
//!
//! Fail-closed: a lookup is valid only when the collaborator answers
//! exactly 200 with a JSON object body. The object's fields are never
//! compared with the requested id.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// Largest lookup body accepted before the answer is treated as invalid
pub const MAX_LOOKUP_BODY_BYTES: usize = 64 * 1024;

/// Decides whether a collaborator confirms an identifier
#[async_trait]
pub trait Validator: Send + Sync {
    /// GET `url` and report whether it confirmed the identifier.
    async fn validate(&self, url: &str) -> bool;
}

/// Real validator backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct HttpValidator {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpValidator {
    /// Build a validator whose lookups give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("enrollment-service/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_body_bytes: MAX_LOOKUP_BODY_BYTES,
        })
    }

    /// Override the body size cap.
    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Read the body, giving up once it grows past the cap.
    async fn read_capped(&self, url: &str, mut response: reqwest::Response) -> Option<Vec<u8>> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            tracing::debug!(url, limit, "Lookup body too large");
            return None;
        }

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > limit {
                        tracing::debug!(url, limit, "Lookup body too large");
                        return None;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => return Some(body),
                Err(e) => {
                    tracing::warn!(url, error = %e, "Lookup body could not be read");
                    return None;
                }
            }
        }
    }
}

#[async_trait]
impl Validator for HttpValidator {
    async fn validate(&self, url: &str) -> bool {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "Lookup request failed");
                return false;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::debug!(url, status = status.as_u16(), "Lookup rejected by status");
            return false;
        }

        match self.read_capped(url, response).await {
            Some(body) => is_json_object(&body),
            None => false,
        }
    }
}

/// True when `body` parses as a JSON object (any fields, including none).
pub fn is_json_object(body: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body).is_ok()
}

/// Base addresses of the Student and Course services
#[derive(Debug, Clone)]
pub struct LookupTargets {
    student_base: String,
    course_base: String,
}

impl LookupTargets {
    pub fn new(student_base: impl Into<String>, course_base: impl Into<String>) -> Self {
        Self {
            student_base: student_base.into().trim_end_matches('/').to_owned(),
            course_base: course_base.into().trim_end_matches('/').to_owned(),
        }
    }

    /// `{student_base}/students/{id}` with the id encoded as one path segment.
    pub fn student_url(&self, student_id: &str) -> String {
        format!(
            "{}/students/{}",
            self.student_base,
            urlencoding::encode(student_id)
        )
    }

    /// `{course_base}/courses/{id}`
    pub fn course_url(&self, course_id: i32) -> String {
        format!("{}/courses/{}", self.course_base, course_id)
    }
}

/// Mock validator for testing.
///
/// Answers per exact URL, falls back to a default, and records every call.
pub struct MockValidator {
    answers: Mutex<HashMap<String, bool>>,
    default: bool,
    calls: Mutex<Vec<String>>,
}

impl MockValidator {
    /// Validator that answers `default` for any URL without a scripted answer.
    pub fn new(default: bool) -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            default,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the answer for one URL.
    pub fn answer(&self, url: impl Into<String>, valid: bool) {
        if let Ok(mut answers) = self.answers.lock() {
            answers.insert(url.into(), valid);
        }
    }

    /// URLs looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of lookups whose URL contains `fragment`.
    pub fn calls_matching(&self, fragment: &str) -> usize {
        self.calls().iter().filter(|u| u.contains(fragment)).count()
    }
}

#[async_trait]
impl Validator for MockValidator {
    async fn validate(&self, url: &str) -> bool {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_owned());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|answers| answers.get(url).copied())
            .unwrap_or(self.default)
    }
}
