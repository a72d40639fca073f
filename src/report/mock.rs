//! Test doubles for the completion boundary.

use std::sync::Mutex;
use std::time::Duration;

use super::completion::{CompletionClient, CompletionRequest, Role};
use super::CompletionError;

/// Returns the narrative segment unchanged.
pub struct EchoCompletionClient;

impl CompletionClient for EchoCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        request
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .ok_or_else(|| CompletionError::MalformedResponse("no user message".into()))
    }
}

/// Returns a configured response and records every request it sees.
pub struct RecordingCompletionClient {
    response: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl RecordingCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletionClient for RecordingCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Always fails with the configured error.
pub struct FailingCompletionClient {
    error: CompletionError,
}

impl FailingCompletionClient {
    pub fn new(error: CompletionError) -> Self {
        Self { error }
    }
}

impl CompletionClient for FailingCompletionClient {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(self.error.clone())
    }
}

/// Sleeps before answering, to exercise the timeout bound.
pub struct StalledCompletionClient {
    delay: Duration,
}

impl StalledCompletionClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl CompletionClient for StalledCompletionClient {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        std::thread::sleep(self.delay);
        Ok("late answer".into())
    }
}
