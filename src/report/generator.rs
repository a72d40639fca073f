use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use super::completion::{CompletionClient, CompletionRequest};
use super::templates::TemplateRegistry;
use super::{CompletionError, ReportError};
use crate::config;
use crate::form::CaseNarrative;
use crate::models::{DocumentType, GeneratedReport};

/// Decoding and transport settings shared by every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    /// Upper bound for one completion call, enforced by the generator.
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: config::DEFAULT_MODEL.to_string(),
            temperature: config::TEMPERATURE,
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Turns (document type, narrative) into a report via one completion call.
///
/// Holds only process-wide, read-only collaborators, so one instance is
/// shared by all sessions.
pub struct ReportGenerator {
    templates: Arc<TemplateRegistry>,
    client: Arc<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl ReportGenerator {
    pub fn new(
        templates: Arc<TemplateRegistry>,
        client: Arc<dyn CompletionClient>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            templates,
            client,
            settings,
        }
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Resolve the template, submit one request, wrap the answer.
    ///
    /// The caller is responsible for skipping blank narratives. No retry is
    /// attempted; every failure of the service surfaces as `GenerationFailed`.
    pub fn generate(
        &self,
        document_type: DocumentType,
        narrative: &CaseNarrative,
    ) -> Result<GeneratedReport, ReportError> {
        let instruction = self.templates.resolve(document_type)?;
        let request = CompletionRequest::new(
            &self.settings.model,
            instruction,
            narrative.as_str(),
            self.settings.temperature,
        );

        tracing::debug!(
            document_type = document_type.as_str(),
            model = %self.settings.model,
            narrative_len = narrative.as_str().len(),
            "Submitting completion request"
        );

        let started = Instant::now();
        let text = self
            .complete_within_timeout(request)
            .map_err(ReportError::GenerationFailed)?;
        let elapsed = started.elapsed();

        tracing::info!(
            document_type = document_type.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Report generated"
        );

        Ok(GeneratedReport {
            document_type,
            text,
            model: self.settings.model.clone(),
            elapsed,
            generated_at: Utc::now(),
        })
    }

    /// Run the client call on a worker thread and stop waiting after the
    /// configured timeout. A late answer is discarded with the worker.
    fn complete_within_timeout(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let timeout = self.settings.timeout;
        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("completion-call".into())
            .spawn(move || {
                let _ = tx.send(client.complete(&request));
            })
            .map_err(|e| CompletionError::HttpClient(format!("Cannot spawn worker: {e}")))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(CompletionError::Timeout(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CompletionError::HttpClient(
                "completion worker exited without a result".into(),
            )),
        }
    }
}
