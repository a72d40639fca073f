//! Instruction templates (system prompts) per document type.
//!
//! Sources, in increasing precedence:
//! 1. a JSON object file keyed by template key (`{"ERSTBERICHT_PROMPT": "..."}`)
//! 2. environment variables named by the template keys

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use super::ReportError;
use crate::models::DocumentType;

#[derive(Error, Debug)]
pub enum TemplateLoadError {
    #[error("Failed to read template file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Template file {path} is not a JSON object of strings: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only lookup from document type to instruction string.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<DocumentType, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Blank instructions are ignored.
    pub fn with(mut self, document_type: DocumentType, instruction: impl Into<String>) -> Self {
        self.insert(document_type, instruction);
        self
    }

    pub fn insert(&mut self, document_type: DocumentType, instruction: impl Into<String>) {
        let instruction = instruction.into();
        if instruction.trim().is_empty() {
            self.templates.remove(&document_type);
        } else {
            self.templates.insert(document_type, instruction);
        }
    }

    /// Load templates from a JSON object file. Unknown keys are skipped.
    pub fn from_json_file(path: &Path) -> Result<Self, TemplateLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TemplateLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| TemplateLoadError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let mut registry = Self::new();
        for (key, instruction) in entries {
            match DocumentType::from_template_key(&key) {
                Some(document_type) => registry.insert(document_type, instruction),
                None => tracing::warn!(key = %key, "Ignoring unknown template key"),
            }
        }
        Ok(registry)
    }

    /// Overlay templates found through `lookup` (normally `std::env::var`).
    pub fn overlay_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for document_type in DocumentType::all() {
            if let Some(instruction) = lookup(document_type.template_key()) {
                self.insert(*document_type, instruction);
            }
        }
    }

    pub fn overlay_env(&mut self) {
        self.overlay_from(|key| std::env::var(key).ok());
    }

    /// Instruction for `document_type`, or `TemplateNotConfigured`.
    pub fn resolve(&self, document_type: DocumentType) -> Result<&str, ReportError> {
        self.templates
            .get(&document_type)
            .map(String::as_str)
            .ok_or(ReportError::TemplateNotConfigured(document_type))
    }

    pub fn is_configured(&self, document_type: DocumentType) -> bool {
        self.templates.contains_key(&document_type)
    }

    /// Configured document types in selector order.
    pub fn configured(&self) -> Vec<DocumentType> {
        DocumentType::all()
            .iter()
            .copied()
            .filter(|t| self.is_configured(*t))
            .collect()
    }
}
