//! Per-user session state.
//!
//! Each session owns one `FormAssembler` and at most one live
//! `GeneratedReport`. Sessions never share mutable state; the only
//! process-wide pieces are the read-only generator collaborators.
//!
//! Key properties:
//! - Sessions exist only in memory, never persisted
//! - A failed generation leaves the form and the previous report untouched
//! - Idle sessions are evicted after the configured timeout

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::effects::{ClipboardSink, EffectError};
use crate::form::{CaseNarrative, FormAssembler, FormError};
use crate::models::{DocumentType, GeneratedReport};
use crate::report::{ReportError, ReportGenerator};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Session lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Failure of a session generate cycle.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Result of one press of "generate".
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Narrative was blank; the service was not called.
    Skipped,
    Generated(GeneratedReport),
}

// ═══════════════════════════════════════════════════════════
// ReportSession: one user's form and last report
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct ReportSession {
    id: Uuid,
    form: FormAssembler,
    report: Option<GeneratedReport>,
    created_at: DateTime<Utc>,
    last_activity: Instant,
}

impl ReportSession {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            id: Uuid::new_v4(),
            form: FormAssembler::new(document_type),
            report: None,
            created_at: Utc::now(),
            last_activity: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn form(&self) -> &FormAssembler {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormAssembler {
        &mut self.form
    }

    pub fn report(&self) -> Option<&GeneratedReport> {
        self.report.as_ref()
    }

    /// Replace the live report (last writer wins).
    pub fn store_report(&mut self, report: GeneratedReport) {
        self.report = Some(report);
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    /// Hand the live report text to a clipboard. Returns `false` when there
    /// is no report yet.
    pub fn copy_report(&self, clipboard: &dyn ClipboardSink) -> Result<bool, EffectError> {
        match &self.report {
            Some(report) => clipboard.copy_to_clipboard(&report.text).map(|()| true),
            None => Ok(false),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// SessionStore: all live sessions
// ═══════════════════════════════════════════════════════════

/// Lock-per-session map. The outer `RwLock` only guards membership.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<ReportSession>>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Open a new session on `document_type` and return its id.
    pub fn create(&self, document_type: DocumentType) -> Result<Uuid, SessionError> {
        let session = ReportSession::new(document_type);
        let id = session.id();
        self.sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!(session_id = %id, document_type = document_type.as_str(), "Session created");
        Ok(id)
    }

    pub fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    /// The outer lock only guards membership, so a poisoned map is still readable.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: Uuid) -> Result<Arc<Mutex<ReportSession>>, SessionError> {
        self.sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Run `f` with exclusive access to one session. Marks it active.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ReportSession) -> T,
    ) -> Result<T, SessionError> {
        let handle = self.handle(id)?;
        let mut guard: MutexGuard<'_, ReportSession> =
            handle.lock().map_err(|_| SessionError::LockPoisoned)?;
        guard.touch();
        Ok(f(&mut guard))
    }

    /// Snapshot the inputs of a generate cycle without holding the lock
    /// across the external call.
    pub fn narrative(&self, id: Uuid) -> Result<(DocumentType, CaseNarrative), SessionError> {
        self.with_session(id, |s| (s.form().document_type(), s.form().build_narrative()))
    }

    /// Store a finished report if the session still exists.
    pub fn store_report(&self, id: Uuid, report: GeneratedReport) -> Result<(), SessionError> {
        self.with_session(id, |s| s.store_report(report))
    }

    /// One generate cycle for session `id`: snapshot the narrative, skip if
    /// blank, otherwise call the generator without holding the session lock
    /// and store the result (last writer wins).
    ///
    /// If the session disappears during the call the report is still
    /// returned, only not stored. A failed call leaves the form and the
    /// previous report untouched.
    pub fn generate(
        &self,
        id: Uuid,
        generator: &ReportGenerator,
    ) -> Result<GenerationOutcome, GenerateError> {
        let (document_type, narrative) = self.narrative(id)?;
        if narrative.is_blank() {
            tracing::debug!(session_id = %id, "Blank narrative, generation skipped");
            return Ok(GenerationOutcome::Skipped);
        }

        let report = generator.generate(document_type, &narrative)?;

        if let Err(e) = self.store_report(id, report.clone()) {
            tracing::warn!(session_id = %id, error = %e, "Report generated but not stored");
        }
        Ok(GenerationOutcome::Generated(report))
    }

    /// Drop sessions idle for longer than the timeout, and sessions whose
    /// lock is poisoned. Returns the count removed.
    pub fn evict_idle(&self) -> usize {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        // A session whose lock is held is in use, so it is kept.
        sessions.retain(|_, session| match session.try_lock() {
            Ok(s) => s.idle_for() < self.idle_timeout,
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }
}
