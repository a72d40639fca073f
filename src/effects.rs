//! External side effects around a generation cycle.
//!
//! The core never calls these; the enclosing application wires them to its
//! display cycle (copy button, feedback form).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("Feedback message is empty")]
    EmptyMessage,

    #[error("Feedback message too long ({len} chars, max {max})")]
    MessageTooLong { len: usize, max: usize },

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Maximum accepted feedback length in characters.
pub const MAX_FEEDBACK_CHARS: usize = 2000;

/// Copy text to the user's clipboard.
pub trait ClipboardSink: Send + Sync {
    fn copy_to_clipboard(&self, text: &str) -> Result<(), EffectError>;
}

/// Transmit a free-text feedback message.
pub trait FeedbackSink: Send + Sync {
    fn send_feedback(&self, message: &str) -> Result<(), EffectError>;
}

/// Reject blank and oversized messages before they reach a sink.
pub fn validate_feedback(message: &str) -> Result<&str, EffectError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(EffectError::EmptyMessage);
    }
    let len = trimmed.chars().count();
    if len > MAX_FEEDBACK_CHARS {
        return Err(EffectError::MessageTooLong {
            len,
            max: MAX_FEEDBACK_CHARS,
        });
    }
    Ok(trimmed)
}

/// Writes feedback to the structured log.
///
/// Only the length is logged at info. Feedback may quote patient data, so
/// the text itself goes to the `mediscript::feedback` target at debug,
/// which the default filter does not enable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedbackSink;

impl FeedbackSink for LogFeedbackSink {
    fn send_feedback(&self, message: &str) -> Result<(), EffectError> {
        tracing::info!(chars = message.chars().count(), "Feedback received");
        tracing::debug!(target: "mediscript::feedback", feedback = message, "Feedback text");
        Ok(())
    }
}

#[cfg(test)]
pub use test_sinks::*;


#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn blank_feedback_is_rejected() {
        assert_eq!(validate_feedback("  \n"), Err(EffectError::EmptyMessage));
    }

    #[test]
    fn long_feedback_is_rejected() {
        let msg = "a".repeat(MAX_FEEDBACK_CHARS + 1);
        assert!(matches!(
            validate_feedback(&msg),
            Err(EffectError::MessageTooLong { max: MAX_FEEDBACK_CHARS, .. })
        ));
    }

    #[test]
    fn feedback_is_trimmed() {
        assert_eq!(validate_feedback("  Danke! \n").unwrap(), "Danke!");
    }

    #[test]
    fn umlauts_count_as_single_chars() {
        let msg = "ä".repeat(MAX_FEEDBACK_CHARS);
        assert!(validate_feedback(&msg).is_ok());
    }

    #[test]
    fn log_sink_accepts_messages() {
        assert!(LogFeedbackSink.send_feedback("Bitte kürzer formulieren").is_ok());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn log_sink_keeps_text_out_of_default_log() {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(
                crate::config::default_log_filter(),
            ))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            LogFeedbackSink
                .send_feedback("Patientin 72 Jahre, Osteoporose")
                .unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Feedback received"));
        assert!(!output.contains("Osteoporose"));
    }
}
