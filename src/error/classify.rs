//! Platform error-code classifier.
//!
//! Pure lookups over one fixed table per adapter kind.  Codes missing from a
//! table fall back to a templated message and [`ErrorCategory::Unknown`].

use std::borrow::Cow;

use super::ErrorCategory;

/// Result of a classifier lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: ErrorCategory,
    pub message: Cow<'static, str>,
}

type Table = &'static [(&'static str, ErrorCategory, &'static str)];

const RECOGNITION_CODES: Table = &[
    ("network", ErrorCategory::TransientPlatformError, "Network error occurred"),
    ("not-allowed", ErrorCategory::PermissionDenied, "Microphone permission denied"),
    ("service-not-allowed", ErrorCategory::PermissionDenied, "Speech service not allowed"),
    ("no-speech", ErrorCategory::NoInputDetected, "No speech detected"),
    ("aborted", ErrorCategory::TransientPlatformError, "Speech recognition aborted"),
    ("audio-capture", ErrorCategory::TransientPlatformError, "No microphone found"),
    ("bad-grammar", ErrorCategory::InvalidRequest, "Grammar error in speech recognition"),
    ("language-not-supported", ErrorCategory::InvalidRequest, "Language not supported"),
];

const SYNTHESIS_CODES: Table = &[
    ("canceled", ErrorCategory::TransientPlatformError, "Speech was canceled"),
    ("interrupted", ErrorCategory::TransientPlatformError, "Speech was interrupted"),
    ("audio-busy", ErrorCategory::TransientPlatformError, "Audio output is busy"),
    ("audio-hardware", ErrorCategory::TransientPlatformError, "Audio hardware error"),
    ("network", ErrorCategory::TransientPlatformError, "Network error"),
    (
        "synthesis-unavailable",
        ErrorCategory::TransientPlatformError,
        "Speech synthesis unavailable",
    ),
    ("synthesis-failed", ErrorCategory::TransientPlatformError, "Speech synthesis failed"),
    ("language-unavailable", ErrorCategory::InvalidRequest, "Language not available"),
    ("voice-unavailable", ErrorCategory::InvalidRequest, "Voice not available"),
    ("text-too-long", ErrorCategory::InvalidRequest, "Text is too long"),
    ("invalid-argument", ErrorCategory::InvalidRequest, "Invalid argument"),
    ("not-allowed", ErrorCategory::PermissionDenied, "Speech synthesis not allowed"),
];

fn lookup(table: Table, raw_code: &str, fallback_prefix: &str) -> Classification {
    match table.iter().find(|(code, _, _)| *code == raw_code) {
        Some((_, category, message)) => Classification {
            category: *category,
            message: Cow::Borrowed(*message),
        },
        None => Classification {
            category: ErrorCategory::Unknown,
            message: Cow::Owned(format!("{fallback_prefix}: {raw_code}")),
        },
    }
}

/// Classify a recognition-engine error code.
///
/// ```
/// use speech_adapters::error::{classify_recognition, ErrorCategory};
///
/// let c = classify_recognition("not-allowed");
/// assert_eq!(c.category, ErrorCategory::PermissionDenied);
/// assert_eq!(c.message, "Microphone permission denied");
///
/// let c = classify_recognition("mystery");
/// assert_eq!(c.category, ErrorCategory::Unknown);
/// assert_eq!(c.message, "Speech recognition error: mystery");
/// ```
pub fn classify_recognition(raw_code: &str) -> Classification {
    lookup(RECOGNITION_CODES, raw_code, "Speech recognition error")
}

/// Classify a synthesis (utterance) error code.
pub fn classify_synthesis(raw_code: &str) -> Classification {
    lookup(SYNTHESIS_CODES, raw_code, "Speech synthesis error")
}
