//! Error taxonomy shared by both adapters.
//!
//! Adapters never return errors from their commands.  Everything that goes
//! wrong is published as an [`AdapterError`] in the adapter state so the
//! consuming screen can render it.  The only `Result`-returning boundaries
//! are the platform traits ([`PlatformError`]) and configuration
//! ([`ConfigError`]).

pub mod classify;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use classify::{classify_recognition, classify_synthesis, Classification};

// ---------------------------------------------------------------------------
// ErrorCategory
// ---------------------------------------------------------------------------

/// Coarse category of an adapter error.
///
/// Every category is recoverable: after reporting it the adapter is back in
/// its idle / not-listening state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The platform capability does not exist in this environment.
    Unsupported,
    /// The user or the platform refused access (microphone, speech service).
    PermissionDenied,
    /// Capture ran but nothing was heard.
    NoInputDetected,
    /// Network, audio hardware, busy device, aborted session.
    TransientPlatformError,
    /// Empty text, bad language or voice, bad grammar.
    InvalidRequest,
    /// A platform code the classifier does not know.
    Unknown,
}

impl ErrorCategory {
    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Unsupported => "Unsupported",
            ErrorCategory::PermissionDenied => "Permission denied",
            ErrorCategory::NoInputDetected => "No input",
            ErrorCategory::TransientPlatformError => "Platform error",
            ErrorCategory::InvalidRequest => "Invalid request",
            ErrorCategory::Unknown => "Unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// AdapterError
// ---------------------------------------------------------------------------

/// An error published as adapter state.
///
/// Transient: replaced or cleared by the next successful transition, never
/// accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterError {
    /// Coarse category.
    pub category: ErrorCategory,
    /// The code as reported by the platform (or an adapter-local code such as
    /// `"unsupported"` / `"empty-text"`).
    pub raw_code: String,
    /// Message intended for display.
    pub message: String,
}

impl AdapterError {
    pub fn new(
        category: ErrorCategory,
        raw_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            raw_code: raw_code.into(),
            message: message.into(),
        }
    }

    /// Build from a classifier lookup.
    pub fn from_classification(raw_code: &str, classification: Classification) -> Self {
        Self::new(classification.category, raw_code, classification.message)
    }

    /// Build from a synchronous platform rejection.
    pub fn from_platform(err: &PlatformError) -> Self {
        let category = match err {
            PlatformError::InvalidState(_) => ErrorCategory::InvalidRequest,
            PlatformError::Rejected(_) | PlatformError::Unavailable(_) => {
                ErrorCategory::TransientPlatformError
            }
        };
        Self::new(category, err.code(), err.to_string())
    }

    /// Build from a rejected configuration.
    pub fn from_config(err: &ConfigError) -> Self {
        Self::new(ErrorCategory::InvalidRequest, "invalid-config", err.to_string())
    }
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// PlatformError
// ---------------------------------------------------------------------------

/// A synchronous rejection raised by a platform call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The handle is in the wrong state for the request (e.g. already started).
    #[error("{0}")]
    InvalidState(String),

    /// The platform refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The engine could not be created or reached.
    #[error("{0}")]
    Unavailable(String),
}

impl PlatformError {
    /// Stable code used as [`AdapterError::raw_code`].
    pub fn code(&self) -> &'static str {
        match self {
            PlatformError::InvalidState(_) => "invalid-state",
            PlatformError::Rejected(_) => "rejected",
            PlatformError::Unavailable(_) => "unavailable",
        }
    }
}

// ---------------------------------------------------------------------------
// IllegalTransition
// ---------------------------------------------------------------------------

/// Returned by the adapter state machines when an input is not legal in the
/// current phase.  Adapters log and drop such inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal transition: {input} while {phase}")]
pub struct IllegalTransition {
    pub phase: &'static str,
    pub input: &'static str,
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_alternatives must be at least 1 (got {0})")]
    MaxAlternatives(u32),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
