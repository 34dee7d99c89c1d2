//! Capability probe.
//!
//! Presence of a capability does not change during a session, so each
//! adapter asks once, at construction, and caches the answer.

use serde::{Deserialize, Serialize};

use crate::config::RecognitionConfig;
use crate::error::PlatformError;
use crate::synthesis::{UtteranceJob, VoiceDescriptor};

use super::{
    CatalogSink, RecognitionHandle, RecognitionPlatform, RecognitionSink, SynthesisPlatform,
    UtteranceSink,
};

/// The two capabilities this crate adapts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Recognition,
    Synthesis,
}

impl Capability {
    /// Fixed user-facing message held by an adapter whose capability is absent.
    pub fn unsupported_message(&self) -> &'static str {
        match self {
            Capability::Recognition => "Speech recognition is not supported on this platform.",
            Capability::Synthesis => "Speech synthesis is not supported on this platform.",
        }
    }
}

/// Result of probing both capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub recognition: bool,
    pub synthesis: bool,
}

impl Capabilities {
    /// Probe both platforms.  Side-effect free.
    pub fn probe(recognition: &dyn RecognitionPlatform, synthesis: &dyn SynthesisPlatform) -> Self {
        Self {
            recognition: recognition.supported(),
            synthesis: synthesis.supported(),
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Recognition => self.recognition,
            Capability::Synthesis => self.synthesis,
        }
    }
}

// ---------------------------------------------------------------------------
// Unavailable
// ---------------------------------------------------------------------------

/// Stand-in for an environment that has neither capability.
///
/// Adapters built on it report themselves unsupported and turn every command
/// into a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl RecognitionPlatform for Unavailable {
    fn supported(&self) -> bool {
        false
    }

    fn create(
        &mut self,
        _config: &RecognitionConfig,
        _sink: RecognitionSink,
    ) -> Result<Box<dyn RecognitionHandle>, PlatformError> {
        Err(PlatformError::Unavailable(
            Capability::Recognition.unsupported_message().into(),
        ))
    }
}

impl SynthesisPlatform for Unavailable {
    fn supported(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        Vec::new()
    }

    fn watch_voices(&mut self, _sink: CatalogSink) {}

    fn speak(&mut self, _job: &UtteranceJob, _sink: UtteranceSink) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable(
            Capability::Synthesis.unsupported_message().into(),
        ))
    }

    fn cancel(&mut self) {}

    fn pause(&mut self) {}

    fn resume(&mut self) {}
}
