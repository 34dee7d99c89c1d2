//! The external speech capabilities the adapters drive.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐  create(config, sink)  ┌──────────────────────┐
//! │  RecognitionAdapter   │───────────────────────▶│ RecognitionPlatform  │
//! │                       │  start() / stop()      │   └ RecognitionHandle│
//! │   pump() / next_event │◀── RecognitionSink ────│                      │
//! └───────────────────────┘                        └──────────────────────┘
//!
//! ┌───────────────────────┐  speak(job, sink)      ┌──────────────────────┐
//! │   SynthesisAdapter    │───────────────────────▶│  SynthesisPlatform   │
//! │                       │  cancel/pause/resume   │                      │
//! │   pump() / next_event │◀── UtteranceSink ──────│                      │
//! │                       │◀── CatalogSink ────────│                      │
//! └───────────────────────┘                        └──────────────────────┘
//! ```
//!
//! Platform calls return immediately.  Outcomes arrive later as signals
//! through the sinks, on the same logical thread as the adapter.  The traits
//! carry no `Send` bound: the whole model is single-threaded.
//!
//! [`simulated`] provides a scripted in-memory platform.

pub mod events;
pub mod probe;
pub mod simulated;

use crate::config::RecognitionConfig;
use crate::error::PlatformError;
use crate::synthesis::{UtteranceJob, VoiceDescriptor};

pub use events::{
    Alternative, CatalogSink, HandleId, JobId, RecognitionEvent, RecognitionResult,
    RecognitionSignal, RecognitionSink, SynthesisEvent, UtteranceSignal, UtteranceSink,
};
pub use probe::{Capabilities, Capability, Unavailable};
pub use simulated::{SimulatedRecognition, SimulatedSynthesis};

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// A speech recognition capability.
pub trait RecognitionPlatform {
    /// Whether the capability exists in this environment.
    fn supported(&self) -> bool {
        true
    }

    /// Construct a new engine handle configured with `config`.  All of the
    /// handle's callbacks must be delivered through `sink`.
    fn create(
        &mut self,
        config: &RecognitionConfig,
        sink: RecognitionSink,
    ) -> Result<Box<dyn RecognitionHandle>, PlatformError>;
}

/// One recognition engine handle.
pub trait RecognitionHandle {
    /// Ask the engine to begin capture.  Confirmation arrives as
    /// [`RecognitionSignal::Start`].
    fn start(&mut self) -> Result<(), PlatformError>;

    /// Ask the engine to end capture.  Confirmation arrives as
    /// [`RecognitionSignal::End`].
    fn stop(&mut self) -> Result<(), PlatformError>;
}

// Compile-time assertion: both handles must be usable as trait objects.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn RecognitionPlatform>, _: Box<dyn RecognitionHandle>) {}
};

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// A text-to-speech capability.
pub trait SynthesisPlatform {
    /// Whether the capability exists in this environment.
    fn supported(&self) -> bool {
        true
    }

    /// The current voice catalog (possibly empty until the platform is ready).
    fn voices(&self) -> Vec<VoiceDescriptor>;

    /// Register the slot that receives catalog updates.
    fn watch_voices(&mut self, sink: CatalogSink);

    /// Submit one utterance.  Its callbacks must be delivered through `sink`.
    fn speak(&mut self, job: &UtteranceJob, sink: UtteranceSink) -> Result<(), PlatformError>;

    /// Stop speaking immediately and drop anything pending.
    fn cancel(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SynthesisPlatform>) {}
};
