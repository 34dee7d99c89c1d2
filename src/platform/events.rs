//! Signals delivered by the platform and the identity-bound sinks that carry
//! them back to the owning adapter.
//!
//! Every engine handle and every utterance job gets its own sink.  The sink
//! stamps each signal with the identity it was created for, so an adapter can
//! tell a signal from its current handle/job apart from a late one sent by a
//! handle/job it already tore down.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::synthesis::VoiceDescriptor;

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Generation number of a recognition engine handle within one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub u64);

/// Sequence number of an utterance job within one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recognition
// ---------------------------------------------------------------------------

/// One hypothesis for a recognition result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub transcript: String,
    pub confidence: f32,
}

/// One entry of a result batch.
///
/// `alternatives` is ordered best-first, as the platform reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub alternatives: Vec<Alternative>,
    pub is_final: bool,
}

impl RecognitionResult {
    /// A final result with a single alternative.
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Alternative {
                transcript: text.into(),
                confidence: 1.0,
            }],
            is_final: true,
        }
    }

    /// A provisional result with a single alternative.
    pub fn interim_text(text: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Alternative {
                transcript: text.into(),
                confidence: 0.5,
            }],
            is_final: false,
        }
    }

    /// Transcript of the best alternative, or `""` when there is none.
    pub fn best(&self) -> &str {
        self.alternatives
            .first()
            .map(|a| a.transcript.as_str())
            .unwrap_or("")
    }
}

/// A callback from a recognition engine handle.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionSignal {
    /// Capture has started.
    Start,
    /// Capture has ended (naturally or after a stop request).
    End,
    /// The engine failed with a platform error code.
    Error(String),
    /// A result batch.  `results` is the session's full result list and
    /// `resume_index` the first entry that changed since the last batch.
    Result {
        results: Vec<RecognitionResult>,
        resume_index: usize,
    },
}

/// A [`RecognitionSignal`] stamped with the handle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionEvent {
    pub handle: HandleId,
    pub signal: RecognitionSignal,
}

/// Sender handed to a recognition engine handle at creation.
#[derive(Debug, Clone)]
pub struct RecognitionSink {
    handle: HandleId,
    tx: UnboundedSender<RecognitionEvent>,
}

impl RecognitionSink {
    pub(crate) fn new(handle: HandleId, tx: UnboundedSender<RecognitionEvent>) -> Self {
        Self { handle, tx }
    }

    /// The handle this sink reports for.
    pub fn handle(&self) -> HandleId {
        self.handle
    }

    /// Deliver a signal.  Returns `false` once the adapter is gone.
    pub fn emit(&self, signal: RecognitionSignal) -> bool {
        self.tx
            .send(RecognitionEvent {
                handle: self.handle,
                signal,
            })
            .is_ok()
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// A callback from an utterance job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceSignal {
    Start,
    End,
    Error(String),
    Pause,
    Resume,
}

/// Everything the synthesis adapter listens to.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    /// A signal from one utterance job.
    Utterance { job: JobId, signal: UtteranceSignal },
    /// The platform's voice catalog changed; carries the full new catalog.
    VoicesChanged(Vec<VoiceDescriptor>),
}

/// Sender handed to the platform with each utterance job.
#[derive(Debug, Clone)]
pub struct UtteranceSink {
    job: JobId,
    tx: UnboundedSender<SynthesisEvent>,
}

impl UtteranceSink {
    pub(crate) fn new(job: JobId, tx: UnboundedSender<SynthesisEvent>) -> Self {
        Self { job, tx }
    }

    pub fn job(&self) -> JobId {
        self.job
    }

    /// Deliver a signal.  Returns `false` once the adapter is gone.
    pub fn emit(&self, signal: UtteranceSignal) -> bool {
        self.tx
            .send(SynthesisEvent::Utterance {
                job: self.job,
                signal,
            })
            .is_ok()
    }
}

/// Sender the platform uses to announce voice catalog updates.
#[derive(Debug, Clone)]
pub struct CatalogSink {
    tx: UnboundedSender<SynthesisEvent>,
}

impl CatalogSink {
    pub(crate) fn new(tx: UnboundedSender<SynthesisEvent>) -> Self {
        Self { tx }
    }

    /// Deliver a full replacement catalog.  Returns `false` once the adapter
    /// is gone.
    pub fn emit(&self, voices: Vec<VoiceDescriptor>) -> bool {
        self.tx.send(SynthesisEvent::VoicesChanged(voices)).is_ok()
    }
}
