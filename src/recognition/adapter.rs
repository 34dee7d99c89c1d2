//! Recognition session adapter.
//!
//! [`RecognitionAdapter`] owns at most one engine handle, built from its
//! [`RecognitionConfig`].  Commands ask the handle to start or stop and
//! return; `is_listening` only moves when the handle confirms through its
//! [`RecognitionSink`].
//!
//! ```text
//! start() ──▶ handle.start()                      [Starting]
//! Start   ──▶ listening, error cleared             [Listening]
//! Result  ──▶ finals appended, interim replaced
//! stop()  ──▶ handle.stop()                        [Stopping]
//! End     ──▶ not listening, transcript kept       [Idle]
//! Error   ──▶ classified error, not listening      [Idle]
//! ```
//!
//! Each handle gets a fresh [`HandleId`].  After [`reconfigure`] the old
//! handle's late signals are dropped.
//!
//! [`reconfigure`]: RecognitionAdapter::reconfigure

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::config::RecognitionConfig;
use crate::error::{classify_recognition, AdapterError, ErrorCategory};
use crate::platform::{
    Capability, HandleId, RecognitionEvent, RecognitionHandle, RecognitionPlatform,
    RecognitionSignal, RecognitionSink,
};

use super::state::{ListenInput, ListenPhase};
use super::transcript::{fold_batch, TranscriptSegment};

// ---------------------------------------------------------------------------
// RecognitionSnapshot
// ---------------------------------------------------------------------------

/// The published state of a [`RecognitionAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionSnapshot {
    pub supported: bool,
    pub listening: bool,
    pub phase: ListenPhase,
    pub transcript: Vec<TranscriptSegment>,
    pub interim: String,
    pub error: Option<AdapterError>,
}

// ---------------------------------------------------------------------------
// RecognitionAdapter
// ---------------------------------------------------------------------------

/// Speech-to-text adapter over a [`RecognitionPlatform`].
///
/// ```
/// use speech_adapters::config::RecognitionConfig;
/// use speech_adapters::platform::{RecognitionResult, SimulatedRecognition};
/// use speech_adapters::recognition::RecognitionAdapter;
///
/// let sim = SimulatedRecognition::new().with_auto_confirm();
/// let mut stt = RecognitionAdapter::new(Box::new(sim.clone()), RecognitionConfig::default());
///
/// stt.start();
/// stt.pump();
/// assert!(stt.is_listening());
///
/// sim.emit_results(vec![RecognitionResult::final_text("hello")], 0);
/// stt.pump();
/// assert_eq!(stt.transcript()[0].text, "hello");
/// ```
pub struct RecognitionAdapter {
    platform: Box<dyn RecognitionPlatform>,
    supported: bool,
    config: RecognitionConfig,
    handle: Option<Box<dyn RecognitionHandle>>,
    current: Option<HandleId>,
    next_handle: u64,
    phase: ListenPhase,
    transcript: Vec<TranscriptSegment>,
    interim: String,
    error: Option<AdapterError>,
    events_tx: mpsc::UnboundedSender<RecognitionEvent>,
    events_rx: mpsc::UnboundedReceiver<RecognitionEvent>,
    state_tx: watch::Sender<RecognitionSnapshot>,
}

impl RecognitionAdapter {
    /// Probe the platform and, when supported, build the first engine handle.
    ///
    /// An invalid `config` is repaired field by field (see
    /// [`RecognitionConfig::repaired`]) and the rejection is published as an
    /// [`ErrorCategory::InvalidRequest`] error.
    pub fn new(platform: Box<dyn RecognitionPlatform>, config: RecognitionConfig) -> Self {
        let supported = platform.supported();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (config, error) = match config.validate() {
            _ if !supported => {
                log::info!("recognition: capability not available");
                (config, Some(unsupported_error()))
            }
            Ok(()) => (config, None),
            Err(e) => {
                log::warn!("recognition: {e}; using defaults for invalid fields");
                (config.repaired(), Some(AdapterError::from_config(&e)))
            }
        };

        let initial = RecognitionSnapshot {
            supported,
            listening: false,
            phase: ListenPhase::Idle,
            transcript: Vec::new(),
            interim: String::new(),
            error: error.clone(),
        };
        let (state_tx, _) = watch::channel(initial);

        let mut adapter = Self {
            platform,
            supported,
            config,
            handle: None,
            current: None,
            next_handle: 1,
            phase: ListenPhase::Idle,
            transcript: Vec::new(),
            interim: String::new(),
            error,
            events_tx,
            events_rx,
            state_tx,
        };
        if supported {
            adapter.create_handle();
            adapter.publish();
        }
        adapter
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Ask the engine to begin capture.  No-op while listening.
    pub fn start(&mut self) {
        if !self.supported {
            self.error = Some(unsupported_error());
            self.publish();
            return;
        }
        if self.phase.is_listening() {
            log::debug!("recognition: start ignored while {}", self.phase.label());
            return;
        }
        if self.handle.is_none() {
            self.create_handle();
        }
        let Some(handle) = self.handle.as_mut() else {
            self.publish();
            return;
        };

        match handle.start() {
            Ok(()) => {
                self.error = None;
                self.apply(ListenInput::StartRequested);
            }
            Err(e) => {
                log::warn!("recognition: start rejected: {e}");
                self.error = Some(AdapterError::from_platform(&e));
            }
        }
        self.publish();
    }

    /// Ask the engine to end capture.  No-op unless listening.
    pub fn stop(&mut self) {
        if self.phase != ListenPhase::Listening {
            log::debug!("recognition: stop ignored while {}", self.phase.label());
            return;
        }
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        match handle.stop() {
            Ok(()) => self.apply(ListenInput::StopRequested),
            Err(e) => {
                log::warn!("recognition: stop rejected: {e}");
                self.error = Some(AdapterError::from_platform(&e));
            }
        }
        self.publish();
    }

    /// Stop when listening, start otherwise.
    pub fn toggle(&mut self) {
        if self.phase.is_listening() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Empty the transcript and the interim text.  Listening is unaffected.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.interim.clear();
        self.publish();
    }

    /// Replace the configuration.
    ///
    /// An invalid `config` is rejected: the current configuration and handle
    /// stay as they are and an [`ErrorCategory::InvalidRequest`] error is
    /// published.
    ///
    /// When `config` differs from the current one the active handle is
    /// stopped and dropped, and a new handle is built with `config`.  The
    /// adapter is not listening afterwards; call [`start`](Self::start) to
    /// resume capture.
    pub fn reconfigure(&mut self, config: RecognitionConfig) {
        if config == self.config {
            log::debug!("recognition: reconfigure with identical config ignored");
            return;
        }
        if let Err(e) = config.validate() {
            log::warn!("recognition: reconfigure rejected: {e}");
            if self.supported {
                self.error = Some(AdapterError::from_config(&e));
                self.publish();
            }
            return;
        }
        self.config = config;
        if !self.supported {
            return;
        }

        self.teardown();
        self.create_handle();
        self.publish();
    }

    /// Clear the published error.  An unsupported adapter keeps its error.
    pub fn reset_error(&mut self) {
        if self.supported {
            self.error = None;
            self.publish();
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn is_listening(&self) -> bool {
        self.phase.is_listening()
    }

    pub fn phase(&self) -> ListenPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[TranscriptSegment] {
        &self.transcript
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn error(&self) -> Option<&AdapterError> {
        self.error.as_ref()
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    /// Identity of the live engine handle, if one exists.
    pub fn handle_id(&self) -> Option<HandleId> {
        self.current
    }

    pub fn snapshot(&self) -> RecognitionSnapshot {
        RecognitionSnapshot {
            supported: self.supported,
            listening: self.is_listening(),
            phase: self.phase,
            transcript: self.transcript.clone(),
            interim: self.interim.clone(),
            error: self.error.clone(),
        }
    }

    /// A receiver that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<RecognitionSnapshot> {
        self.state_tx.subscribe()
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    /// Handle every pending engine signal.  Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next engine signal and handle it.
    pub async fn next_event(&mut self) -> Option<RecognitionEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    fn handle_event(&mut self, event: RecognitionEvent) {
        if self.current != Some(event.handle) {
            log::debug!(
                "recognition: dropping {:?} from stale {}",
                event.signal,
                event.handle
            );
            return;
        }

        match event.signal {
            RecognitionSignal::Start => {
                self.error = None;
                self.apply(ListenInput::Started);
            }
            RecognitionSignal::End => self.apply(ListenInput::Ended),
            RecognitionSignal::Error(code) => {
                let classification = classify_recognition(&code);
                log::warn!("recognition: {code}: {}", classification.message);
                self.error = Some(AdapterError::from_classification(&code, classification));
                self.apply(ListenInput::Failed);
            }
            RecognitionSignal::Result {
                results,
                resume_index,
            } => {
                let outcome = fold_batch(&results, resume_index, Utc::now());
                for segment in &outcome.finals {
                    log::debug!("recognition: final {:?}", segment.text);
                }
                self.transcript.extend(outcome.finals);
                self.interim = outcome.interim;
                self.error = None;
            }
        }
        self.publish();
    }

    // -----------------------------------------------------------------------
    // Handle lifecycle
    // -----------------------------------------------------------------------

    fn create_handle(&mut self) {
        let id = HandleId(self.next_handle);
        self.next_handle += 1;
        let sink = RecognitionSink::new(id, self.events_tx.clone());

        match self.platform.create(&self.config, sink) {
            Ok(handle) => {
                log::debug!(
                    "recognition: created {id} (lang={}, continuous={}, interim={})",
                    self.config.language,
                    self.config.continuous,
                    self.config.interim_results
                );
                self.handle = Some(handle);
                self.current = Some(id);
            }
            Err(e) => {
                log::warn!("recognition: could not create engine handle: {e}");
                self.error = Some(AdapterError::from_platform(&e));
            }
        }
    }

    fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if self.phase != ListenPhase::Idle {
                if let Err(e) = handle.stop() {
                    log::warn!("recognition: stop during teardown failed: {e}");
                }
            }
        }
        if let Some(id) = self.current.take() {
            log::debug!("recognition: tore down {id}");
        }
        self.apply(ListenInput::TornDown);
    }

    fn apply(&mut self, input: ListenInput) {
        match self.phase.transition(input) {
            Ok(next) => {
                if next != self.phase {
                    log::debug!("recognition: {} -> {}", self.phase.label(), next.label());
                }
                self.phase = next;
            }
            Err(e) => log::warn!("recognition: {e}"),
        }
    }

    /// Push changed fields into the watched snapshot.
    ///
    /// Every mutation is published before the next one, so the published
    /// transcript is either a prefix of `self.transcript` (results were
    /// appended) or longer than it (it was cleared).  Only the difference is
    /// copied.
    fn publish(&self) {
        let listening = self.is_listening();
        self.state_tx.send_if_modified(|current| {
            let mut changed = false;
            changed |= sync(&mut current.supported, &self.supported);
            changed |= sync(&mut current.listening, &listening);
            changed |= sync(&mut current.phase, &self.phase);
            changed |= sync(&mut current.interim, &self.interim);
            changed |= sync(&mut current.error, &self.error);

            let published = current.transcript.len();
            if published < self.transcript.len() {
                current
                    .transcript
                    .extend_from_slice(&self.transcript[published..]);
                changed = true;
            } else if published > self.transcript.len() {
                current.transcript.clone_from(&self.transcript);
                changed = true;
            }
            changed
        });
    }
}

impl Drop for RecognitionAdapter {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            if self.phase != ListenPhase::Idle {
                log::debug!("recognition: adapter dropped while {}, stopping", self.phase.label());
                if let Err(e) = handle.stop() {
                    log::warn!("recognition: stop on drop failed: {e}");
                }
            }
        }
    }
}

fn sync<T: PartialEq + Clone>(slot: &mut T, value: &T) -> bool {
    if slot == value {
        false
    } else {
        slot.clone_from(value);
        true
    }
}

fn unsupported_error() -> AdapterError {
    AdapterError::new(
        ErrorCategory::Unsupported,
        "unsupported",
        Capability::Recognition.unsupported_message(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
