//! Synthesis queue adapter.
//!
//! [`SynthesisAdapter`] owns at most one utterance job.  Commands issue a
//! platform request and return; the `speaking` / `paused` flags only move
//! when the platform confirms, through the job's [`UtteranceSink`].  The one
//! exception is [`cancel`](SynthesisAdapter::cancel), which settles the state
//! synchronously.
//!
//! ```text
//! speak("hi")
//!   └─▶ cancel in-flight job, build UtteranceJob, platform.speak   [Starting]
//! Start ──▶ [Speaking] ──pause()──▶ [Pausing] ──Pause──▶ [Paused]
//! [Paused] ──resume()──▶ [Resuming] ──Resume──▶ [Speaking]
//! End / Error / cancel() ──▶ [Idle]
//! ```
//!
//! Signals from a job the adapter no longer owns are dropped, so a late `End`
//! after `cancel()` or after a newer `speak()` never touches the state.

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::config::SynthesisConfig;
use crate::error::{classify_synthesis, AdapterError, ErrorCategory};
use crate::platform::{
    Capability, CatalogSink, JobId, SynthesisEvent, SynthesisPlatform, UtteranceSignal,
    UtteranceSink,
};

use super::state::{SynthesisInput, SynthesisPhase};
use super::utterance::{SynthesisOverrides, UtteranceJob};
use super::voice::VoiceDescriptor;

// ---------------------------------------------------------------------------
// SynthesisSnapshot
// ---------------------------------------------------------------------------

/// The published state of a [`SynthesisAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisSnapshot {
    pub supported: bool,
    pub speaking: bool,
    pub paused: bool,
    pub phase: SynthesisPhase,
    pub voices: Vec<VoiceDescriptor>,
    pub error: Option<AdapterError>,
}

// ---------------------------------------------------------------------------
// SynthesisAdapter
// ---------------------------------------------------------------------------

/// Text-to-speech adapter over a [`SynthesisPlatform`].
///
/// ```
/// use speech_adapters::config::SynthesisConfig;
/// use speech_adapters::platform::SimulatedSynthesis;
/// use speech_adapters::synthesis::SynthesisAdapter;
///
/// let sim = SimulatedSynthesis::new().with_auto_confirm();
/// let mut tts = SynthesisAdapter::new(Box::new(sim.clone()), SynthesisConfig::default());
///
/// tts.speak("Hello there");
/// tts.pump();
/// assert!(tts.is_speaking());
///
/// sim.finish();
/// tts.pump();
/// assert!(!tts.is_speaking());
/// ```
pub struct SynthesisAdapter {
    platform: Box<dyn SynthesisPlatform>,
    supported: bool,
    config: SynthesisConfig,
    phase: SynthesisPhase,
    voices: Vec<VoiceDescriptor>,
    error: Option<AdapterError>,
    current: Option<JobId>,
    next_job: u64,
    events_tx: mpsc::UnboundedSender<SynthesisEvent>,
    events_rx: mpsc::UnboundedReceiver<SynthesisEvent>,
    state_tx: watch::Sender<SynthesisSnapshot>,
}

impl SynthesisAdapter {
    /// Probe the platform, load the voice catalog and subscribe to catalog
    /// updates.
    pub fn new(mut platform: Box<dyn SynthesisPlatform>, config: SynthesisConfig) -> Self {
        let supported = platform.supported();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let (voices, error) = if supported {
            platform.watch_voices(CatalogSink::new(events_tx.clone()));
            (platform.voices(), None)
        } else {
            log::info!("synthesis: capability not available");
            (Vec::new(), Some(unsupported_error()))
        };

        let initial = SynthesisSnapshot {
            supported,
            speaking: false,
            paused: false,
            phase: SynthesisPhase::Idle,
            voices: voices.clone(),
            error: error.clone(),
        };
        let (state_tx, _) = watch::channel(initial);

        log::debug!("synthesis: adapter ready with {} voices", voices.len());

        Self {
            platform,
            supported,
            config,
            phase: SynthesisPhase::Idle,
            voices,
            error,
            current: None,
            next_job: 1,
            events_tx,
            events_rx,
            state_tx,
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Speak `text` with the base configuration.
    pub fn speak(&mut self, text: &str) {
        self.speak_with(text, &SynthesisOverrides::default());
    }

    /// Speak `text` with `overrides` merged over the base configuration.
    ///
    /// Any utterance in flight is cancelled first.  Blank text is rejected
    /// with an [`ErrorCategory::InvalidRequest`] error and leaves the current
    /// utterance alone.
    pub fn speak_with(&mut self, text: &str, overrides: &SynthesisOverrides) {
        if !self.supported {
            self.error = Some(unsupported_error());
            self.publish();
            return;
        }
        if text.trim().is_empty() {
            log::warn!("synthesis: refusing to speak blank text");
            self.error = Some(AdapterError::new(
                ErrorCategory::InvalidRequest,
                "empty-text",
                "Please provide text to speak",
            ));
            self.publish();
            return;
        }

        if let Some(old) = self.current.take() {
            log::debug!("synthesis: {old} superseded");
            self.platform.cancel();
            self.apply(SynthesisInput::Cancel);
        }
        self.error = None;

        let id = JobId(self.next_job);
        self.next_job += 1;
        let job = UtteranceJob::build(id, text, &self.config, overrides, &self.voices);
        log::debug!(
            "synthesis: {id} rate={} pitch={} volume={} lang={} voice={}",
            job.rate,
            job.pitch,
            job.volume,
            job.language,
            job.voice.as_ref().map_or("<default>", |v| v.name.as_str()),
        );

        let sink = UtteranceSink::new(id, self.events_tx.clone());
        match self.platform.speak(&job, sink) {
            Ok(()) => {
                self.current = Some(id);
                self.apply(SynthesisInput::Speak);
            }
            Err(e) => {
                log::warn!("synthesis: speak rejected: {e}");
                self.error = Some(AdapterError::from_platform(&e));
            }
        }
        self.publish();
    }

    /// Stop the current utterance.  `speaking` and `paused` drop to `false`
    /// immediately.
    pub fn cancel(&mut self) {
        if !self.supported {
            return;
        }
        self.platform.cancel();
        if let Some(job) = self.current.take() {
            log::debug!("synthesis: {job} cancelled");
        }
        self.apply(SynthesisInput::Cancel);
        self.publish();
    }

    /// Ask the platform to pause.  Only meaningful while speaking.
    pub fn pause(&mut self) {
        if !self.supported || self.phase != SynthesisPhase::Speaking {
            log::debug!("synthesis: pause ignored while {}", self.phase.label());
            return;
        }
        self.platform.pause();
        self.apply(SynthesisInput::PauseRequested);
        self.publish();
    }

    /// Ask the platform to resume.  Only meaningful while paused.
    pub fn resume(&mut self) {
        if !self.supported || self.phase != SynthesisPhase::Paused {
            log::debug!("synthesis: resume ignored while {}", self.phase.label());
            return;
        }
        self.platform.resume();
        self.apply(SynthesisInput::ResumeRequested);
        self.publish();
    }

    /// Replace the base configuration.  Takes effect on the next `speak`.
    pub fn set_config(&mut self, config: SynthesisConfig) {
        if let Err(e) = config.validate() {
            log::warn!("synthesis: {e}; values will be clamped per utterance");
        }
        self.config = config;
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

    pub fn is_speaking(&self) -> bool {
        self.phase.is_speaking()
    }

    pub fn is_paused(&self) -> bool {
        self.phase.is_paused()
    }

    pub fn phase(&self) -> SynthesisPhase {
        self.phase
    }

    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    pub fn error(&self) -> Option<&AdapterError> {
        self.error.as_ref()
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SynthesisSnapshot {
        SynthesisSnapshot {
            supported: self.supported,
            speaking: self.is_speaking(),
            paused: self.is_paused(),
            phase: self.phase,
            voices: self.voices.clone(),
            error: self.error.clone(),
        }
    }

    /// A receiver that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SynthesisSnapshot> {
        self.state_tx.subscribe()
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    /// Handle every pending platform signal.  Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next platform signal and handle it.
    pub async fn next_event(&mut self) -> Option<SynthesisEvent> {
        let event = self.events_rx.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    fn handle_event(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::VoicesChanged(voices) => {
                log::debug!("synthesis: catalog now has {} voices", voices.len());
                self.voices = voices;
                self.state_tx
                    .send_modify(|current| current.voices.clone_from(&self.voices));
            }
            SynthesisEvent::Utterance { job, signal } => {
                if self.current != Some(job) {
                    log::debug!("synthesis: dropping {signal:?} from stale {job}");
                    return;
                }
                self.handle_signal(signal);
            }
        }
        self.publish();
    }

    fn handle_signal(&mut self, signal: UtteranceSignal) {
        match signal {
            UtteranceSignal::Start => {
                self.error = None;
                self.apply(SynthesisInput::Started);
            }
            UtteranceSignal::Pause => self.apply(SynthesisInput::Paused),
            UtteranceSignal::Resume => self.apply(SynthesisInput::Resumed),
            UtteranceSignal::End => {
                self.current = None;
                self.apply(SynthesisInput::Ended);
            }
            UtteranceSignal::Error(code) => {
                let classification = classify_synthesis(&code);
                log::warn!("synthesis: {code}: {}", classification.message);
                self.error = Some(AdapterError::from_classification(&code, classification));
                self.current = None;
                self.apply(SynthesisInput::Failed);
            }
        }
    }

    fn apply(&mut self, input: SynthesisInput) {
        match self.phase.transition(input) {
            Ok(next) => {
                if next != self.phase {
                    log::debug!("synthesis: {} -> {}", self.phase.label(), next.label());
                }
                self.phase = next;
            }
            Err(e) => log::warn!("synthesis: {e}"),
        }
    }

    /// Push changed status fields into the watched snapshot.  The voice list
    /// is pushed separately, only when the catalog changes.
    fn publish(&self) {
        let speaking = self.phase.is_speaking();
        let paused = self.phase.is_paused();
        self.state_tx.send_if_modified(|current| {
            let changed = current.supported != self.supported
                || current.speaking != speaking
                || current.paused != paused
                || current.phase != self.phase
                || current.error != self.error;
            if changed {
                current.supported = self.supported;
                current.speaking = speaking;
                current.paused = paused;
                current.phase = self.phase;
                current.error.clone_from(&self.error);
            }
            changed
        });
    }
}

impl Drop for SynthesisAdapter {
    fn drop(&mut self) {
        if self.current.take().is_some() {
            log::debug!("synthesis: adapter dropped mid-utterance, cancelling");
            self.platform.cancel();
        }
    }
}

fn unsupported_error() -> AdapterError {
    AdapterError::new(
        ErrorCategory::Unsupported,
        "unsupported",
        Capability::Synthesis.unsupported_message(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::platform::simulated::SynthesisCommand;
    use crate::platform::SimulatedSynthesis;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Alex", "en-US", "a"),
            VoiceDescriptor::new("Amélie", "fr-FR", "b"),
        ]
    }

    fn adapter(sim: &SimulatedSynthesis) -> SynthesisAdapter {
        SynthesisAdapter::new(Box::new(sim.clone()), SynthesisConfig::default())
    }

    // ---- speak ---

    #[test]
    fn speaking_only_after_start_signal() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);

        tts.speak("hello");
        assert!(!tts.is_speaking());
        assert_eq!(tts.phase(), SynthesisPhase::Starting);

        sim.emit(UtteranceSignal::Start);
        tts.pump();
        assert!(tts.is_speaking());
        assert!(!tts.is_paused());
    }

    #[test]
    fn blank_text_is_invalid_request() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);

        tts.speak("   ");
        let err = tts.error().unwrap();
        assert_eq!(err.category, ErrorCategory::InvalidRequest);
        assert_eq!(err.raw_code, "empty-text");
        assert_eq!(err.message, "Please provide text to speak");
        assert!(sim.spoken().is_empty());
    }

    #[test]
    fn blank_text_leaves_current_utterance_alone() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("first");
        tts.pump();

        tts.speak("");
        tts.pump();
        assert!(tts.is_speaking());
        assert!(!sim.commands().contains(&SynthesisCommand::Cancel));
    }

    #[test]
    fn voice_resolved_by_config_language() {
        let sim = SimulatedSynthesis::new().with_voices(catalog());
        let config = SynthesisConfig {
            language: "fr-FR".into(),
            ..SynthesisConfig::default()
        };
        let mut tts = SynthesisAdapter::new(Box::new(sim.clone()), config);

        tts.speak("bonjour");
        assert_eq!(sim.last_job().unwrap().voice.unwrap().uri, "b");
    }

    #[test]
    fn voice_falls_back_to_first_entry() {
        let sim = SimulatedSynthesis::new().with_voices(catalog());
        let config = SynthesisConfig {
            language: "de-DE".into(),
            ..SynthesisConfig::default()
        };
        let mut tts = SynthesisAdapter::new(Box::new(sim.clone()), config);

        tts.speak("hallo");
        assert_eq!(sim.last_job().unwrap().voice.unwrap().uri, "a");
    }

    #[test]
    fn empty_catalog_uses_platform_default() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);
        tts.speak("hello");
        assert!(sim.last_job().unwrap().voice.is_none());
    }

    #[test]
    fn overrides_apply_to_one_utterance_only() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);

        tts.speak_with("fast", &SynthesisOverrides::default().rate(1.3).pitch(1.1));
        tts.speak("normal");

        let spoken = sim.spoken();
        assert_eq!(spoken[0].rate, 1.3);
        assert_eq!(spoken[0].pitch, 1.1);
        assert_eq!(spoken[1].rate, 1.0);
        assert_eq!(spoken[1].pitch, 1.0);
    }

    #[test]
    fn second_speak_terminates_first() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);

        tts.speak("one");
        tts.pump();
        tts.speak("two");
        tts.pump();

        assert_eq!(
            sim.commands(),
            vec![
                SynthesisCommand::Speak(JobId(1)),
                SynthesisCommand::Cancel,
                SynthesisCommand::Speak(JobId(2)),
            ]
        );
        // The first job's late End was dropped; the second is speaking.
        assert!(tts.is_speaking());
        assert_eq!(sim.current_job(), Some(JobId(2)));
    }

    #[test]
    fn platform_rejection_is_captured() {
        let sim = SimulatedSynthesis::new();
        sim.fail_next_speak(PlatformError::Rejected("engine busy".into()));
        let mut tts = adapter(&sim);

        tts.speak("hello");
        let err = tts.error().unwrap();
        assert_eq!(err.category, ErrorCategory::TransientPlatformError);
        assert_eq!(err.message, "engine busy");
        assert_eq!(tts.phase(), SynthesisPhase::Idle);
    }

    // ---- pause / resume / cancel ---

    #[test]
    fn pause_resume_cancel_scenario() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);

        tts.speak("a long paragraph");
        sim.emit(UtteranceSignal::Start);
        tts.pump();
        assert!(tts.is_speaking());

        tts.pause();
        assert!(!tts.is_paused(), "paused only on the platform's signal");
        sim.emit(UtteranceSignal::Pause);
        tts.pump();
        assert!(tts.is_paused());
        assert!(tts.is_speaking());

        tts.cancel();
        assert!(!tts.is_speaking());
        assert!(!tts.is_paused());

        // Late End for the cancelled job.
        sim.emit_for(JobId(1), UtteranceSignal::End);
        assert_eq!(tts.pump(), 1);
        assert!(!tts.is_speaking());
        assert!(!tts.is_paused());
        assert_eq!(tts.phase(), SynthesisPhase::Idle);
    }

    #[test]
    fn late_error_after_cancel_is_dropped() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);

        tts.speak("interrupted soon");
        sim.emit(UtteranceSignal::Start);
        tts.pump();
        tts.cancel();

        sim.emit_for(JobId(1), UtteranceSignal::Error("interrupted".into()));
        assert_eq!(tts.pump(), 1);
        assert_eq!(tts.phase(), SynthesisPhase::Idle);
        assert!(tts.error().is_none());
        assert!(tts.snapshot().error.is_none());
    }

    #[test]
    fn late_error_from_replaced_job_leaves_new_job_alone() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("first");
        tts.pump();
        tts.speak("second");
        tts.pump();

        sim.emit_for(JobId(1), UtteranceSignal::Error("canceled".into()));
        tts.pump();
        assert!(tts.is_speaking());
        assert!(tts.error().is_none());
    }

    #[test]
    fn resume_clears_paused_on_signal() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("text");
        tts.pump();
        tts.pause();
        tts.pump();
        assert!(tts.is_paused());

        tts.resume();
        assert!(tts.is_paused());
        tts.pump();
        assert!(!tts.is_paused());
        assert!(tts.is_speaking());
    }

    #[test]
    fn no_op_commands_while_idle() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);
        let before = tts.snapshot();

        tts.pause();
        tts.resume();
        tts.cancel();
        tts.cancel();

        assert_eq!(tts.snapshot(), before);
        assert!(!sim.commands().contains(&SynthesisCommand::Pause));
        assert!(!sim.commands().contains(&SynthesisCommand::Resume));
    }

    #[test]
    fn resume_while_speaking_is_no_op() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("text");
        tts.pump();

        tts.resume();
        assert!(!sim.commands().contains(&SynthesisCommand::Resume));
        assert_eq!(tts.phase(), SynthesisPhase::Speaking);
    }

    // ---- completion ---

    #[test]
    fn end_signal_finishes() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("text");
        tts.pump();

        sim.finish();
        tts.pump();
        assert!(!tts.is_speaking());
        assert!(tts.error().is_none());
    }

    #[test]
    fn error_signal_is_classified() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("text");
        tts.pump();

        sim.emit(UtteranceSignal::Error("audio-busy".into()));
        tts.pump();
        let err = tts.error().unwrap();
        assert_eq!(err.category, ErrorCategory::TransientPlatformError);
        assert_eq!(err.message, "Audio output is busy");
        assert!(!tts.is_speaking());
        assert!(!tts.is_paused());
    }

    #[test]
    fn duplicate_end_is_idempotent() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("text");
        tts.pump();

        sim.emit(UtteranceSignal::End);
        sim.emit_for(JobId(1), UtteranceSignal::End);
        tts.pump();
        assert_eq!(tts.phase(), SynthesisPhase::Idle);
    }

    #[test]
    fn new_speak_clears_error() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);
        tts.speak("");
        assert!(tts.error().is_some());

        tts.speak("hello");
        assert!(tts.error().is_none());
    }

    // ---- catalog ---

    #[test]
    fn catalog_updates_replace_voices() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);
        assert!(tts.voices().is_empty());

        sim.set_voices(catalog());
        tts.pump();
        assert_eq!(tts.voices().len(), 2);

        sim.set_voices(vec![VoiceDescriptor::new("Kyoko", "ja-JP", "k")]);
        tts.pump();
        assert_eq!(tts.voices().len(), 1);
        assert_eq!(tts.voices()[0].uri, "k");
    }

    #[test]
    fn subscriber_sees_catalog_updates() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        let mut rx = tts.subscribe();

        sim.set_voices(catalog());
        tts.pump();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().voices, catalog());

        tts.speak("hi");
        tts.pump();
        assert_eq!(*rx.borrow(), tts.snapshot());
    }

    // ---- unsupported ---

    #[test]
    fn unsupported_speak_is_no_op_with_error() {
        let sim = SimulatedSynthesis::unsupported();
        let mut tts = adapter(&sim);
        assert!(!tts.is_supported());

        tts.speak("hello");
        tts.cancel();
        assert!(sim.spoken().is_empty());
        assert!(sim.commands().is_empty());
        assert_eq!(tts.error().unwrap().category, ErrorCategory::Unsupported);

        tts.reset_error();
        assert!(tts.error().is_some());
    }

    // ---- config / observation ---

    #[test]
    fn set_config_affects_next_utterance() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);
        tts.set_config(SynthesisConfig {
            rate: 0.8,
            pitch: 1.0,
            ..SynthesisConfig::default()
        });
        assert_eq!(tts.config().rate, 0.8);
        assert_eq!(tts.config().pitch, 1.0);

        tts.speak("slow");
        assert_eq!(sim.last_job().unwrap().rate, 0.8);
    }

    #[test]
    fn subscriber_sees_changes() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        let mut rx = tts.subscribe();
        assert!(!rx.has_changed().unwrap());

        tts.speak("hi");
        tts.pump();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().speaking);
    }

    #[test]
    fn snapshot_serializes() {
        let sim = SimulatedSynthesis::new().with_voices(catalog());
        let tts = adapter(&sim);
        let json = serde_json::to_value(tts.snapshot()).unwrap();
        assert_eq!(json["speaking"], false);
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["voices"][1]["uri"], "b");
    }

    #[test]
    fn drop_cancels_in_flight_job() {
        let sim = SimulatedSynthesis::new().with_auto_confirm();
        let mut tts = adapter(&sim);
        tts.speak("bye");
        drop(tts);
        assert_eq!(sim.commands().last(), Some(&SynthesisCommand::Cancel));
    }

    #[tokio::test]
    async fn next_event_drives_state() {
        let sim = SimulatedSynthesis::new();
        let mut tts = adapter(&sim);
        tts.speak("async");
        sim.emit(UtteranceSignal::Start);

        let event = tts.next_event().await.unwrap();
        assert_eq!(
            event,
            SynthesisEvent::Utterance {
                job: JobId(1),
                signal: UtteranceSignal::Start
            }
        );
        assert!(tts.is_speaking());
    }
}
