//! Scripted in-memory platform.
//!
//! [`SimulatedRecognition`] and [`SimulatedSynthesis`] implement the platform
//! traits without any audio.  They are cheap `Rc` handles: give one clone to
//! an adapter and keep another to drive the script: fire signals, inspect
//! the commands the adapter issued or swap the voice catalog.
//!
//! With `with_auto_confirm()` the platforms answer requests on their own the
//! way a well-behaved engine would (start → `Start`, stop → `End`, pause →
//! `Pause` and so on).  Cancelling an utterance in auto mode sends a late `End` for
//! the cancelled job, which is what real engines tend to do.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;

use crate::config::RecognitionConfig;
use crate::error::PlatformError;
use crate::synthesis::{UtteranceJob, VoiceDescriptor};

use super::{
    CatalogSink, HandleId, JobId, RecognitionHandle, RecognitionPlatform, RecognitionResult,
    RecognitionSignal, RecognitionSink, SynthesisPlatform, UtteranceSignal, UtteranceSink,
};

// ---------------------------------------------------------------------------
// SimulatedRecognition
// ---------------------------------------------------------------------------

/// A request the recognition adapter made of the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionCommand {
    Create(HandleId),
    Start(HandleId),
    Stop(HandleId),
}

#[derive(Debug)]
struct SimHandleState {
    sink: RecognitionSink,
    running: bool,
}

#[derive(Debug, Default)]
struct RecognitionInner {
    unsupported: bool,
    auto_confirm: bool,
    fail_create: Option<PlatformError>,
    fail_start: Option<PlatformError>,
    configs: Vec<RecognitionConfig>,
    handles: Vec<SimHandleState>,
    commands: Vec<RecognitionCommand>,
}

/// Scripted recognition platform.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRecognition {
    inner: Rc<RefCell<RecognitionInner>>,
}

impl SimulatedRecognition {
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform whose capability probe reports `false`.
    pub fn unsupported() -> Self {
        let sim = Self::new();
        sim.inner.borrow_mut().unsupported = true;
        sim
    }

    /// Answer `start()` with `Start` and `stop()` with `End` automatically.
    pub fn with_auto_confirm(self) -> Self {
        self.inner.borrow_mut().auto_confirm = true;
        self
    }

    /// Make the next `create()` fail with `err`.
    pub fn fail_next_create(&self, err: PlatformError) {
        self.inner.borrow_mut().fail_create = Some(err);
    }

    /// Make the next `start()` on any handle fail with `err`.
    pub fn fail_next_start(&self, err: PlatformError) {
        self.inner.borrow_mut().fail_start = Some(err);
    }

    /// Configurations of every handle created so far, oldest first.
    pub fn configs(&self) -> Vec<RecognitionConfig> {
        self.inner.borrow().configs.clone()
    }

    pub fn commands(&self) -> Vec<RecognitionCommand> {
        self.inner.borrow().commands.clone()
    }

    pub fn handle_count(&self) -> usize {
        self.inner.borrow().handles.len()
    }

    /// Whether the newest handle is capturing, from the platform's view.
    pub fn is_running(&self) -> bool {
        self.inner
            .borrow()
            .handles
            .last()
            .is_some_and(|h| h.running)
    }

    /// Fire a signal from the newest handle.  Returns `false` when there is
    /// no handle or its adapter is gone.
    pub fn emit(&self, signal: RecognitionSignal) -> bool {
        let index = match self.inner.borrow().handles.len() {
            0 => return false,
            n => n - 1,
        };
        self.emit_from(index, signal)
    }

    /// Fire a signal from the handle created `index`-th (0-based).
    pub fn emit_from(&self, index: usize, signal: RecognitionSignal) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(state) = inner.handles.get_mut(index) else {
            return false;
        };
        if matches!(signal, RecognitionSignal::End | RecognitionSignal::Error(_)) {
            state.running = false;
        }
        state.sink.emit(signal)
    }

    pub fn emit_start(&self) -> bool {
        self.emit(RecognitionSignal::Start)
    }

    pub fn emit_end(&self) -> bool {
        self.emit(RecognitionSignal::End)
    }

    pub fn emit_error(&self, code: &str) -> bool {
        self.emit(RecognitionSignal::Error(code.to_string()))
    }

    pub fn emit_results(&self, results: Vec<RecognitionResult>, resume_index: usize) -> bool {
        self.emit(RecognitionSignal::Result {
            results,
            resume_index,
        })
    }
}

impl RecognitionPlatform for SimulatedRecognition {
    fn supported(&self) -> bool {
        !self.inner.borrow().unsupported
    }

    fn create(
        &mut self,
        config: &RecognitionConfig,
        sink: RecognitionSink,
    ) -> Result<Box<dyn RecognitionHandle>, PlatformError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(err) = inner.fail_create.take() {
            return Err(err);
        }
        let handle = sink.handle();
        inner.configs.push(config.clone());
        inner.commands.push(RecognitionCommand::Create(handle));
        inner.handles.push(SimHandleState {
            sink,
            running: false,
        });
        let index = inner.handles.len() - 1;

        Ok(Box::new(SimHandle {
            index,
            inner: Rc::clone(&self.inner),
        }))
    }
}

struct SimHandle {
    index: usize,
    inner: Rc<RefCell<RecognitionInner>>,
}

impl RecognitionHandle for SimHandle {
    fn start(&mut self) -> Result<(), PlatformError> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if let Some(err) = inner.fail_start.take() {
            return Err(err);
        }
        let state = &mut inner.handles[self.index];
        if state.running {
            return Err(PlatformError::InvalidState(
                "recognition has already started".into(),
            ));
        }
        state.running = true;
        inner.commands.push(RecognitionCommand::Start(state.sink.handle()));
        if inner.auto_confirm {
            state.sink.emit(RecognitionSignal::Start);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlatformError> {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let state = &mut inner.handles[self.index];
        inner.commands.push(RecognitionCommand::Stop(state.sink.handle()));
        if inner.auto_confirm && state.running {
            state.running = false;
            state.sink.emit(RecognitionSignal::End);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SimulatedSynthesis
// ---------------------------------------------------------------------------

/// A request the synthesis adapter made of the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisCommand {
    Speak(JobId),
    Cancel,
    Pause,
    Resume,
}

#[derive(Debug, Default)]
struct SynthesisInner {
    unsupported: bool,
    auto_confirm: bool,
    fail_speak: Option<PlatformError>,
    voices: Vec<VoiceDescriptor>,
    catalog_sinks: Vec<CatalogSink>,
    spoken: Vec<UtteranceJob>,
    sinks: Vec<UtteranceSink>,
    current: Option<UtteranceSink>,
    paused: bool,
    commands: Vec<SynthesisCommand>,
}

/// Scripted synthesis platform.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSynthesis {
    inner: Rc<RefCell<SynthesisInner>>,
}

impl SimulatedSynthesis {
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform whose capability probe reports `false`.
    pub fn unsupported() -> Self {
        let sim = Self::new();
        sim.inner.borrow_mut().unsupported = true;
        sim
    }

    /// Start with `voices` as the catalog.
    pub fn with_voices(self, voices: Vec<VoiceDescriptor>) -> Self {
        self.inner.borrow_mut().voices = voices;
        self
    }

    /// Answer speak/pause/resume/cancel automatically.
    pub fn with_auto_confirm(self) -> Self {
        self.inner.borrow_mut().auto_confirm = true;
        self
    }

    /// Load the initial catalog from a JSON array of [`VoiceDescriptor`]s.
    ///
    /// A missing file yields an empty catalog, mirroring a platform that has
    /// not finished loading its voices.
    pub fn with_catalog_file(self, path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no voice catalog at {}", path.display());
            return Ok(self);
        }
        let content = std::fs::read_to_string(path)?;
        let voices: Vec<VoiceDescriptor> = serde_json::from_str(&content)?;
        log::debug!("loaded {} voices from {}", voices.len(), path.display());
        Ok(self.with_voices(voices))
    }

    /// Replace the catalog and notify every registered catalog slot.
    pub fn set_voices(&self, voices: Vec<VoiceDescriptor>) {
        let mut inner = self.inner.borrow_mut();
        inner.voices = voices.clone();
        for sink in &inner.catalog_sinks {
            sink.emit(voices.clone());
        }
    }

    /// Make the next `speak()` fail with `err`.
    pub fn fail_next_speak(&self, err: PlatformError) {
        self.inner.borrow_mut().fail_speak = Some(err);
    }

    /// Every job submitted so far, oldest first.
    pub fn spoken(&self) -> Vec<UtteranceJob> {
        self.inner.borrow().spoken.clone()
    }

    pub fn last_job(&self) -> Option<UtteranceJob> {
        self.inner.borrow().spoken.last().cloned()
    }

    pub fn commands(&self) -> Vec<SynthesisCommand> {
        self.inner.borrow().commands.clone()
    }

    /// The job the platform is currently working on, if any.
    pub fn current_job(&self) -> Option<JobId> {
        self.inner.borrow().current.as_ref().map(UtteranceSink::job)
    }

    /// Fire a signal for the current job.
    pub fn emit(&self, signal: UtteranceSignal) -> bool {
        let inner = self.inner.borrow();
        match &inner.current {
            Some(sink) => sink.emit(signal),
            None => false,
        }
    }

    /// Fire a signal for any job ever submitted, including cancelled ones.
    pub fn emit_for(&self, job: JobId, signal: UtteranceSignal) -> bool {
        let inner = self.inner.borrow();
        inner
            .sinks
            .iter()
            .find(|s| s.job() == job)
            .is_some_and(|s| s.emit(signal))
    }

    /// Finish the current job naturally.
    pub fn finish(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.paused = false;
        match inner.current.take() {
            Some(sink) => sink.emit(UtteranceSignal::End),
            None => false,
        }
    }
}

impl SynthesisPlatform for SimulatedSynthesis {
    fn supported(&self) -> bool {
        !self.inner.borrow().unsupported
    }

    fn voices(&self) -> Vec<VoiceDescriptor> {
        self.inner.borrow().voices.clone()
    }

    fn watch_voices(&mut self, sink: CatalogSink) {
        self.inner.borrow_mut().catalog_sinks.push(sink);
    }

    fn speak(&mut self, job: &UtteranceJob, sink: UtteranceSink) -> Result<(), PlatformError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(err) = inner.fail_speak.take() {
            return Err(err);
        }
        inner.commands.push(SynthesisCommand::Speak(job.id));
        inner.spoken.push(job.clone());
        inner.sinks.push(sink.clone());
        inner.paused = false;
        if inner.auto_confirm {
            sink.emit(UtteranceSignal::Start);
        }
        inner.current = Some(sink);
        Ok(())
    }

    fn cancel(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.commands.push(SynthesisCommand::Cancel);
        inner.paused = false;
        let auto = inner.auto_confirm;
        if let Some(sink) = inner.current.take() {
            if auto {
                sink.emit(UtteranceSignal::End);
            }
        }
    }

    fn pause(&mut self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.commands.push(SynthesisCommand::Pause);
        if inner.auto_confirm && !inner.paused {
            if let Some(sink) = &inner.current {
                sink.emit(UtteranceSignal::Pause);
                inner.paused = true;
            }
        }
    }

    fn resume(&mut self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        inner.commands.push(SynthesisCommand::Resume);
        if inner.auto_confirm && inner.paused {
            if let Some(sink) = &inner.current {
                sink.emit(UtteranceSignal::Resume);
                inner.paused = false;
            }
        }
    }
}
