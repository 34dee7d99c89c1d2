//! Synthesis lifecycle state machine.
//!
//! [`SynthesisPhase`] is the single source of truth for the `speaking` and
//! `paused` flags the adapter publishes.  Requests move it into a transient
//! phase (`Starting`, `Pausing`, `Resuming`) and platform confirmations settle
//! it.

use serde::Serialize;

use crate::error::IllegalTransition;

// ---------------------------------------------------------------------------
// SynthesisPhase
// ---------------------------------------------------------------------------

/// Phases of the current utterance.
///
/// ```text
/// Idle ──speak──▶ Starting ──Start──▶ Speaking
/// Speaking ──pause──▶ Pausing ──Pause──▶ Paused
/// Paused ──resume──▶ Resuming ──Resume──▶ Speaking
/// any ──cancel / End / Error──▶ Idle
/// ```
///
/// Confirmations that arrive without a matching request (an engine that
/// pauses on its own, say) are accepted as long as they make sense for the
/// current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisPhase {
    #[default]
    Idle,
    /// Submitted, waiting for the platform's start confirmation.
    Starting,
    Speaking,
    /// Pause requested, not yet confirmed.
    Pausing,
    Paused,
    /// Resume requested, not yet confirmed.
    Resuming,
}

/// Inputs to [`SynthesisPhase::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisInput {
    Speak,
    Started,
    PauseRequested,
    Paused,
    ResumeRequested,
    Resumed,
    Cancel,
    Ended,
    Failed,
}

impl SynthesisInput {
    fn label(self) -> &'static str {
        match self {
            SynthesisInput::Speak => "speak",
            SynthesisInput::Started => "start",
            SynthesisInput::PauseRequested => "pause request",
            SynthesisInput::Paused => "pause",
            SynthesisInput::ResumeRequested => "resume request",
            SynthesisInput::Resumed => "resume",
            SynthesisInput::Cancel => "cancel",
            SynthesisInput::Ended => "end",
            SynthesisInput::Failed => "error",
        }
    }
}

impl SynthesisPhase {
    /// An utterance is in progress, paused or not.
    ///
    /// ```
    /// use speech_adapters::synthesis::SynthesisPhase;
    ///
    /// assert!(!SynthesisPhase::Idle.is_speaking());
    /// assert!(!SynthesisPhase::Starting.is_speaking());
    /// assert!(SynthesisPhase::Speaking.is_speaking());
    /// assert!(SynthesisPhase::Paused.is_speaking());
    /// ```
    pub fn is_speaking(self) -> bool {
        matches!(
            self,
            SynthesisPhase::Speaking
                | SynthesisPhase::Pausing
                | SynthesisPhase::Paused
                | SynthesisPhase::Resuming
        )
    }

    /// The platform has confirmed a pause and not yet confirmed a resume.
    pub fn is_paused(self) -> bool {
        matches!(self, SynthesisPhase::Paused | SynthesisPhase::Resuming)
    }

    pub fn label(self) -> &'static str {
        match self {
            SynthesisPhase::Idle => "idle",
            SynthesisPhase::Starting => "starting",
            SynthesisPhase::Speaking => "speaking",
            SynthesisPhase::Pausing => "pausing",
            SynthesisPhase::Paused => "paused",
            SynthesisPhase::Resuming => "resuming",
        }
    }

    /// Next phase for `input`, or [`IllegalTransition`] when the input makes
    /// no sense here.  The caller keeps the current phase on error.
    pub fn transition(self, input: SynthesisInput) -> Result<Self, IllegalTransition> {
        use SynthesisInput as I;
        use SynthesisPhase as P;

        let next = match (self, input) {
            (P::Idle, I::Speak) => P::Starting,

            (P::Starting | P::Speaking, I::Started) => P::Speaking,

            (P::Speaking, I::PauseRequested) => P::Pausing,
            (P::Speaking | P::Pausing | P::Paused, I::Paused) => P::Paused,

            (P::Paused, I::ResumeRequested) => P::Resuming,
            (P::Paused | P::Resuming | P::Speaking, I::Resumed) => P::Speaking,

            (_, I::Cancel | I::Ended | I::Failed) => P::Idle,

            _ => {
                return Err(IllegalTransition {
                    phase: self.label(),
                    input: input.label(),
                })
            }
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::SynthesisInput as I;
    use super::SynthesisPhase as P;

    fn run(inputs: &[SynthesisInput]) -> SynthesisPhase {
        inputs
            .iter()
            .fold(P::Idle, |p, &i| p.transition(i).unwrap_or(p))
    }

    #[test]
    fn happy_path() {
        assert_eq!(run(&[I::Speak]), P::Starting);
        assert_eq!(run(&[I::Speak, I::Started]), P::Speaking);
        assert_eq!(run(&[I::Speak, I::Started, I::Ended]), P::Idle);
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let p = run(&[I::Speak, I::Started, I::PauseRequested]);
        assert_eq!(p, P::Pausing);
        assert!(p.is_speaking());
        assert!(!p.is_paused());

        let p = p.transition(I::Paused).unwrap();
        assert!(p.is_paused());

        let p = p.transition(I::ResumeRequested).unwrap();
        assert_eq!(p, P::Resuming);
        assert!(p.is_paused());

        assert_eq!(p.transition(I::Resumed).unwrap(), P::Speaking);
    }

    #[test]
    fn pause_request_while_idle_is_illegal() {
        let err = P::Idle.transition(I::PauseRequested).unwrap_err();
        assert_eq!(err.phase, "idle");
        assert_eq!(err.input, "pause request");
    }

    #[test]
    fn resume_request_while_speaking_is_illegal() {
        assert!(P::Speaking.transition(I::ResumeRequested).is_err());
    }

    #[test]
    fn speak_outside_idle_is_illegal() {
        assert!(P::Speaking.transition(I::Speak).is_err());
    }

    #[test]
    fn start_while_paused_is_illegal() {
        assert!(P::Paused.transition(I::Started).is_err());
    }

    #[test]
    fn unsolicited_pause_is_accepted() {
        assert_eq!(P::Speaking.transition(I::Paused).unwrap(), P::Paused);
    }

    #[test]
    fn terminal_inputs_reset_from_everywhere() {
        for p in [P::Idle, P::Starting, P::Speaking, P::Pausing, P::Paused, P::Resuming] {
            for i in [I::Cancel, I::Ended, I::Failed] {
                assert_eq!(p.transition(i).unwrap(), P::Idle);
            }
        }
    }

    #[test]
    fn paused_implies_speaking() {
        for p in [P::Idle, P::Starting, P::Speaking, P::Pausing, P::Paused, P::Resuming] {
            assert!(!p.is_paused() || p.is_speaking(), "{p:?}");
        }
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(SynthesisPhase::default(), P::Idle);
    }
}
