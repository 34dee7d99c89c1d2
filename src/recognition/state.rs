//! Recognition lifecycle state machine.

use serde::Serialize;

use crate::error::IllegalTransition;

/// Phases of the recognition engine handle, as seen by the adapter.
///
/// ```text
/// Idle ──start()──▶ Starting ──Start──▶ Listening ──stop()──▶ Stopping
/// any ──End / Error / teardown──▶ Idle
/// ```
///
/// `is_listening` is `true` in `Listening` and `Stopping`: capture keeps
/// running until the platform confirms the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenPhase {
    #[default]
    Idle,
    /// Start requested, not yet confirmed.
    Starting,
    Listening,
    /// Stop requested, not yet confirmed.
    Stopping,
}

/// Inputs to [`ListenPhase::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenInput {
    StartRequested,
    StopRequested,
    Started,
    Ended,
    Failed,
    /// The adapter dropped its handle to rebuild it.
    TornDown,
}

impl ListenInput {
    fn label(self) -> &'static str {
        match self {
            ListenInput::StartRequested => "start request",
            ListenInput::StopRequested => "stop request",
            ListenInput::Started => "start",
            ListenInput::Ended => "end",
            ListenInput::Failed => "error",
            ListenInput::TornDown => "teardown",
        }
    }
}

impl ListenPhase {
    /// ```
    /// use speech_adapters::recognition::ListenPhase;
    ///
    /// assert!(!ListenPhase::Idle.is_listening());
    /// assert!(!ListenPhase::Starting.is_listening());
    /// assert!(ListenPhase::Listening.is_listening());
    /// assert!(ListenPhase::Stopping.is_listening());
    /// ```
    pub fn is_listening(self) -> bool {
        matches!(self, ListenPhase::Listening | ListenPhase::Stopping)
    }

    pub fn label(self) -> &'static str {
        match self {
            ListenPhase::Idle => "idle",
            ListenPhase::Starting => "starting",
            ListenPhase::Listening => "listening",
            ListenPhase::Stopping => "stopping",
        }
    }

    pub fn transition(self, input: ListenInput) -> Result<Self, IllegalTransition> {
        use ListenInput as I;
        use ListenPhase as P;

        let next = match (self, input) {
            (P::Idle | P::Starting, I::StartRequested) => P::Starting,
            (P::Listening | P::Stopping, I::StopRequested) => P::Stopping,

            // Engines may start on their own (continuous restarts).
            (P::Idle | P::Starting | P::Listening, I::Started) => P::Listening,
            (P::Stopping, I::Started) => P::Stopping,

            (_, I::Ended | I::Failed | I::TornDown) => P::Idle,

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
    use super::ListenInput as I;
    use super::ListenPhase as P;

    #[test]
    fn full_cycle() {
        let p = P::Idle.transition(I::StartRequested).unwrap();
        assert_eq!(p, P::Starting);
        assert!(!p.is_listening());

        let p = p.transition(I::Started).unwrap();
        assert!(p.is_listening());

        let p = p.transition(I::StopRequested).unwrap();
        assert_eq!(p, P::Stopping);
        assert!(p.is_listening());

        assert_eq!(p.transition(I::Ended).unwrap(), P::Idle);
    }

    #[test]
    fn stop_request_while_idle_is_illegal() {
        let err = P::Idle.transition(I::StopRequested).unwrap_err();
        assert_eq!(err.to_string(), "illegal transition: stop request while idle");
    }

    #[test]
    fn start_request_while_listening_is_illegal() {
        assert!(P::Listening.transition(I::StartRequested).is_err());
        assert!(P::Stopping.transition(I::StartRequested).is_err());
    }

    #[test]
    fn stopping_survives_a_late_start() {
        assert_eq!(P::Stopping.transition(I::Started).unwrap(), P::Stopping);
    }

    #[test]
    fn terminal_inputs_reset_from_everywhere() {
        for p in [P::Idle, P::Starting, P::Listening, P::Stopping] {
            for i in [I::Ended, I::Failed, I::TornDown] {
                assert_eq!(p.transition(i).unwrap(), P::Idle);
            }
        }
    }
}
