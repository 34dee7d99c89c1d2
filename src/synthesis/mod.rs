//! Text-to-speech: voice catalog, utterance building and the synthesis
//! adapter.

pub mod adapter;
pub mod state;
pub mod utterance;
pub mod voice;

pub use adapter::{SynthesisAdapter, SynthesisSnapshot};
pub use state::{SynthesisInput, SynthesisPhase};
pub use utterance::{SynthesisOverrides, UtteranceJob};
pub use voice::{resolve_voice, VoiceDescriptor};
