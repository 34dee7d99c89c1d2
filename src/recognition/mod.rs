//! Speech-to-text: transcript model, listen state machine and the
//! recognition adapter.

pub mod adapter;
pub mod state;
pub mod transcript;

pub use adapter::{RecognitionAdapter, RecognitionSnapshot};
pub use state::{ListenInput, ListenPhase};
pub use transcript::{fold_batch, BatchOutcome, TranscriptSegment};
