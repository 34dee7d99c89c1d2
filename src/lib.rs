//! Adapters that turn a platform's speech recognition and speech synthesis
//! capabilities into small observable state machines.
//!
//! * [`recognition::RecognitionAdapter`] keeps a listening flag, a transcript
//!   of final segments, the current interim text and the last error.
//! * [`synthesis::SynthesisAdapter`] keeps speaking / paused flags, the voice
//!   catalog and the last error.
//!
//! Both talk to the platform through the traits in [`platform`];
//! [`platform::simulated`] is a scripted in-memory implementation.

pub mod config;
pub mod demo;
pub mod error;
pub mod platform;
pub mod recognition;
pub mod synthesis;
