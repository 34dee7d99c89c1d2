//! Screen logic for the `speech-demo` binary.
//!
//! Kept in the library so it can be tested against the simulated platform.

pub mod commands;
pub mod reader;

pub use commands::{command_config, match_command, ColorCommand, CommandSession};
pub use reader::{
    preferred_voice, Article, ArticleReader, SpeedPreset, AUTO_ADVANCE_DELAY, SAMPLE_ARTICLES,
};
