//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), the per-adapter configs,
//! `AppPaths` for cross-platform directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, RecognitionConfig, SynthesisConfig};
