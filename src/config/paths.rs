//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir:
//!   Windows: %APPDATA%\speech-adapters\
//!   macOS:   ~/Library/Application Support/speech-adapters/
//!   Linux:   ~/.config/speech-adapters/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `voices.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `voices.json`, the simulated platform's voice catalog.
    pub voices_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "speech-adapters";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let voices_file = config_dir.join("voices.json");

        Self {
            config_dir,
            settings_file,
            voices_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .voices_file
            .file_name()
            .is_some_and(|n| n == "voices.json"));
        assert!(paths.settings_file.starts_with(&paths.config_dir));
    }
}
