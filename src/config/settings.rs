//! Adapter settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::error::ConfigError;
use crate::synthesis::VoiceDescriptor;

// ---------------------------------------------------------------------------
// RecognitionConfig
// ---------------------------------------------------------------------------

/// Settings for one recognition engine handle.
///
/// Changing any field requires a new handle; see
/// [`RecognitionAdapter::reconfigure`](crate::recognition::RecognitionAdapter::reconfigure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Keep capturing after the first final result.
    pub continuous: bool,
    /// Deliver provisional (non-final) results.
    pub interim_results: bool,
    /// BCP-47 language tag, e.g. `"en-US"`.
    pub language: String,
    /// Number of alternatives per result (at least 1).
    pub max_alternatives: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
            language: "en-US".into(),
            max_alternatives: 1,
        }
    }
}

impl RecognitionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_alternatives < 1 {
            return Err(ConfigError::MaxAlternatives(self.max_alternatives));
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "recognition.language",
            });
        }
        Ok(())
    }

    /// A copy with invalid fields replaced by their defaults.
    ///
    /// ```
    /// use speech_adapters::config::RecognitionConfig;
    ///
    /// let bad = RecognitionConfig {
    ///     max_alternatives: 0,
    ///     language: " ".into(),
    ///     ..RecognitionConfig::default()
    /// };
    /// let fixed = bad.repaired();
    /// assert_eq!(fixed.max_alternatives, 1);
    /// assert_eq!(fixed.language, "en-US");
    /// assert!(fixed.validate().is_ok());
    /// ```
    pub fn repaired(&self) -> Self {
        let defaults = Self::default();
        Self {
            continuous: self.continuous,
            interim_results: self.interim_results,
            language: if self.language.trim().is_empty() {
                defaults.language
            } else {
                self.language.clone()
            },
            max_alternatives: self.max_alternatives.max(1),
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesisConfig
// ---------------------------------------------------------------------------

/// Base settings applied to every utterance.
///
/// | Field  | Range      | Default |
/// |--------|------------|---------|
/// | rate   | 0.5 – 2.0  | 1.0     |
/// | pitch  | 0.0 – 2.0  | 1.0     |
/// | volume | 0.0 – 1.0  | 1.0     |
///
/// Out-of-range values are stored as given and clamped when an utterance is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// BCP-47 language tag used for the utterance and for voice matching.
    pub language: String,
    /// Explicit voice.  `None` lets the adapter pick one from the catalog.
    pub voice: Option<VoiceDescriptor>,
}

impl SynthesisConfig {
    pub const RATE_RANGE: (f32, f32) = (0.5, 2.0);
    pub const PITCH_RANGE: (f32, f32) = (0.0, 2.0);
    pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("synthesis.rate", self.rate),
            ("synthesis.pitch", self.pitch),
            ("synthesis.volume", self.volume),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "synthesis.language",
            });
        }
        Ok(())
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            language: "en-US".into(),
            voice: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// Missing sections fall back to their defaults, so a partial file is fine.
///
/// ```rust,no_run
/// use speech_adapters::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recognition adapter settings.
    pub recognition: RecognitionConfig,
    /// Synthesis adapter settings.
    pub synthesis: SynthesisConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.recognition.validate()?;
        self.synthesis.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
