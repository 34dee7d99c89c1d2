//! Utterance construction: per-call overrides merged over the base config.

use serde::{Deserialize, Serialize};

use crate::config::SynthesisConfig;
use crate::platform::JobId;

use super::voice::{resolve_voice, VoiceDescriptor};

// ---------------------------------------------------------------------------
// SynthesisOverrides
// ---------------------------------------------------------------------------

/// Per-utterance overrides.  Every `Some` field replaces the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOverrides {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub language: Option<String>,
    pub voice: Option<VoiceDescriptor>,
}

impl SynthesisOverrides {
    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn voice(mut self, voice: VoiceDescriptor) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Merge over `base`, field by field.
    pub fn apply(&self, base: &SynthesisConfig) -> SynthesisConfig {
        SynthesisConfig {
            rate: self.rate.unwrap_or(base.rate),
            pitch: self.pitch.unwrap_or(base.pitch),
            volume: self.volume.unwrap_or(base.volume),
            language: self
                .language
                .clone()
                .unwrap_or_else(|| base.language.clone()),
            voice: self.voice.clone().or_else(|| base.voice.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// UtteranceJob
// ---------------------------------------------------------------------------

/// One unit of speech with its fully resolved settings.
///
/// Numeric values are clamped into their supported ranges; a non-finite value
/// falls back to the default of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceJob {
    pub id: JobId,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub language: String,
    /// `None` means the platform's default voice.
    pub voice: Option<VoiceDescriptor>,
}

impl UtteranceJob {
    /// Resolve `overrides` over `base` and pick a voice from `catalog`.
    pub fn build(
        id: JobId,
        text: &str,
        base: &SynthesisConfig,
        overrides: &SynthesisOverrides,
        catalog: &[VoiceDescriptor],
    ) -> Self {
        let merged = overrides.apply(base);
        let voice = resolve_voice(merged.voice.as_ref(), &merged.language, catalog);

        Self {
            id,
            text: text.to_string(),
            rate: clamp_or_default(merged.rate, SynthesisConfig::RATE_RANGE),
            pitch: clamp_or_default(merged.pitch, SynthesisConfig::PITCH_RANGE),
            volume: clamp_or_default(merged.volume, SynthesisConfig::VOLUME_RANGE),
            language: merged.language,
            voice,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test(id: JobId, text: &str) -> Self {
        Self::build(
            id,
            text,
            &SynthesisConfig::default(),
            &SynthesisOverrides::default(),
            &[],
        )
    }
}

fn clamp_or_default(value: f32, (lo, hi): (f32, f32)) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        1.0_f32.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_field_by_field() {
        let base = SynthesisConfig {
            rate: 0.8,
            pitch: 1.2,
            volume: 0.5,
            language: "en-US".into(),
            voice: None,
        };
        let merged = SynthesisOverrides::default().rate(1.3).apply(&base);
        assert_eq!(merged.rate, 1.3);
        assert_eq!(merged.pitch, 1.2);
        assert_eq!(merged.volume, 0.5);
        assert_eq!(merged.language, "en-US");
    }

    #[test]
    fn base_voice_survives_when_not_overridden() {
        let mut base = SynthesisConfig::default();
        base.voice = Some(VoiceDescriptor::new("Alex", "en-US", "a"));
        let merged = SynthesisOverrides::default().pitch(0.9).apply(&base);
        assert_eq!(merged.voice.unwrap().uri, "a");
    }

    #[test]
    fn build_clamps_out_of_range_values() {
        let base = SynthesisConfig {
            rate: 5.0,
            pitch: -1.0,
            volume: 3.0,
            ..SynthesisConfig::default()
        };
        let job = UtteranceJob::build(JobId(1), "hi", &base, &SynthesisOverrides::default(), &[]);
        assert_eq!(job.rate, 2.0);
        assert_eq!(job.pitch, 0.0);
        assert_eq!(job.volume, 1.0);
    }

    #[test]
    fn build_replaces_nan_with_default() {
        let overrides = SynthesisOverrides::default().rate(f32::NAN);
        let job = UtteranceJob::build(JobId(1), "hi", &SynthesisConfig::default(), &overrides, &[]);
        assert_eq!(job.rate, 1.0);
    }

    #[test]
    fn build_resolves_voice_with_overridden_language() {
        let catalog = vec![
            VoiceDescriptor::new("Alex", "en-US", "a"),
            VoiceDescriptor::new("Amélie", "fr-FR", "b"),
        ];
        let overrides = SynthesisOverrides::default().language("fr-FR");
        let job = UtteranceJob::build(
            JobId(4),
            "bonjour",
            &SynthesisConfig::default(),
            &overrides,
            &catalog,
        );
        assert_eq!(job.voice.unwrap().uri, "b");
        assert_eq!(job.language, "fr-FR");
        assert_eq!(job.id, JobId(4));
        assert_eq!(job.text, "bonjour");
    }
}
