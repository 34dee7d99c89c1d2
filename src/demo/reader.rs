//! Article reader: reads short articles aloud with a speed preset.

use std::time::Duration;

use serde::Serialize;

use crate::synthesis::{SynthesisAdapter, SynthesisOverrides, VoiceDescriptor};

/// Delay before the next article starts when auto-advance is on.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Article {
    pub title: &'static str,
    pub body: &'static str,
}

impl Article {
    /// Title and body joined the way they are read aloud.
    pub fn spoken_text(&self) -> String {
        format!("{}. {}", self.title, self.body)
    }
}

pub static SAMPLE_ARTICLES: [Article; 3] = [
    Article {
        title: "Ownership in Rust",
        body: "Every value in Rust has a single owner. When the owner goes out of scope the \
               value is dropped. Borrowing lets code read or change a value without taking \
               ownership of it.",
    },
    Article {
        title: "Async Runtimes",
        body: "An async runtime polls futures until they complete. Tasks yield at await \
               points so one thread can drive many of them. Channels carry messages between \
               tasks without shared locks.",
    },
    Article {
        title: "Speech Interfaces",
        body: "Speech recognition turns spoken words into text, and speech synthesis turns \
               text back into sound. Together they make hands-free and accessible \
               applications possible.",
    },
];

/// Reading speed.  Each preset is a rate / pitch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn rate(self) -> f32 {
        match self {
            SpeedPreset::Slow => 0.8,
            SpeedPreset::Normal => 1.0,
            SpeedPreset::Fast => 1.3,
        }
    }

    pub fn pitch(self) -> f32 {
        match self {
            SpeedPreset::Slow | SpeedPreset::Normal => 1.0,
            SpeedPreset::Fast => 1.1,
        }
    }

    pub fn overrides(self) -> SynthesisOverrides {
        SynthesisOverrides::default()
            .rate(self.rate())
            .pitch(self.pitch())
    }
}

/// An English voice named as such, else the first voice in the catalog.
pub fn preferred_voice(voices: &[VoiceDescriptor]) -> Option<&VoiceDescriptor> {
    voices
        .iter()
        .find(|v| v.speaks("en") && v.name.contains("English"))
        .or_else(|| voices.first())
}

/// State of the reader screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleReader {
    pub index: usize,
    pub speed: SpeedPreset,
    pub auto_advance: bool,
}

impl Default for ArticleReader {
    fn default() -> Self {
        Self {
            index: 0,
            speed: SpeedPreset::Normal,
            auto_advance: false,
        }
    }
}

impl ArticleReader {
    pub fn new(speed: SpeedPreset) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn current(&self) -> &'static Article {
        &SAMPLE_ARTICLES[self.index % SAMPLE_ARTICLES.len()]
    }

    /// Read the selected article with the preset and the preferred voice.
    pub fn read(&self, tts: &mut SynthesisAdapter) {
        let mut overrides = self.speed.overrides();
        if let Some(voice) = preferred_voice(tts.voices()) {
            overrides = overrides.voice(voice.clone());
        }
        log::info!("reading \"{}\" at {:?} speed", self.current().title, self.speed);
        tts.speak_with(&self.current().spoken_text(), &overrides);
    }

    /// Stop reading and select the next article, wrapping around.  Returns
    /// `true` when the caller should start reading it after
    /// [`AUTO_ADVANCE_DELAY`].
    pub fn next(&mut self, tts: &mut SynthesisAdapter) -> bool {
        tts.cancel();
        self.index = (self.index + 1) % SAMPLE_ARTICLES.len();
        self.auto_advance
    }

    /// Stop reading and select the previous article, wrapping around.
    pub fn previous(&mut self, tts: &mut SynthesisAdapter) {
        tts.cancel();
        self.index = match self.index {
            0 => SAMPLE_ARTICLES.len() - 1,
            i => i - 1,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisConfig;
    use crate::platform::SimulatedSynthesis;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Amélie", "fr-FR", "amelie"),
            VoiceDescriptor::new("Samantha", "en-US", "samantha"),
            VoiceDescriptor::new("Google UK English Female", "en-GB", "uk"),
        ]
    }

    #[test]
    fn presets() {
        assert_eq!((SpeedPreset::Slow.rate(), SpeedPreset::Slow.pitch()), (0.8, 1.0));
        assert_eq!((SpeedPreset::Normal.rate(), SpeedPreset::Normal.pitch()), (1.0, 1.0));
        assert_eq!((SpeedPreset::Fast.rate(), SpeedPreset::Fast.pitch()), (1.3, 1.1));
    }

    #[test]
    fn preferred_voice_wants_english_in_the_name() {
        assert_eq!(preferred_voice(&catalog()).unwrap().uri, "uk");
    }

    #[test]
    fn preferred_voice_falls_back_to_first() {
        let voices = &catalog()[..2];
        assert_eq!(preferred_voice(voices).unwrap().uri, "amelie");
        assert!(preferred_voice(&[]).is_none());
    }

    #[test]
    fn read_uses_preset_and_voice() {
        let sim = SimulatedSynthesis::new().with_voices(catalog());
        let mut tts = SynthesisAdapter::new(Box::new(sim.clone()), SynthesisConfig::default());
        let reader = ArticleReader::new(SpeedPreset::Fast);

        reader.read(&mut tts);
        let job = sim.last_job().unwrap();
        assert_eq!(job.rate, 1.3);
        assert_eq!(job.pitch, 1.1);
        assert_eq!(job.voice.unwrap().uri, "uk");
        assert!(job.text.starts_with("Ownership in Rust. "));
    }

    #[test]
    fn navigation_wraps_and_cancels() {
        let sim = SimulatedSynthesis::new();
        let mut tts = SynthesisAdapter::new(Box::new(sim.clone()), SynthesisConfig::default());
        let mut reader = ArticleReader::default();

        reader.previous(&mut tts);
        assert_eq!(reader.index, SAMPLE_ARTICLES.len() - 1);
        assert!(!reader.next(&mut tts));
        assert_eq!(reader.index, 0);
        assert_eq!(sim.commands().len(), 2);
    }

    #[test]
    fn auto_advance_is_reported() {
        let sim = SimulatedSynthesis::new();
        let mut tts = SynthesisAdapter::new(Box::new(sim), SynthesisConfig::default());
        let mut reader = ArticleReader {
            auto_advance: true,
            ..ArticleReader::default()
        };
        assert!(reader.next(&mut tts));
        assert_eq!(reader.current().title, "Async Runtimes");
    }
}
