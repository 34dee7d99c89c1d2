//! Voice catalog entries and voice resolution.

use serde::{Deserialize, Serialize};

/// One voice offered by the synthesis platform.
///
/// `uri` is the identity; two descriptors with the same `uri` are the same
/// voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub name: String,
    /// BCP-47 language tag, e.g. `"fr-FR"`.
    pub language: String,
    pub uri: String,
    /// Rendered on-device rather than by a remote service.
    #[serde(default)]
    pub is_local: bool,
    /// The platform's default voice.
    #[serde(default)]
    pub is_default: bool,
}

impl VoiceDescriptor {
    /// A local, non-default voice.
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            uri: uri.into(),
            is_local: true,
            is_default: false,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_local(mut self, is_local: bool) -> Self {
        self.is_local = is_local;
        self
    }

    /// Whether this voice's language tag starts with `prefix`
    /// (`"en"` matches `"en-GB"`).
    pub fn speaks(&self, prefix: &str) -> bool {
        self.language.starts_with(prefix)
    }
}

/// Pick the voice for an utterance.
///
/// Order of preference:
///
/// 1. `explicit`, when given.
/// 2. The first catalog entry whose language tag equals `language`.
/// 3. The first catalog entry.
/// 4. `None`, so the platform uses its own default.
///
/// ```
/// use speech_adapters::synthesis::{resolve_voice, VoiceDescriptor};
///
/// let catalog = vec![
///     VoiceDescriptor::new("Alex", "en-US", "a"),
///     VoiceDescriptor::new("Amélie", "fr-FR", "b"),
/// ];
/// assert_eq!(resolve_voice(None, "fr-FR", &catalog).unwrap().uri, "b");
/// assert_eq!(resolve_voice(None, "de-DE", &catalog).unwrap().uri, "a");
/// assert!(resolve_voice(None, "fr-FR", &[]).is_none());
/// ```
pub fn resolve_voice(
    explicit: Option<&VoiceDescriptor>,
    language: &str,
    catalog: &[VoiceDescriptor],
) -> Option<VoiceDescriptor> {
    if let Some(voice) = explicit {
        return Some(voice.clone());
    }
    catalog
        .iter()
        .find(|v| v.language == language)
        .or_else(|| catalog.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Alex", "en-US", "a"),
            VoiceDescriptor::new("Amélie", "fr-FR", "b"),
            VoiceDescriptor::new("Thomas", "fr-FR", "c"),
        ]
    }

    #[test]
    fn language_match_wins_over_first_entry() {
        let v = resolve_voice(None, "fr-FR", &catalog()).unwrap();
        assert_eq!(v.uri, "b");
    }

    #[test]
    fn first_match_in_catalog_order() {
        // Two fr-FR voices: the earlier one is chosen.
        let v = resolve_voice(None, "fr-FR", &catalog()).unwrap();
        assert_ne!(v.uri, "c");
    }

    #[test]
    fn no_match_falls_back_to_first_entry() {
        let v = resolve_voice(None, "ja-JP", &catalog()).unwrap();
        assert_eq!(v.uri, "a");
    }

    #[test]
    fn explicit_voice_wins_even_if_not_in_catalog() {
        let explicit = VoiceDescriptor::new("Custom", "en-GB", "z");
        let v = resolve_voice(Some(&explicit), "fr-FR", &catalog()).unwrap();
        assert_eq!(v, explicit);
    }

    #[test]
    fn empty_catalog_means_platform_default() {
        assert!(resolve_voice(None, "en-US", &[]).is_none());
    }

    #[test]
    fn match_is_exact_not_prefix() {
        let v = resolve_voice(None, "fr", &catalog()).unwrap();
        assert_eq!(v.uri, "a");
    }

    #[test]
    fn speaks_matches_language_prefix() {
        let v = VoiceDescriptor::new("Daniel", "en-GB", "d");
        assert!(v.speaks("en"));
        assert!(!v.speaks("fr"));
    }

    #[test]
    fn json_defaults_for_flags() {
        let v: VoiceDescriptor =
            serde_json::from_str(r#"{"name":"Alex","language":"en-US","uri":"a"}"#).unwrap();
        assert!(!v.is_local);
        assert!(!v.is_default);
    }
}
