//! Voice-command session: spoken colour names drive a background colour.

use serde::Serialize;

use crate::config::RecognitionConfig;
use crate::recognition::RecognitionAdapter;

/// A recognised command phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCommand {
    Red,
    Blue,
    Green,
    Reset,
}

impl ColorCommand {
    /// Matching order.  The first phrase contained in the utterance wins.
    pub const ALL: [ColorCommand; 4] = [
        ColorCommand::Red,
        ColorCommand::Blue,
        ColorCommand::Green,
        ColorCommand::Reset,
    ];

    pub fn phrase(self) -> &'static str {
        match self {
            ColorCommand::Red => "red",
            ColorCommand::Blue => "blue",
            ColorCommand::Green => "green",
            ColorCommand::Reset => "reset",
        }
    }

    /// Background colour the command selects.
    pub fn color(self) -> &'static str {
        match self {
            ColorCommand::Red => "#ffcccc",
            ColorCommand::Blue => "#ccccff",
            ColorCommand::Green => "#ccffcc",
            ColorCommand::Reset => DEFAULT_BACKGROUND,
        }
    }
}

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Find the command in `text` (case-insensitive substring match).
///
/// ```
/// use speech_adapters::demo::{match_command, ColorCommand};
///
/// assert_eq!(match_command("Make it BLUE please"), Some(ColorCommand::Blue));
/// assert_eq!(match_command("hello"), None);
/// ```
pub fn match_command(text: &str) -> Option<ColorCommand> {
    let text = text.trim().to_lowercase();
    ColorCommand::ALL
        .into_iter()
        .find(|cmd| text.contains(cmd.phrase()))
}

/// Recognition settings for command capture: one utterance, finals only.
pub fn command_config(language: &str) -> RecognitionConfig {
    RecognitionConfig {
        continuous: false,
        interim_results: false,
        language: language.to_string(),
        ..RecognitionConfig::default()
    }
}

/// State of the voice-command screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSession {
    pub background: &'static str,
    pub last_command: Option<ColorCommand>,
}

impl Default for CommandSession {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            last_command: None,
        }
    }
}

impl CommandSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening on a clean transcript, or stop if already listening.
    pub fn toggle(&self, stt: &mut RecognitionAdapter) {
        if stt.is_listening() {
            stt.stop();
        } else {
            stt.clear_transcript();
            stt.start();
        }
    }

    /// Look at the newest final segment and apply its command, if any.
    /// A matched segment is consumed by clearing the transcript.
    pub fn observe(&mut self, stt: &mut RecognitionAdapter) -> Option<ColorCommand> {
        let latest = stt.transcript().last()?;
        let command = match_command(&latest.text)?;

        log::info!("voice command: {}", command.phrase());
        self.background = command.color();
        self.last_command = Some(command);
        stt.clear_transcript();
        Some(command)
    }
}
