//! `speech-demo`: scripted walk through both adapters.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the simulated platforms and probe their capabilities.
//! 4. Create a single-threaded [`tokio`] runtime.
//! 5. Run the voice-command session, then the article reader.
//!
//! Every interesting state change is printed to stdout as one JSON line.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use speech_adapters::{
    config::{AppConfig, AppPaths},
    demo::{command_config, ArticleReader, CommandSession, SpeedPreset, AUTO_ADVANCE_DELAY},
    platform::{Capabilities, RecognitionResult, SimulatedRecognition, SimulatedSynthesis},
    recognition::RecognitionAdapter,
    synthesis::{SynthesisAdapter, VoiceDescriptor},
};

/// How long the event loop waits for another platform signal before it
/// considers the adapter settled.
const SETTLE_WINDOW: Duration = Duration::from_millis(20);

/// Utterances fed to the voice-command session.
const SPOKEN_COMMANDS: [&str; 5] = [
    "Make it red",
    "now BLUE please",
    "hello there",
    "green",
    "reset",
];

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn emit<T: Serialize>(screen: &str, step: &str, state: &T) -> Result<()> {
    let line = serde_json::json!({
        "screen": screen,
        "step": step,
        "state": state,
    });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Voice commands
// ---------------------------------------------------------------------------

async fn settle_recognition(stt: &mut RecognitionAdapter) {
    while let Ok(Some(_)) = tokio::time::timeout(SETTLE_WINDOW, stt.next_event()).await {}
}

async fn run_voice_commands(sim: SimulatedRecognition, config: &AppConfig) -> Result<()> {
    let mut stt = RecognitionAdapter::new(
        Box::new(sim.clone()),
        command_config(&config.recognition.language),
    );
    let mut session = CommandSession::new();

    if !stt.is_supported() {
        log::warn!("voice commands unavailable");
        return emit("commands", "unsupported", &stt.snapshot());
    }

    for phrase in SPOKEN_COMMANDS {
        session.toggle(&mut stt);
        settle_recognition(&mut stt).await;

        // A single-shot engine delivers one final result, then ends.
        sim.emit_results(vec![RecognitionResult::final_text(phrase)], 0);
        sim.emit_end();
        settle_recognition(&mut stt).await;

        match session.observe(&mut stt) {
            Some(cmd) => log::info!("\"{phrase}\" -> {}", cmd.phrase()),
            None => log::info!("\"{phrase}\" -> no command"),
        }
        emit("commands", phrase, &session)?;
    }

    // A microphone that was never granted.
    session.toggle(&mut stt);
    sim.emit_error("not-allowed");
    settle_recognition(&mut stt).await;
    emit("commands", "permission", &stt.snapshot())?;
    stt.reset_error();

    Ok(())
}

// ---------------------------------------------------------------------------
// Article reader
// ---------------------------------------------------------------------------

fn builtin_voices() -> Vec<VoiceDescriptor> {
    vec![
        VoiceDescriptor::new("Alex", "en-US", "sim://alex").with_default(true),
        VoiceDescriptor::new("Daniel English", "en-GB", "sim://daniel"),
        VoiceDescriptor::new("Amélie", "fr-CA", "sim://amelie"),
        VoiceDescriptor::new("Anna", "de-DE", "sim://anna").with_local(false),
    ]
}

async fn settle_synthesis(tts: &mut SynthesisAdapter) {
    while let Ok(Some(_)) = tokio::time::timeout(SETTLE_WINDOW, tts.next_event()).await {}
}

async fn run_article_reader(sim: SimulatedSynthesis, config: &AppConfig) -> Result<()> {
    let mut tts = SynthesisAdapter::new(Box::new(sim.clone()), config.synthesis.clone());
    if !tts.is_supported() {
        log::warn!("article reader unavailable");
        return emit("reader", "unsupported", &tts.snapshot());
    }

    // Catalogs often arrive after construction.
    if tts.voices().is_empty() {
        sim.set_voices(builtin_voices());
        settle_synthesis(&mut tts).await;
    }
    emit("reader", "voices", &tts.snapshot())?;

    let mut reader = ArticleReader {
        auto_advance: true,
        ..ArticleReader::new(SpeedPreset::Fast)
    };

    reader.read(&mut tts);
    settle_synthesis(&mut tts).await;
    emit("reader", "reading", &tts.snapshot())?;

    tts.pause();
    settle_synthesis(&mut tts).await;
    emit("reader", "paused", &tts.snapshot())?;

    tts.resume();
    settle_synthesis(&mut tts).await;
    emit("reader", "resumed", &tts.snapshot())?;

    if reader.next(&mut tts) {
        emit("reader", "advancing", &reader)?;
        tokio::time::sleep(AUTO_ADVANCE_DELAY).await;
        reader.read(&mut tts);
        settle_synthesis(&mut tts).await;
    }
    emit("reader", "next article", &tts.snapshot())?;

    sim.finish();
    settle_synthesis(&mut tts).await;
    emit("reader", "finished", &tts.snapshot())?;

    tts.speak("   ");
    emit("reader", "blank text", &tts.snapshot())?;
    tts.reset_error();

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("speech demo starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();

    // 3. Platforms
    let recognition = SimulatedRecognition::new().with_auto_confirm();
    let synthesis = SimulatedSynthesis::new()
        .with_auto_confirm()
        .with_catalog_file(&paths.voices_file)
        .unwrap_or_else(|e| {
            log::warn!(
                "Failed to load {} ({e}); starting with no voices",
                paths.voices_file.display()
            );
            SimulatedSynthesis::new().with_auto_confirm()
        });
    let caps = Capabilities::probe(&recognition, &synthesis);
    log::info!(
        "capabilities: recognition={} synthesis={}",
        caps.recognition,
        caps.synthesis
    );

    // 4. Runtime (single thread: the platforms are not Send)
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // 5. Sessions
    rt.block_on(async {
        run_voice_commands(recognition, &config).await?;
        run_article_reader(synthesis, &config).await
    })?;

    log::info!("speech demo finished");
    Ok(())
}
