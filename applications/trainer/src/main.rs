//! Aural Trainer - command-line ear training
//!
//! Plays the four ear-training games through the default audio device:
//! pick a game, audition the hidden processing, submit a guess, and see
//! the score. Scores can be posted to a stats backend when one is
//! configured.

mod output;
mod repl;

use anyhow::{Context, Result};
use aural_audio::assets::{AssetLibrary, FileAssetLibrary};
use aural_audio::SessionManager;
use aural_core::{GameKind, ScoreSubmitter, StemId};
use aural_game::submit::{HttpScoreSubmitter, NullSubmitter};
use aural_game::{config, GameConfig, ParameterGenerator, RoundController};
use clap::Parser;
use output::AudioOutput;
use repl::Repl;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aural-trainer")]
#[command(about = "Ear-training games for mixing engineers", long_about = None)]
struct Cli {
    /// Which game to play: balance, compressor, frequency, or stereo
    #[arg(value_parser = parse_game)]
    game: GameKind,

    /// Directory holding the game's audio clips
    #[arg(short, long, default_value = "assets")]
    assets: String,

    /// Stats backend base URL; scores stay local when unset
    #[arg(long, env = "AURAL_BACKEND")]
    backend: Option<String>,

    /// User id for score submission
    #[arg(long, env = "AURAL_USER", default_value = "local")]
    user: String,

    /// Seed the round generator for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_game(value: &str) -> std::result::Result<GameKind, String> {
    match value {
        "balance" => Ok(GameKind::Balance),
        "compressor" => Ok(GameKind::Compressor),
        "frequency" => Ok(GameKind::Frequency),
        "stereo" | "pan" => Ok(GameKind::Stereo),
        other => Err(format!(
            "unknown game '{}' (expected balance, compressor, frequency, or stereo)",
            other
        )),
    }
}

/// Asset names the chosen game can request
fn catalog_for(kind: GameKind) -> Vec<String> {
    match kind {
        GameKind::Balance => config::TRACK_FOLDERS
            .iter()
            .flat_map(|track| {
                StemId::ALL
                    .iter()
                    .map(move |stem| config::stem_asset(track, *stem))
            })
            .collect(),
        GameKind::Compressor | GameKind::Frequency => {
            config::MIX_CLIPS.iter().map(|s| (*s).to_string()).collect()
        }
        GameKind::Stereo => config::VOCAL_CLIPS.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aural_trainer=info,aural_game=info,aural_audio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let library = Arc::new(FileAssetLibrary::new(cli.assets.clone()));

    // Warm the decode cache so the first audition starts without a stall.
    // A missing clip only breaks the rounds that draw it, so keep going.
    rt.block_on(async {
        for name in catalog_for(cli.game) {
            if let Err(e) = library.load(&name).await {
                warn!(asset = %name, error = %e, "clip unavailable");
            }
        }
    });

    let generator = match cli.seed {
        Some(seed) => ParameterGenerator::seeded(seed),
        None => ParameterGenerator::new(),
    };
    let controller = Arc::new(Mutex::new(RoundController::new(
        GameConfig::for_kind(cli.game),
        generator,
        SessionManager::new(library),
    )));

    // The audio thread renders through try_lock: while the REPL briefly
    // holds the controller the device gets silence instead of blocking.
    let render_controller = controller.clone();
    let _output = AudioOutput::start(move |buffer, sample_rate| match render_controller.try_lock() {
        Ok(mut controller) => controller.session_mut().render(buffer, sample_rate),
        Err(_) => buffer.fill(0.0),
    })
    .context("failed to open audio output")?;

    let submitter: Box<dyn ScoreSubmitter> = match &cli.backend {
        Some(base_url) => {
            info!(backend = %base_url, "submitting scores");
            Box::new(HttpScoreSubmitter::new(base_url)?)
        }
        None => Box::new(NullSubmitter),
    };

    Repl::new(controller, rt, submitter, cli.user).run()
}
