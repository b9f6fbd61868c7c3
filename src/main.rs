use anyhow::{Context, Result};
use clap::Parser;
use mobivox_audio::{CpalSink, DeviceManager, PlaybackController, PlaybackState};
use mobivox_core::{AppConfig, MobilityProfile};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mobivox", about = "Mobility profile analyzer with spoken AI reports")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Path to the mobility profile JSON file
    #[arg(short, long)]
    profile: PathBuf,

    /// Override the configured report engine
    #[arg(long)]
    engine: Option<String>,

    /// Print the report without synthesizing or playing speech
    #[arg(long)]
    no_speech: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("mobivox starting");

    let profile = MobilityProfile::load_from_file(&cli.profile)
        .with_context(|| format!("failed to load profile from {:?}", cli.profile))?;

    let summary = mobivox_core::summarize(&profile);
    tracing::info!(
        total_visas = summary.total_visas,
        visited_countries = summary.visited_countries,
        "profile summarized"
    );
    for (status, count) in summary.status_breakdown() {
        tracing::info!("visa status '{}': {}", status, count);
    }

    let engine_name = cli.engine.as_deref().unwrap_or(&config.engine.engine);
    let registry = mobivox_engine::EngineRegistry::new();
    let mut engine = registry
        .create(engine_name)
        .with_context(|| format!("failed to create engine '{}'", engine_name))?;

    let engine_config = match engine_name {
        "gemini" => match &config.engine.gemini {
            Some(gemini) => {
                toml::Value::try_from(gemini).context("failed to serialize gemini config")?
            }
            None => toml::Value::Table(Default::default()),
        },
        _ => toml::Value::Table(Default::default()),
    };

    engine
        .initialize(engine_config)
        .await
        .with_context(|| format!("failed to initialize engine '{}'", engine_name))?;
    tracing::info!("report engine '{}' active", engine_name);

    // A failed analysis degrades to the fixed fallback report.
    let report = match engine.analyze(&profile, &summary).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("analysis failed: {}", e);
            mobivox_engine::FALLBACK_REPORT.to_string()
        }
    };
    println!("{}", report);

    if cli.no_speech {
        return Ok(());
    }

    let speech = match engine.synthesize(&report).await {
        Ok(Some(speech)) => speech,
        Ok(None) => {
            tracing::info!("engine returned no speech audio");
            return Ok(());
        }
        Err(e) => {
            tracing::warn!("speech synthesis failed: {}", e);
            return Ok(());
        }
    };

    let buffer =
        match mobivox_audio::decode_payload(&speech.data, speech.sample_rate, speech.channels) {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::warn!("unable to play speech: {}", e);
                return Ok(());
            }
        };
    tracing::info!(
        frames = buffer.frame_count(),
        sample_rate = buffer.sample_rate(),
        "playing spoken report ({:.1}s)",
        buffer.duration_secs(),
    );

    let device_manager = DeviceManager::new();
    let output_device = device_manager
        .get_output_device(&config.output.device_name)
        .with_context(|| {
            format!("failed to get output device: {}", config.output.device_name)
        })?;

    let mut controller = PlaybackController::new(CpalSink::new(output_device));
    let mut events = controller
        .take_event_receiver()
        .context("playback event receiver already taken")?;

    controller.play(&buffer)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping playback");
                controller.stop();
                break;
            }
            event = events.recv() => {
                match event {
                    Some(event) => {
                        controller.handle_event(event);
                        if controller.state() == PlaybackState::Idle {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
