use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice_session::config::DEFAULT_CONFIG_PATH;
use voice_session::{
    control_channel, create_router, AppState, Config, HttpCommandClient, ListeningAdapter,
    NatsClient, NatsRecognitionEngine, ProcessSynthesizer, SpeechPlayback, StatusSurface,
    VoiceActivity, VoiceController,
};

#[derive(Parser, Debug)]
#[command(name = "voice-session", about = "Wake-phrase voice command session")]
struct Args {
    /// Configuration file (without extension)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    // Listening engine: without a reachable STT feed the session runs with
    // the control disabled
    let session_id = cfg.recognition.session_id();
    let listener = match NatsClient::connect(&cfg.recognition.nats_url, session_id.clone()).await {
        Ok(client) => {
            info!("Following STT session: {}", session_id);
            let engine = NatsRecognitionEngine::new(client, cfg.recognition.engine_config());
            ListeningAdapter::new(Box::new(engine))
        }
        Err(e) => {
            warn!("Speech recognition unavailable: {:#}", e);
            ListeningAdapter::unavailable()
        }
    };

    let synthesizer = if cfg.speech.enabled {
        ProcessSynthesizer::detect(cfg.speech.program.as_deref())
    } else {
        None
    };
    let playback = match synthesizer {
        Some(synth) => SpeechPlayback::new(Arc::new(synth), cfg.speech.voice_settings()),
        None => {
            warn!("Speech synthesis unavailable, responses will not be spoken");
            SpeechPlayback::unavailable()
        }
    }
    .with_timeout(cfg.timeouts.playback());

    let command_client = HttpCommandClient::default();
    info!("Command service: {}", command_client.endpoint());

    let controller = VoiceController::new(listener, Arc::new(command_client), playback)
        .with_dispatch_timeout(cfg.timeouts.dispatch());

    let voice = VoiceActivity::new();
    let surface = StatusSurface::new(controller.subscribe(), voice.subscribe());
    let (control, commands) = control_channel();

    let session_task = tokio::spawn(controller.run(commands));

    let app = create_router(AppState::new(surface, voice, control.clone()));
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
            if let Err(e) = control.shutdown().await {
                warn!("Session loop already stopped: {}", e);
            }
        })
        .await
        .context("HTTP server failed")?;

    session_task.await.context("Session task panicked")?;

    Ok(())
}
