mod backends;
mod config;
mod terminal;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use ritual_core::{
    EffectOrchestrator, LogDispatcher, NotificationDispatcher, ParticleEngine, StepController,
    WebhookDispatcher,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    backends::{AssetAudio, TracingRenderer, WarmupLoader},
    config::{load_settings, DEFAULT_CONFIG_FILE},
};

#[derive(Parser, Debug)]
#[command(about = "Speak to the Oracle from the terminal")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    webhook_url: Option<String>,
    #[arg(long)]
    assets_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.webhook_url {
        settings.webhook_url = Some(url);
    }
    if let Some(dir) = args.assets_dir {
        settings.assets_dir = dir;
    }

    let dispatcher: Arc<dyn NotificationDispatcher> = match settings.webhook_endpoint()? {
        Some(endpoint) => {
            info!(host = endpoint.host_str().unwrap_or_default(), "webhook notifications enabled");
            Arc::new(WebhookDispatcher::new(endpoint).context("failed to build webhook client")?)
        }
        None => {
            warn!("no webhook configured; sealed messages are only logged");
            Arc::new(LogDispatcher)
        }
    };

    let engine = ParticleEngine::new(Arc::new(WarmupLoader::new(settings.engine_warmup())));
    let timings = settings.timings();
    let effects = EffectOrchestrator::new(
        Arc::new(AssetAudio::new(settings.assets_dir.clone())),
        Arc::new(TracingRenderer::default()),
        engine.ready_signal(),
        timings,
    );
    let mut controller = StepController::new(effects, dispatcher, timings);

    let init = Arc::clone(&engine);
    tokio::spawn(async move {
        init.initialize().await;
    });

    controller.open();

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(terminal::render(&controller).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = terminal::interpret(controller.step(), &line);
        let outcome = terminal::execute(&mut controller, command);

        let mut screen = String::new();
        if let Some(notice) = terminal::notice(controller.step(), outcome) {
            screen.push_str(&format!("\n  {notice}\n"));
        }
        screen.push_str(&terminal::render(&controller));
        stdout.write_all(screen.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("input closed; leaving the ritual");
    Ok(())
}
