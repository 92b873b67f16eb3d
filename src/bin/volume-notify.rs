use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use volume_notify::{
    Classifier, Config, Daemon, DbusNotifier, Dispatcher, PulseServer, RoundingPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "volume-notify")]
#[command(
    about = "Show desktop notifications when PulseAudio volume or mute state changes",
    long_about = None
)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,
    /// How the displayed percentage is rounded
    #[arg(long, value_enum)]
    rounding: Option<RoundingPolicy>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("Invalid configuration")?;
    if let Some(rounding) = cli.rounding {
        config.notify.rounding = rounding;
    }
    tracing::debug!("Using {:?}", config);

    let (events_tx, events_rx) = mpsc::channel(config.pulse.queue_capacity());
    let server = PulseServer::connect(&config.pulse, events_tx).await?;
    let notifier = DbusNotifier::connect().await?;

    let mut daemon = Daemon::new(
        Box::new(server),
        Dispatcher::new(Box::new(notifier), config.notify.app_name.clone()),
        Classifier::new(config.notify.rounding, config.pulse.ignore_label.clone()),
        events_rx,
    );

    let outcome = daemon.run(shutdown_signal()).await;
    daemon.shutdown().await?;
    outcome?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut interrupt), Ok(mut terminate)) => {
                tokio::select! {
                    _ = interrupt.recv() => tracing::debug!("Received SIGINT"),
                    _ = terminate.recv() => tracing::debug!("Received SIGTERM"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to install signal handlers ({}), waiting for Ctrl-C", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
