/// Creator Studio - terminal client for the music catalog
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use studio_cli::{
    shell::{Outcome, Shell},
    StudioConfig,
};
use studio_gateway::GatewayClient;
use studio_playback::PlaybackCoordinator;
use studio_views::Studio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PROMPT: &str = "studio> ";

#[derive(Parser)]
#[command(name = "studio")]
#[command(about = "Creator Studio: manage genres and tracks from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "STUDIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell,
    /// Load and validate the configuration, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the prompt stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = StudioConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => run_shell(config).await?,
        Commands::CheckConfig => {
            println!("Configuration OK");
            println!("  gateway: {}", config.gateway.url);
            println!("  bucket:  {}", config.gateway.bucket);
            println!("  volume:  {}", config.player.initial_volume);
        }
    }

    Ok(())
}

async fn run_shell(config: StudioConfig) -> anyhow::Result<()> {
    let gateway = Arc::new(GatewayClient::new(config.gateway_config())?);
    let player = PlaybackCoordinator::headless(config.player.initial_volume);

    let studio = Arc::new(Studio::new(
        gateway.clone(),
        gateway.clone(),
        gateway.clone(),
        player,
    ));
    let _sessions = studio.clone().watch_sessions(gateway.subscribe());
    studio.start().await?;

    tracing::info!(gateway = %gateway.url(), bucket = %gateway.bucket(), "Studio ready");

    let shell = Shell::new(studio);
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\n", shell.greeting().await).as_bytes())
        .await?;

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match shell.execute(&line).await {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Output(text)) if text.is_empty() => {}
            Ok(Outcome::Output(text)) => stdout.write_all(format!("{}\n", text).as_bytes()).await?,
            Err(e) => stdout.write_all(format!("error: {}\n", e).as_bytes()).await?,
        }
    }

    stdout.write_all(b"Bye.\n").await?;
    stdout.flush().await?;
    Ok(())
}
