use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config_vault::api;
use config_vault::cli::{handle_backup_command, handle_config_command, BackupCommands, ConfigCommands};
use config_vault::config::paths::{StorePaths, DATA_DIR_ENV};
use config_vault::config::settings::{ServerSettings, DEFAULT_BIND, DEFAULT_PORT, PORT_ENV};
use config_vault::storage::{initialize_storage, needs_initialization, Storage};

#[derive(Parser, Debug)]
#[command(
    name = "config-vault",
    version,
    about = "File-backed JSON configuration store with snapshot backups",
    long_about = "config-vault keeps a single JSON configuration document on disk and \
                  serves it over an HTTP API. Sections can be read and replaced \
                  individually, and the whole document can be snapshotted to \
                  timestamped backups and restored later."
)]
struct Cli {
    /// Directory holding config.json and backups/ [default: current directory]
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct ServerArgs {
    /// TCP port for the HTTP server
    #[arg(long, global = true, default_value_t = DEFAULT_PORT, env = PORT_ENV)]
    port: u16,

    /// Interface address to bind
    #[arg(long, global = true, default_value = DEFAULT_BIND, env = "CONFIG_VAULT_BIND")]
    bind: String,
}

impl ServerArgs {
    fn into_settings(self) -> ServerSettings {
        ServerSettings::new(self.bind, self.port)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Create an empty config document if none exists
    Init,

    /// Inspect the config document
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show resolved paths and server settings
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let paths = StorePaths::resolve(cli.data_dir)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            run_server(paths, cli.server.into_settings()).await?;
        }
        Commands::Init => {
            if initialize_storage(&paths)? {
                println!("Created empty config document: {}", paths.config_file().display());
            } else {
                println!("Config document already exists: {}", paths.config_file().display());
            }
            println!("Backup directory: {}", paths.backup_dir().display());
        }
        Commands::Config(cmd) => {
            let storage = Storage::new(paths)?;
            handle_config_command(&storage.config, cmd)?;
        }
        Commands::Backup(cmd) => {
            let storage = Storage::new(paths)?;
            handle_backup_command(&storage.backups, cmd)?;
        }
        Commands::Paths => {
            let settings = cli.server.into_settings();
            println!("config-vault");
            println!("============");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Config document:  {}", paths.config_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Listen address:   {}", settings.socket_addr()?);
        }
    }

    Ok(())
}

async fn run_server(paths: StorePaths, settings: ServerSettings) -> Result<()> {
    let storage = Storage::new(paths).context("Failed to prepare data directory")?;
    if needs_initialization(storage.paths()) {
        warn!(
            path = %storage.config.path().display(),
            "config document does not exist yet; reads will fail until it is created \
             (run `config-vault init` or PUT /api/config)"
        );
    }

    let listener = api::bind(&settings).await?;
    api::serve(listener, storage, shutdown_signal()).await?;

    info!("config API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            error!("failed to listen for Ctrl+C signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
