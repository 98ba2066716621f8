use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use ghc_api::config::GhcApiConfig;
use ghc_api::GhcApi;
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// GHC Office Server - back-office API for move management
#[derive(Parser)]
#[command(name = "ghc-server")]
#[command(about = "GHC Office Server - back-office API for move management")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // home_dir is normalized while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("GHC Office Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, &args).await,
        Commands::Check => check_config(config),
    }
}

/// Module configs resolved against the server section.
struct Modules {
    ingress: ApiIngressConfig,
    ghc_api: GhcApiConfig,
}

fn resolve_modules(config: &AppConfig, args: &CliArgs) -> Result<Modules> {
    let mut ingress: ApiIngressConfig = config.module_config("api_ingress")?;
    let ghc_api: GhcApiConfig = config.module_config("ghc_api")?;

    // --port wins over an explicit bind_addr; an empty bind_addr follows server.*
    if ingress.bind_addr.trim().is_empty() {
        ingress.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    } else if let Some(port) = args.port {
        let host = ingress
            .bind_addr
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| config.server.host.clone());
        ingress.bind_addr = format!("{host}:{port}");
    }

    Ok(Modules { ingress, ghc_api })
}

async fn run_server(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let modules = resolve_modules(&config, args)?;

    let api = GhcApi::from_config(modules.ghc_api).context("Failed to start ghc_api")?;
    let ingress = ApiIngress::new(modules.ingress);
    let router = ingress.build_router(api.router());

    ingress
        .serve(router, async {
            if let Err(e) = modkit::shutdown::wait_for_shutdown().await {
                tracing::error!(error = %e, "shutdown signal handler failed");
            }
        })
        .await
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let modules = resolve_modules(&config, &CliArgs::default())?;
    modules
        .ingress
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", modules.ingress.bind_addr))?;
    GhcApi::from_config(modules.ghc_api).context("Invalid ghc_api configuration")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
