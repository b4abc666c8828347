mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gc_core::{Cell, Direction, LatLng, SensorMode, Session, StatusReport, WorldError};
use gc_store::{ProfileStore, Store};
use rmcp::{ServiceExt, transport::stdio};

#[derive(Parser)]
#[command(
    name = "geocoin",
    about = "Geocoin world CLI and MCP server",
    after_help = "Sensor tracking lives only inside `geocoin serve` (the gc_sensor tool). \
                  Every other command starts with the sensor idle, since its mode is not saved."
)]
struct Cli {
    /// Player profile to load (default: "default")
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Show position, wallet, and the caches in view
    Look,

    /// Move one tile
    Move {
        /// north, south, east or west
        direction: Direction,
    },

    /// Jump to a coordinate, as a location fix would
    Locate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Take the top coin of the cache in cell (i, j)
    Collect {
        #[arg(allow_negative_numbers = true)]
        i: i32,
        #[arg(allow_negative_numbers = true)]
        j: i32,
    },

    /// Drop the wallet's top coin onto the cache in cell (i, j)
    Deposit {
        #[arg(allow_negative_numbers = true)]
        i: i32,
        #[arg(allow_negative_numbers = true)]
        j: i32,
    },

    /// List the coins in the wallet, top first
    Wallet,

    /// Print every position reached, oldest first
    History,

    /// Discard all progress for the profile
    Reset,
}

fn data_dir() -> PathBuf {
    std::env::var("GEOCOIN_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(gc_store::default_base_dir)
}

fn open_session(cli: &Cli) -> Result<Session<Store>> {
    let base_dir = data_dir();
    let config = gc_store::load_config(&base_dir).context("failed to load config")?;
    let store = ProfileStore::open(cli.profile.as_deref(), Some(&base_dir))
        .context("failed to open profile store")?;
    tracing::debug!(profile = store.profile(), "profile opened");

    let (session, issues) =
        Session::load(config, store.into_store()).context("failed to load session")?;
    for issue in &issues {
        eprintln!(
            "warning: saved {} was unreadable and has been reset ({})",
            issue.key, issue.error
        );
    }
    Ok(session)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Serve => cmd_serve(&cli).await,
        Commands::Look => cmd_look(&cli),
        Commands::Move { direction } => cmd_move(&cli, *direction),
        Commands::Locate { lat, lng } => cmd_locate(&cli, LatLng::new(*lat, *lng)),
        Commands::Collect { i, j } => cmd_collect(&cli, Cell::new(*i, *j)),
        Commands::Deposit { i, j } => cmd_deposit(&cli, Cell::new(*i, *j)),
        Commands::Wallet => cmd_wallet(&cli),
        Commands::History => cmd_history(&cli),
        Commands::Reset => cmd_reset(&cli),
    }
}

async fn cmd_serve(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    tracing::info!(cell = %session.current_cell(), "starting MCP server");

    let server = server::GeocoinServer::new(session);
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}

fn sensor_label(mode: SensorMode) -> &'static str {
    match mode {
        SensorMode::Idle => "idle",
        SensorMode::Tracking => "tracking",
    }
}

fn print_status(status: &StatusReport) {
    println!("position: {} (cell {})", status.position, status.cell);
    println!("sensor:   {}", sensor_label(status.sensor));
    println!("wallet:   {}", status.wallet_summary);
}

fn cmd_look(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    print_status(&session.status());

    let caches = session
        .visible_caches()
        .context("failed to resolve caches in view")?;
    println!("caches in view: {}", caches.len());
    for cache in &caches {
        println!("  {:<20} {:>3} coins", cache.cell().to_string(), cache.len());
    }
    Ok(())
}

fn cmd_move(cli: &Cli, direction: Direction) -> Result<()> {
    let mut session = open_session(cli)?;
    let status = session
        .step(direction)
        .with_context(|| format!("failed to move {direction}"))?;
    print_status(&status);
    Ok(())
}

fn cmd_locate(cli: &Cli, point: LatLng) -> Result<()> {
    let mut session = open_session(cli)?;
    let status = session
        .locate(point)
        .with_context(|| format!("failed to apply fix {point}"))?;
    print_status(&status);
    Ok(())
}

fn cmd_collect(cli: &Cli, cell: Cell) -> Result<()> {
    let mut session = open_session(cli)?;
    match session.collect(cell) {
        Ok(report) => {
            let left = report.status.cache.map_or(0, |c| c.coins);
            println!("collected {} from {cell} ({left} left)", report.coin);
            println!("wallet:   {}", report.status.wallet_summary);
            Ok(())
        }
        Err(WorldError::EmptyStack(_)) => {
            println!("cache {cell} is empty, nothing collected");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to collect from {cell}")),
    }
}

fn cmd_deposit(cli: &Cli, cell: Cell) -> Result<()> {
    let mut session = open_session(cli)?;
    match session.deposit(cell) {
        Ok(report) => {
            let held = report.status.cache.map_or(0, |c| c.coins);
            println!("deposited {} into {cell} ({held} coins there)", report.coin);
            println!("wallet:   {}", report.status.wallet_summary);
            Ok(())
        }
        Err(WorldError::EmptyStack(_)) => {
            println!("wallet is empty, nothing deposited");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to deposit into {cell}")),
    }
}

fn cmd_wallet(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    let wallet = session.wallet();
    println!("{}", wallet.summary());
    for coin in wallet.coins().iter().rev() {
        println!("  {coin}");
    }
    Ok(())
}

fn cmd_history(cli: &Cli) -> Result<()> {
    let session = open_session(cli)?;
    for (n, point) in session.tracker().history().iter().enumerate() {
        println!("{n:>4}  {point}");
    }
    Ok(())
}

fn cmd_reset(cli: &Cli) -> Result<()> {
    let mut session = open_session(cli)?;
    let status = session.reset().context("failed to reset")?;
    println!("progress discarded");
    print_status(&status);
    Ok(())
}
