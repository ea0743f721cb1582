use clap::{Parser, Subcommand};
use database::DbRepository;
use std::net::IpAddr;
use web_server::AppState;

mod telemetry;

/// The main entry point for the invoice dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the settings have development defaults.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Hashing needs neither settings nor logging.
    if let Commands::HashPassword { password } = &cli.command {
        return hash_password(password);
    }

    let mut settings = configuration::load_settings()?;
    let _log_guard = telemetry::init(&settings.log)?;

    match cli.command {
        Commands::Serve(args) => {
            if let Some(host) = args.host {
                settings.server.host = host;
            }
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            handle_serve(settings).await
        }
        Commands::Migrate => handle_migrate(settings).await,
        Commands::HashPassword { .. } => Ok(()),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A dashboard backend for invoices and customers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending migrations and start the web server.
    Serve(ServeArgs),
    /// Run pending database migrations and exit.
    Migrate,
    /// Print the bcrypt hash of a password, for seeding the `users` table.
    HashPassword {
        /// The plain-text password to hash.
        password: String,
    },
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind (overrides HOST).
    #[arg(long)]
    host: Option<IpAddr>,

    /// The port to listen on (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(settings: configuration::Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;

    let state = AppState::new(DbRepository::new(db_pool.clone()));
    let result =
        web_server::run_server(settings.server.socket_addr(), state, shutdown_signal()).await;

    database::close(db_pool).await;
    result
}

async fn handle_migrate(settings: configuration::Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    let result = database::run_migrations(&db_pool).await;
    database::close(db_pool).await;
    result?;
    tracing::info!("Migrations are up to date.");
    Ok(())
}

fn hash_password(password: &str) -> anyhow::Result<()> {
    let hashed = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    println!("{hashed}");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        // Never resolve, so the server keeps running.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
