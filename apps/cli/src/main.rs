//! # Rocket Cart CLI
//!
//! Inspects and mutates the persisted cart from a terminal.
//!
//! ## Usage
//! ```text
//! rocket-cart [--config PATH] show
//! rocket-cart add 3
//! rocket-cart update 3 5
//! rocket-cart remove 3
//! rocket-cart clear
//! rocket-cart config init [--force]
//! ```
//!
//! The resulting cart is printed to stdout as JSON. Notices and logs go to
//! stderr, so the output can be piped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use rocket_cart::{ApiClient, CartConfig, CartEngine, CartOutcome};
use rocket_core::{AmountUpdate, Notice, ProductId};
use rocket_db::{Database, DbConfig};

#[derive(Parser, Debug)]
#[command(name = "rocket-cart")]
#[command(about = "Manage the Rocket Shoes shopping cart")]
#[command(version)]
struct Cli {
    /// Config file (defaults to cart.toml in the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current cart
    Show,

    /// Add one unit of a product
    Add { id: ProductId },

    /// Remove a product from the cart
    Remove { id: ProductId },

    /// Set a product's quantity (zero or negative is ignored)
    Update {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Empty the cart
    Clear,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the effective settings (defaults plus environment) to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,rocket=debug,sqlx=warn";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    if let Command::Config { action: ConfigCommand::Init { force } } = cli.command {
        let path = cli
            .config
            .or_else(CartConfig::default_config_path)
            .context("no config path given and no platform config dir")?;
        init_config(&path, force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = CartConfig::load(cli.config).context("loading configuration")?;

    let engine = open_engine(&config).await?;

    let outcome = match cli.command {
        Command::Show => None,
        Command::Add { id } => Some(engine.add_product(id).await),
        Command::Remove { id } => Some(engine.remove_product(id).await),
        Command::Update { id, amount } => Some(
            engine
                .update_product_amount(AmountUpdate::new(id, amount))
                .await,
        ),
        Command::Clear => Some(engine.clear().await),
        Command::Config { .. } => None,
    };

    println!("{}", serde_json::to_string_pretty(engine.cart().as_ref())?);

    match outcome {
        Some(CartOutcome::Rejected(err)) => {
            info!(error = %err, "Command rejected");
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Initializes logging to stderr.
///
/// Default filter: [`DEFAULT_LOG_FILTER`], overridable with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

/// Builds the stderr subscriber. The filter is the only level gate.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Writes the effective configuration to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let mut config = CartConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    config.save(Some(path.to_path_buf()))?;

    eprintln!("Wrote {}", path.display());
    Ok(())
}

async fn open_engine(config: &CartConfig) -> anyhow::Result<CartEngine> {
    let db_path = config
        .database_path()
        .context("no database path configured and no platform data dir")?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    info!(path = %db_path.display(), "Opening cart database");
    let db = Database::new(DbConfig::new(&db_path)).await?;

    let api = ApiClient::new(&config.api.base_url, config.api_timeout())?;

    let engine = CartEngine::builder()
        .api(api)
        .store(db)
        .storage_key(config.storage.storage_key.clone())
        .notifier(|notice: &Notice| eprintln!("{notice}"))
        .open()
        .await?;

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn default_filter_quiets_sqlx_debug() {
        let subscriber = log_subscriber(EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "sqlx::query", Level::DEBUG));
            assert!(tracing::enabled!(target: "sqlx::query", Level::WARN));
            assert!(!tracing::enabled!(target: "hyper::proto", Level::TRACE));
            assert!(!tracing::enabled!(target: "hyper::proto", Level::DEBUG));
            assert!(tracing::enabled!(target: "rocket_cart::engine", Level::DEBUG));
            assert!(tracing::enabled!(target: "reqwest::connect", Level::INFO));
        });
    }

    #[test]
    fn explicit_filter_is_honored() {
        let subscriber = log_subscriber(EnvFilter::new("warn"));

        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(target: "rocket_cart::engine", Level::INFO));
            assert!(tracing::enabled!(target: "rocket_cart::engine", Level::WARN));
        });
    }

    #[test]
    fn config_init_writes_then_refuses_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.toml");

        init_config(&path, false).unwrap();
        let written = CartConfig::load(Some(path.clone())).unwrap();
        assert_eq!(written.storage.storage_key, "@RocketShoes:cart");

        std::fs::write(&path, "[api]\ntimeout_secs = 42\n").unwrap();
        assert!(init_config(&path, false).is_err());
        assert!(std::fs::read_to_string(&path).unwrap().contains("42"));

        init_config(&path, true).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(!contents.contains("42"));
    }
}
