//! Petsim command line.
//!
//! One subcommand per action, plus `status`, `history` and `init`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use petsim::config::Config;
use petsim::core::{Action, PetId};
use petsim::{PetEngine, SqliteStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "petsim", version, about = "Look after a virtual pet")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config and PETSIM_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lower hunger, restore some energy
    Feed(PetArg),
    /// Raise happiness at the cost of energy and hunger
    Play(PetArg),
    /// Spend energy and a little happiness
    Train(PetArg),
    /// Lose happiness and energy
    Misbehave(PetArg),
    /// Apply idle decay for the time since the last update
    Decay(PetArg),
    /// Show current attributes
    Status(PetArg),
    /// List applied transitions, oldest first
    History(PetArg),
    /// Create the default user and pet if missing
    Init {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct PetArg {
    /// Pet id (defaults to the default user's first pet)
    #[arg(long)]
    pet: Option<PetId>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_database_override(cli.db.clone());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = SqliteStore::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database at {}",
            config.database_path.display()
        )
    })?;
    let mut engine = PetEngine::new(store);

    match cli.command {
        Command::Feed(arg) => run_action(&mut engine, &config, arg, Action::Feed),
        Command::Play(arg) => run_action(&mut engine, &config, arg, Action::Play),
        Command::Train(arg) => run_action(&mut engine, &config, arg, Action::Train),
        Command::Misbehave(arg) => run_action(&mut engine, &config, arg, Action::Misbehave),
        Command::Decay(arg) => run_action(&mut engine, &config, arg, Action::Decay),
        Command::Status(arg) => {
            let pet_id = resolve_pet(&mut engine, &config, arg)?;
            let pet = engine.status(pet_id)?;
            println!("{}", serde_json::to_string_pretty(&pet)?);
            Ok(())
        }
        Command::History(arg) => {
            let pet_id = resolve_pet(&mut engine, &config, arg)?;
            for entry in engine.history(pet_id)? {
                println!(
                    "{}  {:<10} {}",
                    entry.timestamp.to_rfc3339(),
                    entry.action,
                    entry.description()
                );
            }
            Ok(())
        }
        Command::Init { user, name } => {
            let username = user.unwrap_or_else(|| config.default_username.clone());
            let pet_name = name.unwrap_or_else(|| config.default_pet_name.clone());
            let pet = engine
                .seed_default(&username, &pet_name)
                .context("failed to seed default pet")?;
            println!("{}", serde_json::to_string_pretty(&pet)?);
            Ok(())
        }
    }
}

fn run_action(
    engine: &mut PetEngine<SqliteStore>,
    config: &Config,
    arg: PetArg,
    action: Action,
) -> Result<()> {
    let pet_id = resolve_pet(engine, config, arg)?;
    let outcome = engine
        .perform(pet_id, action)
        .with_context(|| format!("failed to {action} pet {pet_id}"))?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn resolve_pet(
    engine: &mut PetEngine<SqliteStore>,
    config: &Config,
    arg: PetArg,
) -> Result<PetId> {
    match arg.pet {
        Some(pet_id) => Ok(pet_id),
        None => Ok(engine
            .seed_default(&config.default_username, &config.default_pet_name)
            .context("failed to resolve default pet")?
            .id),
    }
}
