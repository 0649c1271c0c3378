//! Console entry point for the shelter registry.
//!
//! # Responsibility
//! - Resolve configuration from file, environment and flags.
//! - Bootstrap logging and the SQLite store, then run the menu.
//! - Exit non-zero when bootstrap fails.

mod console;
mod menu;

use clap::Parser;
use console::Console;
use log::info;
use shelter_core::db::open_db;
use shelter_core::{
    init_logging, ShelterConfig, ShelterService, SqliteAnimalRepository, SqliteFamilyRepository,
};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Animal shelter registry.
#[derive(Debug, Parser)]
#[command(name = "shelter", version)]
struct Args {
    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// SQLite database file; overrides the config file.
    #[arg(long, value_name = "PATH", env = "SHELTER_DB")]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error; overrides the config file.
    #[arg(long, value_name = "LEVEL", env = "SHELTER_LOG_LEVEL")]
    log_level: Option<String>,
    /// Log directory; overrides the config file.
    #[arg(long, value_name = "DIR", env = "SHELTER_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<ShelterConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => ShelterConfig::load(path)?,
            None => ShelterConfig::default(),
        };

        if let Some(db) = &self.db {
            config.database.path = Some(db.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = Some(level.clone());
        }
        if let Some(dir) = &self.log_dir {
            config.logging.dir = Some(dir.clone());
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shelter: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = args.resolve_config()?;
    let cwd = std::env::current_dir()?;
    init_logging(&config.log_level(), &config.log_dir(&cwd))?;

    let conn = open_db(config.database_path())?;
    let service = ShelterService::new(
        SqliteAnimalRepository::try_new(&conn)?,
        SqliteFamilyRepository::try_new(&conn)?,
    );

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    menu::run_menu(&service, &mut console)?;

    info!("event=app_exit module=cli status=ok");
    Ok(())
}
