//! PetShelter CLI
//!
//! Command-line interface for the pet shelter record store

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use petshelter_core::logging_facility::{self, Profile};
use petshelter_engine::Shelter;
use petshelter_store::StoreConfig;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "petshelter")]
#[command(about = "PetShelter - Track the pets in a shelter", long_about = None)]
struct Cli {
    /// Database file; created on first use
    #[arg(long, global = true, default_value = ".petshelter/pets_shelter.db")]
    db: PathBuf,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every pet in the catalog
    List(commands::catalog::ListArgs),
    /// Show one pet
    Show(commands::catalog::ShowArgs),
    /// Add a new pet
    Add(commands::editor::AddArgs),
    /// Change fields of an existing pet
    Edit(commands::editor::EditArgs),
    /// Delete one pet
    Delete(commands::editor::DeleteArgs),
    /// Delete every pet
    DeleteAll,
    /// Add the sample pet (Toto, Terrier, male, 7)
    InsertDummy,
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let shelter = Shelter::open(&StoreConfig::file(&cli.db))?;

    match cli.command {
        Commands::List(args) => commands::catalog::list(&shelter, args),
        Commands::Show(args) => commands::catalog::show(&shelter, args),
        Commands::Add(args) => commands::editor::add(&shelter, args),
        Commands::Edit(args) => commands::editor::edit(&shelter, args),
        Commands::Delete(args) => commands::editor::delete(&shelter, args),
        Commands::DeleteAll => commands::catalog::delete_all(&shelter),
        Commands::InsertDummy => commands::catalog::insert_dummy(&shelter),
    }
}
