use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tripledger::cli::{
    handle_credential_command, handle_currency_command, handle_expense_command, handle_export,
    handle_import, handle_itinerary_command, handle_ledger_command, handle_traveler_command,
    handle_trip_command, ExportFormat,
};
use tripledger::config::{paths::TripPaths, settings::Settings};
use tripledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tripledger",
    author = "Kaylee Beyene",
    version,
    about = "Trip planning state and shared expense ledger",
    long_about = "tripledger keeps a trip's basics, travelers and generated itinerary \
                  on disk and tracks shared expenses: who paid, who shares, and what \
                  everyone owes at the end."
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Trip basics
    #[command(subcommand)]
    Trip(tripledger::cli::TripCommands),

    /// Traveler roster
    #[command(subcommand)]
    Traveler(tripledger::cli::TravelerCommands),

    /// Home-currency conversion
    #[command(subcommand)]
    Currency(tripledger::cli::CurrencyCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(tripledger::cli::ExpenseCommands),

    /// Spending breakdown by category and traveler
    Ledger {
        /// Only one trip day (1-based)
        #[arg(short, long)]
        day: Option<u32>,
        /// Write the breakdown to a CSV file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generated itinerary
    #[command(subcommand)]
    Itinerary(tripledger::cli::ItineraryCommands),

    /// Export the trip to a file
    Export {
        /// Output file path
        output: PathBuf,
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Replace the stored trip with a JSON or YAML export
    Import {
        /// Export file path
        input: PathBuf,
    },

    /// Itinerary generator API key
    #[command(subcommand)]
    Credential(tripledger::cli::CredentialCommands),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = TripPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    let loaded = storage.load_state()?;
    let state = loaded.state;
    let symbol = settings.local_currency_symbol.as_str();

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing tripledger at: {}", paths.base_dir().display());
            let written = storage.write_missing_defaults()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if !written.is_empty() {
                println!();
                println!("Created default entries:");
                for key in written {
                    println!("  - {}", key);
                }
            }
            println!();
            println!("Run 'tripledger trip set --destination <PLACE>' to get started.");
        }
        Some(Commands::Config) => {
            println!("tripledger Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Local currency symbol: {:?}", settings.local_currency_symbol);
            println!("  Hide zero travelers:   {}", settings.hide_zero_travelers);
            println!("  Pretty JSON export:    {}", settings.pretty_export);

            if !loaded.warnings.is_empty() {
                println!();
                println!("Repaired on load:");
                for warning in &loaded.warnings {
                    println!("  - {}", warning);
                }
            }

            let stale = storage.stale_keys()?;
            if !stale.is_empty() {
                println!();
                println!("Stored keys no longer used (kept as is):");
                for (key, keys) in stale {
                    println!("  {}: {}", key, keys.join(", "));
                }
            }
        }
        Some(Commands::Trip(cmd)) => handle_trip_command(&storage, symbol, cmd)?,
        Some(Commands::Traveler(cmd)) => handle_traveler_command(&storage, cmd)?,
        Some(Commands::Currency(cmd)) => handle_currency_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, cmd)?,
        Some(Commands::Ledger { day, output }) => {
            handle_ledger_command(&state, &settings, day, output)?
        }
        Some(Commands::Itinerary(cmd)) => handle_itinerary_command(&storage, &state, symbol, cmd)?,
        Some(Commands::Export {
            output,
            format,
            pretty,
        }) => handle_export(&storage, output, format, pretty || settings.pretty_export)?,
        Some(Commands::Import { input }) => handle_import(&storage, input)?,
        Some(Commands::Credential(cmd)) => {
            handle_credential_command(&storage, &state.credential, cmd)?
        }
        None => {
            println!("tripledger - trip planning and shared expenses");
            println!();
            println!("Run 'tripledger --help' for usage information.");
        }
    }

    Ok(())
}
