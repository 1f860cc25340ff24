//! Traveler CLI commands

use clap::Subcommand;

use crate::error::TripResult;
use crate::services::TripService;
use crate::storage::Storage;

/// Traveler subcommands
#[derive(Subcommand)]
pub enum TravelerCommands {
    /// List travelers
    List,
    /// Replace traveler names (the count follows)
    Names {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Change the number of travelers, keeping existing names
    Count { count: u32 },
}

/// Handle a traveler command
pub fn handle_traveler_command(storage: &Storage, cmd: TravelerCommands) -> TripResult<()> {
    let service = TripService::new(storage);

    let roster = match cmd {
        TravelerCommands::List => service.travelers()?,
        TravelerCommands::Names { names } => service.set_traveler_names(names)?,
        TravelerCommands::Count { count } => service.set_traveler_count(count)?,
    };

    for (i, name) in roster.names().iter().enumerate() {
        println!("{:>2}. {}", i + 1, name);
    }
    println!("\nTotal: {} travelers", roster.len());

    Ok(())
}
