//! API credential CLI commands
//!
//! The key is stored in plain text in the data directory and never exported.

use clap::Subcommand;

use crate::error::{TripError, TripResult};
use crate::models::ApiCredential;
use crate::storage::Storage;

/// Credential subcommands
#[derive(Subcommand)]
pub enum CredentialCommands {
    /// Store the itinerary generator API key
    Set {
        #[arg(env = "TRIPLEDGER_API_KEY", hide_env_values = true)]
        key: String,
    },
    /// Remove the stored key
    Clear,
    /// Show the stored key, masked
    Show,
}

/// Handle a credential command
pub fn handle_credential_command(
    storage: &Storage,
    current: &ApiCredential,
    cmd: CredentialCommands,
) -> TripResult<()> {
    match cmd {
        CredentialCommands::Set { key } => {
            let credential = ApiCredential {
                api_key: key.trim().to_string(),
            };
            if !credential.is_set() {
                return Err(TripError::Validation("API key cannot be empty".into()));
            }
            storage.save_credential(&credential)?;
            println!("API key stored: {}", credential.masked());
        }
        CredentialCommands::Clear => {
            storage.clear_credential()?;
            println!("API key removed.");
        }
        CredentialCommands::Show => {
            if current.is_set() {
                println!("API key: {}", current.masked());
            } else {
                println!("No API key stored.");
            }
        }
    }

    Ok(())
}
