//! Config document CLI commands

use clap::Subcommand;

use crate::error::{VaultError, VaultResult};
use crate::storage::file_io::to_pretty_json;
use crate::storage::ConfigStore;

/// Document subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the document, or one section of it
    Show {
        /// Top-level section to print
        section: Option<String>,
    },

    /// List top-level section names
    Sections,
}

/// Handle a config command
pub fn handle_config_command(store: &ConfigStore, cmd: ConfigCommands) -> VaultResult<()> {
    match cmd {
        ConfigCommands::Show { section } => {
            let bytes = match section {
                Some(name) => to_pretty_json(&store.read_section(&name)?),
                None => to_pretty_json(&store.read()?),
            }
            .map_err(VaultError::from)?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }

        ConfigCommands::Sections => {
            let doc = store.read()?;
            if doc.is_empty() {
                println!("Document is empty.");
            }
            for name in doc.keys() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
