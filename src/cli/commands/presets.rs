//! Preset management commands.

use anyhow::{Context, Result};
use trading_config::PresetStore;

use crate::cli::PresetCommand;

pub async fn run(action: PresetCommand, store: &PresetStore) -> Result<()> {
    match action {
        PresetCommand::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No presets in {}", store.dir().display());
            }
            for name in names {
                println!("{}", name);
            }
        }
        PresetCommand::Show { name } => {
            let preset = store
                .load(&name)
                .with_context(|| format!("Failed to load preset '{}'", name))?;
            println!("{}", serde_json::to_string_pretty(&preset)?);
        }
        PresetCommand::Delete { name } => {
            store
                .delete(&name)
                .with_context(|| format!("Failed to delete preset '{}'", name))?;
            println!("Deleted preset '{}'", name);
        }
    }
    Ok(())
}
