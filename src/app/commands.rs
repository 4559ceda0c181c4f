use crate::config::Command;
use crate::core::manager::AddressHistoryManager;
use crate::core::{AddressLookup, HistoryEntry, KeyValueStore, Result};

pub const NOT_FOUND_MESSAGE: &str = "CEP not found";
pub const EMPTY_HISTORY_MESSAGE: &str = "History is empty";
pub const CLEARED_MESSAGE: &str = "History cleared";

/// Runs one CLI command against the manager and returns the text to print.
pub async fn run<L: AddressLookup, S: KeyValueStore>(
    manager: &AddressHistoryManager<L, S>,
    command: &Command,
) -> Result<String> {
    match command {
        Command::Lookup { cep } => {
            let output = match manager.lookup(cep.as_str()).await? {
                Some(address) => address.to_string(),
                None => NOT_FOUND_MESSAGE.to_string(),
            };
            Ok(output)
        }
        Command::History => Ok(render_history(&manager.history().await)),
        Command::Clear => {
            manager.clear_history().await?;
            Ok(CLEARED_MESSAGE.to_string())
        }
    }
}

/// One block per entry with the raw wire fields, oldest first.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_HISTORY_MESSAGE.to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let fields = [entry.logradouro(), entry.bairro(), entry.localidade(), entry.uf()];
            let mut block = vec![format!("#{}", index + 1)];
            block.extend(fields.into_iter().map(|f| f.unwrap_or("-").to_string()));
            block.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
