pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{LocalStorage, MemoryStore, ViaCepClient};
pub use config::TomlConfig;
pub use crate::core::manager::{AddressHistoryManager, HISTORY_KEY};
pub use domain::model::{Address, HistoryEntry, PostalCode};
pub use utils::error::{CepError, LookupError, PersistenceError, Result};
