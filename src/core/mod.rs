pub mod manager;

pub use crate::domain::model::{Address, HistoryEntry, PostalCode};
pub use crate::domain::ports::{AddressLookup, ConfigProvider, KeyValueStore};
pub use crate::utils::error::Result;
