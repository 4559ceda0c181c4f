// Adapters layer: concrete implementations of the domain ports (http lookup, storage).

pub mod http;
pub mod storage;

pub use http::{ViaCepClient, DEFAULT_ENDPOINT};
pub use storage::{LocalStorage, MemoryStore};
