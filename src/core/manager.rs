use crate::core::{AddressLookup, KeyValueStore, Result};
use crate::domain::model::{classify_response, Address, HistoryEntry, LookupOutcome, PostalCode};
use crate::utils::error::{CepError, PersistenceError};
use tokio::sync::Mutex;

/// Storage key holding the serialized history.
pub const HISTORY_KEY: &str = "@historicoCEP";

/// Mediates CEP lookups and mirrors the resulting history to a key-value store.
///
/// The whole history is re-serialized on every append, so each successful
/// lookup costs O(N) in the history length. Mutations are serialized through
/// one lock that is held across the store write; the remote call runs outside
/// it, so entries land in lookup completion order.
pub struct AddressHistoryManager<L: AddressLookup, S: KeyValueStore> {
    lookup: L,
    storage: S,
    history: Mutex<Vec<HistoryEntry>>,
}

impl<L: AddressLookup, S: KeyValueStore> AddressHistoryManager<L, S> {
    /// Loads the persisted history and returns a ready manager.
    ///
    /// A missing or unparsable blob yields an empty history. A failing store
    /// read is returned as [`CepError::Persistence`].
    pub async fn initialize(lookup: L, storage: S) -> Result<Self> {
        let history = load_history(&storage).await?;
        tracing::info!("📚 Loaded {} history entries", history.len());

        Ok(Self {
            lookup,
            storage,
            history: Mutex::new(history),
        })
    }

    /// Resolves `code`, records the raw payload and returns the mapped address.
    ///
    /// `Ok(None)` means the service does not know the code; nothing is recorded.
    /// When the address resolves but the history write fails, the error is
    /// [`CepError::NotSaved`] and carries the resolved address.
    pub async fn lookup(&self, code: impl Into<PostalCode>) -> Result<Option<Address>> {
        let code = code.into();
        tracing::info!("🔍 Looking up CEP {}", code);

        let payload = self.lookup.fetch(&code).await?;
        let entry = match classify_response(payload)? {
            LookupOutcome::Found(entry) => entry,
            LookupOutcome::NotFound => {
                tracing::info!("CEP {} not found", code);
                return Ok(None);
            }
        };
        let address = entry.to_address();

        let mut history = self.history.lock().await;
        // Memory is only replaced after the write lands.
        let mut updated = history.clone();
        updated.push(entry);

        if let Err(source) = self.persist(&updated).await {
            tracing::warn!("⚠️ CEP {} resolved but history not saved: {}", code, source);
            return Err(CepError::NotSaved { address, source });
        }

        *history = updated;
        tracing::debug!("History now holds {} entries", history.len());
        Ok(Some(address))
    }

    /// Snapshot of the history, oldest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.clone()
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    /// Removes the persisted history, then empties memory.
    /// On a failing removal memory is left as it was.
    pub async fn clear_history(&self) -> Result<()> {
        let mut history = self.history.lock().await;

        self.storage.remove(HISTORY_KEY).await.map_err(|e| {
            tracing::warn!("⚠️ Failed to clear history: {}", e);
            CepError::Persistence(e)
        })?;

        let dropped = history.len();
        history.clear();
        tracing::info!("🧹 Cleared {} history entries", dropped);
        Ok(())
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> std::result::Result<(), PersistenceError> {
        let blob = serde_json::to_string(entries)?;
        tracing::debug!("Writing history blob ({} bytes)", blob.len());
        self.storage.set(HISTORY_KEY, &blob).await
    }
}

async fn load_history<S: KeyValueStore>(storage: &S) -> Result<Vec<HistoryEntry>> {
    let Some(blob) = storage.get(HISTORY_KEY).await? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(&blob) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            tracing::warn!("⚠️ Stored history is unreadable, starting empty: {}", e);
            Ok(Vec::new())
        }
    }
}
