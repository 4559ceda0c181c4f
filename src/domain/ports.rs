use crate::domain::model::PostalCode;
use crate::utils::error::{LookupError, PersistenceError};
use async_trait::async_trait;

/// Durable string store keyed by string.
pub trait KeyValueStore: Send + Sync {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, PersistenceError>> + Send;

    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Removing a key that is not present succeeds.
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}

/// Remote lookup service. Returns the decoded JSON payload as-is.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn fetch(&self, code: &PostalCode) -> Result<serde_json::Value, LookupError>;
}
