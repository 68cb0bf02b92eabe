use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod rest;

pub use memory::InMemoryBackend;
pub use rest::RestBackend;

/// Failures reported by the managed backend. Absence of a record is a
/// distinct outcome, not a transport error.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("record not found")]
    NotFound,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("{0}")]
    Unavailable(String),
}

/// Account record as the credential authority stores it. The password hash
/// never leaves this layer in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The managed identity service: the system of record for user accounts.
/// Email uniqueness is enforced here, not locally.
#[async_trait]
pub trait CredentialAuthority: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AccountRecord, BackendError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<AccountRecord>, BackendError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AccountRecord>, BackendError>;

    /// All accounts in insertion order. The service exposes no pagination.
    async fn list_users(&self) -> Result<Vec<AccountRecord>, BackendError>;

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), BackendError>;

    /// `NotFound` when no account exists under this id.
    async fn delete_user(&self, id: Uuid) -> Result<(), BackendError>;
}

/// The managed document store, addressed by collection and document id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, BackendError>;

    /// Upsert. Creating and overwriting are the same operation.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<(), BackendError>;

    /// `NotFound` when no document exists under this id.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError>;

    /// All documents of a collection in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, BackendError>;
}
