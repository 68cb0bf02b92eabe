use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{AccountRecord, BackendError, CredentialAuthority, DocumentStore};

/// In-process stand-in for the managed backend: same contracts, including
/// email uniqueness and insertion-ordered listings. Backs `AppState::fake()`
/// and the test suite.
#[derive(Default)]
pub struct InMemoryBackend {
    accounts: Mutex<Vec<AccountRecord>>,
    collections: Mutex<HashMap<String, Vec<(String, serde_json::Value)>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialAuthority for InMemoryBackend {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AccountRecord, BackendError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == email) {
            return Err(BackendError::DuplicateEmail);
        }
        let record = AccountRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        accounts.push(record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<AccountRecord>, BackendError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AccountRecord>, BackendError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<AccountRecord>, BackendError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), BackendError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BackendError::NotFound)?;
        account.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), BackendError> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.id != id);
        if accounts.len() == before {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryBackend {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, BackendError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(_, body)| body.clone()))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<(), BackendError> {
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = body,
            None => docs.push((id.to_string(), body)),
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.get_mut(collection).ok_or(BackendError::NotFound)?;
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        if docs.len() == before {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, BackendError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(_, body)| body.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_enforces_email_uniqueness() {
        let backend = InMemoryBackend::new();
        backend.create_user("a@example.com", "hash").await.unwrap();
        let err = backend.create_user("a@example.com", "hash2").await.unwrap_err();
        assert!(matches!(err, BackendError::DuplicateEmail));
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let backend = InMemoryBackend::new();
        backend.create_user("first@example.com", "h").await.unwrap();
        backend.create_user("second@example.com", "h").await.unwrap();
        let users = backend.list_users().await.unwrap();
        assert_eq!(users[0].email, "first@example.com");
        assert_eq!(users[1].email, "second@example.com");
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend.delete_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound));
    }

    #[tokio::test]
    async fn documents_roundtrip_and_delete() {
        let backend = InMemoryBackend::new();
        backend
            .set("projects", "p1", json!({"name": "alpha"}))
            .await
            .unwrap();
        let doc = backend.get("projects", "p1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "alpha");

        backend.delete("projects", "p1").await.unwrap();
        assert!(backend.get("projects", "p1").await.unwrap().is_none());
        let err = backend.delete("projects", "p1").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound));
    }
}
