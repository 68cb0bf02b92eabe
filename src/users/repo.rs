use tracing::{error, warn};
use uuid::Uuid;

use crate::auth::password;
use crate::backend::BackendError;
use crate::error::{ApiError, StoreSide};
use crate::state::Backends;
use crate::users::repo_types::User;

pub const USERS_COLLECTION: &str = "users";

impl User {
    /// Hashes the password, creates the account in the credential authority,
    /// then mirrors a document under the same id. If the mirror write fails
    /// the account is rolled back; a failed rollback is reported as a partial
    /// state so the caller can reconcile.
    pub async fn create(backends: &Backends, email: &str, password: &str) -> Result<User, ApiError> {
        let hash = password::hash_password(password)?;
        let record = backends.identity.create_user(email, &hash).await?;
        let user = User::from(record);

        let doc = serde_json::to_value(&user).map_err(anyhow::Error::from)?;
        if let Err(mirror_err) = backends
            .documents
            .set(USERS_COLLECTION, &user.id.to_string(), doc)
            .await
        {
            warn!(user_id = %user.id, error = %mirror_err, "mirror write failed, rolling back account");
            return match backends.identity.delete_user(user.id).await {
                Ok(()) => Err(ApiError::from(mirror_err)),
                Err(rollback_err) => {
                    error!(user_id = %user.id, error = %rollback_err, "rollback failed, account orphaned");
                    Err(ApiError::PartialDeleteFailure {
                        surviving: StoreSide::CredentialAuthority,
                    })
                }
            };
        }

        Ok(user)
    }

    pub async fn find_by_id(backends: &Backends, id: Uuid) -> Result<Option<User>, ApiError> {
        let record = backends.identity.get_user(id).await?;
        Ok(record.map(User::from))
    }

    pub async fn find_by_email(backends: &Backends, email: &str) -> Result<Option<User>, ApiError> {
        let record = backends.identity.get_user_by_email(email).await?;
        Ok(record.map(User::from))
    }

    /// All users in insertion order. The backend exposes no pagination.
    pub async fn find_all(backends: &Backends) -> Result<Vec<User>, ApiError> {
        let records = backends.identity.list_users().await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    /// Verify-before-write: the old password must match the stored hash
    /// before the new one is hashed and persisted.
    pub async fn update_password(
        backends: &Backends,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let user = Self::find_by_email(backends, email)
            .await?
            .ok_or(ApiError::NotFound("user"))?;

        if !password::compare_password(old_password, &user.password_hash)? {
            return Err(ApiError::PasswordMismatch);
        }

        let new_hash = password::hash_password(new_password)?;
        backends
            .identity
            .set_password_hash(user.id, &new_hash)
            .await?;
        Ok(())
    }

    /// Removes the user from BOTH stores. Both deletes are always attempted;
    /// when exactly one side fails the error names the store that still holds
    /// a record, so a reconciliation pass can finish the job.
    pub async fn delete(backends: &Backends, id: Uuid) -> Result<(), ApiError> {
        let identity = backends.identity.delete_user(id).await;
        let documents = backends
            .documents
            .delete(USERS_COLLECTION, &id.to_string())
            .await;

        match (identity, documents) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(BackendError::NotFound), Err(BackendError::NotFound)) => {
                Err(ApiError::NotFound("user"))
            }
            // one store had already lost the record; the other delete cleaned the orphan
            (Ok(()), Err(BackendError::NotFound)) | (Err(BackendError::NotFound), Ok(())) => Ok(()),
            (Ok(()) | Err(BackendError::NotFound), Err(e)) => {
                error!(user_id = %id, error = %e, "document store delete failed");
                Err(ApiError::PartialDeleteFailure {
                    surviving: StoreSide::DocumentStore,
                })
            }
            (Err(e), Ok(()) | Err(BackendError::NotFound)) => {
                error!(user_id = %id, error = %e, "credential authority delete failed");
                Err(ApiError::PartialDeleteFailure {
                    surviving: StoreSide::CredentialAuthority,
                })
            }
            (Err(e), Err(_)) => Err(ApiError::from(e)),
        }
    }

    pub fn compare_password(plain: &str, hash: &str) -> Result<bool, ApiError> {
        password::compare_password(plain, hash)
    }
}
