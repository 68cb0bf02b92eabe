use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::backend::AccountRecord;

/// User as the application sees it. The same id addresses both the
/// credential-authority record and the mirrored document.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,    // unique user ID, assigned by the credential authority
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<AccountRecord> for User {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            password_hash: record.password_hash,
            created_at: record.created_at,
        }
    }
}
