use serde::Deserialize;
use uuid::Uuid;

/// Request body for creating a project. The owner comes from the body, not
/// from auth: this prefix is wired without the token middleware.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}
