use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::backend::DocumentStore;
use crate::error::ApiError;

pub const PROJECTS_COLLECTION: &str = "projects";

/// Project document, owned by a user, stored only in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Project {
    pub async fn create(
        documents: &dyn DocumentStore,
        owner_id: Uuid,
        name: &str,
        description: Option<String>,
    ) -> Result<Project, ApiError> {
        let project = Project {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            description,
            created_at: OffsetDateTime::now_utc(),
        };
        let doc = serde_json::to_value(&project).map_err(anyhow::Error::from)?;
        documents
            .set(PROJECTS_COLLECTION, &project.id.to_string(), doc)
            .await?;
        Ok(project)
    }

    pub async fn find_by_id(
        documents: &dyn DocumentStore,
        id: Uuid,
    ) -> Result<Option<Project>, ApiError> {
        let doc = documents.get(PROJECTS_COLLECTION, &id.to_string()).await?;
        match doc {
            Some(body) => {
                let project = serde_json::from_value(body).map_err(anyhow::Error::from)?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    pub async fn find_all(documents: &dyn DocumentStore) -> Result<Vec<Project>, ApiError> {
        let docs = documents.list(PROJECTS_COLLECTION).await?;
        let projects = docs
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Project>, _>>()
            .map_err(anyhow::Error::from)?;
        Ok(projects)
    }

    pub async fn delete(documents: &dyn DocumentStore, id: Uuid) -> Result<(), ApiError> {
        documents
            .delete(PROJECTS_COLLECTION, &id.to_string())
            .await
            .map_err(|e| match e {
                crate::backend::BackendError::NotFound => ApiError::NotFound("project"),
                other => ApiError::from(other),
            })
    }
}
