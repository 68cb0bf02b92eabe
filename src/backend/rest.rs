use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use super::{AccountRecord, BackendError, CredentialAuthority, DocumentStore};

/// HTTP client for the managed identity/document service. All durable state
/// lives on the other side of this client; nothing is retried locally.
#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    email: &'a str,
    password_hash: &'a str,
}

#[derive(Serialize)]
struct SetPasswordBody<'a> {
    password_hash: &'a str,
}

impl RestBackend {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("x-api-key", &self.api_key)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(BackendError::NotFound),
            StatusCode::CONFLICT => Err(BackendError::DuplicateEmail),
            s if s.is_success() => Ok(resp),
            s => Err(BackendError::Unavailable(format!("backend returned {s}"))),
        }
    }

    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        self.send(req)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl CredentialAuthority for RestBackend {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AccountRecord, BackendError> {
        let req = self
            .request(reqwest::Method::POST, "/v1/users")
            .json(&CreateUserBody {
                email,
                password_hash,
            });
        self.json(req).await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<AccountRecord>, BackendError> {
        let req = self.request(reqwest::Method::GET, &format!("/v1/users/{id}"));
        match self.json(req).await {
            Ok(record) => Ok(Some(record)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<AccountRecord>, BackendError> {
        let req = self
            .request(reqwest::Method::GET, "/v1/users")
            .query(&[("email", email)]);
        match self.json(req).await {
            Ok(record) => Ok(Some(record)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_users(&self) -> Result<Vec<AccountRecord>, BackendError> {
        let req = self.request(reqwest::Method::GET, "/v1/users");
        self.json(req).await
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), BackendError> {
        let req = self
            .request(reqwest::Method::PATCH, &format!("/v1/users/{id}/password"))
            .json(&SetPasswordBody { password_hash });
        self.send(req).await.map(|_| ())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), BackendError> {
        let req = self.request(reqwest::Method::DELETE, &format!("/v1/users/{id}"));
        self.send(req).await.map(|_| ())
    }
}

#[async_trait]
impl DocumentStore for RestBackend {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, BackendError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/v1/collections/{collection}/docs/{id}"),
        );
        match self.json(req).await {
            Ok(doc) => Ok(Some(doc)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<(), BackendError> {
        let req = self
            .request(
                reqwest::Method::PUT,
                &format!("/v1/collections/{collection}/docs/{id}"),
            )
            .json(&body);
        self.send(req).await.map(|_| ())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let req = self.request(
            reqwest::Method::DELETE,
            &format!("/v1/collections/{collection}/docs/{id}"),
        );
        self.send(req).await.map(|_| ())
    }

    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, BackendError> {
        let req = self.request(
            reqwest::Method::GET,
            &format!("/v1/collections/{collection}/docs"),
        );
        self.json(req).await
    }
}
