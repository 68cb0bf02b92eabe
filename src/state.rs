use std::sync::Arc;

use crate::backend::{CredentialAuthority, DocumentStore, InMemoryBackend, RestBackend};
use crate::config::AppConfig;

/// Handles to the two halves of the managed backend. Both point at the same
/// service in production; tests may swap either side independently.
#[derive(Clone)]
pub struct Backends {
    pub identity: Arc<dyn CredentialAuthority>,
    pub documents: Arc<dyn DocumentStore>,
}

#[derive(Clone)]
pub struct AppState {
    pub backends: Backends,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let rest = Arc::new(RestBackend::new(
            &config.backend.base_url,
            &config.backend.api_key,
        )?);
        Ok(Self {
            backends: Backends {
                identity: rest.clone(),
                documents: rest,
            },
            config,
        })
    }

    pub fn from_parts(backends: Backends, config: Arc<AppConfig>) -> Self {
        Self { backends, config }
    }

    /// State over the in-memory backend, for tests.
    pub fn fake() -> Self {
        let memory = Arc::new(InMemoryBackend::new());
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            backend: crate::config::BackendConfig {
                base_url: "http://fake.local".into(),
                api_key: "fake".into(),
            },
        });
        Self {
            backends: Backends {
                identity: memory.clone(),
                documents: memory,
            },
            config,
        }
    }
}
