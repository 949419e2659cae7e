use axum::async_trait;
use serde::Deserialize;
use tracing::warn;

/// Session data returned by the external identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalSession {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub session_token: String,
}

/// External identity-provider collaborator, used by `POST /auth/session` to
/// exchange a provider session id for local session data.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// `Ok(None)` means the provider rejected the session id; `Err` means the
    /// provider itself could not be reached.
    async fn fetch_session(&self, session_id: &str) -> anyhow::Result<Option<ExternalSession>>;
}

pub struct HttpIdentityClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpIdentityClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn fetch_session(&self, session_id: &str) -> anyhow::Result<Option<ExternalSession>> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header("X-Session-ID", session_id)
            .send()
            .await?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "identity provider rejected session id");
            return Ok(None);
        }

        Ok(Some(resp.json::<ExternalSession>().await?))
    }
}
