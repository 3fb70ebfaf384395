//! HTTP implementation of [`PanelApi`].

use std::time::Duration;

use async_trait::async_trait;
use marzban_lifecycle::SubscriberRecord;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::{PanelError, decode_body};
use crate::session::Credential;
use crate::traits::PanelApi;

/// Build the shared reqwest client used for all panel calls.
///
/// `trust_all` disables certificate verification for panels served with
/// self-signed certificates. `timeout` bounds every single request.
pub fn build_http_client(trust_all: bool, timeout: Duration) -> Result<Client, PanelError> {
    Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(trust_all)
        .build()
        .map_err(|e| PanelError::Client(format!("failed to build HTTP client: {e}")))
}

/// Join path segments onto the panel base URL, percent-encoding each one.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, PanelError> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| PanelError::Client(format!("invalid panel url {base_url:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| PanelError::Client(format!("panel url {base_url:?} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Panel user API over HTTP.
#[derive(Debug, Clone)]
pub struct PanelClient {
    client: Client,
    base_url: String,
}

impl PanelClient {
    /// Create a client for the panel at `base_url`
    /// (e.g. `https://panel.example.com:8000`).
    pub fn new(client: Client, base_url: impl Into<String>) -> Result<Self, PanelError> {
        let base_url = base_url.into();
        // Fail early on a malformed URL rather than on the first request.
        endpoint(&base_url, &[])?;
        Ok(Self { client, base_url })
    }

    fn user_url(&self, username: &str) -> Result<Url, PanelError> {
        endpoint(&self.base_url, &["api", "user", username])
    }

    /// Send an authenticated request and decode the response body.
    async fn send(&self, req: RequestBuilder, credential: &Credential) -> Result<Value, PanelError> {
        let resp = req
            .bearer_auth(credential.token())
            .send()
            .await
            .map_err(PanelError::request_transport)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(PanelError::request_transport)?;
        let body = decode_body(&bytes);

        if !status.is_success() {
            return Err(PanelError::Request {
                status: Some(status.as_u16()),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl PanelApi for PanelClient {
    async fn get_user(&self, username: &str, credential: &Credential) -> Result<Value, PanelError> {
        let url = self.user_url(username)?;
        debug!(%url, "fetching user");
        self.send(self.client.get(url), credential).await
    }

    async fn create_user(
        &self,
        record: &SubscriberRecord,
        credential: &Credential,
    ) -> Result<Value, PanelError> {
        let url = endpoint(&self.base_url, &["api", "user"])?;
        debug!(%url, username = %record.username, "creating user");
        self.send(self.client.post(url).json(record), credential).await
    }

    async fn update_user(
        &self,
        username: &str,
        partial: &Value,
        credential: &Credential,
    ) -> Result<Value, PanelError> {
        let url = self.user_url(username)?;
        debug!(%url, "updating user");
        self.send(self.client.put(url).json(partial), credential).await
    }

    async fn delete_user(
        &self,
        username: &str,
        credential: &Credential,
    ) -> Result<Value, PanelError> {
        let url = self.user_url(username)?;
        debug!(%url, "deleting user");
        self.send(self.client.delete(url), credential).await
    }

    async fn list_users(&self, credential: &Credential) -> Result<Value, PanelError> {
        let url = endpoint(&self.base_url, &["api", "users"])?;
        debug!(%url, "listing users");
        self.send(self.client.get(url), credential).await
    }
}
