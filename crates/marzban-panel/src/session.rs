//! Admin credential acquisition.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::client::endpoint;
use crate::error::{PanelError, decode_body};
use crate::traits::SessionProvider;

/// Opaque admin bearer token.
///
/// The token's expiry is unknown to the gateway. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Acquires a fresh token on every call by posting the admin username and
/// password to `/api/admin/token`.
pub struct PasswordSession {
    client: Client,
    token_url: Url,
    username: String,
    password: String,
}

impl PasswordSession {
    /// Create a session provider for the panel at `base_url`.
    pub fn new(
        client: Client,
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, PanelError> {
        Ok(Self {
            client,
            token_url: endpoint(base_url, &["api", "admin", "token"])?,
            username: username.into(),
            password: password.into(),
        })
    }
}

impl fmt::Debug for PasswordSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordSession")
            .field("token_url", &self.token_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionProvider for PasswordSession {
    async fn acquire(&self) -> Result<Credential, PanelError> {
        debug!(url = %self.token_url, username = %self.username, "requesting admin token");

        let resp = self
            .client
            .post(self.token_url.clone())
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(PanelError::auth_transport)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(PanelError::auth_transport)?;
        let body = decode_body(&bytes);

        if !status.is_success() {
            return Err(PanelError::Auth {
                status: Some(status.as_u16()),
                body,
            });
        }

        match body.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => Ok(Credential::new(token)),
            _ => Err(PanelError::Auth {
                status: Some(status.as_u16()),
                body,
            }),
        }
    }
}
