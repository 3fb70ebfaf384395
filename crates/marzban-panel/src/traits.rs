//! Session and panel API traits.

use std::sync::Arc;

use async_trait::async_trait;
use marzban_lifecycle::SubscriberRecord;
use serde_json::Value;

use crate::error::PanelError;
use crate::session::Credential;

/// Source of admin bearer credentials.
///
/// Implementations must be thread-safe (`Send + Sync`) as they may be
/// called concurrently from multiple requests.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a credential for one operation.
    ///
    /// Fails with [`PanelError::Auth`] when the panel rejects the admin
    /// account or cannot be reached.
    async fn acquire(&self) -> Result<Credential, PanelError>;

    /// Drop any credential kept for reuse, e.g. after the panel answered 401.
    ///
    /// Default implementation does nothing.
    #[inline]
    fn invalidate(&self) {}
}

/// User operations on the panel.
///
/// Every call is a single authenticated request; implementations never
/// retry. Successful calls return the decoded upstream body.
#[async_trait]
pub trait PanelApi: Send + Sync {
    /// `GET /api/user/{username}`
    async fn get_user(&self, username: &str, credential: &Credential) -> Result<Value, PanelError>;

    /// `POST /api/user`
    async fn create_user(
        &self,
        record: &SubscriberRecord,
        credential: &Credential,
    ) -> Result<Value, PanelError>;

    /// `PUT /api/user/{username}` with a partial record.
    async fn update_user(
        &self,
        username: &str,
        partial: &Value,
        credential: &Credential,
    ) -> Result<Value, PanelError>;

    /// `DELETE /api/user/{username}`
    async fn delete_user(&self, username: &str, credential: &Credential)
    -> Result<Value, PanelError>;

    /// `GET /api/users`
    async fn list_users(&self, credential: &Credential) -> Result<Value, PanelError>;
}

/// Blanket implementation for `Arc<S>` where `S: SessionProvider`.
#[async_trait]
impl<S: SessionProvider + ?Sized> SessionProvider for Arc<S> {
    #[inline]
    async fn acquire(&self) -> Result<Credential, PanelError> {
        (**self).acquire().await
    }

    #[inline]
    fn invalidate(&self) {
        (**self).invalidate()
    }
}

/// Blanket implementation for `Arc<P>` where `P: PanelApi`.
#[async_trait]
impl<P: PanelApi + ?Sized> PanelApi for Arc<P> {
    #[inline]
    async fn get_user(&self, username: &str, credential: &Credential) -> Result<Value, PanelError> {
        (**self).get_user(username, credential).await
    }

    #[inline]
    async fn create_user(
        &self,
        record: &SubscriberRecord,
        credential: &Credential,
    ) -> Result<Value, PanelError> {
        (**self).create_user(record, credential).await
    }

    #[inline]
    async fn update_user(
        &self,
        username: &str,
        partial: &Value,
        credential: &Credential,
    ) -> Result<Value, PanelError> {
        (**self).update_user(username, partial, credential).await
    }

    #[inline]
    async fn delete_user(
        &self,
        username: &str,
        credential: &Credential,
    ) -> Result<Value, PanelError> {
        (**self).delete_user(username, credential).await
    }

    #[inline]
    async fn list_users(&self, credential: &Credential) -> Result<Value, PanelError> {
        (**self).list_users(credential).await
    }
}
