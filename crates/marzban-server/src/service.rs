//! Subscription operations composed from a session provider and the panel API.

use marzban_config::ListView;
use marzban_lifecycle::{
    CreateUserRequest, UserNormalizer, UserSummary, compute_renewal, summarize, unix_now,
};
use marzban_panel::{Credential, PanelApi, PanelError, SessionProvider};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Result of a renewal.
#[derive(Debug, Clone, Serialize)]
pub struct ExtendOutcome {
    pub username: String,
    pub days: i64,
    /// `expire` the panel reported before the update, if numeric.
    pub old_expire: Option<i64>,
    pub new_expire: i64,
    /// Panel response to the update.
    pub data: Value,
}

/// Result of a deletion.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveOutcome {
    pub username: String,
    pub data: Value,
}

/// User list in the configured presentation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserListing {
    Raw(Value),
    Summary(Vec<UserSummary>),
}

/// Gateway operations. Each call acquires its own credential and performs
/// its upstream calls sequentially; nothing is retried.
pub struct SubscriptionService {
    session: Box<dyn SessionProvider>,
    panel: Box<dyn PanelApi>,
    normalizer: UserNormalizer,
    list_view: ListView,
    clock: fn() -> i64,
}

impl SubscriptionService {
    pub fn new(
        session: impl SessionProvider + 'static,
        panel: impl PanelApi + 'static,
    ) -> Self {
        Self {
            session: Box::new(session),
            panel: Box::new(panel),
            normalizer: UserNormalizer::default(),
            list_view: ListView::default(),
            clock: unix_now,
        }
    }

    pub fn with_normalizer(mut self, normalizer: UserNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_list_view(mut self, list_view: ListView) -> Self {
        self.list_view = list_view;
        self
    }

    /// Replace the clock used for renewals (Unix seconds).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Extend `username`'s subscription by `days` days.
    pub async fn extend(&self, username: &str, days: i64) -> Result<ExtendOutcome, ApiError> {
        let username = require_username(username)?;
        if days <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "days must be a positive integer, got {days}"
            )));
        }

        let credential = self.acquire("extend").await?;
        let user = self.upstream("get_user", self.panel.get_user(username, &credential).await)?;

        let old_expire = user.get("expire").and_then(Value::as_i64);
        let new_expire = compute_renewal(old_expire, (self.clock)(), days);
        let partial = json!({ "expire": new_expire });

        let data = self.upstream(
            "update_user",
            self.panel.update_user(username, &partial, &credential).await,
        )?;

        info!(username, days, ?old_expire, new_expire, "subscription extended");
        Ok(ExtendOutcome {
            username: username.to_string(),
            days,
            old_expire,
            new_expire,
            data,
        })
    }

    /// Create a user from a loosely specified request.
    ///
    /// Returns the panel's created record verbatim.
    pub async fn create(&self, request: CreateUserRequest) -> Result<Value, ApiError> {
        let credential = self.acquire("create").await?;
        let record = self.normalizer.normalize(request)?;
        debug!(?record, "normalized user record");

        let created = self.upstream("create_user", self.panel.create_user(&record, &credential).await)?;
        info!(username = %record.username, "user created");
        Ok(created)
    }

    /// Delete `username`.
    pub async fn remove(&self, username: &str) -> Result<RemoveOutcome, ApiError> {
        let username = require_username(username)?;
        let credential = self.acquire("remove").await?;
        let data = self.upstream("delete_user", self.panel.delete_user(username, &credential).await)?;

        info!(username, "user deleted");
        Ok(RemoveOutcome {
            username: username.to_string(),
            data,
        })
    }

    /// List users in the configured presentation.
    pub async fn list(&self) -> Result<UserListing, ApiError> {
        let credential = self.acquire("list").await?;
        let body = self.upstream("list_users", self.panel.list_users(&credential).await)?;

        Ok(match self.list_view {
            ListView::Raw => UserListing::Raw(body),
            ListView::Summary => UserListing::Summary(summarize(&body)),
        })
    }

    async fn acquire(&self, operation: &'static str) -> Result<Credential, ApiError> {
        let result = self.session.acquire().await;
        self.upstream(operation, result)
    }

    fn upstream<T>(&self, operation: &'static str, result: Result<T, PanelError>) -> Result<T, ApiError> {
        result.map_err(|err| {
            warn!(
                operation,
                kind = err.kind(),
                status = ?err.status(),
                body = %err.body(),
                "panel call failed"
            );
            if err.is_unauthorized() {
                self.session.invalidate();
            }
            ApiError::Upstream(err)
        })
    }
}

/// Reject blank usernames; anything else is forwarded unchanged.
fn require_username(username: &str) -> Result<&str, ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::InvalidInput("username is required".into()));
    }
    Ok(username)
}
