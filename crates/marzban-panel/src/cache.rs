//! Credential reuse with a bounded lifetime.
//!
//! The panel does not report token lifetimes to the gateway, so the cache
//! keeps a credential for a configured TTL and drops it early when the
//! service reports a 401 through [`SessionProvider::invalidate`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::PanelError;
use crate::session::Credential;
use crate::traits::SessionProvider;

/// Cached credential with its expiry; `None` never expires.
#[derive(Debug)]
struct CacheEntry {
    credential: Credential,
    expires_at: Option<Instant>,
}

/// Wraps a [`SessionProvider`] and reuses its credentials for `ttl`.
///
/// Concurrent misses may each acquire a token; the last one wins. The lock
/// is never held across an await.
#[derive(Debug)]
pub struct CachingSession<S> {
    inner: S,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl<S: SessionProvider> CachingSession<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slot: Mutex::new(None),
        }
    }

    fn cached(&self) -> Option<Credential> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|entry| entry.expires_at.is_none_or(|at| at > Instant::now()))
            .map(|entry| entry.credential.clone())
    }
}

#[async_trait]
impl<S: SessionProvider> SessionProvider for CachingSession<S> {
    async fn acquire(&self) -> Result<Credential, PanelError> {
        if let Some(credential) = self.cached() {
            debug!("reusing cached admin token");
            return Ok(credential);
        }

        let credential = self.inner.acquire().await?;
        *self.slot.lock() = Some(CacheEntry {
            credential: credential.clone(),
            expires_at: Instant::now().checked_add(self.ttl),
        });
        Ok(credential)
    }

    fn invalidate(&self) {
        if self.slot.lock().take().is_some() {
            debug!("dropped cached admin token");
        }
        self.inner.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    /// Hands out `tok-1`, `tok-2`, ... and counts calls.
    #[derive(Debug, Default)]
    struct CountingSession {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionProvider for CountingSession {
        async fn acquire(&self) -> Result<Credential, PanelError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Credential::new(format!("tok-{n}")))
        }
    }

    struct FailingSession;

    #[async_trait]
    impl SessionProvider for FailingSession {
        async fn acquire(&self) -> Result<Credential, PanelError> {
            Err(PanelError::Auth {
                status: Some(401),
                body: json!({"detail": "Incorrect username or password"}),
            })
        }
    }

    #[tokio::test]
    async fn reuses_within_ttl() {
        let session = CachingSession::new(CountingSession::default(), Duration::from_secs(60));
        assert_eq!(session.acquire().await.unwrap().token(), "tok-1");
        assert_eq!(session.acquire().await.unwrap().token(), "tok-1");
        assert_eq!(session.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reacquires_after_expiry() {
        let session = CachingSession::new(CountingSession::default(), Duration::ZERO);
        assert_eq!(session.acquire().await.unwrap().token(), "tok-1");
        assert_eq!(session.acquire().await.unwrap().token(), "tok-2");
    }

    #[tokio::test]
    async fn invalidate_forces_reacquire() {
        let session = CachingSession::new(CountingSession::default(), Duration::from_secs(60));
        session.acquire().await.unwrap();
        session.invalidate();
        assert_eq!(session.acquire().await.unwrap().token(), "tok-2");
    }

    #[tokio::test]
    async fn unrepresentable_ttl_never_expires() {
        let session = CachingSession::new(CountingSession::default(), Duration::from_secs(u64::MAX));
        assert_eq!(session.acquire().await.unwrap().token(), "tok-1");
        assert!(session.slot.lock().as_ref().is_some_and(|e| e.expires_at.is_none()));
        assert_eq!(session.acquire().await.unwrap().token(), "tok-1");
        assert_eq!(session.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let session = CachingSession::new(FailingSession, Duration::from_secs(60));
        assert!(session.acquire().await.is_err());
        assert!(session.slot.lock().is_none());
    }
}
