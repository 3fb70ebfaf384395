//! Client side of the Marzban panel API.
//!
//! - [`SessionProvider`] acquires admin bearer credentials
//!   ([`PasswordSession`], optionally wrapped in [`CachingSession`])
//! - [`PanelApi`] is the user CRUD surface, implemented over HTTP by
//!   [`PanelClient`]
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use marzban_panel::{PanelApi, PanelClient, PasswordSession, SessionProvider, build_http_client};
//!
//! # async fn example() -> Result<(), marzban_panel::PanelError> {
//! let http = build_http_client(false, Duration::from_secs(30))?;
//! let session = PasswordSession::new(http.clone(), "https://panel.example.com:8000", "admin", "secret")?;
//! let panel = PanelClient::new(http, "https://panel.example.com:8000")?;
//!
//! let credential = session.acquire().await?;
//! let user = panel.get_user("alice", &credential).await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod client;
mod error;
mod session;
mod traits;

pub use cache::CachingSession;
pub use client::{PanelClient, build_http_client};
pub use error::PanelError;
pub use session::{Credential, PasswordSession};
pub use traits::{PanelApi, SessionProvider};
