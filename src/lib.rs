//! # marzban-gateway
//!
//! An HTTP gateway in front of the Marzban VPN panel API.
//!
//! ## Crates
//!
//! - [`marzban_core`] - Project metadata and default constants
//! - [`marzban_config`] - Configuration loading and validation
//! - [`marzban_lifecycle`] - Expiry arithmetic and user payload normalization
//! - [`marzban_panel`] - Panel sessions and HTTP client
//! - [`marzban_server`] - Subscription service, HTTP API and CLIs

pub use marzban_config as config;
pub use marzban_core as core;
pub use marzban_lifecycle as lifecycle;
pub use marzban_panel as panel;
pub use marzban_server as server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use marzban_config::{Config, load_config, validate_config};
    pub use marzban_lifecycle::{CreateUserRequest, UserNormalizer, compute_renewal};
    pub use marzban_panel::{PanelApi, PanelClient, PasswordSession, SessionProvider};
    pub use marzban_server::{
        ApiError, CancellationToken, ServerError, SubscriptionService, build_service,
        run_with_shutdown,
    };
}
