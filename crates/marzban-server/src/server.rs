//! Service wiring and the HTTP server loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use marzban_config::{Config, ConfigError};
use marzban_core::DEFAULT_PROXY_PROTOCOL;
use marzban_lifecycle::{UserDefaults, UserNormalizer};
use marzban_panel::{CachingSession, PanelClient, PasswordSession, build_http_client};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::routes;
use crate::error::ServerError;
use crate::service::SubscriptionService;

/// Build the subscription service described by `config`.
pub fn build_service(config: &Config) -> Result<SubscriptionService, ServerError> {
    let panel_cfg = &config.panel;
    if panel_cfg.tls.trust_all() {
        warn!(panel = %panel_cfg.url, "panel certificate verification disabled");
    }

    let http = build_http_client(
        panel_cfg.tls.trust_all(),
        Duration::from_secs(panel_cfg.timeout_secs),
    )?;
    let session = PasswordSession::new(
        http.clone(),
        &panel_cfg.url,
        panel_cfg.username.as_str(),
        panel_cfg.password.as_str(),
    )?;
    let panel = PanelClient::new(http, panel_cfg.url.as_str())?;

    let service = match panel_cfg.token_cache_secs {
        Some(ttl) => {
            info!(ttl_secs = ttl, "admin token cache enabled");
            SubscriptionService::new(CachingSession::new(session, Duration::from_secs(ttl)), panel)
        }
        None => SubscriptionService::new(session, panel),
    };

    let normalizer = UserNormalizer::new(UserDefaults {
        proxy_protocol: DEFAULT_PROXY_PROTOCOL.to_string(),
        inbound_tag: panel_cfg.default_inbound.clone(),
    });
    Ok(service
        .with_normalizer(normalizer)
        .with_list_view(config.api.list_view))
}

/// Bind the configured address and serve until `shutdown` is cancelled.
pub async fn run_with_shutdown(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listen: SocketAddr = config
        .server
        .listen
        .parse()
        .map_err(|e| ConfigError::Validation(format!("invalid listen address: {e}")))?;
    let service = Arc::new(build_service(&config)?);

    let listener = TcpListener::bind(listen).await?;
    info!(
        listen = %listener.local_addr()?,
        panel = %config.panel.url,
        list_view = ?config.api.list_view,
        "gateway listening"
    );

    serve(listener, routes(service, config.api.default_days), shutdown).await
}

/// Serve `router` on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!("gateway stopped");
    Ok(())
}
