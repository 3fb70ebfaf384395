//! Marzban gateway server library.
//!
//! This module exposes the subscription service, HTTP routes and server loop
//! for use by the CLIs, integration tests and embedding scenarios.

mod api;
mod error;
mod server;
mod service;

pub mod cli;
pub mod users;

pub use api::routes;
pub use cli::ServeArgs;
pub use error::{ApiError, ServerError};
pub use server::{build_service, run_with_shutdown, serve};
pub use service::{ExtendOutcome, RemoveOutcome, SubscriptionService, UserListing};
pub use tokio_util::sync::CancellationToken;
pub use users::UsersArgs;
