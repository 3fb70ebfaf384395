//! Subscription lifecycle computations for the marzban gateway.
//!
//! Everything in this crate is free of I/O:
//!
//! - [`compute_renewal`] - new expiry for a renewed subscription
//! - [`UserNormalizer`] - canonical user-creation payload from a loose request
//! - [`summarize`] - compact projection of the panel's user list
//!
//! # Example
//!
//! ```
//! use marzban_lifecycle::compute_renewal;
//!
//! // An unlimited (0) subscription restarts its countdown from now.
//! assert_eq!(compute_renewal(Some(0), 1_700_000_000, 30), 1_702_592_000);
//! ```

mod calendar;
mod error;
mod expiry;
mod normalize;
mod record;
mod request;
mod summary;

pub use calendar::add_months;
pub use error::NormalizeError;
pub use expiry::{compute_renewal, parse_days, unix_now};
pub use normalize::{UserDefaults, UserNormalizer};
pub use record::SubscriberRecord;
pub use request::CreateUserRequest;
pub use summary::{UserSummary, format_expire, summarize};
