//! Error kind labels for logging.
//!
//! These constants provide consistent error classification across all crates.

/// Admin token acquisition failed.
pub const ERROR_UPSTREAM_AUTH: &str = "upstream_auth";
/// A panel user operation failed.
pub const ERROR_UPSTREAM_REQUEST: &str = "upstream_request";
/// The HTTP client could not be built or a URL could not be formed.
pub const ERROR_CLIENT: &str = "client";
/// Caller supplied malformed input.
pub const ERROR_INVALID_INPUT: &str = "invalid_input";
/// Configuration error.
pub const ERROR_CONFIG: &str = "config";
/// Socket or file I/O error.
pub const ERROR_IO: &str = "io";
