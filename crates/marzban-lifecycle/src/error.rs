//! Normalization error types.

/// Error produced while building a user-creation payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// `months` was zero or negative.
    #[error("months must be a positive integer, got {0}")]
    NonPositiveMonths(i64),

    /// The derived expiry does not fit the calendar.
    #[error("months offset {0} is out of range")]
    MonthsOutOfRange(i64),
}
