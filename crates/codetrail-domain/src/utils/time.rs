//! Timestamp helpers shared across entity constructors and event logging.

/// Current Unix epoch time in whole seconds.
#[must_use]
pub fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
