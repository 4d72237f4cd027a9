use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC time in seconds.
///
/// Returns 0 if the system clock is set before the unix epoch.
pub fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|time| time.as_secs())
        .unwrap_or_default()
}
