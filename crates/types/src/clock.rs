//! Wall-clock access for deadline and expiry checks.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Current wall-clock time as whole Unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
