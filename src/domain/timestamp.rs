//! Conversion from Apple's Core Data epoch.
//!
//! Message stores on iOS count seconds from 2001-01-01T00:00:00 UTC rather
//! than from the Unix epoch.

use chrono::{DateTime, NaiveDateTime};

/// Seconds between 1970-01-01T00:00:00 and 2001-01-01T00:00:00.
pub const APPLE_EPOCH_OFFSET_SECS: i64 = 978_307_200;

/// Returns 2001-01-01T00:00:00.
#[must_use]
pub fn apple_epoch() -> NaiveDateTime {
    DateTime::from_timestamp(APPLE_EPOCH_OFFSET_SECS, 0)
        .unwrap_or_default()
        .naive_utc()
}

/// Converts raw Apple-epoch seconds into a naive UTC date-time.
///
/// Returns `None` for non-finite or out-of-range values.
#[must_use]
pub fn from_apple_timestamp(raw: f64) -> Option<NaiveDateTime> {
    if !raw.is_finite() {
        return None;
    }

    let whole = raw.floor();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = (((raw - whole) * 1e9).round() as u32).min(999_999_999);
    #[allow(clippy::cast_possible_truncation)]
    let secs = (whole as i64).checked_add(APPLE_EPOCH_OFFSET_SECS)?;

    DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}
