//! Minutes left before a quoted price lapses.

use crate::model::Offer;
use chrono::{DateTime, Utc};

const MS_PER_MINUTE: u64 = 60_000;

/// Whole minutes from `now_ms` until `expire_at_ms`, rounded up, 0 once past.
#[must_use]
pub fn minutes_until(expire_at_ms: i64, now_ms: i64) -> u64 {
    let remaining = expire_at_ms.saturating_sub(now_ms);
    u64::try_from(remaining).map_or(0, |ms| ms.div_ceil(MS_PER_MINUTE))
}

/// Minutes of validity `offer` has left at `now`.
///
/// `None` when the offer carries no expiry (including out-of-stock offers).
/// Always recomputed from `now`; nothing is cached.
#[must_use]
pub fn minutes_remaining(offer: &Offer, now: DateTime<Utc>) -> Option<u64> {
    offer
        .expire_at_ms()
        .map(|expire_at| minutes_until(expire_at, now.timestamp_millis()))
}
