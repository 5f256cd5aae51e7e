//! Timestamp freshness policy and clock abstraction.
//!
//! To bound the replay window, a signed request's timestamp may be at most
//! [`TIMESTAMP_MAX_SECONDS`] old. Clocks drift, so the same amount of skew is
//! tolerated in the other direction.

use std::fmt::Debug;

use chrono::Utc;

use crate::error::AuthError;

/// Maximum accepted distance, in seconds, between a request timestamp and now.
pub const TIMESTAMP_MAX_SECONDS: i64 = 30;

/// Source of the current Unix time.
pub trait Clock: Debug + Send + Sync {
    /// Current Unix time in whole seconds.
    fn now_unix(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Outcome of an accepted timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampCheck {
    /// The timestamp is now or in the past, `age` seconds ago.
    Fresh {
        /// Seconds elapsed since the timestamp.
        age: i64,
    },
    /// The timestamp is `ahead` seconds in the future, within the tolerated skew.
    Future {
        /// Seconds the timestamp lies ahead of now.
        ahead: i64,
    },
}

/// Why a timestamp was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampRejection {
    /// Not a base-10 integer.
    Malformed(String),
    /// Older than the allowed window, by `age` seconds.
    TooOld {
        /// Seconds elapsed since the timestamp.
        age: i64,
    },
    /// Further in the future than the allowed skew.
    TooFarAhead {
        /// Seconds the timestamp lies ahead of now.
        ahead: i64,
    },
}

impl From<TimestampRejection> for AuthError {
    fn from(_: TimestampRejection) -> Self {
        Self::InvalidTimeStamp
    }
}

/// Check `ts` against `now` with the given skew bound.
///
/// On success returns the parsed timestamp together with how it relates to `now`.
///
/// # Errors
///
/// Returns a [`TimestampRejection`] when `ts` is malformed or further than
/// `max_skew` seconds from `now` in either direction.
///
/// # Examples
///
/// ```
/// use lcp_auth::timestamp::{TimestampCheck, verify_timestamp};
///
/// assert_eq!(verify_timestamp("100", 130, 30), Ok((100, TimestampCheck::Fresh { age: 30 })));
/// assert_eq!(verify_timestamp("130", 100, 30), Ok((130, TimestampCheck::Future { ahead: 30 })));
/// assert!(verify_timestamp("99", 130, 30).is_err());
/// ```
pub fn verify_timestamp(
    ts: &str,
    now: i64,
    max_skew: i64,
) -> Result<(i64, TimestampCheck), TimestampRejection> {
    let claimed: i64 = ts
        .parse()
        .map_err(|_| TimestampRejection::Malformed(ts.to_owned()))?;
    let age = now.saturating_sub(claimed);

    if age > max_skew {
        return Err(TimestampRejection::TooOld { age });
    }
    if age.saturating_neg() > max_skew {
        return Err(TimestampRejection::TooFarAhead {
            ahead: age.saturating_neg(),
        });
    }
    let check = if age < 0 {
        TimestampCheck::Future { ahead: -age }
    } else {
        TimestampCheck::Fresh { age }
    };
    Ok((claimed, check))
}
