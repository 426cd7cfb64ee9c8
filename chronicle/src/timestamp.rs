use std::{
    fmt,
    ops::{Add, Deref, Sub},
};

use chrono::{DateTime, Local, TimeZone};
use localtime::LocalTime;

/// Milliseconds since epoch.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Add<u64> for Timestamp {
    type Output = Timestamp;

    fn add(self, millis: u64) -> Self::Output {
        Self(self.0 + millis)
    }
}

impl Sub<u64> for Timestamp {
    type Output = Timestamp;

    fn sub(self, millis: u64) -> Self::Output {
        Self(self.0 - millis)
    }
}

impl Timestamp {
    /// UNIX epoch.
    pub const EPOCH: Self = Self(0);
    /// Minimum value.
    pub const MIN: Self = Self(0);
    /// Maximum value.
    // Nb. This is the maximum value that can fit in a signed 64-bit integer (`i64`),
    // which is what calendar conversions take.
    pub const MAX: Self = Self(9223372036854775807);

    /// Capture the current wall-clock time.
    pub fn now() -> Self {
        LocalTime::now().into()
    }

    /// Convert to local time.
    pub fn to_local_time(&self) -> LocalTime {
        (*self).into()
    }

    /// Convert to a local calendar date-time, for display.
    pub fn to_local_datetime(&self) -> DateTime<Local> {
        Local
            .timestamp_millis_opt(self.0 as i64)
            .single()
            .unwrap_or_default()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for Timestamp {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<LocalTime> for Timestamp {
    fn from(t: LocalTime) -> Self {
        Self(t.as_millis())
    }
}

impl From<Timestamp> for LocalTime {
    fn from(t: Timestamp) -> Self {
        LocalTime::from_millis(t.0 as u128)
    }
}

impl From<u64> for Timestamp {
    fn from(u: u64) -> Self {
        Self(u)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Timestamp::from(2) > Timestamp::from(1));
        assert!(Timestamp::EPOCH < Timestamp::MAX);
        assert_eq!(Timestamp::from(7), Timestamp::from(7));
    }

    #[test]
    fn test_arithmetic() {
        let t = Timestamp::from(1000);
        assert_eq!(t + 500, Timestamp::from(1500));
        assert_eq!(t - 500, Timestamp::from(500));
    }

    #[test]
    fn test_local_time_roundtrip() {
        let t = Timestamp::from(86_400_000);
        assert_eq!(Timestamp::from(t.to_local_time()), t);
    }

    #[test]
    fn test_now_is_past_epoch() {
        assert!(Timestamp::now() > Timestamp::EPOCH);
    }
}
