use chrono::{DateTime, Utc};

/// An absolute point in time, millisecond precision, UTC.
///
/// Sub-millisecond fractional seconds are truncated on the way in; the
/// wire representation is the signed milliseconds-since-epoch integer
/// carried by the `TIME` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a [`Timestamp`] from milliseconds since the Unix epoch.
    pub fn from_millis(milliseconds: i64) -> Self {
        Self(milliseconds)
    }

    /// Milliseconds since the Unix epoch.
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// The decoder's default `ts_hook`-absent representation:
    /// a UTC instant at `ms / 1000` seconds.
    pub fn to_utc(self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0).unwrap_or_else(|| {
            // chrono's range is wider than practical epoch math needs but
            // narrower than i64::MIN/MAX; clamp rather than panic.
            if self.0 < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            }
        })
    }
}

impl From<i64> for Timestamp {
    fn from(val: i64) -> Self {
        Self(val)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(val: DateTime<Utc>) -> Self {
        Self(val.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_millis() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(ts.as_millis(), 1_700_000_000_123);
    }

    #[test]
    fn to_utc_truncates_to_millisecond_precision() {
        let ts = Timestamp::from_millis(1_700_000_000_500);
        let utc = ts.to_utc();
        assert_eq!(Timestamp::from(utc).as_millis(), 1_700_000_000_500);
    }
}
