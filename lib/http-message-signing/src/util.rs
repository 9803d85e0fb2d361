use std::time::{Duration, SystemTime, SystemTimeError};

pub trait UnixTimestampExt: Sized {
    type Error;

    fn from_unix_timestamp(timestamp: u64) -> Self;

    /// `None` if the timestamp can't be represented on this platform
    fn checked_from_unix_timestamp(timestamp: u64) -> Option<Self>;
    fn to_unix_timestamp(&self) -> Result<u64, Self::Error>;

    /// Drop everything below whole seconds
    fn truncate_to_secs(&self) -> Result<Self, Self::Error> {
        self.to_unix_timestamp().map(Self::from_unix_timestamp)
    }
}

impl UnixTimestampExt for SystemTime {
    type Error = SystemTimeError;

    fn from_unix_timestamp(timestamp: u64) -> Self {
        let duration = Duration::from_secs(timestamp);
        SystemTime::UNIX_EPOCH + duration
    }

    fn checked_from_unix_timestamp(timestamp: u64) -> Option<Self> {
        SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(timestamp))
    }

    fn to_unix_timestamp(&self) -> Result<u64, Self::Error> {
        self.duration_since(SystemTime::UNIX_EPOCH)
            .map(|duration| duration.as_secs())
    }
}

/// Whole seconds since the Unix epoch, as used by `(created)` and `(expires)`
///
/// Times before the epoch can't be represented in the protocol and collapse to zero
pub fn unix_seconds(time: SystemTime) -> u64 {
    time.to_unix_timestamp().unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::{unix_seconds, UnixTimestampExt};
    use std::time::{Duration, SystemTime};

    #[test]
    fn truncates_subsecond_precision() {
        let time = SystemTime::from_unix_timestamp(1_582_543_214) + Duration::from_millis(999);
        assert_eq!(
            time.truncate_to_secs().unwrap(),
            SystemTime::from_unix_timestamp(1_582_543_214)
        );
    }

    #[test]
    fn unrepresentable_timestamp() {
        assert_eq!(SystemTime::checked_from_unix_timestamp(u64::MAX), None);
        assert_eq!(
            SystemTime::checked_from_unix_timestamp(1_582_543_214),
            Some(SystemTime::from_unix_timestamp(1_582_543_214))
        );
    }

    #[test]
    fn pre_epoch_collapses_to_zero() {
        let time = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(unix_seconds(time), 0);
    }
}
