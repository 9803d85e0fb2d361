use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

/// Direction the delta should be adjusted in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaDirection {
    /// Add to the delta
    Add,

    /// Subtract from the delta
    Sub,
}

/// Handle to adjust the delta of a mocked clock
#[derive(Clone, Debug)]
pub struct MockHandle {
    delta: Arc<AtomicI64>,
}

impl MockHandle {
    /// Adjust the delta by the duration in the direction specified
    pub fn adjust(&self, direction: DeltaDirection, delta: Duration) {
        let mut delta = i64::try_from(delta.as_nanos()).unwrap_or(i64::MAX);
        if direction == DeltaDirection::Sub {
            delta = -delta;
        }

        self.delta.fetch_add(delta, Ordering::AcqRel);
    }

    /// Move the clock forward
    pub fn advance(&self, delta: Duration) {
        self.adjust(DeltaDirection::Add, delta);
    }

    /// Set the delta to the absolute value (in nanoseconds)
    pub fn set_delta(&self, delta: i64) {
        self.delta.store(delta, Ordering::Release);
    }
}

#[derive(Clone, Debug, Default)]
enum Source {
    #[default]
    System,
    Fixed(SystemTime),
}

/// Source of the current UTC time
///
/// A single clock is shared by everything that needs "now" during signing and
/// verification, so tests can control time through a [`MockHandle`].
#[derive(Clone, Debug, Default)]
pub struct Clock {
    source: Source,
    delta: Option<Arc<AtomicI64>>,
}

impl Clock {
    /// Construct a new clock reading the system time
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a mockable clock
    ///
    /// This clock follows the system time and returns a handle which you can use to adjust the delta
    #[must_use]
    pub fn mockable() -> (Self, MockHandle) {
        Self::with_delta(Source::System)
    }

    /// Construct a clock pinned to the specified point in time
    ///
    /// The clock only moves when adjusted through the returned handle
    #[must_use]
    pub fn frozen(at: SystemTime) -> (Self, MockHandle) {
        Self::with_delta(Source::Fixed(at))
    }

    fn with_delta(source: Source) -> (Self, MockHandle) {
        let delta = Arc::new(AtomicI64::default());

        let mock_handle = MockHandle {
            delta: Arc::clone(&delta),
        };
        let clock = Self {
            source,
            delta: Some(delta),
        };

        (clock, mock_handle)
    }

    /// Read the current time and apply the delta
    #[must_use]
    pub fn now(&self) -> SystemTime {
        let mut now = match self.source {
            Source::System => SystemTime::now(),
            Source::Fixed(at) => at,
        };

        if let Some(ref delta) = self.delta {
            let ns_delta = delta.load(Ordering::Acquire);
            if ns_delta.is_positive() {
                now += Duration::from_nanos(ns_delta.unsigned_abs());
            } else {
                now -= Duration::from_nanos(ns_delta.unsigned_abs());
            }
        }

        now
    }
}
