//! Time management utilities
//!
//! The scene graph never reads a global clock. The frame driver samples a
//! [`Clock`] once per frame and passes the resulting [`ClockReading`] down
//! to every update behavior, so tests can feed synthetic timestamps.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Opaque monotonic timestamp
///
/// Only meaningful relative to another reading from the same clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockReading(Duration);

impl ClockReading {
    /// The clock's own epoch
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Build a reading at `seconds` past the epoch
    ///
    /// Negative or non-finite values collapse onto the epoch.
    pub fn from_secs_f64(seconds: f64) -> Self {
        Duration::try_from_secs_f64(seconds).map_or(Self::ZERO, Self)
    }

    /// Seconds past the epoch
    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Seconds elapsed from `earlier` to `self`, clamped at zero
    pub fn seconds_since(self, earlier: Self) -> f32 {
        elapsed_seconds(earlier, self)
    }
}

/// Seconds elapsed between two readings
///
/// Returns `0.0` when `t1` precedes `t0`; a backwards step never produces a
/// negative duration.
pub fn elapsed_seconds(t0: ClockReading, t1: ClockReading) -> f32 {
    match t1.0.checked_sub(t0.0) {
        Some(delta) => delta.as_secs_f32(),
        None => {
            log::debug!(
                "Clock went backwards ({:.6}s -> {:.6}s), clamping elapsed time to zero",
                t0.as_secs_f64(),
                t1.as_secs_f64()
            );
            0.0
        }
    }
}

/// Source of clock readings
pub trait Clock {
    /// Current reading
    fn now(&self) -> ClockReading;
}

/// Wall clock backed by [`Instant`], immune to system clock adjustments
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Create a clock whose epoch is the moment of construction
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> ClockReading {
        ClockReading(self.epoch.elapsed())
    }
}

/// Synthetic clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    current: Cell<ClockReading>,
}

impl ManualClock {
    /// Create a manual clock at the epoch
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute reading (may go backwards)
    pub fn set(&self, reading: ClockReading) {
        self.current.set(reading);
    }

    /// Jump to `seconds` past the epoch
    pub fn set_secs(&self, seconds: f64) {
        self.set(ClockReading::from_secs_f64(seconds));
    }

    /// Move forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        let next = self.current.get().as_secs_f64() + seconds;
        self.set_secs(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> ClockReading {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> ClockReading {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> ClockReading {
        (**self).now()
    }
}

/// Frame timing statistics kept by the frame driver
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    first_frame: Option<ClockReading>,
    last_frame: Option<ClockReading>,
    delta_time: f32,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now` (should be called once per frame)
    pub fn tick(&mut self, now: ClockReading) {
        self.delta_time = self.last_frame.map_or(0.0, |last| elapsed_seconds(last, now));
        self.first_frame.get_or_insert(now);
        self.last_frame = Some(now);
        self.frame_count += 1;
    }

    /// Time between the last two frames in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds between the first and the latest frame
    pub fn total_time(&self) -> f32 {
        match (self.first_frame, self.last_frame) {
            (Some(first), Some(last)) => elapsed_seconds(first, last),
            _ => 0.0,
        }
    }

    /// Number of frames recorded
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reading of the latest frame, if any
    pub fn last_frame(&self) -> Option<ClockReading> {
        self.last_frame
    }

    /// Average FPS over the recorded frames
    pub fn average_fps(&self) -> f32 {
        let total = self.total_time();
        if total > 0.0 && self.frame_count > 1 {
            (self.frame_count - 1) as f32 / total
        } else {
            0.0
        }
    }
}
