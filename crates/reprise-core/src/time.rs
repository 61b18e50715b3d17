use std::cell::Cell;

use web_time::{Duration, Instant, SystemTime};

/// A wall-clock reading, as displayed by clock widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub SystemTime);

impl Timestamp {
    /// Hours/minutes/seconds of the UTC day this timestamp falls in.
    pub fn hms(&self) -> (u64, u64, u64) {
        let secs = self
            .0
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let day = secs % 86_400;
        (day / 3600, (day % 3600) / 60, day % 60)
    }

    /// `HH:MM:SS`, zero-padded.
    pub fn format_hms(&self) -> String {
        let (h, m, s) = self.hms();
        format!("{h:02}:{m:02}:{s:02}")
    }
}

/// Time source for composition and timers. Hosts install one as a
/// composition local; anything that needs time at event-dispatch time
/// captures the handle during composition.
///
/// `now` is monotonic and drives timer deadlines; `wall_now` is what clock
/// widgets display.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
    fn wall_now(&self) -> SystemTime;
}

/// The real clocks.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when stepped. Monotonic and wall time advance in
/// lockstep; wall time starts at the UNIX epoch so formatted output is
/// deterministic.
pub struct ManualClock {
    origin: Instant,
    wall_origin: SystemTime,
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            wall_origin: SystemTime::UNIX_EPOCH,
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.elapsed.set(self.elapsed.get() + d);
    }

    /// Steps forward to `t`. A target in the past is ignored; this clock
    /// never runs backwards.
    pub fn advance_to(&self, t: Instant) {
        if let Some(d) = t.checked_duration_since(self.origin)
            && d > self.elapsed.get()
        {
            self.elapsed.set(d);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn wall_now(&self) -> SystemTime {
        self.wall_origin + self.elapsed.get()
    }
}
