use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// Time source for cooldown expiry, log timestamps and the inter-shot wait.
pub trait Clock {
    fn monotonic(&self) -> Instant;
    fn now_utc(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time with a blocking sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated time: `sleep` advances the clock instantly and is recorded.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    origin_utc: DateTime<Utc>,
    elapsed: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(origin_utc: DateTime<Utc>) -> Self {
        Self {
            origin: Instant::now(),
            origin_utc,
            elapsed: Cell::new(Duration::ZERO),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.elapsed.get())
            .ok()
            .and_then(|elapsed| self.origin_utc.checked_add_signed(elapsed))
            .unwrap_or(self.origin_utc)
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.advance(duration);
    }
}
