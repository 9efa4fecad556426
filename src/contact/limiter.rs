//! Per-client sliding-window limiter for contact submissions.
//!
//! The ledger maps a client identifier to the timestamps of its accepted
//! submissions. Entries are pruned lazily on every `admit` and in bulk by a
//! sweep, either rolled per call or run by a background task depending on
//! [`SweepPolicy`]. Everything lives in memory; a restart resets all counters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

/// Time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// How stale ledger entries of one-off clients get reclaimed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepPolicy {
    /// Each `admit` sweeps the whole ledger with this probability.
    /// No upper bound on ledger size between sweeps.
    Probabilistic { probability: f64 },
    /// A background task sweeps on a fixed interval; `admit` never sweeps.
    Periodic { interval: Duration },
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self::Probabilistic { probability: 0.01 }
    }
}

/// Limiter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Accepted submissions allowed per client inside one window.
    pub max_submissions: usize,
    /// Trailing window length.
    pub window: TimeDelta,
    pub sweep: SweepPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: 3,
            window: TimeDelta::hours(1),
            sweep: SweepPolicy::default(),
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        self == Self::Admitted
    }
}

type Ledger = HashMap<String, Vec<DateTime<Utc>>>;

/// Process-wide submission limiter. Create once at startup and share.
pub struct RateLimiter {
    config: RateLimitConfig,
    ledger: Mutex<Ledger>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            ledger: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Limiter on the wall clock.
    pub fn with_system_clock(config: RateLimitConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// `admit` at the injected clock's current time.
    pub fn check(&self, client: &str) -> Admission {
        self.admit(client, self.clock.now())
    }

    /// Decide whether `client` may submit at `now`, recording the attempt if so.
    ///
    /// The fetch/prune/compare/append sequence holds the ledger lock
    /// throughout, so concurrent callers never push a client past the cap.
    /// A rejection leaves the client's entry untouched.
    pub fn admit(&self, client: &str, now: DateTime<Utc>) -> Admission {
        let outcome = {
            let mut ledger = self.lock();
            let recent: Vec<DateTime<Utc>> = ledger
                .get(client)
                .map(|times| self.recent(times, now))
                .unwrap_or_default();

            if recent.len() >= self.config.max_submissions {
                Admission::Rejected
            } else {
                let mut recent = recent;
                recent.push(now);
                ledger.insert(client.to_string(), recent);
                Admission::Admitted
            }
        };

        debug!(client = %client, outcome = ?outcome, "Submission admission decided");

        if let SweepPolicy::Probabilistic { probability } = self.config.sweep
            && rand::random::<f64>() < probability
        {
            self.sweep(now);
        }

        outcome
    }

    /// Prune every entry to its in-window timestamps, dropping empty entries.
    /// Returns how many clients were removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut ledger = self.lock();
        let before = ledger.len();
        ledger.retain(|_, times| {
            times.retain(|t| self.in_window(*t, now));
            !times.is_empty()
        });
        let removed = before - ledger.len();
        if removed > 0 {
            info!(removed, remaining = ledger.len(), "Rate-limit ledger swept");
        }
        removed
    }

    /// Accepted submissions of `client` still inside the window at `now`.
    pub fn recent_count(&self, client: &str, now: DateTime<Utc>) -> usize {
        self.lock()
            .get(client)
            .map(|times| times.iter().filter(|t| self.in_window(**t, now)).count())
            .unwrap_or(0)
    }

    /// Raw stored timestamps for `client`, as of the last access.
    pub fn timestamps(&self, client: &str) -> Vec<DateTime<Utc>> {
        self.lock().get(client).cloned().unwrap_or_default()
    }

    /// Number of clients currently held in the ledger.
    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    fn recent(&self, times: &[DateTime<Utc>], now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        times
            .iter()
            .copied()
            .filter(|t| self.in_window(*t, now))
            .collect()
    }

    fn in_window(&self, t: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(t) < self.config.window
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spawn the background sweep for [`SweepPolicy::Periodic`].
pub fn spawn_sweep_task(
    limiter: Arc<RateLimiter>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            limiter.sweep(limiter.clock.now());
        }
    })
}
