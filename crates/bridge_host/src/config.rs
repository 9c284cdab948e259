//! Host configuration.

use std::time::Duration;

/// Configuration for the host tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

impl TickConfig {
    /// Wall-clock budget of one tick.
    ///
    /// Rates that are not finite and positive, or whose period does not fit a
    /// [`Duration`], fall back to the default 60 Hz. The result is never
    /// shorter than one nanosecond.
    #[must_use]
    pub fn period(&self) -> Duration {
        let fallback = || Duration::from_secs_f64(1.0 / Self::default().tick_rate);
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return fallback();
        }
        match Duration::try_from_secs_f64(1.0 / self.tick_rate) {
            Ok(period) => period.max(Duration::from_nanos(1)),
            Err(_) => fallback(),
        }
    }
}

/// Configuration for a [`Host`](crate::Host).
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Tick loop settings.
    pub tick: TickConfig,
    /// Accept `register_component` / `register_system` after a guest's
    /// `setup` has returned. Off by default.
    pub allow_late_registration: bool,
}

impl HostConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target tick rate.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick.tick_rate = tick_rate;
        self
    }

    /// Stop after `max_ticks` ticks (0 = unlimited).
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.tick.max_ticks = max_ticks;
        self
    }

    /// Allow or reject registration outside `setup`.
    #[must_use]
    pub fn with_late_registration(mut self, allow: bool) -> Self {
        self.allow_late_registration = allow;
        self
    }
}
