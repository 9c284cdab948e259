//! Per-tick dispatch reports.

use bridge_component::{GuestError, GuestId};

/// How one system invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The system returned normally.
    Completed,
    /// The system returned an error; the rest of the tick still ran.
    Failed {
        /// Rendered error message.
        message: String,
        /// `true` when the guest failed to decode a received value.
        decode_error: bool,
    },
}

impl InvocationOutcome {
    /// Record a guest error.
    #[must_use]
    pub fn failed(err: &GuestError) -> Self {
        Self::Failed {
            message: err.to_string(),
            decode_error: err.is_decode(),
        }
    }

    /// Returns `true` if the system completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// One system invocation within a tick.
#[derive(Debug, Clone)]
pub struct SystemInvocation {
    /// The guest instance that owns the system.
    pub guest: GuestId,
    /// Human-readable guest name.
    pub guest_name: String,
    /// The invoked system.
    pub system: String,
    /// Rows delivered per query, in declaration order.
    pub rows: Vec<usize>,
    /// Entities the system spawned.
    pub spawned: usize,
    /// How the invocation ended.
    pub outcome: InvocationOutcome,
}

/// Everything dispatched during one tick, in invocation order.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// The tick this report belongs to.
    pub tick_id: u64,
    /// Invocations in the order they happened.
    pub invocations: Vec<SystemInvocation>,
}

impl TickReport {
    /// Create an empty report.
    #[must_use]
    pub fn new(tick_id: u64) -> Self {
        Self {
            tick_id,
            invocations: Vec::new(),
        }
    }

    /// Names of the invoked systems, in order.
    #[must_use]
    pub fn invoked_systems(&self) -> Vec<&str> {
        self.invocations.iter().map(|i| i.system.as_str()).collect()
    }

    /// Returns the number of failed invocations.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.invocations
            .iter()
            .filter(|i| !i.outcome.is_completed())
            .count()
    }

    /// Returns the invocation of `system`, if it ran this tick.
    #[must_use]
    pub fn invocation(&self, system: &str) -> Option<&SystemInvocation> {
        self.invocations.iter().find(|i| i.system == system)
    }
}
