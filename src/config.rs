//! # Global submitter configuration.
//!
//! [`Config`] defines the submitter's behavior: how long a network-failed task
//! waits for a death notification, when excessive per-actor queueing is
//! reported, event bus capacity, and the cadence of the timeout sweeper.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use actorq::Config;
//!
//! let mut cfg = Config::default();
//! cfg.wait_for_death_info_timeout = Duration::from_secs(5);
//! cfg.sweep_interval = Duration::from_millis(500);
//!
//! assert_eq!(cfg.excess_queueing_warn_threshold, 5_000);
//! ```

use std::time::Duration;

/// Configuration for the actor task submitter.
///
/// Controls the death-info grace period, queueing warnings, event bus
/// capacity, and sweep cadence.
#[derive(Clone, Debug)]
pub struct Config {
    /// How long a task whose push failed with a network error is held waiting
    /// for a definitive death notification before it is failed anyway.
    pub wait_for_death_info_timeout: Duration,
    /// Warn when the number of not-yet-processed sequence numbers for one
    /// actor reaches this value. Doubles after each warning to avoid spam.
    pub excess_queueing_warn_threshold: i64,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Interval between timeout sweeps when driven by the built-in sweeper.
    pub sweep_interval: Duration,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `wait_for_death_info_timeout = 1s`
    /// - `excess_queueing_warn_threshold = 5000`
    /// - `bus_capacity = 1024`
    /// - `sweep_interval = 1s`
    fn default() -> Self {
        Self {
            wait_for_death_info_timeout: Duration::from_secs(1),
            excess_queueing_warn_threshold: 5_000,
            bus_capacity: 1024,
            sweep_interval: Duration::from_secs(1),
        }
    }
}
