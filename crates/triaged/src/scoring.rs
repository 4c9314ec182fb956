//! Priority scoring for the specialization queues.
//!
//! A fixed linear formula, not a pluggable cost model. Scores are never
//! persisted: the ranking is time-dependent and gets recomputed from stored
//! severity plus elapsed wait on every read.

/// Weight on severity in the priority formula.
pub const SEVERITY_WEIGHT: f64 = 10.0;

/// Weight on hours waited in the priority formula.
pub const WAIT_WEIGHT: f64 = 2.0;

/// Fixed slot duration used for wait estimates, in minutes.
pub const SLOT_DURATION_MINS: i64 = 15;

/// Priority score. Strictly increasing in both inputs, so it is a total
/// ordering key for the queue at any instant.
pub fn priority_score(severity: u8, hours_waiting: f64) -> f64 {
    f64::from(severity) * SEVERITY_WEIGHT + hours_waiting * WAIT_WEIGHT
}

/// Estimated wait for a given 1-based queue position.
pub fn estimated_wait_mins(position: usize) -> i64 {
    position as i64 * SLOT_DURATION_MINS
}
