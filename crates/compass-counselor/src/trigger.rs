//! Summarization cadence trigger.
//!
//! Summarization is due whenever the post-turn message total is an exact
//! multiple of the configured interval. The total is the conversation's
//! monotonic append counter, evaluated after both turn messages are
//! persisted — cadence is therefore predictable and independent of the
//! success/failure mix of earlier turns, and out-of-band deletions never
//! shift the schedule.

use serde::{Deserialize, Serialize};

/// Default cadence: summarize every 10 messages.
pub const DEFAULT_SUMMARY_INTERVAL: u64 = 10;

/// Fixed-interval summarization trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTrigger {
    /// Cadence in total messages.
    interval: u64,
}

impl Default for SummaryTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_INTERVAL)
    }
}

impl SummaryTrigger {
    /// Create a trigger with the given interval.
    ///
    /// An interval of zero is nonsensical and clamped to 1 (settings
    /// validation rejects it before it ever gets here).
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Configured interval.
    #[must_use]
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Whether summarization is due at the given post-turn total.
    #[must_use]
    pub fn is_due(&self, total_messages: u64) -> bool {
        total_messages > 0 && total_messages % self.interval == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_exactly_at_multiples() {
        let trigger = SummaryTrigger::new(10);
        assert!(!trigger.is_due(9));
        assert!(trigger.is_due(10));
        assert!(!trigger.is_due(11));
        assert!(trigger.is_due(20));
    }

    #[test]
    fn never_due_at_zero() {
        let trigger = SummaryTrigger::new(10);
        assert!(!trigger.is_due(0));
    }

    #[test]
    fn two_messages_per_turn_fires_every_five_turns() {
        let trigger = SummaryTrigger::new(10);
        // Post-turn totals for successful turns: 2, 4, 6, ...
        let due: Vec<u64> = (1..=10u64)
            .map(|turn| turn * 2)
            .filter(|total| trigger.is_due(*total))
            .collect();
        assert_eq!(due, vec![10, 20]);
    }

    #[test]
    fn failed_turns_shift_cadence_predictably() {
        let trigger = SummaryTrigger::new(10);
        // A failed turn appends only the user message; the counter still
        // advances and the next multiple of 10 fires as usual.
        assert!(!trigger.is_due(9));
        assert!(trigger.is_due(10));
    }

    #[test]
    fn interval_one_fires_every_message() {
        let trigger = SummaryTrigger::new(1);
        assert!(trigger.is_due(1));
        assert!(trigger.is_due(2));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let trigger = SummaryTrigger::new(0);
        assert_eq!(trigger.interval(), 1);
        assert!(trigger.is_due(1));
    }

    #[test]
    fn default_interval_is_ten() {
        assert_eq!(SummaryTrigger::default().interval(), 10);
    }
}
