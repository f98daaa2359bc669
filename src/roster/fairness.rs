use std::collections::HashMap;

/// Per-member workload counters used to rank shuffle candidates.
///
/// Rebuilt from the ledger at the start of every run — the tracker owns no
/// state across runs, so pre-existing load (pins included) always counts.
#[derive(Debug, Clone, Default)]
pub struct FairnessTracker {
    assignment_count: HashMap<String, u32>,
    last_assigned_index: HashMap<String, i64>,
}

impl FairnessTracker {
    pub fn new() -> Self {
        FairnessTracker::default()
    }

    /// Records one assignment at the given chronological event index.
    pub fn record(&mut self, member_id: &str, event_index: i64) {
        *self
            .assignment_count
            .entry(member_id.to_string())
            .or_insert(0) += 1;
        let last = self
            .last_assigned_index
            .entry(member_id.to_string())
            .or_insert(-1);
        *last = (*last).max(event_index);
    }

    pub fn count(&self, member_id: &str) -> u32 {
        self.assignment_count.get(member_id).copied().unwrap_or(0)
    }

    /// Chronological index of the member's latest assignment, -1 if never
    /// assigned.
    pub fn last_index(&self, member_id: &str) -> i64 {
        self.last_assigned_index
            .get(member_id)
            .copied()
            .unwrap_or(-1)
    }

    /// Sort key for candidate ranking: fewest assignments first, then
    /// assigned longest ago, then member id so ties resolve the same way on
    /// every run.
    pub fn rank_key<'a>(&self, member_id: &'a str) -> (u32, i64, &'a str) {
        (self.count(member_id), self.last_index(member_id), member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_member_defaults() {
        let tracker = FairnessTracker::new();
        assert_eq!(tracker.count("alice"), 0);
        assert_eq!(tracker.last_index("alice"), -1);
    }

    #[test]
    fn record_increments_and_keeps_max_index() {
        let mut tracker = FairnessTracker::new();
        tracker.record("alice", 3);
        tracker.record("alice", 1); // out-of-order record must not move the index back
        assert_eq!(tracker.count("alice"), 2);
        assert_eq!(tracker.last_index("alice"), 3);
    }

    #[test]
    fn rank_prefers_low_count_then_old_index_then_id() {
        let mut tracker = FairnessTracker::new();
        tracker.record("alice", 0);
        tracker.record("alice", 1);
        tracker.record("bob", 0);
        // bob has fewer assignments than alice
        assert!(tracker.rank_key("bob") < tracker.rank_key("alice"));
        // carol never assigned, beats both
        assert!(tracker.rank_key("carol") < tracker.rank_key("bob"));
        // dave ties carol on counters; id decides
        assert!(tracker.rank_key("carol") < tracker.rank_key("dave"));
    }
}
