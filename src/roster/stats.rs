use std::collections::HashSet;

use serde::Serialize;

use super::ledger::Ledger;
use super::types::{Event, Role};

/// Read-only aggregation over a ledger for display. Pure function of its
/// inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub filled: usize,
    pub empty: usize,
    pub manual: usize,
    pub auto: usize,
    pub unique_members: usize,
    pub fill_percentage: u32,
}

/// Summarizes a ledger against the full slot grid (events x roles).
pub fn roster_stats(ledger: &Ledger, events: &[Event], roles: &[Role]) -> StatsSummary {
    let total = events.len() * roles.len();
    let filled = ledger.len();
    let manual = ledger.iter().filter(|(_, a)| a.manual).count();
    let unique_members: HashSet<&str> = ledger.iter().map(|(_, a)| a.member_id.as_str()).collect();
    let fill_percentage = if total == 0 {
        0
    } else {
        ((filled as f64 / total as f64) * 100.0).round() as u32
    };

    StatsSummary {
        filled,
        empty: total.saturating_sub(filled),
        manual,
        auto: filled - manual,
        unique_members: unique_members.len(),
        fill_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::types::SlotKey;
    use chrono::NaiveDate;

    fn event(id: &str, day: &str) -> Event {
        Event {
            id: id.to_string(),
            name: id.to_string(),
            date: NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            session: None,
        }
    }

    fn role(id: &str) -> Role {
        Role {
            id: id.to_string(),
            name: id.to_string(),
            category: None,
            min_needed: None,
            max_needed: None,
        }
    }

    #[test]
    fn summarizes_partially_filled_grid() {
        // 5 events x 2 roles = 10 slots; 4 filled (1 manual, 3 auto) by 2
        // unique members.
        let events: Vec<Event> = (1..=5)
            .map(|n| event(&format!("e{}", n), &format!("2026-03-0{}", n)))
            .collect();
        let roles = vec![role("vocalist"), role("usher")];

        let mut ledger = Ledger::new();
        ledger.pin(SlotKey::new("e1", "vocalist"), "alice");
        ledger.apply(SlotKey::new("e1", "usher"), "bob", false).unwrap();
        ledger.apply(SlotKey::new("e2", "vocalist"), "bob", false).unwrap();
        ledger.apply(SlotKey::new("e3", "vocalist"), "alice", false).unwrap();

        let stats = roster_stats(&ledger, &events, &roles);
        assert_eq!(
            stats,
            StatsSummary {
                filled: 4,
                empty: 6,
                manual: 1,
                auto: 3,
                unique_members: 2,
                fill_percentage: 40,
            }
        );
    }

    #[test]
    fn empty_grid_reports_zero_percentage() {
        let stats = roster_stats(&Ledger::new(), &[], &[]);
        assert_eq!(stats.filled, 0);
        assert_eq!(stats.empty, 0);
        assert_eq!(stats.fill_percentage, 0);
    }
}
