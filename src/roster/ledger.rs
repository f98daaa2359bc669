use std::collections::BTreeMap;

use crate::error::RosterError;

use super::types::{Assignment, Event, Role, SlotKey};

/// The working slot -> assignment map for a roster period.
///
/// Backed by a `BTreeMap` so iteration order is deterministic, which keeps
/// renderings and fairness seeding reproducible for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<SlotKey, Assignment>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn get(&self, slot: &SlotKey) -> Option<&Assignment> {
        self.entries.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &Assignment)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or overwrites an assignment.
    ///
    /// Overwriting an existing manual entry is rejected with
    /// `RosterError::ManualOverwrite` (explicit rejection rather than a
    /// silent no-op); [`Ledger::pin`] and [`Ledger::clear_slot`] are the
    /// human override path. The shuffle engine never targets an occupied
    /// slot, so it can never trip this.
    pub fn apply(
        &mut self,
        slot: SlotKey,
        member_id: &str,
        manual: bool,
    ) -> Result<(), RosterError> {
        if let Some(existing) = self.entries.get(&slot) {
            if existing.manual {
                return Err(RosterError::ManualOverwrite {
                    event_id: slot.event_id,
                    role_id: slot.role_id,
                    member_id: existing.member_id.clone(),
                });
            }
        }
        self.entries.insert(
            slot,
            Assignment {
                member_id: member_id.to_string(),
                manual,
            },
        );
        Ok(())
    }

    /// Pins a member to a slot on behalf of an admin. Replaces whatever is
    /// there, manual or not.
    pub fn pin(&mut self, slot: SlotKey, member_id: &str) {
        self.entries.insert(
            slot,
            Assignment {
                member_id: member_id.to_string(),
                manual: true,
            },
        );
    }

    /// Removes whatever occupies the slot (admin action). Returns the
    /// removed assignment, if any.
    pub fn clear_slot(&mut self, slot: &SlotKey) -> Option<Assignment> {
        self.entries.remove(slot)
    }

    /// Returns a copy holding only the manual assignments, plus the number
    /// of auto assignments that were dropped. Pure; `self` is untouched.
    pub fn clear_auto(&self) -> (Ledger, usize) {
        let manual_only: BTreeMap<SlotKey, Assignment> = self
            .entries
            .iter()
            .filter(|(_, assignment)| assignment.manual)
            .map(|(slot, assignment)| (slot.clone(), assignment.clone()))
            .collect();
        let removed = self.entries.len() - manual_only.len();
        (
            Ledger {
                entries: manual_only,
            },
            removed,
        )
    }

    /// Drops entries whose slot no longer matches a known event and role.
    /// Used when an admin replaces the plan under an existing ledger.
    /// Returns how many entries were dropped.
    pub fn retain_valid(&mut self, events: &[Event], roles: &[Role]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|slot, _| {
            events.iter().any(|e| e.id == slot.event_id)
                && roles.iter().any(|r| r.id == slot.role_id)
        });
        before - self.entries.len()
    }
}

/// Free-function form of [`Ledger::clear_auto`].
pub fn clear_auto(ledger: &Ledger) -> (Ledger, usize) {
    ledger.clear_auto()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(event: &str, role: &str) -> SlotKey {
        SlotKey::new(event, role)
    }

    #[test]
    fn apply_rejects_manual_overwrite() {
        let mut ledger = Ledger::new();
        ledger.pin(slot("e1", "vocalist"), "carol");

        let err = ledger
            .apply(slot("e1", "vocalist"), "alice", false)
            .unwrap_err();
        assert!(matches!(err, RosterError::ManualOverwrite { .. }));
        assert_eq!(
            ledger.get(&slot("e1", "vocalist")).unwrap().member_id,
            "carol"
        );
    }

    #[test]
    fn apply_overwrites_auto_entries() {
        let mut ledger = Ledger::new();
        ledger.apply(slot("e1", "vocalist"), "alice", false).unwrap();
        ledger.apply(slot("e1", "vocalist"), "bob", false).unwrap();
        assert_eq!(ledger.get(&slot("e1", "vocalist")).unwrap().member_id, "bob");
    }

    #[test]
    fn pin_replaces_and_clear_slot_removes() {
        let mut ledger = Ledger::new();
        ledger.apply(slot("e1", "usher"), "alice", false).unwrap();
        ledger.pin(slot("e1", "usher"), "bob");
        assert!(ledger.get(&slot("e1", "usher")).unwrap().manual);

        let removed = ledger.clear_slot(&slot("e1", "usher")).unwrap();
        assert_eq!(removed.member_id, "bob");
        assert!(ledger.is_empty());
    }

    #[test]
    fn clear_auto_keeps_only_manual_entries() {
        let mut ledger = Ledger::new();
        ledger.apply(slot("e1", "vocalist"), "alice", false).unwrap();
        ledger.apply(slot("e1", "usher"), "bob", false).unwrap();
        ledger.apply(slot("e2", "vocalist"), "carol", false).unwrap();
        ledger.pin(slot("e2", "usher"), "dave");
        ledger.pin(slot("e3", "vocalist"), "erin");

        let (manual_only, removed) = ledger.clear_auto();
        assert_eq!(removed, 3);
        assert_eq!(manual_only.len(), 2);
        assert!(manual_only.iter().all(|(_, a)| a.manual));
        // the input ledger is untouched
        assert_eq!(ledger.len(), 5);
    }
}
