use std::collections::{HashMap, HashSet};

use crate::error::RosterError;

use super::availability::AvailabilityStore;
use super::eligibility::EligibilityIndex;
use super::fairness::FairnessTracker;
use super::ledger::Ledger;
use super::types::{Event, Role, ShuffleMode, SlotKey};

/// Result of a shuffle run: the updated ledger plus how many slots this run
/// newly filled.
#[derive(Debug, Clone)]
pub struct ShuffleOutcome {
    pub ledger: Ledger,
    pub filled: usize,
}

/// Fills event/role slots with eligible, available members.
///
/// A single greedy forward pass: events in chronological order (ties keep
/// declaration order), roles in declared order. For each open slot the
/// least-loaded candidate wins — ranked by ascending
/// `(assignment_count, last_assigned_index, member_id)` — among members who
/// hold the role, are available on the event's date (and session, if the
/// event has one), and are not already booked in the event. A slot with no
/// candidate is left empty; that is a gap for the stats report, not an
/// error. Earlier decisions are never revisited, so an admin can always
/// explain a pick as "fewest prior assignments at the time".
///
/// `FillAll` strips auto assignments before the pass; `FillEmptyOnly` keeps
/// everything already in the ledger. Manual assignments are never touched by
/// either mode. The pass is pure: identical inputs give an identical ledger
/// and fill count.
pub fn shuffle(
    events: &[Event],
    roles: &[Role],
    eligibility: &EligibilityIndex,
    availability: &AvailabilityStore,
    ledger: &Ledger,
    mode: ShuffleMode,
) -> Result<ShuffleOutcome, RosterError> {
    validate_inputs(events, roles, ledger)?;

    // Chronological order; sort_by_key is stable, so same-date events keep
    // their declaration order.
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|event| event.date);

    let mut working = match mode {
        ShuffleMode::FillAll => ledger.clear_auto().0,
        ShuffleMode::FillEmptyOnly => ledger.clone(),
    };

    let event_index: HashMap<&str, i64> = ordered
        .iter()
        .enumerate()
        .map(|(index, event)| (event.id.as_str(), index as i64))
        .collect();

    // Fairness counters are recomputed from the working ledger on every run,
    // pins included, so pre-existing load always counts.
    let mut fairness = FairnessTracker::new();
    // Members already holding any slot of an event, to prevent
    // double-booking within that event.
    let mut booked: HashMap<String, HashSet<String>> = HashMap::new();
    for (slot, assignment) in working.iter() {
        fairness.record(&assignment.member_id, event_index[slot.event_id.as_str()]);
        booked
            .entry(slot.event_id.clone())
            .or_default()
            .insert(assignment.member_id.clone());
    }

    let mut filled = 0;
    for (index, event) in ordered.iter().enumerate() {
        let taken = booked.entry(event.id.clone()).or_default();
        for role in roles {
            let slot = SlotKey::new(&event.id, &role.id);
            if working.get(&slot).is_some() {
                continue;
            }

            let mut candidates: Vec<&String> = eligibility
                .members_for_role(&role.id)
                .iter()
                .filter(|member_id| !taken.contains(member_id.as_str()))
                .filter(|member_id| {
                    availability.is_available(member_id.as_str(), event.date, event.session.as_deref())
                })
                .collect();
            candidates.sort_by(|a, b| fairness.rank_key(a.as_str()).cmp(&fairness.rank_key(b.as_str())));

            if let Some(best) = candidates.into_iter().next() {
                let chosen = best.clone();
                working.apply(slot, &chosen, false)?;
                fairness.record(&chosen, index as i64);
                taken.insert(chosen);
                filled += 1;
            }
            // No candidate: leave the slot empty and move on.
        }
    }

    Ok(ShuffleOutcome {
        ledger: working,
        filled,
    })
}

/// Rejects malformed input shapes before the pass runs; proceeding with them
/// would corrupt the fairness accounting.
fn validate_inputs(events: &[Event], roles: &[Role], ledger: &Ledger) -> Result<(), RosterError> {
    let mut event_ids = HashSet::new();
    for event in events {
        if !event_ids.insert(event.id.as_str()) {
            return Err(RosterError::DuplicateEvent(event.id.clone()));
        }
    }

    let mut role_ids = HashSet::new();
    for role in roles {
        if !role_ids.insert(role.id.as_str()) {
            return Err(RosterError::DuplicateRole(role.id.clone()));
        }
    }

    for (slot, _) in ledger.iter() {
        if !event_ids.contains(slot.event_id.as_str()) {
            return Err(RosterError::UnknownEvent(slot.event_id.clone()));
        }
        if !role_ids.contains(slot.role_id.as_str()) {
            return Err(RosterError::UnknownRole(slot.role_id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::types::Member;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(id: &str, day: &str) -> Event {
        Event {
            id: id.to_string(),
            name: id.to_string(),
            date: date(day),
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

    fn member(id: &str, roles: &[&str]) -> Member {
        Member {
            id: id.to_string(),
            name: id.to_string(),
            team: String::new(),
            role_ids: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn duplicate_event_id_is_rejected() {
        let events = vec![event("e1", "2026-03-01"), event("e1", "2026-03-08")];
        let err = shuffle(
            &events,
            &[role("vocalist")],
            &EligibilityIndex::default(),
            &AvailabilityStore::new(),
            &Ledger::new(),
            ShuffleMode::FillAll,
        )
        .unwrap_err();
        assert!(matches!(err, RosterError::DuplicateEvent(id) if id == "e1"));
    }

    #[test]
    fn ledger_entry_for_unknown_event_is_rejected() {
        let mut ledger = Ledger::new();
        ledger.pin(SlotKey::new("ghost", "vocalist"), "alice");
        let err = shuffle(
            &[event("e1", "2026-03-01")],
            &[role("vocalist")],
            &EligibilityIndex::default(),
            &AvailabilityStore::new(),
            &ledger,
            ShuffleMode::FillEmptyOnly,
        )
        .unwrap_err();
        assert!(matches!(err, RosterError::UnknownEvent(id) if id == "ghost"));
    }

    #[test]
    fn same_date_events_keep_declaration_order() {
        // Two services on the same day: the one declared first is filled
        // first, so the first member by id lands there.
        let events = vec![event("morning", "2026-03-01"), event("evening", "2026-03-01")];
        let members = vec![member("alice", &["usher"]), member("bob", &["usher"])];
        let eligibility = EligibilityIndex::build(&members);

        let outcome = shuffle(
            &events,
            &[role("usher")],
            &eligibility,
            &AvailabilityStore::new(),
            &Ledger::new(),
            ShuffleMode::FillAll,
        )
        .unwrap();

        assert_eq!(outcome.filled, 2);
        assert_eq!(
            outcome
                .ledger
                .get(&SlotKey::new("morning", "usher"))
                .unwrap()
                .member_id,
            "alice"
        );
        assert_eq!(
            outcome
                .ledger
                .get(&SlotKey::new("evening", "usher"))
                .unwrap()
                .member_id,
            "bob"
        );
    }

    #[test]
    fn session_unavailability_excludes_candidate() {
        let mut morning = event("svc1", "2026-03-01");
        morning.session = Some("morning".to_string());
        let members = vec![member("alice", &["usher"]), member("bob", &["usher"])];
        let eligibility = EligibilityIndex::build(&members);
        let availability =
            AvailabilityStore::from_records(vec![crate::roster::types::AvailabilityRecord {
                member_id: "alice".to_string(),
                date: date("2026-03-01"),
                session: Some("morning".to_string()),
                available: false,
                reason: None,
            }]);

        let outcome = shuffle(
            &[morning],
            &[role("usher")],
            &eligibility,
            &availability,
            &Ledger::new(),
            ShuffleMode::FillAll,
        )
        .unwrap();

        assert_eq!(
            outcome
                .ledger
                .get(&SlotKey::new("svc1", "usher"))
                .unwrap()
                .member_id,
            "bob"
        );
    }

    #[test]
    fn slot_with_no_candidate_stays_empty() {
        let outcome = shuffle(
            &[event("e1", "2026-03-01")],
            &[role("drums")],
            &EligibilityIndex::build(&[member("alice", &["vocalist"])]),
            &AvailabilityStore::new(),
            &Ledger::new(),
            ShuffleMode::FillAll,
        )
        .unwrap();
        assert_eq!(outcome.filled, 0);
        assert!(outcome.ledger.is_empty());
    }
}
