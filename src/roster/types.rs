use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A volunteer who can be placed into role-slots.
/// Immutable for the duration of a shuffle run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub team: String,
    /// Role ids this member is qualified to fill.
    #[serde(default)]
    pub role_ids: Vec<String>,
}

/// A position that needs filling at every event (e.g. "Vocalist", "Usher").
/// Occupancy bounds are advisory for admins; the engine only ever places one
/// member per slot and one slot per member per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_needed: Option<u32>,
    #[serde(default)]
    pub max_needed: Option<u32>,
}

/// A dated gathering (service, rehearsal, ...). Events are ordered by date;
/// ties keep declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    /// Optional session label for days with more than one gathering
    /// (e.g. "morning" / "evening").
    #[serde(default)]
    pub session: Option<String>,
}

/// The unit the engine fills: one (event, role) pair.
///
/// An explicit composite key rather than a concatenated string, so ids that
/// contain separator characters can never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub event_id: String,
    pub role_id: String,
}

impl SlotKey {
    pub fn new(event_id: &str, role_id: &str) -> Self {
        SlotKey {
            event_id: event_id.to_string(),
            role_id: role_id.to_string(),
        }
    }
}

/// A filled slot. `manual` marks an admin pin: the engine never creates,
/// replaces, or removes a manual assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub member_id: String,
    pub manual: bool,
}

/// How a shuffle run treats the existing ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleMode {
    /// Strip every auto assignment first, then fill. Pins survive.
    FillAll,
    /// Leave everything in place; only fill slots with no assignment.
    FillEmptyOnly,
}

/// One availability statement for a member. Absence of a record means
/// available (open-world default). A record with a session label only covers
/// that session; a record without one covers the whole day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub member_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub session: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub reason: Option<String>,
}
