pub mod error;
pub mod parser;
pub mod roster;
pub mod display;
pub mod logging;
pub mod web;

pub use error::RosterError;
pub use roster::{
    clear_auto, roster_stats, shuffle, Assignment, AvailabilityRecord, AvailabilityStore,
    EligibilityIndex, Event, FairnessTracker, Ledger, Member, Role, ShuffleMode, ShuffleOutcome,
    SlotKey, StatsSummary,
};
