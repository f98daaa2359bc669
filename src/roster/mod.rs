pub mod types;
pub mod availability;
pub mod eligibility;
pub mod fairness;
pub mod ledger;
pub mod engine;
pub mod stats;

pub use types::{Assignment, AvailabilityRecord, Event, Member, Role, ShuffleMode, SlotKey};
pub use availability::AvailabilityStore;
pub use eligibility::EligibilityIndex;
pub use fairness::FairnessTracker;
pub use ledger::{clear_auto, Ledger};
pub use engine::{shuffle, ShuffleOutcome};
pub use stats::{roster_stats, StatsSummary};
