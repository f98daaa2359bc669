use thiserror::Error;

/// Errors surfaced at the boundaries of the roster tool.
///
/// The shuffle pass itself never fails on an unfillable slot — a gap in the
/// roster is a normal, user-visible state. Errors exist only for malformed
/// input shapes and for attempts to overwrite a pinned assignment.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("duplicate event id `{0}`")]
    DuplicateEvent(String),

    #[error("duplicate role id `{0}`")]
    DuplicateRole(String),

    #[error("assignment references unknown event `{0}`")]
    UnknownEvent(String),

    #[error("assignment references unknown role `{0}`")]
    UnknownRole(String),

    #[error("slot ({event_id}, {role_id}) is pinned to {member_id}; unpin it before reassigning")]
    ManualOverwrite {
        event_id: String,
        role_id: String,
        member_id: String,
    },

    #[error("invalid date `{value}`: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid roster plan: {0}")]
    InvalidPlan(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
