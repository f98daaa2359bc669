use std::collections::HashMap;

use chrono::NaiveDate;

use super::types::AvailabilityRecord;

/// Lookup for "is member M available on date D (session S)?".
///
/// Only explicit records are stored; anyone without a record for a date is
/// considered available. Session-specific records take precedence over a
/// whole-day record for the same member and date.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityStore {
    by_day: HashMap<(String, NaiveDate), AvailabilityRecord>,
    by_session: HashMap<(String, NaiveDate, String), AvailabilityRecord>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        AvailabilityStore::default()
    }

    pub fn from_records(records: Vec<AvailabilityRecord>) -> Self {
        let mut store = AvailabilityStore::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Inserts a record, replacing any previous record for the same
    /// (member, date, session).
    pub fn insert(&mut self, record: AvailabilityRecord) {
        match &record.session {
            Some(session) => {
                let key = (record.member_id.clone(), record.date, session.clone());
                self.by_session.insert(key, record);
            }
            None => {
                let key = (record.member_id.clone(), record.date);
                self.by_day.insert(key, record);
            }
        }
    }

    pub fn is_available(&self, member_id: &str, date: NaiveDate, session: Option<&str>) -> bool {
        self.lookup(member_id, date, session)
            .map(|r| r.available)
            .unwrap_or(true)
    }

    /// The reason attached to the record governing (member, date, session),
    /// if any.
    pub fn reason(&self, member_id: &str, date: NaiveDate, session: Option<&str>) -> Option<&str> {
        self.lookup(member_id, date, session)
            .and_then(|r| r.reason.as_deref())
    }

    fn lookup(
        &self,
        member_id: &str,
        date: NaiveDate,
        session: Option<&str>,
    ) -> Option<&AvailabilityRecord> {
        if let Some(session) = session {
            let key = (member_id.to_string(), date, session.to_string());
            if let Some(record) = self.by_session.get(&key) {
                return Some(record);
            }
        }
        self.by_day.get(&(member_id.to_string(), date))
    }
}
