use csv::Reader;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::RosterError;
use crate::roster::{AvailabilityRecord, Event, Member, Role};

/// Result of a bulk member import: the members themselves plus the
/// unavailability records declared on their rows.
#[derive(Debug, Clone, Default)]
pub struct MemberImport {
    pub members: Vec<Member>,
    pub availability: Vec<AvailabilityRecord>,
}

/// Events and roles for a roster period, loaded from a JSON plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterPlan {
    pub roles: Vec<Role>,
    pub events: Vec<Event>,
}

/// Splits a comma-separated cell into trimmed, non-empty items.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_date(value: &str) -> Result<NaiveDate, RosterError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| RosterError::InvalidDate {
        value: value.trim().to_string(),
    })
}

/// Loads members from a CSV file.
///
/// Expected columns (found by header name, with positional fallbacks):
/// member id, name, team, roles (comma-separated role ids), unavailable
/// dates (comma-separated YYYY-MM-DD), and an optional reason that applies
/// to those dates. Rows missing a name or id are skipped; a later row for
/// the same member id replaces the earlier one, so a re-submitted form wins.
pub fn load_members<P: AsRef<Path>>(csv_path: P) -> Result<MemberImport, RosterError> {
    let reader = Reader::from_path(csv_path)?;
    parse_members(reader)
}

/// Same as [`load_members`] but from any reader (the web upload endpoint
/// parses the request body directly).
pub fn parse_members_from_reader<R: Read>(input: R) -> Result<MemberImport, RosterError> {
    parse_members(Reader::from_reader(input))
}

fn parse_members<R: Read>(mut reader: Reader<R>) -> Result<MemberImport, RosterError> {
    let headers = reader.headers()?.clone();
    let find = |needle: &str, fallback: usize| {
        headers
            .iter()
            .position(|h| h.to_lowercase().contains(needle))
            .unwrap_or(fallback)
    };

    let id_col = find("id", 0);
    let name_col = find("name", 1);
    let team_col = find("team", 2);
    let roles_col = find("role", 3);
    let unavailable_col = find("unavailable", 4);
    let reason_col = find("reason", 5);

    // Track members by id so a later row replaces an earlier one, while the
    // output keeps first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Member> = HashMap::new();
    let mut availability: HashMap<String, Vec<AvailabilityRecord>> = HashMap::new();

    for result in reader.records() {
        let record = result?;

        let id = record.get(id_col).unwrap_or("").trim().to_string();
        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if id.is_empty() || name.is_empty() {
            continue;
        }
        let team = record.get(team_col).unwrap_or("").trim().to_string();
        let role_ids = parse_list(record.get(roles_col).unwrap_or(""));

        let reason = record
            .get(reason_col)
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(|r| r.to_string());
        let mut records = Vec::new();
        for date_str in parse_list(record.get(unavailable_col).unwrap_or("")) {
            records.push(AvailabilityRecord {
                member_id: id.clone(),
                date: parse_date(&date_str)?,
                session: None,
                available: false,
                reason: reason.clone(),
            });
        }

        if !members.contains_key(&id) {
            order.push(id.clone());
        }
        members.insert(
            id.clone(),
            Member {
                id: id.clone(),
                name,
                team,
                role_ids,
            },
        );
        availability.insert(id, records);
    }

    let mut import = MemberImport::default();
    for id in order {
        if let Some(member) = members.remove(&id) {
            import.members.push(member);
        }
        if let Some(records) = availability.remove(&id) {
            import.availability.extend(records);
        }
    }
    Ok(import)
}

/// Loads a roster plan (roles + events) from a JSON file and checks its
/// shape. Duplicate ids are rejected here so a bad plan never reaches the
/// engine.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<RosterPlan, RosterError> {
    let text = fs::read_to_string(path)?;
    let plan: RosterPlan = serde_json::from_str(&text)?;
    validate_plan(&plan)?;
    Ok(plan)
}

pub fn validate_plan(plan: &RosterPlan) -> Result<(), RosterError> {
    let mut seen_roles = std::collections::HashSet::new();
    for role in &plan.roles {
        if role.id.trim().is_empty() {
            return Err(RosterError::InvalidPlan("role with empty id".to_string()));
        }
        if !seen_roles.insert(role.id.as_str()) {
            return Err(RosterError::InvalidPlan(format!(
                "duplicate role id `{}`",
                role.id
            )));
        }
    }
    let mut seen_events = std::collections::HashSet::new();
    for event in &plan.events {
        if event.id.trim().is_empty() {
            return Err(RosterError::InvalidPlan("event with empty id".to_string()));
        }
        if !seen_events.insert(event.id.as_str()) {
            return Err(RosterError::InvalidPlan(format!(
                "duplicate event id `{}`",
                event.id
            )));
        }
    }
    Ok(())
}
