use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use crate::error::RosterError;
use crate::roster::{Event, Ledger, Member, Role, SlotKey, StatsSummary};

/// Formats a member name with their team tag, e.g. `[Worship] Alice`.
pub fn format_member_name(team: &str, name: &str) -> String {
    if team.is_empty() {
        name.to_string()
    } else {
        format!("[{}] {}", team, name)
    }
}

/// Renders the full roster as text: one block per event (chronological),
/// one line per role. Pinned assignments are marked, open slots show as
/// `[EMPTY]`.
pub fn render_roster(
    events: &[Event],
    roles: &[Role],
    members: &[Member],
    ledger: &Ledger,
) -> String {
    let member_map: HashMap<&str, &Member> =
        members.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|event| event.date);

    let mut out = String::new();
    for event in ordered {
        out.push_str(&format!("** {} ({})", event.name, event.date));
        if let Some(session) = &event.session {
            out.push_str(&format!(", {}", session));
        }
        out.push_str(" **\n");

        for role in roles {
            let slot = SlotKey::new(&event.id, &role.id);
            match ledger.get(&slot) {
                Some(assignment) => {
                    // Fall back to the raw id if the member list no longer
                    // carries this person.
                    let display = member_map
                        .get(assignment.member_id.as_str())
                        .map(|m| format_member_name(&m.team, &m.name))
                        .unwrap_or_else(|| assignment.member_id.clone());
                    let marker = if assignment.manual { " (pinned)" } else { "" };
                    out.push_str(&format!("  {} -> {}{}\n", role.name, display, marker));
                }
                None => {
                    out.push_str(&format!("  {} -> [EMPTY]\n", role.name));
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Prints the roster to the terminal.
pub fn print_roster(events: &[Event], roles: &[Role], members: &[Member], ledger: &Ledger) {
    print!("{}", render_roster(events, roles, members, ledger));
}

/// Writes the same rendering to a file.
pub fn write_roster_to_file(
    events: &[Event],
    roles: &[Role],
    members: &[Member],
    ledger: &Ledger,
    filename: &str,
) -> Result<(), RosterError> {
    let mut file = File::create(filename)?;
    file.write_all(render_roster(events, roles, members, ledger).as_bytes())?;
    Ok(())
}

/// Prints the stats summary in a readable format.
pub fn print_stats(stats: &StatsSummary) {
    println!("\n=== Roster Stats ===");
    println!(
        "Filled: {} ({}%), empty: {}",
        stats.filled, stats.fill_percentage, stats.empty
    );
    println!("Pinned: {}, auto: {}", stats.manual, stats.auto);
    println!("Unique members used: {}", stats.unique_members);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn renders_assignments_gaps_and_pins() {
        let events = vec![Event {
            id: "e1".to_string(),
            name: "Sunday Service".to_string(),
            date: date("2026-03-01"),
            session: None,
        }];
        let roles = vec![
            Role {
                id: "vocalist".to_string(),
                name: "Vocalist".to_string(),
                category: None,
                min_needed: None,
                max_needed: None,
            },
            Role {
                id: "usher".to_string(),
                name: "Usher".to_string(),
                category: None,
                min_needed: None,
                max_needed: None,
            },
        ];
        let members = vec![Member {
            id: "m1".to_string(),
            name: "Alice".to_string(),
            team: "Worship".to_string(),
            role_ids: vec!["vocalist".to_string()],
        }];
        let mut ledger = Ledger::new();
        ledger.pin(SlotKey::new("e1", "vocalist"), "m1");

        let text = render_roster(&events, &roles, &members, &ledger);
        assert!(text.contains("** Sunday Service (2026-03-01) **"));
        assert!(text.contains("Vocalist -> [Worship] Alice (pinned)"));
        assert!(text.contains("Usher -> [EMPTY]"));
    }

    #[test]
    fn formats_names_without_team_tag() {
        assert_eq!(format_member_name("", "Alice"), "Alice");
        assert_eq!(format_member_name("Worship", "Alice"), "[Worship] Alice");
    }
}
