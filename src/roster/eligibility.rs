use std::collections::HashMap;

use super::types::Member;

/// Role -> qualified members, built once per shuffle run by scanning the
/// member list's role grants.
#[derive(Debug, Clone, Default)]
pub struct EligibilityIndex {
    by_role: HashMap<String, Vec<String>>,
}

impl EligibilityIndex {
    pub fn build(members: &[Member]) -> Self {
        let mut by_role: HashMap<String, Vec<String>> = HashMap::new();
        for member in members {
            for role_id in &member.role_ids {
                let holders = by_role.entry(role_id.clone()).or_default();
                // A duplicated grant on one member must not create a
                // duplicate candidate.
                if !holders.iter().any(|id| id == &member.id) {
                    holders.push(member.id.clone());
                }
            }
        }
        EligibilityIndex { by_role }
    }

    /// Members holding the role. Unknown role id -> empty slice, not an error.
    pub fn members_for_role(&self, role_id: &str) -> &[String] {
        self.by_role
            .get(role_id)
            .map(|members| members.as_slice())
            .unwrap_or(&[])
    }

    pub fn member_has_role(&self, member_id: &str, role_id: &str) -> bool {
        self.members_for_role(role_id)
            .iter()
            .any(|id| id == member_id)
    }
}
