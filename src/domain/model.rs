use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Leader,
    Member,
}

/// A participant profile, immutable for the duration of an allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    pub role: Role,
    /// UTC offset in hours; `None` when the timezone was absent or unparseable.
    pub timezone_offset: Option<f64>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub habits: Vec<String>,
    /// Two-level interest tags of the form `"domain:subdomain"`.
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

impl Participant {
    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }

    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

/// An in-flight team borrowing participants from the run's pool.
///
/// Leaders are never evicted or reassigned once seeded; capacity is only
/// guaranteed after the cohesion pass.
#[derive(Debug, Clone)]
pub struct TeamDraft<'a> {
    pub name: String,
    pub leaders: Vec<&'a Participant>,
    pub members: Vec<&'a Participant>,
}

impl<'a> TeamDraft<'a> {
    pub fn seeded_by(leader: &'a Participant) -> Self {
        Self {
            name: format!("Team {}", leader.label()),
            leaders: vec![leader],
            members: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.leaders.len() + self.members.len()
    }

    /// Leaders first, then members, both in assignment order.
    pub fn occupants(&self) -> impl Iterator<Item = &'a Participant> + '_ {
        self.leaders.iter().chain(self.members.iter()).copied()
    }

    pub fn into_formed(self) -> FormedTeam {
        FormedTeam {
            name: self.name,
            leader_ids: self.leaders.iter().map(|p| p.id.clone()).collect(),
            member_ids: self.members.iter().map(|p| p.id.clone()).collect(),
        }
    }
}

/// A finalized team as handed to the surrounding layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormedTeam {
    pub name: String,
    pub leader_ids: Vec<String>,
    pub member_ids: Vec<String>,
}

impl FormedTeam {
    pub fn size(&self) -> usize {
        self.leader_ids.len() + self.member_ids.len()
    }
}

/// Per-phase diagnostic counts for downstream display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub timezone_groups: usize,
    pub teams_seeded: usize,
    pub category_orphans: usize,
    pub cohesion_orphans: usize,
    pub reassigned: usize,
    pub unassigned: usize,
}

/// Final result of one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationOutcome {
    pub teams: Vec<FormedTeam>,
    pub unassigned: Vec<String>,
    pub report: PhaseReport,
}

impl FormationOutcome {
    pub fn empty() -> Self {
        Self {
            teams: Vec::new(),
            unassigned: Vec::new(),
            report: PhaseReport::default(),
        }
    }
}
