use crate::config::FormationConfig;
use crate::core::scoring::ScoringEngine;
use crate::core::timezone::TimezoneGroup;
use crate::domain::model::{Participant, TeamDraft};

pub struct CategoryOutcome<'a> {
    pub teams: Vec<TeamDraft<'a>>,
    pub orphans: Vec<&'a Participant>,
}

/// Phase 2: forms leader-centered teams inside each timezone group.
///
/// Each leader seeds a team; every non-leader joins the leader whose category
/// set it matches best, provided the score clears the configured threshold.
/// Equal scores go to the earliest leader in input order (selection only moves
/// on a strictly better score). A group without leaders orphans all of its
/// participants. Capacity is not enforced here; oversized teams are resolved
/// by the cohesion pass.
pub fn cluster_by_category<'a>(
    groups: &[TimezoneGroup<'a>],
    config: &FormationConfig,
) -> CategoryOutcome<'a> {
    let mut teams = Vec::new();
    let mut orphans: Vec<&'a Participant> = Vec::new();

    for (offset, participants) in groups {
        let leaders: Vec<&Participant> = participants
            .iter()
            .copied()
            .filter(|p| p.is_leader())
            .collect();

        if leaders.is_empty() {
            tracing::debug!(
                offset = ?offset,
                count = participants.len(),
                "Phase 2: timezone group has no leaders, orphaning all participants"
            );
            orphans.extend(participants.iter().copied());
            continue;
        }

        let mut drafts: Vec<TeamDraft<'a>> =
            leaders.iter().map(|&l| TeamDraft::seeded_by(l)).collect();

        for member in participants.iter().copied().filter(|p| !p.is_leader()) {
            let mut best: Option<(usize, f64)> = None;
            for (idx, leader) in leaders.iter().enumerate() {
                let score = ScoringEngine::cat_score(&member.categories, &leader.categories);
                if best.map_or(true, |(_, current)| score > current) {
                    best = Some((idx, score));
                }
            }

            match best {
                Some((idx, score)) if score >= config.min_category_score_threshold => {
                    drafts[idx].members.push(member);
                }
                _ => orphans.push(member),
            }
        }

        teams.append(&mut drafts);
    }

    tracing::info!(
        "Phase 2: seeded {} teams, {} participants orphaned",
        teams.len(),
        orphans.len()
    );
    CategoryOutcome { teams, orphans }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timezone::cluster_by_timezone;
    use crate::domain::model::Role;

    fn participant(id: &str, role: Role, categories: &[&str]) -> Participant {
        Participant {
            id: id.to_string(),
            display_name: String::new(),
            role,
            timezone_offset: Some(0.0),
            goals: vec![],
            habits: vec![],
            categories: categories.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_member_joins_best_matching_leader() {
        let pool = vec![
            participant("l1", Role::Leader, &["health:fitness"]),
            participant("l2", Role::Leader, &["tech:webdev"]),
            participant("m1", Role::Member, &["tech:webdev"]),
        ];
        let groups = cluster_by_timezone(&pool);
        let outcome = cluster_by_category(&groups, &FormationConfig::default());

        assert_eq!(outcome.teams.len(), 2);
        assert!(outcome.orphans.is_empty());
        let webdev_team = &outcome.teams[1];
        assert_eq!(webdev_team.leaders[0].id, "l2");
        assert_eq!(webdev_team.members.len(), 1);
        assert_eq!(webdev_team.members[0].id, "m1");
    }

    #[test]
    fn test_below_threshold_becomes_orphan() {
        let pool = vec![
            participant("l1", Role::Leader, &["tech:ai"]),
            participant("m1", Role::Member, &["health:fitness"]),
        ];
        let groups = cluster_by_timezone(&pool);
        let outcome = cluster_by_category(&groups, &FormationConfig::default());

        assert_eq!(outcome.teams.len(), 1);
        assert!(outcome.teams[0].members.is_empty());
        assert_eq!(outcome.orphans.len(), 1);
        assert_eq!(outcome.orphans[0].id, "m1");
    }

    #[test]
    fn test_group_without_leaders_orphans_everyone() {
        let pool = vec![
            participant("m1", Role::Member, &["tech:webdev"]),
            participant("m2", Role::Member, &["tech:webdev"]),
        ];
        let groups = cluster_by_timezone(&pool);
        let outcome = cluster_by_category(&groups, &FormationConfig::default());

        assert!(outcome.teams.is_empty());
        let ids: Vec<&str> = outcome.orphans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn test_tie_goes_to_earliest_leader() {
        let pool = vec![
            participant("l1", Role::Leader, &["tech:webdev"]),
            participant("l2", Role::Leader, &["tech:webdev"]),
            participant("m1", Role::Member, &["tech:webdev"]),
        ];
        let groups = cluster_by_timezone(&pool);
        let outcome = cluster_by_category(&groups, &FormationConfig::default());

        assert_eq!(outcome.teams[0].leaders[0].id, "l1");
        assert_eq!(outcome.teams[0].members.len(), 1);
        assert!(outcome.teams[1].members.is_empty());
    }

    #[test]
    fn test_capacity_not_enforced() {
        let mut pool = vec![participant("l1", Role::Leader, &["tech:webdev"])];
        for i in 0..20 {
            pool.push(participant(&format!("m{i}"), Role::Member, &["tech:webdev"]));
        }
        let groups = cluster_by_timezone(&pool);
        let config = FormationConfig {
            max_team_size: 6,
            ..Default::default()
        };
        let outcome = cluster_by_category(&groups, &config);

        assert_eq!(outcome.teams.len(), 1);
        assert_eq!(outcome.teams[0].size(), 21);
    }
}
