use crate::core::scoring::ScoringEngine;
use crate::domain::model::{Participant, TeamDraft};
use crate::utils::error::Result;
use futures::future::join_all;

pub struct CohesionOutcome<'a> {
    pub teams: Vec<TeamDraft<'a>>,
    pub orphans: Vec<&'a Participant>,
}

/// Phase 3: trims oversized teams down to capacity by semantic cohesion.
///
/// Teams at or under capacity pass through untouched and never hit the
/// embedding collaborator. Oversized teams are optimized concurrently; each
/// team's matrix build is self-contained, and the output order matches the
/// input team order regardless of completion order.
pub async fn optimize_teams<'a>(
    scorer: &ScoringEngine,
    teams: Vec<TeamDraft<'a>>,
    max_team_size: usize,
) -> CohesionOutcome<'a> {
    let results = join_all(
        teams
            .into_iter()
            .map(|team| optimize_team(scorer, team, max_team_size)),
    )
    .await;

    let mut outcome = CohesionOutcome {
        teams: Vec::with_capacity(results.len()),
        orphans: Vec::new(),
    };
    for (team, mut evicted) in results {
        outcome.teams.push(team);
        outcome.orphans.append(&mut evicted);
    }

    if !outcome.orphans.is_empty() {
        tracing::info!(
            "Phase 3: {} participants moved to the orphan pool",
            outcome.orphans.len()
        );
    }
    outcome
}

/// Ranks one oversized team's non-leaders by cohesion and keeps the top ones
/// that fit beside the leaders. An embedding failure leaves the team
/// untrimmed rather than failing the run.
async fn optimize_team<'a>(
    scorer: &ScoringEngine,
    mut team: TeamDraft<'a>,
    max_team_size: usize,
) -> (TeamDraft<'a>, Vec<&'a Participant>) {
    if team.size() <= max_team_size {
        return (team, Vec::new());
    }

    tracing::debug!(
        team = %team.name,
        size = team.size(),
        "Phase 3: optimizing oversized team"
    );

    let occupants: Vec<&Participant> = team.occupants().collect();
    let matrix = match pairwise_matrix(scorer, &occupants).await {
        Ok(matrix) => matrix,
        Err(e) => {
            tracing::warn!(
                team = %team.name,
                error = %e,
                "Phase 3: embedding unavailable, leaving team untrimmed"
            );
            return (team, Vec::new());
        }
    };

    // Cohesion is the mean similarity to the rest of the team, leaders
    // included. The diagonal stays zero, as in the matrix it averages over.
    let size = occupants.len();
    let cohesion: Vec<f64> = matrix
        .iter()
        .map(|row| row.iter().sum::<f64>() / size as f64)
        .collect();

    // Leaders are exempt from eviction. Non-leaders occupy matrix rows after
    // the leaders; a stable sort keeps input order on exact ties.
    let leader_count = team.leaders.len();
    let mut ranked: Vec<usize> = (0..team.members.len()).collect();
    ranked.sort_by(|&a, &b| {
        cohesion[leader_count + b].total_cmp(&cohesion[leader_count + a])
    });

    let slots = max_team_size.saturating_sub(leader_count);
    let kept: Vec<bool> = {
        let mut kept = vec![false; team.members.len()];
        for &idx in ranked.iter().take(slots) {
            kept[idx] = true;
        }
        kept
    };

    let mut evicted = Vec::new();
    let mut retained = Vec::with_capacity(slots);
    for (idx, member) in team.members.iter().enumerate() {
        if kept[idx] {
            retained.push(*member);
        } else {
            evicted.push(*member);
        }
    }
    team.members = retained;

    (team, evicted)
}

/// Symmetric pairwise semantic-similarity matrix over a team's occupants.
/// Each unordered pair is scored once and mirrored.
async fn pairwise_matrix(
    scorer: &ScoringEngine,
    occupants: &[&Participant],
) -> Result<Vec<Vec<f64>>> {
    let size = occupants.len();
    let mut matrix = vec![vec![0.0; size]; size];
    for i in 0..size {
        for j in (i + 1)..size {
            let score = scorer.semantic_score(occupants[i], occupants[j]).await?;
            matrix[i][j] = score;
            matrix[j][i] = score;
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormationConfig;
    use crate::domain::model::Role;
    use crate::domain::ports::EmbeddingClient;
    use crate::utils::error::FormationError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Scores the pair of single-entry goal lists by table lookup; pairs not
    /// listed score zero.
    struct PairTable(HashMap<(String, String), f64>);

    impl PairTable {
        fn new(pairs: &[(&str, &str, f64)]) -> Self {
            let mut table = HashMap::new();
            for (a, b, score) in pairs {
                table.insert((a.to_string(), b.to_string()), *score);
                table.insert((b.to_string(), a.to_string()), *score);
            }
            Self(table)
        }
    }

    #[async_trait]
    impl EmbeddingClient for PairTable {
        async fn compare(&self, a: &[String], b: &[String]) -> Result<Vec<Vec<f64>>> {
            let score = self
                .0
                .get(&(a[0].clone(), b[0].clone()))
                .copied()
                .unwrap_or(0.0);
            Ok(vec![vec![score]])
        }
    }

    struct FailingClient;

    #[async_trait]
    impl EmbeddingClient for FailingClient {
        async fn compare(&self, _a: &[String], _b: &[String]) -> Result<Vec<Vec<f64>>> {
            Err(FormationError::EmbeddingError {
                message: "timeout".to_string(),
            })
        }
    }

    fn participant(id: &str, role: Role, goal: &str) -> Participant {
        Participant {
            id: id.to_string(),
            display_name: String::new(),
            role,
            timezone_offset: Some(0.0),
            goals: vec![goal.to_string()],
            habits: vec![],
            categories: Default::default(),
        }
    }

    fn draft<'a>(leader: &'a Participant, members: &[&'a Participant]) -> TeamDraft<'a> {
        let mut team = TeamDraft::seeded_by(leader);
        team.members.extend(members.iter().copied());
        team
    }

    #[tokio::test]
    async fn test_trims_least_cohesive_members() {
        let leader = participant("l", Role::Leader, "g-l");
        let members: Vec<Participant> = (1..=7)
            .map(|i| participant(&format!("m{i}"), Role::Member, &format!("g{i}")))
            .collect();

        // m6 and m7 score low against everyone; the rest score high.
        let mut pairs = Vec::new();
        let mut names: Vec<String> = vec!["g-l".to_string()];
        names.extend((1..=7).map(|i| format!("g{i}")));
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let low = names[i].ends_with('6')
                    || names[i].ends_with('7')
                    || names[j].ends_with('6')
                    || names[j].ends_with('7');
                pairs.push((
                    names[i].as_str(),
                    names[j].as_str(),
                    if low { 0.1 } else { 0.8 },
                ));
            }
        }
        let scorer = ScoringEngine::new(
            Arc::new(PairTable::new(&pairs)),
            FormationConfig::default(),
        );

        let member_refs: Vec<&Participant> = members.iter().collect();
        let team = draft(&leader, &member_refs);
        let outcome = optimize_teams(&scorer, vec![team], 6).await;

        assert_eq!(outcome.teams.len(), 1);
        assert_eq!(outcome.teams[0].size(), 6);
        let kept: Vec<&str> = outcome.teams[0].members.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(kept, vec!["m1", "m2", "m3", "m4", "m5"]);
        let evicted: Vec<&str> = outcome.orphans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(evicted, vec!["m6", "m7"]);
    }

    #[tokio::test]
    async fn test_leader_kept_despite_low_cohesion() {
        let leader = participant("l", Role::Leader, "g-l");
        let members: Vec<Participant> = (1..=3)
            .map(|i| participant(&format!("m{i}"), Role::Member, &format!("g{i}")))
            .collect();

        // The leader is the least cohesive occupant but is never evicted.
        let pairs = [
            ("g-l", "g1", 0.0),
            ("g-l", "g2", 0.0),
            ("g-l", "g3", 0.0),
            ("g1", "g2", 0.9),
            ("g1", "g3", 0.9),
            ("g2", "g3", 0.9),
        ];
        let scorer = ScoringEngine::new(
            Arc::new(PairTable::new(&pairs)),
            FormationConfig::default(),
        );

        let member_refs: Vec<&Participant> = members.iter().collect();
        let team = draft(&leader, &member_refs);
        let outcome = optimize_teams(&scorer, vec![team], 3).await;

        assert_eq!(outcome.teams[0].leaders.len(), 1);
        assert_eq!(outcome.teams[0].leaders[0].id, "l");
        assert_eq!(outcome.teams[0].size(), 3);
        assert_eq!(outcome.orphans.len(), 1);
    }

    #[tokio::test]
    async fn test_team_at_capacity_passes_through() {
        let leader = participant("l", Role::Leader, "g-l");
        let m1 = participant("m1", Role::Member, "g1");
        let scorer = ScoringEngine::new(Arc::new(FailingClient), FormationConfig::default());

        let team = draft(&leader, &[&m1]);
        let outcome = optimize_teams(&scorer, vec![team], 6).await;

        // Never touches the embedding client, so the failing client is moot.
        assert_eq!(outcome.teams[0].size(), 2);
        assert!(outcome.orphans.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_team_untrimmed() {
        let leader = participant("l", Role::Leader, "g-l");
        let members: Vec<Participant> = (1..=4)
            .map(|i| participant(&format!("m{i}"), Role::Member, &format!("g{i}")))
            .collect();
        let scorer = ScoringEngine::new(Arc::new(FailingClient), FormationConfig::default());

        let member_refs: Vec<&Participant> = members.iter().collect();
        let team = draft(&leader, &member_refs);
        let outcome = optimize_teams(&scorer, vec![team], 3).await;

        // Documented degradation: the team stays oversized.
        assert_eq!(outcome.teams[0].size(), 5);
        assert!(outcome.orphans.is_empty());
    }
}
