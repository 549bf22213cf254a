use crate::config::FormationConfig;
use crate::core::scoring::ScoringEngine;
use crate::domain::model::{Participant, TeamDraft};
use crate::domain::ports::TeamFit;
use std::cmp::Ordering;

pub struct ReassignOutcome<'a> {
    pub teams: Vec<TeamDraft<'a>>,
    pub unassigned: Vec<&'a Participant>,
    pub reassigned: usize,
}

struct Candidate {
    team_idx: usize,
    fit: TeamFit,
    size: usize,
}

/// Phase 4: places accumulated orphans into existing teams with tiered
/// fallback logic.
///
/// Orphans are processed in accumulation order and each assignment commits
/// immediately, so later orphans see the updated team sizes. Tier 1 prefers
/// teams clearing the timezone threshold, ranked by category score with the
/// smaller team winning ties; Tier 2 falls back to the least-bad timezone
/// fit. Remaining ties keep the earliest team in team order. Greedy and
/// non-backtracking by design.
pub fn reassign_orphans<'a>(
    scorer: &ScoringEngine,
    orphans: Vec<&'a Participant>,
    mut teams: Vec<TeamDraft<'a>>,
    config: &FormationConfig,
) -> ReassignOutcome<'a> {
    let orphan_count = orphans.len();
    let mut unassigned = Vec::new();

    for orphan in orphans {
        let mut candidates = Vec::new();
        for (team_idx, team) in teams.iter().enumerate() {
            if team.size() >= config.max_team_size {
                continue;
            }
            // Leaderless teams should not exist at this point; guarded anyway.
            if team.leaders.is_empty() {
                continue;
            }
            candidates.push(Candidate {
                team_idx,
                fit: scorer.fit(orphan, &team.leaders),
                size: team.size(),
            });
        }

        if candidates.is_empty() {
            tracing::debug!(orphan = %orphan.id, "Phase 4: no team has capacity");
            unassigned.push(orphan);
            continue;
        }

        let primary: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.fit.tz_score >= config.min_timezone_score_threshold)
            .collect();

        let chosen = if !primary.is_empty() {
            pick_first_max(&primary, compare_tier1)
        } else {
            let all: Vec<&Candidate> = candidates.iter().collect();
            pick_first_max(&all, compare_tier2)
        };

        teams[chosen].members.push(orphan);
    }

    let outcome = ReassignOutcome {
        teams,
        reassigned: orphan_count - unassigned.len(),
        unassigned,
    };
    tracing::info!(
        "Phase 4: {} participants placed, {} remain unassigned",
        outcome.reassigned,
        outcome.unassigned.len()
    );
    outcome
}

/// Tier 1 ranking: category score descending, then smaller team first.
fn compare_tier1(a: &Candidate, b: &Candidate) -> Ordering {
    a.fit
        .cat_score
        .total_cmp(&b.fit.cat_score)
        .then(b.size.cmp(&a.size))
}

/// Tier 2 ranking: timezone score descending, then category score
/// descending, then smaller team first.
fn compare_tier2(a: &Candidate, b: &Candidate) -> Ordering {
    a.fit
        .tz_score
        .total_cmp(&b.fit.tz_score)
        .then(a.fit.cat_score.total_cmp(&b.fit.cat_score))
        .then(b.size.cmp(&a.size))
}

/// Returns the team index of the best candidate, keeping the earliest one
/// when the ranking ties.
fn pick_first_max(
    candidates: &[&Candidate],
    compare: fn(&Candidate, &Candidate) -> Ordering,
) -> usize {
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if compare(candidate, best) == Ordering::Greater {
            best = candidate;
        }
    }
    best.team_idx
}
