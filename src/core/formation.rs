use crate::config::FormationConfig;
use crate::core::category::cluster_by_category;
use crate::core::cohesion::optimize_teams;
use crate::core::reassign::reassign_orphans;
use crate::core::scoring::ScoringEngine;
use crate::core::timezone::cluster_by_timezone;
use crate::domain::model::{FormationOutcome, Participant, PhaseReport, TeamDraft};
use crate::domain::ports::EmbeddingClient;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::Serialize;
use std::sync::Arc;

/// Sequences the four formation phases over one participant snapshot.
///
/// The orchestrator owns no state beyond its configuration and the injected
/// embedding client, so a run is idempotent given identical input and
/// identical embedding responses. Assignment in phases 2 and 4 is greedy and
/// non-backtracking; bounded latency is preferred over a globally optimal
/// matching.
pub struct FormationOrchestrator {
    scorer: ScoringEngine,
    config: FormationConfig,
}

/// One ranked entry produced by [`FormationOrchestrator::recommend_teams`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecommendation {
    pub team_name: String,
    pub tz_score: f64,
    pub cat_score: f64,
    pub size: usize,
}

impl FormationOrchestrator {
    /// Malformed configuration is the one fatal condition and is rejected
    /// here, before any phase can run.
    pub fn new(embeddings: Arc<dyn EmbeddingClient>, config: FormationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: ScoringEngine::new(embeddings, config.clone()),
            config,
        })
    }

    /// Runs phases 1 through 4 and returns the final team set, the residual
    /// unassigned list and per-phase counts.
    pub async fn form_teams(&self, pool: &[Participant]) -> Result<FormationOutcome> {
        if pool.is_empty() {
            return Ok(FormationOutcome::empty());
        }

        let leader_count = pool.iter().filter(|p| p.is_leader()).count();
        tracing::info!(
            "Starting team formation with {} leaders and {} members",
            leader_count,
            pool.len() - leader_count
        );

        let groups = cluster_by_timezone(pool);
        let timezone_groups = groups.len();

        let category = cluster_by_category(&groups, &self.config);
        let teams_seeded = category.teams.len();
        let category_orphans = category.orphans.len();

        let cohesion = optimize_teams(&self.scorer, category.teams, self.config.max_team_size).await;
        let cohesion_orphans = cohesion.orphans.len();

        let mut orphans = category.orphans;
        orphans.extend(cohesion.orphans);
        let reassigned = reassign_orphans(&self.scorer, orphans, cohesion.teams, &self.config);

        let outcome = FormationOutcome {
            teams: reassigned
                .teams
                .into_iter()
                .map(TeamDraft::into_formed)
                .collect(),
            unassigned: reassigned
                .unassigned
                .iter()
                .map(|p| p.id.clone())
                .collect(),
            report: PhaseReport {
                timezone_groups,
                teams_seeded,
                category_orphans,
                cohesion_orphans,
                reassigned: reassigned.reassigned,
                unassigned: reassigned.unassigned.len(),
            },
        };

        debug_assert_eq!(
            outcome.teams.iter().map(|t| t.size()).sum::<usize>() + outcome.unassigned.len(),
            pool.len(),
            "every participant must end up in exactly one place"
        );

        tracing::info!(
            "Team formation complete: {} teams, {} unassigned",
            outcome.teams.len(),
            outcome.unassigned.len()
        );
        Ok(outcome)
    }

    /// Ranks existing teams with spare capacity for a single candidate, best
    /// first: timezone fit, then category fit, then the smaller team.
    pub fn recommend_teams(
        &self,
        candidate: &Participant,
        teams: &[TeamDraft<'_>],
    ) -> Vec<TeamRecommendation> {
        let mut recommendations: Vec<TeamRecommendation> = teams
            .iter()
            .filter(|team| team.size() < self.config.max_team_size && !team.leaders.is_empty())
            .map(|team| {
                let fit = self.scorer.fit(candidate, &team.leaders);
                TeamRecommendation {
                    team_name: team.name.clone(),
                    tz_score: fit.tz_score,
                    cat_score: fit.cat_score,
                    size: team.size(),
                }
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.tz_score
                .total_cmp(&a.tz_score)
                .then(b.cat_score.total_cmp(&a.cat_score))
                .then(a.size.cmp(&b.size))
        });
        recommendations
    }
}
