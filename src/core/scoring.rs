use crate::config::FormationConfig;
use crate::domain::model::Participant;
use crate::domain::ports::{EmbeddingClient, TeamFit};
use crate::utils::error::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Score returned when one side of a timezone comparison is unknown.
const NEUTRAL_TZ_SCORE: f64 = 0.5;

/// Computes pairwise compatibility between participants and composite fit
/// against a team's leadership. Timezone and category scoring are pure;
/// semantic scoring delegates to the injected embedding collaborator.
pub struct ScoringEngine {
    embeddings: Arc<dyn EmbeddingClient>,
    config: FormationConfig,
}

impl ScoringEngine {
    pub fn new(embeddings: Arc<dyn EmbeddingClient>, config: FormationConfig) -> Self {
        Self { embeddings, config }
    }

    /// Banded timezone compatibility over the absolute hour difference.
    /// An unknown offset on either side scores neutral rather than zero.
    pub fn tz_score(a: Option<f64>, b: Option<f64>) -> f64 {
        let (Some(a), Some(b)) = (a, b) else {
            return NEUTRAL_TZ_SCORE;
        };
        let diff = (a - b).abs();
        if diff <= 3.0 {
            1.0
        } else if diff <= 6.0 {
            0.7
        } else if diff <= 9.0 {
            0.4
        } else {
            0.1
        }
    }

    /// Category similarity weighted 60% for exact sub-category overlap and
    /// 40% for broader domain overlap.
    pub fn cat_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let domains_a = Self::domains(a);
        let domains_b = Self::domains(b);

        let sub_overlap =
            a.intersection(b).count() as f64 / a.len().min(b.len()) as f64;
        let dom_overlap = domains_a.intersection(&domains_b).count() as f64
            / domains_a.len().min(domains_b.len()) as f64;

        0.6 * sub_overlap + 0.4 * dom_overlap
    }

    fn domains(categories: &BTreeSet<String>) -> BTreeSet<&str> {
        categories
            .iter()
            .map(|c| c.split_once(':').map(|(domain, _)| domain).unwrap_or(c))
            .collect()
    }

    /// Reduces a raw similarity matrix to a scalar, rewarding strong matches:
    /// a flat bonus per near-perfect cell, plus a small capped bonus for
    /// mid-range cells. The result is clamped to 1.0.
    fn apply_similarity_bonuses(&self, matrix: &[Vec<f64>]) -> f64 {
        let cells = matrix.iter().map(|row| row.len()).sum::<usize>();
        if cells == 0 {
            return 0.0;
        }

        let mut sum = 0.0;
        let mut perfect_matches = 0usize;
        let mut mid_matches = 0usize;
        for row in matrix {
            for &value in row {
                sum += value;
                if value >= self.config.perfect_match_threshold {
                    perfect_matches += 1;
                } else if value >= self.config.mid_match_threshold_low
                    && value <= self.config.mid_match_threshold_high
                {
                    mid_matches += 1;
                }
            }
        }

        let base = sum / cells as f64;
        let mut bonus = perfect_matches as f64 * self.config.perfect_match_bonus;
        bonus += (mid_matches as f64 * self.config.mid_match_bonus_increment)
            .min(self.config.mid_match_bonus_cap);

        (base + bonus).min(1.0)
    }

    /// Semantic compatibility from the goals and habits of two participants.
    /// Goals and habits produce separate matrices, each bonus-adjusted, then
    /// averaged with equal weight; a list empty on either side contributes
    /// nothing, and no signal at all scores 0.0.
    pub async fn semantic_score(&self, a: &Participant, b: &Participant) -> Result<f64> {
        let mut scores = Vec::with_capacity(2);

        if !a.goals.is_empty() && !b.goals.is_empty() {
            let matrix = self.embeddings.compare(&a.goals, &b.goals).await?;
            scores.push(self.apply_similarity_bonuses(&matrix));
        }
        if !a.habits.is_empty() && !b.habits.is_empty() {
            let matrix = self.embeddings.compare(&a.habits, &b.habits).await?;
            scores.push(self.apply_similarity_bonuses(&matrix));
        }

        if scores.is_empty() {
            return Ok(0.0);
        }
        Ok(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// Fit of one participant against a team's leaders: the best score per
    /// metric across leaders. A participant fits a team if it fits at least
    /// one of its leaders well.
    pub fn fit(&self, participant: &Participant, leaders: &[&Participant]) -> TeamFit {
        let mut fit = TeamFit {
            tz_score: 0.0,
            cat_score: 0.0,
        };
        for leader in leaders {
            fit.tz_score = fit.tz_score.max(Self::tz_score(
                participant.timezone_offset,
                leader.timezone_offset,
            ));
            fit.cat_score = fit
                .cat_score
                .max(Self::cat_score(&participant.categories, &leader.categories));
        }
        fit
    }
}
