use crate::domain::model::{Participant, Role};
use crate::domain::ports::EmbeddingClient;
use crate::utils::error::{FormationError, Result};
use crate::utils::timezone::parse_utc_offset;
use crate::utils::validation::validate_non_empty_string;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Deterministic local embedding client.
///
/// Embeds each string as a bag of FNV-hashed tokens folded into a fixed
/// number of buckets and compares with cosine similarity. Identical strings
/// score 1.0; unrelated strings score near 0. Far weaker than a sentence
/// model, but stable across runs, which the formation tests rely on.
pub struct HashEmbedding {
    buckets: usize,
}

impl HashEmbedding {
    pub fn new(buckets: usize) -> Self {
        Self { buckets }
    }

    fn embed(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.buckets];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[fnv1a(token) as usize % self.buckets] += 1.0;
        }
        vector
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingClient for HashEmbedding {
    async fn compare(&self, a: &[String], b: &[String]) -> Result<Vec<Vec<f64>>> {
        let rows: Vec<Vec<f64>> = a.iter().map(|text| self.embed(text)).collect();
        let cols: Vec<Vec<f64>> = b.iter().map(|text| self.embed(text)).collect();

        Ok(rows
            .iter()
            .map(|row| cols.iter().map(|col| cosine(row, col)).collect())
            .collect())
    }
}

fn fnv1a(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x1000_0000_01b3);
    }
    hash
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// One profile entry of a participant snapshot, with the timezone still in
/// its raw textual form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEntry {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub habits: Vec<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

/// A snapshot of the unassigned pool as handed over by the surrounding
/// platform layer: designated leaders plus everyone else.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub leaders: Vec<ProfileEntry>,
    #[serde(default)]
    pub members: Vec<ProfileEntry>,
}

impl Snapshot {
    /// Resolves raw timezones and fixes roles, yielding the immutable pool
    /// the orchestrator consumes. Leaders come first, in snapshot order.
    pub fn into_pool(self) -> Result<Vec<Participant>> {
        let mut pool = Vec::with_capacity(self.leaders.len() + self.members.len());
        for (entries, role) in [(self.leaders, Role::Leader), (self.members, Role::Member)] {
            for entry in entries {
                validate_non_empty_string("id", &entry.id)?;
                pool.push(Participant {
                    id: entry.id,
                    display_name: entry.display_name,
                    role,
                    timezone_offset: entry
                        .timezone
                        .as_deref()
                        .and_then(parse_utc_offset),
                    goals: entry.goals,
                    habits: entry.habits,
                    categories: entry.categories,
                });
            }
        }
        Ok(pool)
    }
}

/// Reads a JSON snapshot file and resolves it into a participant pool.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<Participant>> {
    let content = std::fs::read_to_string(&path).map_err(|e| FormationError::SnapshotError {
        message: format!("cannot read {}: {}", path.as_ref().display(), e),
    })?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    snapshot.into_pool()
}
