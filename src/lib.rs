pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{load_snapshot, HashEmbedding, Snapshot};
pub use config::FormationConfig;
pub use core::formation::{FormationOrchestrator, TeamRecommendation};
pub use domain::model::{FormationOutcome, FormedTeam, Participant, PhaseReport, Role, TeamDraft};
pub use domain::ports::{EmbeddingClient, TeamFit};
pub use utils::error::{FormationError, Result};
