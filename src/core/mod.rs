pub mod category;
pub mod cohesion;
pub mod formation;
pub mod reassign;
pub mod scoring;
pub mod timezone;

pub use crate::domain::model::{FormationOutcome, FormedTeam, Participant, PhaseReport, TeamDraft};
pub use crate::domain::ports::{EmbeddingClient, TeamFit};
pub use crate::utils::error::Result;
