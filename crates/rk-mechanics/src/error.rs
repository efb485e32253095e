//! Error types for the resolution engine.

use crate::engine::PendingCommit;
use crate::id::{CharacterId, CombatantId};

/// Errors that can occur while resolving rolls or applying transitions.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// The request was malformed and was rejected before any dice were drawn.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operation is inconsistent with the character's current state.
    #[error("not allowed: {0}")]
    DomainViolation(String),

    /// A dice expression could not be parsed.
    #[error("invalid dice: {0}")]
    InvalidDice(String),

    /// The character service does not know this character.
    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),

    /// The encounter service does not know this combatant.
    #[error("combatant {0} not found")]
    CombatantNotFound(CombatantId),

    /// The character service could not be reached while loading.
    #[error("character service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Saving the resolved state failed; local state was reverted.
    #[error("failed to persist character {character}: {reason}")]
    PersistenceFailure {
        /// Character whose save failed.
        character: CharacterId,
        /// What the service reported.
        reason: String,
        /// The already-resolved commit, ready for [`crate::RollEngine::retry_commit`].
        pending: Box<PendingCommit>,
    },

    /// Configuration could not be read.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl MechError {
    /// Returns the pending commit of a persistence failure, if any.
    pub fn into_pending(self) -> Option<PendingCommit> {
        match self {
            Self::PersistenceFailure { pending, .. } => Some(*pending),
            _ => None,
        }
    }
}

/// Convenience result type for engine operations.
pub type MechResult<T> = Result<T, MechError>;
