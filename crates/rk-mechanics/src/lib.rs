//! Dice roll and rules resolution engine for a tabletop character sheet.
//!
//! Turns a [`RollRequest`] into a classified [`RollOutcome`] (final value,
//! success, Dragon/Demon critical) and applies it to a character as one
//! clamped state change: HP/WP, conditions, death rolls, rallying, rests,
//! initiative and advancement marks. [`RollEngine`] ties the pieces
//! together behind the [`CharacterService`], [`EncounterService`] and
//! [`AdvancementTracker`] seams.

pub mod config;
pub mod dice;
pub mod effects;
pub mod encounter;
pub mod engine;
pub mod error;
pub mod history;
pub mod id;
pub mod resolution;
pub mod sheet;
pub mod store;

pub use config::EngineConfig;
pub use dice::{DicePool, DiceRoller, Die, DieResult, RandomRoller, RollResult, ScriptedRoller};
pub use effects::{DirectTransition, Effect, VitalsDelta};
pub use encounter::InMemoryEncounter;
pub use engine::{PendingCommit, RollEngine, RollReport};
pub use error::{MechError, MechResult};
pub use history::{RollHistory, RollHistoryEntry};
pub use id::{CharacterId, CombatantId};
pub use resolution::{Critical, Modifier, RestKind, RollMode, RollOutcome, RollRequest};
pub use sheet::{Character, CharacterVitals, Condition, Conditions, LifeState, Track};
pub use store::{
    AdvancementTracker, CharacterService, EncounterService, InMemoryCharacters, ServiceError,
    SessionAdvancements, VitalsPatch,
};
