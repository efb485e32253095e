//! The roll engine: draw, classify, dispatch, apply, persist.
//!
//! Every operation runs as one uninterruptible unit on `&mut self`. Invalid
//! requests and domain violations are rejected before any die is drawn.
//! Once dice are drawn the roll is recorded in the history whatever happens
//! to persistence; a failed save rolls the character back and hands the
//! caller a [`PendingCommit`] to retry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::dice::{DiceRoller, RandomRoller};
use crate::effects::{
    self, DirectTransition, Effect, SideEffect, VitalsDelta, check_preconditions,
};
use crate::encounter::InMemoryEncounter;
use crate::error::{MechError, MechResult};
use crate::history::{RollHistory, RollHistoryEntry};
use crate::id::CharacterId;
use crate::resolution::{RollMode, RollOutcome, RollRequest, interpret};
use crate::sheet::{Character, CharacterVitals};
use crate::store::{
    AdvancementTracker, CharacterService, CharacterStore, EncounterService, ServiceError,
    SessionAdvancements,
};

/// A resolved change that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCommit {
    /// The character the change belongs to.
    pub character: CharacterId,
    /// The mode of the roll that produced the change. `None` for direct
    /// transitions.
    pub mode: Option<RollMode>,
    /// The roll that produced the change, if any.
    pub outcome: Option<RollOutcome>,
    /// Vitals the change was resolved against.
    pub before: CharacterVitals,
    /// The combined vitals change.
    pub delta: VitalsDelta,
    /// Collaborator changes still to apply.
    pub side_effects: Vec<SideEffect>,
}

/// What a roll or transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollReport {
    /// The character affected.
    pub character: CharacterId,
    /// The classified roll. `None` for direct transitions.
    pub outcome: Option<RollOutcome>,
    /// Everything that changed, in order.
    pub effects: Vec<Effect>,
    /// Vitals after the change.
    pub vitals: CharacterVitals,
}

impl RollReport {
    /// Returns true if the character stabilized, died or came back up.
    pub fn changed_life_state(&self) -> bool {
        self.effects.iter().any(Effect::is_life_transition)
    }
}

/// Resolves rolls and transitions for characters behind a character service.
#[derive(Debug)]
pub struct RollEngine<C, E = InMemoryEncounter, R = RandomRoller, A = SessionAdvancements> {
    config: EngineConfig,
    store: CharacterStore<C>,
    encounter: E,
    roller: R,
    advancements: A,
    history: RollHistory,
}

impl<C: CharacterService> RollEngine<C> {
    /// An engine with an empty encounter, a random roller seeded from the
    /// config and a fresh advancement set.
    pub fn new(characters: C, config: EngineConfig) -> Self {
        let roller = RandomRoller::new(config.seed);
        Self::with_parts(
            characters,
            InMemoryEncounter::new(),
            roller,
            SessionAdvancements::new(),
            config,
        )
    }
}

impl<C, E, R, A> RollEngine<C, E, R, A>
where
    C: CharacterService,
    E: EncounterService,
    R: DiceRoller,
    A: AdvancementTracker,
{
    /// An engine over explicit collaborators.
    pub fn with_parts(
        characters: C,
        encounter: E,
        roller: R,
        advancements: A,
        config: EngineConfig,
    ) -> Self {
        let history = RollHistory::new(config.history_capacity);
        Self {
            config,
            store: CharacterStore::new(characters),
            encounter,
            roller,
            advancements,
            history,
        }
    }

    /// Swap the dice source.
    pub fn with_roller<R2: DiceRoller>(self, roller: R2) -> RollEngine<C, E, R2, A> {
        RollEngine {
            config: self.config,
            store: self.store,
            encounter: self.encounter,
            roller,
            advancements: self.advancements,
            history: self.history,
        }
    }

    /// Swap the encounter.
    pub fn with_encounter<E2: EncounterService>(self, encounter: E2) -> RollEngine<C, E2, R, A> {
        RollEngine {
            config: self.config,
            store: self.store,
            encounter,
            roller: self.roller,
            advancements: self.advancements,
            history: self.history,
        }
    }

    /// Draw and resolve a roll for a character.
    pub fn request_roll(
        &mut self,
        character: CharacterId,
        request: RollRequest,
    ) -> MechResult<RollReport> {
        request.validate()?;
        let vitals = self.load(character)?.vitals.clone();
        check_preconditions(request.mode, &vitals)?;
        let stranger = request
            .combatant_id
            .filter(|c| request.mode == RollMode::Initiative && !self.encounter.contains(*c));
        if let Some(combatant) = stranger {
            return Err(MechError::CombatantNotFound(combatant));
        }

        let raw = self.roller.roll(&request.dice_pool);
        debug!(
            %character,
            mode = %request.mode,
            pool = %request.dice_pool,
            raw = %raw,
            "dice drawn"
        );
        let mut outcome = interpret(&request, raw, &mut self.roller);
        let dispatch = effects::dispatch(&request, &mut outcome, &vitals, &mut self.roller);
        debug!(%character, outcome = %outcome, "roll classified");
        let mode = request.mode;

        self.history
            .append(RollHistoryEntry::new(character, request, outcome.clone()));

        self.commit(PendingCommit {
            character,
            mode: Some(mode),
            outcome: Some(outcome),
            before: vitals,
            delta: dispatch.delta,
            side_effects: dispatch.side_effects,
        })
    }

    /// Like [`request_roll`](Self::request_roll), calling `notify` once the
    /// result is persisted. `notify` is not called on failure.
    pub fn request_roll_then(
        &mut self,
        character: CharacterId,
        request: RollRequest,
        notify: impl FnOnce(&RollReport),
    ) -> MechResult<RollReport> {
        let report = self.request_roll(character, request)?;
        notify(&report);
        Ok(report)
    }

    /// Apply a dice-free change.
    pub fn apply_direct_transition(
        &mut self,
        character: CharacterId,
        transition: DirectTransition,
    ) -> MechResult<RollReport> {
        let vitals = self.load(character)?.vitals.clone();
        let delta = transition.to_delta(&vitals)?;
        debug!(%character, ?transition, "direct transition");
        self.commit(PendingCommit {
            character,
            mode: None,
            outcome: None,
            before: vitals,
            delta,
            side_effects: Vec::new(),
        })
    }

    /// Try again to persist a change whose save failed.
    ///
    /// The delta is re-applied to the character's current vitals. If those
    /// changed since the change was resolved, a roll must still be allowed
    /// in the new state and a direct transition is refused.
    pub fn retry_commit(&mut self, pending: PendingCommit) -> MechResult<RollReport> {
        let current = self.load(pending.character)?.vitals.clone();
        if current != pending.before {
            match pending.mode {
                Some(mode) => check_preconditions(mode, &current)?,
                None => {
                    return Err(MechError::DomainViolation(
                        "the character changed since this transition; apply it again".into(),
                    ));
                }
            }
            debug!(character = %pending.character, "retrying against changed vitals");
        }
        self.commit(pending)
    }

    /// Current vitals of a character.
    pub fn vitals(&mut self, character: CharacterId) -> MechResult<CharacterVitals> {
        Ok(self.load(character)?.vitals.clone())
    }

    /// The full character as the engine last saw it.
    pub fn character(&mut self, character: CharacterId) -> MechResult<&Character> {
        self.load(character)
    }

    /// Recently resolved rolls.
    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    /// Forget every resolved roll.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Skills marked for advancement.
    pub fn advancements(&self) -> &A {
        &self.advancements
    }

    /// The encounter initiative is recorded in.
    pub fn encounter(&self) -> &E {
        &self.encounter
    }

    /// Mutable access to the encounter, e.g. to add combatants.
    pub fn encounter_mut(&mut self) -> &mut E {
        &mut self.encounter
    }

    /// The character service.
    pub fn characters(&self) -> &C {
        self.store.service()
    }

    /// Mutable access to the character service.
    pub fn characters_mut(&mut self) -> &mut C {
        self.store.service_mut()
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn load(&mut self, character: CharacterId) -> MechResult<&Character> {
        self.store.load(character).map_err(|err| match err {
            ServiceError::CharacterNotFound(id) => MechError::CharacterNotFound(id),
            ServiceError::CombatantNotFound(id) => MechError::CombatantNotFound(id),
            ServiceError::Backend(reason) => MechError::ServiceUnavailable(reason),
        })
    }

    fn commit(&mut self, mut pending: PendingCommit) -> MechResult<RollReport> {
        let character = pending.character;
        let transition = match self.store.commit(character, &pending.delta) {
            Ok(t) => t,
            Err(ServiceError::CharacterNotFound(id)) => {
                return Err(MechError::CharacterNotFound(id));
            }
            Err(err) => {
                warn!(%character, error = %err, "save failed, rolled back");
                return Err(persistence_failure(err, pending));
            }
        };
        pending.delta = VitalsDelta::none();
        pending.before = transition.after.clone();

        let mut effects = transition.effects();
        for effect in effects.iter().filter(|e| e.is_life_transition()) {
            info!(%character, %effect, "life state changed");
        }

        while !pending.side_effects.is_empty() {
            match pending.side_effects.remove(0) {
                SideEffect::MarkAdvancement { skill } => {
                    self.advancements.mark_eligible(character, &skill);
                    effects.push(Effect::AdvancementMarked { skill });
                }
                SideEffect::SkillImproved { skill } => {
                    effects.push(Effect::SkillImproved { skill });
                }
                SideEffect::RecordInitiative { combatant, value } => {
                    match self.encounter.record_initiative(combatant, value) {
                        Ok(()) => effects.push(Effect::InitiativeRecorded { combatant, value }),
                        Err(ServiceError::CombatantNotFound(id)) => {
                            return Err(MechError::CombatantNotFound(id));
                        }
                        Err(err) => {
                            warn!(%character, error = %err, "initiative not recorded");
                            pending
                                .side_effects
                                .insert(0, SideEffect::RecordInitiative { combatant, value });
                            return Err(persistence_failure(err, pending));
                        }
                    }
                }
            }
        }

        Ok(RollReport {
            character,
            outcome: pending.outcome,
            effects,
            vitals: transition.after,
        })
    }
}

fn persistence_failure(err: ServiceError, pending: PendingCommit) -> MechError {
    MechError::PersistenceFailure {
        character: pending.character,
        reason: err.to_string(),
        pending: Box::new(pending),
    }
}
