//! Canonical character state and the services behind it.
//!
//! [`CharacterStore`] caches loaded aggregates, applies a delta as one
//! unit and asks the [`CharacterService`] to persist the changed fields.
//! A failed save puts the cached vitals back the way they were.

pub mod memory;
pub mod service;

pub use memory::{InMemoryCharacters, SessionAdvancements};
pub use service::{
    AdvancementTracker, CharacterService, EncounterService, ServiceError, VitalsPatch,
};

use std::collections::HashMap;

use tracing::warn;

use crate::effects::{Effect, VitalsDelta};
use crate::id::CharacterId;
use crate::sheet::{Character, CharacterVitals};

/// Vitals before and after a committed delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Vitals before the delta.
    pub before: CharacterVitals,
    /// Vitals as saved.
    pub after: CharacterVitals,
}

impl Transition {
    /// What changed, in reporting order.
    pub fn effects(&self) -> Vec<Effect> {
        Effect::diff(&self.before, &self.after)
    }
}

/// Loaded characters, backed by a character service.
#[derive(Debug)]
pub struct CharacterStore<C> {
    service: C,
    cache: HashMap<CharacterId, Character>,
}

impl<C: CharacterService> CharacterStore<C> {
    /// A store with nothing loaded.
    pub fn new(service: C) -> Self {
        Self {
            service,
            cache: HashMap::new(),
        }
    }

    /// The character, fetching it on first use.
    pub fn load(&mut self, id: CharacterId) -> Result<&Character, ServiceError> {
        if !self.cache.contains_key(&id) {
            let mut character = self.service.fetch_character_aggregate(id)?;
            character.vitals = character.vitals.normalized();
            self.cache.insert(id, character);
        }
        self.cache.get(&id).ok_or(ServiceError::CharacterNotFound(id))
    }

    /// Drop a cached character so the next load fetches it again.
    pub fn forget(&mut self, id: CharacterId) {
        self.cache.remove(&id);
    }

    /// Apply a delta to a loaded character and persist the change.
    ///
    /// The patch is computed from normalized vitals, so it never carries
    /// death-roll bookkeeping for a character above 0 HP. Nothing is saved
    /// when the delta changes nothing. On a failed save the cached vitals
    /// are restored and the service error is returned.
    pub fn commit(
        &mut self,
        id: CharacterId,
        delta: &VitalsDelta,
    ) -> Result<Transition, ServiceError> {
        let before = self.load(id)?.vitals.clone();
        let after = delta.apply(&before).normalized();
        let patch = VitalsPatch::diff(&before, &after);
        if patch.is_empty() {
            return Ok(Transition { before, after });
        }

        self.set_vitals(id, after);
        match self.service.save_partial(id, &patch) {
            Ok(mut saved) => {
                let normalized = saved.vitals.clone().normalized();
                if normalized != saved.vitals {
                    warn!(
                        character = %id,
                        saved = ?saved.vitals,
                        "service saved vitals outside their domains"
                    );
                }
                saved.vitals = normalized;
                let after = saved.vitals.clone();
                self.cache.insert(id, saved);
                Ok(Transition { before, after })
            }
            Err(err) => {
                self.set_vitals(id, before);
                Err(err)
            }
        }
    }

    /// The backing service.
    pub fn service(&self) -> &C {
        &self.service
    }

    /// Mutable access to the backing service.
    pub fn service_mut(&mut self) -> &mut C {
        &mut self.service
    }

    fn set_vitals(&mut self, id: CharacterId, vitals: CharacterVitals) {
        if let Some(character) = self.cache.get_mut(&id) {
            character.vitals = vitals;
        }
    }
}
