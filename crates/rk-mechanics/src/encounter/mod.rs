//! Encounter roster and recorded initiative.
//!
//! Only what a drawn initiative needs: who is in the fight and the value
//! each combatant rolled. Turn order is the caller's business.

use serde::{Deserialize, Serialize};

use crate::id::CombatantId;
use crate::store::{EncounterService, ServiceError};

/// A combatant in the encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Stable identifier.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Last recorded initiative, if any.
    pub initiative: Option<u32>,
}

/// An encounter kept in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryEncounter {
    /// Everyone in the encounter, in the order they joined.
    pub combatants: Vec<Combatant>,
}

impl InMemoryEncounter {
    /// An empty encounter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant with a fresh ID.
    pub fn add_combatant(&mut self, name: impl Into<String>) -> CombatantId {
        let id = CombatantId::new();
        self.enlist(id, name);
        id
    }

    /// Add a combatant under a known ID, e.g. one derived from a character.
    /// Re-enlisting an ID renames it and keeps its initiative.
    pub fn enlist(&mut self, id: CombatantId, name: impl Into<String>) {
        let name = name.into();
        match self.combatants.iter_mut().find(|c| c.id == id) {
            Some(existing) => existing.name = name,
            None => self.combatants.push(Combatant {
                id,
                name,
                initiative: None,
            }),
        }
    }

    /// Look up a combatant.
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// Recorded initiative for a combatant.
    pub fn initiative_of(&self, id: CombatantId) -> Option<u32> {
        self.combatant(id).and_then(|c| c.initiative)
    }

    /// Combatants ranked by recorded initiative, highest first. Combatants
    /// without a value come last, in joining order.
    pub fn ranked(&self) -> Vec<&Combatant> {
        let mut ranked: Vec<&Combatant> = self.combatants.iter().collect();
        ranked.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        ranked
    }

    /// Number of combatants.
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Returns true if nobody has joined.
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl EncounterService for InMemoryEncounter {
    fn contains(&self, combatant: CombatantId) -> bool {
        self.combatant(combatant).is_some()
    }

    fn record_initiative(&mut self, combatant: CombatantId, value: u32) -> Result<(), ServiceError> {
        let entry = self
            .combatants
            .iter_mut()
            .find(|c| c.id == combatant)
            .ok_or(ServiceError::CombatantNotFound(combatant))?;
        entry.initiative = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_and_ranking() {
        let mut enc = InMemoryEncounter::new();
        assert!(enc.is_empty());

        let alice = enc.add_combatant("Alice");
        let bob = enc.add_combatant("Bob");
        let charlie = enc.add_combatant("Charlie");
        assert_eq!(enc.len(), 3);

        enc.record_initiative(alice, 15).unwrap();
        enc.record_initiative(charlie, 20).unwrap();

        let names: Vec<&str> = enc.ranked().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Alice", "Bob"]);
        assert_eq!(enc.initiative_of(bob), None);
    }

    #[test]
    fn rerecording_overwrites() {
        let mut enc = InMemoryEncounter::new();
        let id = enc.add_combatant("Alice");
        enc.record_initiative(id, 3).unwrap();
        enc.record_initiative(id, 9).unwrap();
        assert_eq!(enc.initiative_of(id), Some(9));
    }

    #[test]
    fn unknown_combatant() {
        let mut enc = InMemoryEncounter::new();
        let stranger = CombatantId::new();
        assert!(!enc.contains(stranger));
        assert_eq!(
            enc.record_initiative(stranger, 4),
            Err(ServiceError::CombatantNotFound(stranger))
        );
    }

    #[test]
    fn enlist_is_idempotent() {
        let mut enc = InMemoryEncounter::new();
        let id = CombatantId::new();
        enc.enlist(id, "Ilva");
        enc.record_initiative(id, 7).unwrap();
        enc.enlist(id, "Ilva the Bold");
        assert_eq!(enc.len(), 1);
        assert_eq!(enc.combatant(id).unwrap().name, "Ilva the Bold");
        assert_eq!(enc.initiative_of(id), Some(7));
    }
}
