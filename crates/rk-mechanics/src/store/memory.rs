//! In-memory service implementations for tests and single-process hosts.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::service::{AdvancementTracker, CharacterService, ServiceError, VitalsPatch};
use crate::id::CharacterId;
use crate::sheet::Character;

/// Characters held in a map, with optional save failures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCharacters {
    characters: HashMap<CharacterId, Character>,
    failing_saves: usize,
    saves: usize,
}

impl InMemoryCharacters {
    /// An empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a character, returning its ID.
    pub fn insert(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        self.characters.insert(id, character);
        id
    }

    /// The stored version of a character.
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Make the next `count` saves fail.
    pub fn fail_next_saves(&mut self, count: usize) {
        self.failing_saves = count;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl FromIterator<Character> for InMemoryCharacters {
    fn from_iter<I: IntoIterator<Item = Character>>(iter: I) -> Self {
        let mut service = Self::new();
        for character in iter {
            service.insert(character);
        }
        service
    }
}

impl CharacterService for InMemoryCharacters {
    fn fetch_character_aggregate(&mut self, id: CharacterId) -> Result<Character, ServiceError> {
        self.characters
            .get(&id)
            .cloned()
            .ok_or(ServiceError::CharacterNotFound(id))
    }

    fn save_partial(
        &mut self,
        id: CharacterId,
        patch: &VitalsPatch,
    ) -> Result<Character, ServiceError> {
        let character = self
            .characters
            .get_mut(&id)
            .ok_or(ServiceError::CharacterNotFound(id))?;
        if self.failing_saves > 0 {
            self.failing_saves -= 1;
            return Err(ServiceError::Backend("service unavailable".to_string()));
        }
        patch.apply(&mut character.vitals);
        self.saves += 1;
        Ok(character.clone())
    }
}

/// Skills marked for advancement during this session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionAdvancements {
    marked: BTreeSet<(CharacterId, String)>,
}

impl SessionAdvancements {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skills marked for one character, in name order.
    pub fn skills_for(&self, character: CharacterId) -> impl Iterator<Item = &str> + '_ {
        self.marked
            .iter()
            .filter(move |(c, _)| *c == character)
            .map(|(_, skill)| skill.as_str())
    }

    /// Number of marks across all characters.
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    /// Returns true if nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

impl AdvancementTracker for SessionAdvancements {
    fn mark_eligible(&mut self, character: CharacterId, skill: &str) -> bool {
        self.marked.insert((character, skill.to_string()))
    }

    fn is_eligible(&self, character: CharacterId, skill: &str) -> bool {
        self.marked.contains(&(character, skill.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_unknown_character() {
        let mut service = InMemoryCharacters::new();
        let id = CharacterId::new();
        assert_eq!(
            service.fetch_character_aggregate(id),
            Err(ServiceError::CharacterNotFound(id))
        );
    }

    #[test]
    fn save_applies_patch() {
        let mut service = InMemoryCharacters::new();
        let id = service.insert(Character::new("Ilva", 12, 10));
        let saved = service
            .save_partial(
                id,
                &VitalsPatch {
                    current_hp: Some(5),
                    ..VitalsPatch::default()
                },
            )
            .unwrap();
        assert_eq!(saved.vitals.current_hp(), 5);
        assert_eq!(service.get(id).unwrap().vitals.current_hp(), 5);
        assert_eq!(service.save_count(), 1);
    }

    #[test]
    fn injected_failures_run_out() {
        let mut service = InMemoryCharacters::new();
        let id = service.insert(Character::new("Ilva", 12, 10));
        service.fail_next_saves(1);
        let patch = VitalsPatch {
            current_wp: Some(1),
            ..VitalsPatch::default()
        };
        assert!(matches!(
            service.save_partial(id, &patch),
            Err(ServiceError::Backend(_))
        ));
        assert_eq!(service.get(id).unwrap().vitals.current_wp(), 10);
        assert!(service.save_partial(id, &patch).is_ok());
        assert_eq!(service.get(id).unwrap().vitals.current_wp(), 1);
    }

    #[test]
    fn advancement_marks_are_per_character() {
        let mut marks = SessionAdvancements::new();
        let a = CharacterId::new();
        let b = CharacterId::new();
        assert!(marks.mark_eligible(a, "Swords"));
        assert!(!marks.mark_eligible(a, "Swords"));
        assert!(marks.mark_eligible(b, "Swords"));
        assert!(marks.is_eligible(a, "Swords"));
        assert!(!marks.is_eligible(a, "Bows"));
        assert_eq!(marks.len(), 2);
        assert_eq!(marks.skills_for(a).collect::<Vec<_>>(), vec!["Swords"]);
    }
}
