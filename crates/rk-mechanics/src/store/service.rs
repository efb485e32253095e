//! Collaborator boundaries: where characters, encounters and advancement
//! marks actually live.

use serde::{Deserialize, Serialize};

use crate::id::{CharacterId, CombatantId};
use crate::sheet::{Character, CharacterVitals, Conditions};

/// Errors reported by an external service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service has no such character.
    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),

    /// The encounter has no such combatant.
    #[error("combatant {0} not found")]
    CombatantNotFound(CombatantId),

    /// The backend failed (I/O, network, rejected write).
    #[error("{0}")]
    Backend(String),
}

/// The vitals fields that changed, for a partial save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsPatch {
    /// New current HP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<i32>,
    /// New current WP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_wp: Option<i32>,
    /// The full new condition set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,
    /// New passed death-roll count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_rolls_passed: Option<u8>,
    /// New failed death-roll count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_rolls_failed: Option<u8>,
    /// New rallied flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rallied: Option<bool>,
}

impl VitalsPatch {
    /// The fields of `after` that differ from `before`.
    pub fn diff(before: &CharacterVitals, after: &CharacterVitals) -> Self {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        Self {
            current_hp: changed(&before.hp.current, &after.hp.current),
            current_wp: changed(&before.wp.current, &after.wp.current),
            conditions: changed(&before.conditions, &after.conditions),
            death_rolls_passed: changed(&before.death_rolls_passed, &after.death_rolls_passed),
            death_rolls_failed: changed(&before.death_rolls_failed, &after.death_rolls_failed),
            is_rallied: changed(&before.is_rallied, &after.is_rallied),
        }
    }

    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the changed fields into `vitals`, clamping to the tracks.
    pub fn apply(&self, vitals: &mut CharacterVitals) {
        if let Some(hp) = self.current_hp {
            vitals.hp.current = hp.clamp(0, vitals.hp.max);
        }
        if let Some(wp) = self.current_wp {
            vitals.wp.current = wp.clamp(0, vitals.wp.max);
        }
        if let Some(conditions) = &self.conditions {
            vitals.conditions = conditions.clone();
        }
        if let Some(passed) = self.death_rolls_passed {
            vitals.death_rolls_passed = passed;
        }
        if let Some(failed) = self.death_rolls_failed {
            vitals.death_rolls_failed = failed;
        }
        if let Some(rallied) = self.is_rallied {
            vitals.is_rallied = rallied;
        }
    }
}

/// Where characters are loaded from and saved to.
pub trait CharacterService {
    /// Load the full character.
    fn fetch_character_aggregate(&mut self, id: CharacterId) -> Result<Character, ServiceError>;

    /// Persist the changed vitals fields and return the saved character.
    fn save_partial(&mut self, id: CharacterId, patch: &VitalsPatch)
    -> Result<Character, ServiceError>;
}

/// The running encounter, as far as initiative is concerned.
pub trait EncounterService {
    /// Returns true if the combatant takes part in the encounter.
    fn contains(&self, combatant: CombatantId) -> bool;

    /// Store a drawn initiative value.
    fn record_initiative(&mut self, combatant: CombatantId, value: u32)
    -> Result<(), ServiceError>;
}

/// Session-scoped set of skills marked for advancement.
pub trait AdvancementTracker {
    /// Mark a skill. Returns true if it was not yet marked.
    fn mark_eligible(&mut self, character: CharacterId, skill: &str) -> bool;

    /// Returns true if the skill is marked.
    fn is_eligible(&self, character: CharacterId, skill: &str) -> bool;
}

impl<T: CharacterService + ?Sized> CharacterService for &mut T {
    fn fetch_character_aggregate(&mut self, id: CharacterId) -> Result<Character, ServiceError> {
        (**self).fetch_character_aggregate(id)
    }

    fn save_partial(
        &mut self,
        id: CharacterId,
        patch: &VitalsPatch,
    ) -> Result<Character, ServiceError> {
        (**self).save_partial(id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Condition;

    #[test]
    fn diff_of_identical_vitals_is_empty() {
        let v = CharacterVitals::new(10, 8);
        assert!(VitalsPatch::diff(&v, &v).is_empty());
    }

    #[test]
    fn diff_carries_only_changes() {
        let before = CharacterVitals::new(10, 8);
        let mut after = before.clone();
        after.hp.current = 4;
        after.conditions.set(Condition::Scared, true);
        let patch = VitalsPatch::diff(&before, &after);
        assert_eq!(patch.current_hp, Some(4));
        assert_eq!(patch.current_wp, None);
        assert!(patch.conditions.is_some());
        assert_eq!(patch.is_rallied, None);

        let mut replay = before.clone();
        patch.apply(&mut replay);
        assert_eq!(replay, after);
    }

    #[test]
    fn apply_clamps() {
        let mut v = CharacterVitals::new(10, 8);
        VitalsPatch {
            current_hp: Some(50),
            current_wp: Some(-3),
            ..VitalsPatch::default()
        }
        .apply(&mut v);
        assert_eq!(v.current_hp(), 10);
        assert_eq!(v.current_wp(), 0);
    }

    #[test]
    fn patch_json_skips_unchanged_fields() {
        let patch = VitalsPatch {
            current_wp: Some(7),
            ..VitalsPatch::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"current_wp":7}"#);
    }
}
