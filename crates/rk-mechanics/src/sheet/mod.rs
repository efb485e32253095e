//! Character aggregates and the vitals the engine mutates.
//!
//! The character service owns the [`Character`] aggregate. The engine only
//! ever changes its [`CharacterVitals`].

pub mod condition;
pub mod track;

pub use condition::{Condition, Conditions};
pub use track::Track;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::CharacterId;

/// Death rolls needed on either side to end a dying episode.
pub const MAX_DEATH_ROLLS: u8 = 3;

/// Where a character stands between life and death, derived from vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    /// Above zero HP.
    Alive,
    /// At zero HP and making death rolls.
    Dying,
    /// At zero HP with three passed death rolls; waiting to recover.
    Stabilized,
    /// Three failed death rolls.
    Deceased,
}

impl std::fmt::Display for LifeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alive => write!(f, "Alive"),
            Self::Dying => write!(f, "Dying"),
            Self::Stabilized => write!(f, "Stabilized"),
            Self::Deceased => write!(f, "Deceased"),
        }
    }
}

/// HP, WP, conditions, and death-roll bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterVitals {
    /// Hit points.
    pub hp: Track,
    /// Willpower points.
    pub wp: Track,
    /// Active conditions.
    #[serde(default)]
    pub conditions: Conditions,
    /// Death rolls passed in the current dying episode.
    #[serde(default)]
    pub death_rolls_passed: u8,
    /// Death rolls failed in the current dying episode.
    #[serde(default)]
    pub death_rolls_failed: u8,
    /// Whether the character has rallied while at zero HP.
    #[serde(default)]
    pub is_rallied: bool,
}

impl CharacterVitals {
    /// Full HP and WP, no conditions.
    pub fn new(max_hp: i32, max_wp: i32) -> Self {
        Self {
            hp: Track::new(max_hp),
            wp: Track::new(max_wp),
            conditions: Conditions::new(),
            death_rolls_passed: 0,
            death_rolls_failed: 0,
            is_rallied: false,
        }
    }

    /// Current hit points.
    pub fn current_hp(&self) -> i32 {
        self.hp.current
    }

    /// Maximum hit points.
    pub fn max_hp(&self) -> i32 {
        self.hp.max
    }

    /// Current willpower points.
    pub fn current_wp(&self) -> i32 {
        self.wp.current
    }

    /// Maximum willpower points.
    pub fn max_wp(&self) -> i32 {
        self.wp.max
    }

    /// Derive the life state.
    pub fn life_state(&self) -> LifeState {
        if self.hp.current > 0 {
            LifeState::Alive
        } else if self.death_rolls_failed >= MAX_DEATH_ROLLS {
            LifeState::Deceased
        } else if self.death_rolls_passed >= MAX_DEATH_ROLLS {
            LifeState::Stabilized
        } else {
            LifeState::Dying
        }
    }

    /// Bring loaded vitals back inside their domains.
    ///
    /// Death-roll bookkeeping only exists at zero HP, so it is dropped for
    /// a character who is up.
    pub fn normalized(mut self) -> Self {
        self.hp = Track::with_current(self.hp.current, self.hp.max);
        self.wp = Track::with_current(self.wp.current, self.wp.max);
        self.death_rolls_passed = self.death_rolls_passed.min(MAX_DEATH_ROLLS);
        self.death_rolls_failed = self.death_rolls_failed.min(MAX_DEATH_ROLLS);
        if self.hp.current > 0 {
            self.death_rolls_passed = 0;
            self.death_rolls_failed = 0;
            self.is_rallied = false;
        }
        self
    }

    /// Returns true if every field is inside its domain.
    pub fn is_consistent(&self) -> bool {
        (0..=self.hp.max).contains(&self.hp.current)
            && (0..=self.wp.max).contains(&self.wp.current)
            && self.death_rolls_passed <= MAX_DEATH_ROLLS
            && self.death_rolls_failed <= MAX_DEATH_ROLLS
            && !(self.death_rolls_passed == MAX_DEATH_ROLLS
                && self.death_rolls_failed == MAX_DEATH_ROLLS)
    }
}

/// A character as stored by the character service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Stable identifier.
    pub id: CharacterId,
    /// Character name.
    pub name: String,
    /// The part of the sheet the engine mutates.
    pub vitals: CharacterVitals,
    /// Skill levels by name.
    #[serde(default)]
    pub skills: BTreeMap<String, u32>,
}

impl Character {
    /// A fresh character at full HP and WP.
    pub fn new(name: impl Into<String>, max_hp: i32, max_wp: i32) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            vitals: CharacterVitals::new(max_hp, max_wp),
            skills: BTreeMap::new(),
        }
    }

    /// Add or replace a skill level.
    pub fn with_skill(mut self, name: impl Into<String>, level: u32) -> Self {
        self.skills.insert(name.into(), level);
        self
    }

    /// Look up a skill level case-insensitively, returning the canonical
    /// name and level.
    pub fn skill(&self, name: &str) -> Option<(&str, u32)> {
        let lower = name.to_lowercase();
        self.skills
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
            .map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_zero(passed: u8, failed: u8) -> CharacterVitals {
        let mut v = CharacterVitals::new(14, 10);
        v.hp.current = 0;
        v.death_rolls_passed = passed;
        v.death_rolls_failed = failed;
        v
    }

    #[test]
    fn life_states() {
        assert_eq!(CharacterVitals::new(10, 10).life_state(), LifeState::Alive);
        assert_eq!(at_zero(2, 1).life_state(), LifeState::Dying);
        assert_eq!(at_zero(3, 1).life_state(), LifeState::Stabilized);
        assert_eq!(at_zero(1, 3).life_state(), LifeState::Deceased);
    }

    #[test]
    fn normalized_clamps_everything() {
        let mut v = CharacterVitals::new(10, 8);
        v.hp.current = 25;
        v.wp.current = -4;
        let v = v.normalized();
        assert_eq!(v.current_hp(), 10);
        assert_eq!(v.current_wp(), 0);
        assert!(v.is_consistent());

        let v = at_zero(7, 9).normalized();
        assert_eq!(v.death_rolls_passed, 3);
        assert_eq!(v.death_rolls_failed, 3);
    }

    #[test]
    fn normalized_drops_death_rolls_when_up() {
        let mut v = at_zero(2, 2);
        v.hp.current = 4;
        v.is_rallied = true;
        let v = v.normalized();
        assert_eq!(v.death_rolls_passed, 0);
        assert_eq!(v.death_rolls_failed, 0);
        assert!(!v.is_rallied);
    }

    #[test]
    fn skill_lookup_is_case_insensitive() {
        let c = Character::new("Ylva", 12, 10).with_skill("Awareness", 11);
        assert_eq!(c.skill("awareness"), Some(("Awareness", 11)));
        assert_eq!(c.skill("Bows"), None);
    }

    #[test]
    fn vitals_deserialize_with_defaults() {
        let json = r#"{"hp":{"current":5,"max":12},"wp":{"current":3,"max":9}}"#;
        let v: CharacterVitals = serde_json::from_str(json).unwrap();
        assert_eq!(v.current_hp(), 5);
        assert!(v.conditions.is_empty());
        assert_eq!(v.death_rolls_passed, 0);
    }
}
