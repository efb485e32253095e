//! Conditions a character can suffer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named condition, declared in the order rests clear them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Strength condition.
    Exhausted,
    /// Constitution condition.
    Sickly,
    /// Agility condition.
    Dazed,
    /// Intelligence condition.
    Angry,
    /// Willpower condition.
    Scared,
    /// Charisma condition.
    Disheartened,
}

impl Condition {
    /// Every condition, in clearing order.
    pub const ALL: [Condition; 6] = [
        Condition::Exhausted,
        Condition::Sickly,
        Condition::Dazed,
        Condition::Angry,
        Condition::Scared,
        Condition::Disheartened,
    ];

    /// Parse a condition name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().to_lowercase() == lower)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Exhausted => "Exhausted",
            Self::Sickly => "Sickly",
            Self::Dazed => "Dazed",
            Self::Angry => "Angry",
            Self::Scared => "Scared",
            Self::Disheartened => "Disheartened",
        };
        write!(f, "{name}")
    }
}

/// The set of currently active conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(BTreeSet<Condition>);

impl Conditions {
    /// No active conditions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the condition is active.
    pub fn is_active(&self, condition: Condition) -> bool {
        self.0.contains(&condition)
    }

    /// Turn a condition on or off. Returns true if anything changed.
    pub fn set(&mut self, condition: Condition, active: bool) -> bool {
        if active {
            self.0.insert(condition)
        } else {
            self.0.remove(&condition)
        }
    }

    /// Flip a condition. Returns its new state.
    pub fn toggle(&mut self, condition: Condition) -> bool {
        let active = !self.is_active(condition);
        self.set(condition, active);
        active
    }

    /// The first active condition in clearing order.
    pub fn first_active(&self) -> Option<Condition> {
        self.0.iter().next().copied()
    }

    /// Clear every condition.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Active conditions in clearing order.
    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        self.0.iter().copied()
    }

    /// Number of active conditions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no condition is active.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
