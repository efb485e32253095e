//! Dice types, pools, rolling, and dice sources.
//!
//! The sheet only knows the six standard polyhedral dice. A [`DiceRoller`]
//! turns a [`DicePool`] into a [`RollResult`]; the engine never touches an
//! RNG directly.

pub mod pool;
pub mod roll;
pub mod roller;

pub use pool::DicePool;
pub use roll::{DieResult, RollResult};
pub use roller::{DiceRoller, RandomRoller, ScriptedRoller};

use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
}

impl Die {
    /// Every supported die, smallest first.
    pub const ALL: [Die; 6] = [Die::D4, Die::D6, Die::D8, Die::D10, Die::D12, Die::D20];

    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// Look up the die with the given number of sides.
    pub fn from_sides(sides: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.sides() == sides)
    }

    /// Parse a die from a string like "d20" or "D6".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let sides = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::from_sides(sides)
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}
