//! Dice pool construction and parsing.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Die;
use crate::error::MechError;

/// Largest number of dice a single expression term may request.
const MAX_TERM_COUNT: u32 = 100;

/// An ordered collection of dice to be rolled together.
///
/// Order never changes the outcome; it is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    /// The dice in this pool.
    pub dice: Vec<Die>,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self { dice: Vec::new() }
    }

    /// A pool holding exactly one die.
    pub fn single(die: Die) -> Self {
        Self { dice: vec![die] }
    }

    /// Add `count` dice of the given type.
    pub fn add(mut self, die: Die, count: u32) -> Self {
        for _ in 0..count {
            self.dice.push(die);
        }
        self
    }

    /// Returns how many dice are in the pool.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Returns true if the pool is exactly one d20, the only shape that
    /// takes boons, banes, and criticals.
    pub fn is_single_d20(&self) -> bool {
        self.dice.as_slice() == [Die::D20]
    }

    /// Returns true if every die in the pool is of the given type.
    pub fn is_all(&self, die: Die) -> bool {
        !self.dice.is_empty() && self.dice.iter().all(|d| *d == die)
    }
}

impl FromStr for DicePool {
    type Err = MechError;

    /// Parse expressions like `d20`, `2d6`, `d20+d6`, or `1d8, 1d4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pool = DicePool::new();
        let terms = s
            .split(|c: char| c == '+' || c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty());

        for term in terms {
            let lower = term.to_lowercase();
            let Some((count, sides)) = lower.split_once('d') else {
                return Err(MechError::InvalidDice(format!("'{term}' is not a die")));
            };
            let count = if count.is_empty() {
                1
            } else {
                count
                    .parse::<u32>()
                    .map_err(|_| MechError::InvalidDice(format!("bad count in '{term}'")))?
            };
            if count == 0 || count > MAX_TERM_COUNT {
                return Err(MechError::InvalidDice(format!(
                    "count in '{term}' must be 1-{MAX_TERM_COUNT}"
                )));
            }
            let die = sides
                .parse::<u32>()
                .ok()
                .and_then(Die::from_sides)
                .ok_or_else(|| MechError::InvalidDice(format!("unsupported die in '{term}'")))?;
            pool = pool.add(die, count);
        }

        if pool.is_empty() {
            return Err(MechError::InvalidDice("no dice given".to_string()));
        }
        Ok(pool)
    }
}

impl std::fmt::Display for DicePool {
    /// Groups runs of the same die, e.g. `2d6+d4`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut groups: Vec<(Die, u32)> = Vec::new();
        for die in &self.dice {
            match groups.last_mut() {
                Some((last, n)) if last == die => *n += 1,
                _ => groups.push((*die, 1)),
            }
        }
        let parts: Vec<String> = groups
            .iter()
            .map(|(die, n)| {
                if *n == 1 {
                    die.to_string()
                } else {
                    format!("{n}{die}")
                }
            })
            .collect();
        write!(f, "{}", parts.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool() {
        let pool = DicePool::new();
        assert_eq!(pool.count(), 0);
        assert!(pool.is_empty());
        assert!(!pool.is_single_d20());
    }

    #[test]
    fn add_dice() {
        let pool = DicePool::new().add(Die::D20, 2).add(Die::D6, 3);
        assert_eq!(pool.count(), 5);
        assert!(!pool.is_empty());
    }

    #[test]
    fn single_d20_shape() {
        assert!(DicePool::single(Die::D20).is_single_d20());
        assert!(!DicePool::new().add(Die::D20, 2).is_single_d20());
        assert!(!DicePool::single(Die::D20).add(Die::D6, 1).is_single_d20());
        assert!(!DicePool::single(Die::D12).is_single_d20());
    }

    #[test]
    fn parse_expressions() {
        assert_eq!("d20".parse::<DicePool>().unwrap(), DicePool::single(Die::D20));
        assert_eq!(
            "2d6".parse::<DicePool>().unwrap(),
            DicePool::new().add(Die::D6, 2)
        );
        assert_eq!(
            "d20 + D6".parse::<DicePool>().unwrap(),
            DicePool::single(Die::D20).add(Die::D6, 1)
        );
        assert_eq!(
            "1d8,1d4".parse::<DicePool>().unwrap(),
            DicePool::single(Die::D8).add(Die::D4, 1)
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("".parse::<DicePool>().is_err());
        assert!("d7".parse::<DicePool>().is_err());
        assert!("0d6".parse::<DicePool>().is_err());
        assert!("xd6".parse::<DicePool>().is_err());
        assert!("six".parse::<DicePool>().is_err());
        assert!("101d6".parse::<DicePool>().is_err());
    }

    #[test]
    fn display_groups_runs() {
        let pool = DicePool::new().add(Die::D6, 2).add(Die::D4, 1);
        assert_eq!(pool.to_string(), "2d6+d4");
        assert_eq!(DicePool::single(Die::D20).to_string(), "d20");
    }
}
