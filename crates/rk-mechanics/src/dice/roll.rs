//! Dice roll results and aggregation.

use serde::{Deserialize, Serialize};

use super::Die;

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// The value rolled (1 to die.sides()).
    pub value: u32,
}

impl DieResult {
    /// Pair a die with its face.
    pub fn new(die: Die, value: u32) -> Self {
        Self { die, value }
    }
}

/// The result of rolling an entire dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual die results, in pool order.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of all die values.
    pub fn total(&self) -> u32 {
        self.dice.iter().map(|d| d.value).sum()
    }

    /// The highest single die value, or 0 if empty.
    pub fn highest(&self) -> u32 {
        self.dice.iter().map(|d| d.value).max().unwrap_or(0)
    }

    /// The lowest single die value, or 0 if empty.
    pub fn lowest(&self) -> u32 {
        self.dice.iter().map(|d| d.value).min().unwrap_or(0)
    }

    /// The face values in pool order.
    pub fn values(&self) -> Vec<u32> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if nothing was rolled.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(values: &[(Die, u32)]) -> RollResult {
        RollResult {
            dice: values
                .iter()
                .map(|(die, value)| DieResult::new(*die, *value))
                .collect(),
        }
    }

    #[test]
    fn total() {
        let r = make_result(&[(Die::D20, 15), (Die::D6, 4)]);
        assert_eq!(r.total(), 19);
    }

    #[test]
    fn highest_and_lowest() {
        let r = make_result(&[(Die::D6, 3), (Die::D6, 6), (Die::D6, 1)]);
        assert_eq!(r.highest(), 6);
        assert_eq!(r.lowest(), 1);
        assert_eq!(r.values(), vec![3, 6, 1]);
    }

    #[test]
    fn empty_result() {
        let r = RollResult::default();
        assert_eq!(r.total(), 0);
        assert_eq!(r.highest(), 0);
        assert_eq!(r.lowest(), 0);
        assert_eq!(r.count(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn display() {
        let r = make_result(&[(Die::D6, 3), (Die::D6, 5)]);
        assert_eq!(r.to_string(), "[3, 5] = 8");
    }
}
