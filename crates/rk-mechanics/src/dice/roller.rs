//! Sources of die faces.
//!
//! [`RandomRoller`] is the production source. [`ScriptedRoller`] replays a
//! fixed sequence of faces, which makes every rules path reproducible in
//! tests and lets a recorded session be replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::roll::{DieResult, RollResult};
use super::{DicePool, Die};

/// Produces one independent face per die.
pub trait DiceRoller {
    /// Draw a single face in `1..=die.sides()`.
    fn roll_die(&mut self, die: Die) -> u32;

    /// Roll every die of the pool, in pool order.
    fn roll(&mut self, pool: &DicePool) -> RollResult {
        let dice = pool
            .dice
            .iter()
            .map(|die| DieResult::new(*die, self.roll_die(*die)))
            .collect();
        RollResult { dice }
    }
}

impl<T: DiceRoller + ?Sized> DiceRoller for &mut T {
    fn roll_die(&mut self, die: Die) -> u32 {
        (**self).roll_die(die)
    }
}

impl<T: DiceRoller + ?Sized> DiceRoller for Box<T> {
    fn roll_die(&mut self, die: Die) -> u32 {
        (**self).roll_die(die)
    }
}

/// Uniform random faces from a standard RNG.
#[derive(Debug, Clone)]
pub struct RandomRoller {
    rng: StdRng,
}

impl RandomRoller {
    /// A roller with a fixed seed, for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A roller seeded from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, OS-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os(),
        }
    }
}

impl DiceRoller for RandomRoller {
    fn roll_die(&mut self, die: Die) -> u32 {
        self.rng.random_range(1..=die.sides())
    }
}

/// Replays a fixed list of faces, cycling when exhausted.
///
/// Faces are clamped into the range of the die being rolled. An empty
/// script always rolls 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: Vec<u32>,
    cursor: usize,
}

impl ScriptedRoller {
    /// Create a roller that yields `faces` in order.
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            cursor: 0,
        }
    }

    /// How many faces have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll_die(&mut self, die: Die) -> u32 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face.clamp(1, die.sides())
    }
}
