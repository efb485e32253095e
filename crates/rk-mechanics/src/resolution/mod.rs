//! Classifying dice rolls.
//!
//! A [`RollRequest`] and the faces drawn for its pool are interpreted into a
//! [`RollOutcome`]:
//! - **Single d20 with a boon/bane**: extra d20s are drawn; a boon keeps the
//!   lowest face, a bane the highest
//! - **Single d20**: the face is the result; 1 is a Dragon, 20 a Demon
//!   (except on advancement rolls)
//! - **Any other pool**: the faces are summed
//!
//! Checks succeed by rolling at or under the target. Advancement rolls
//! succeed by rolling over it. Rests, recovery, and initiative have no
//! success value.

pub mod modifier;
pub mod request;

pub use modifier::Modifier;
pub use request::{RestKind, RollMode, RollRequest};

use serde::{Deserialize, Serialize};

use crate::dice::{DiceRoller, Die, DieResult, RollResult};

/// Critical results on a qualifying single-d20 roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Critical {
    /// A natural 1: always succeeds.
    Dragon,
    /// A natural 20: always fails.
    Demon,
}

impl std::fmt::Display for Critical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dragon => write!(f, "Dragon"),
            Self::Demon => write!(f, "Demon"),
        }
    }
}

/// A classified roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Faces drawn for the request's pool.
    pub raw_results: Vec<DieResult>,
    /// Extra d20s drawn for a boon or bane.
    pub modifier_results: Vec<DieResult>,
    /// Dice the resolution drew on its own, such as the WP die of a stretch rest.
    #[serde(default)]
    pub secondary_results: Vec<DieResult>,
    /// The value the roll resolved to.
    pub final_value: u32,
    /// Dragon or Demon, if the roll was critical.
    pub critical: Option<Critical>,
    /// Success or failure; `None` where the mode has no target.
    pub is_success: Option<bool>,
}

impl RollOutcome {
    /// Returns true if the roll was a Dragon or a Demon.
    pub fn is_critical(&self) -> bool {
        self.critical.is_some()
    }

    /// The final value as shown on the sheet: `Dragon`, `Demon`, or the number.
    pub fn display_value(&self) -> String {
        match self.critical {
            Some(critical) => critical.to_string(),
            None => self.final_value.to_string(),
        }
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_value())?;
        match self.is_success {
            Some(true) => write!(f, " (success)"),
            Some(false) => write!(f, " (failure)"),
            None => Ok(()),
        }
    }
}

/// Classify a validated request given the faces drawn for its pool.
///
/// Boon and bane dice are drawn from `roller` here, after the pool itself.
pub fn interpret<R: DiceRoller + ?Sized>(
    request: &RollRequest,
    raw: RollResult,
    roller: &mut R,
) -> RollOutcome {
    let single_d20 = request.dice_pool.is_single_d20() && raw.count() == 1;
    let mut modifier_results = Vec::new();

    let final_value = if single_d20 {
        let first = raw.dice.first().map(|d| d.value).unwrap_or(0);
        match request.modifier {
            Modifier::None => first,
            Modifier::Boon(extra) | Modifier::Bane(extra) => {
                modifier_results = (0..extra)
                    .map(|_| DieResult::new(Die::D20, roller.roll_die(Die::D20)))
                    .collect();
                let faces =
                    std::iter::once(first).chain(modifier_results.iter().map(|d| d.value));
                let kept = if matches!(request.modifier, Modifier::Boon(_)) {
                    faces.min()
                } else {
                    faces.max()
                };
                kept.unwrap_or(first)
            }
        }
    } else {
        if request.modifier != Modifier::None {
            tracing::debug!(pool = %request.dice_pool, "modifier ignored outside single-d20 rolls");
        }
        raw.total()
    };

    let critical = if single_d20 && request.mode != RollMode::AdvancementRoll {
        match final_value {
            1 => Some(Critical::Dragon),
            20 => Some(Critical::Demon),
            _ => None,
        }
    } else {
        None
    };

    let is_success = match request.mode {
        RollMode::SkillCheck | RollMode::RallyRoll | RollMode::DeathRoll | RollMode::Generic => {
            request
                .target_value
                .map(|target| roll_under(final_value, target, critical))
        }
        RollMode::AdvancementRoll => request.target_value.map(|target| final_value > target),
        RollMode::RecoveryRoll | RollMode::Rest(_) | RollMode::Initiative => None,
    };

    tracing::debug!(
        mode = %request.mode,
        faces = ?raw.values(),
        final_value,
        ?critical,
        ?is_success,
        "roll interpreted"
    );

    RollOutcome {
        raw_results: raw.dice,
        modifier_results,
        secondary_results: Vec::new(),
        final_value,
        critical,
        is_success,
    }
}

/// At or under the target succeeds; a Dragon always succeeds and a Demon always fails.
fn roll_under(value: u32, target: u32, critical: Option<Critical>) -> bool {
    match critical {
        Some(Critical::Dragon) => true,
        Some(Critical::Demon) => false,
        None => value <= target,
    }
}
