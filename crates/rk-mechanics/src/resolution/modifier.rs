//! Boons and banes on single-d20 rolls.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Most extra d20s a boon or bane can add.
pub const MAX_MODIFIER_DICE: u8 = 3;

/// Extra d20s drawn alongside a single-d20 roll.
///
/// A boon keeps the lowest face, a bane the highest. The two can never be
/// active together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Modifier {
    /// Roll the d20 alone.
    #[default]
    None,
    /// Roll this many extra d20s and keep the lowest.
    Boon(u8),
    /// Roll this many extra d20s and keep the highest.
    Bane(u8),
}

impl Modifier {
    /// A boon of `count` extra dice.
    pub fn boon(count: u8) -> MechResult<Self> {
        check_count(count)?;
        Ok(Self::Boon(count))
    }

    /// A bane of `count` extra dice.
    pub fn bane(count: u8) -> MechResult<Self> {
        check_count(count)?;
        Ok(Self::Bane(count))
    }

    /// Number of extra d20s this modifier draws.
    pub fn extra_dice(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Boon(n) | Self::Bane(n) => n,
        }
    }

    /// Returns an error if the dice count is outside `1..=3`.
    pub fn validate(self) -> MechResult<()> {
        match self {
            Self::None => Ok(()),
            Self::Boon(n) | Self::Bane(n) => check_count(n),
        }
    }

    /// Advance the boon toggle: off, 1, 2, 3, off. Replaces any bane.
    pub fn cycle_boon(self) -> Self {
        match self {
            Self::Boon(n) if n < MAX_MODIFIER_DICE => Self::Boon(n + 1),
            Self::Boon(_) => Self::None,
            Self::None | Self::Bane(_) => Self::Boon(1),
        }
    }

    /// Advance the bane toggle: off, 1, 2, 3, off. Replaces any boon.
    pub fn cycle_bane(self) -> Self {
        match self {
            Self::Bane(n) if n < MAX_MODIFIER_DICE => Self::Bane(n + 1),
            Self::Bane(_) => Self::None,
            Self::None | Self::Boon(_) => Self::Bane(1),
        }
    }
}

fn check_count(count: u8) -> MechResult<()> {
    if (1..=MAX_MODIFIER_DICE).contains(&count) {
        Ok(())
    } else {
        Err(MechError::InvalidRequest(format!(
            "boon/bane count must be 1-{MAX_MODIFIER_DICE}, got {count}"
        )))
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Boon(n) => write!(f, "boon x{n}"),
            Self::Bane(n) => write!(f, "bane x{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boon_cycle_wraps_to_off() {
        let m = Modifier::None.cycle_boon();
        assert_eq!(m, Modifier::Boon(1));
        let m = m.cycle_boon().cycle_boon();
        assert_eq!(m, Modifier::Boon(3));
        assert_eq!(m.cycle_boon(), Modifier::None);
    }

    #[test]
    fn activating_one_clears_the_other() {
        assert_eq!(Modifier::Bane(2).cycle_boon(), Modifier::Boon(1));
        assert_eq!(Modifier::Boon(3).cycle_bane(), Modifier::Bane(1));
    }

    #[test]
    fn counts_are_checked() {
        assert!(Modifier::boon(0).is_err());
        assert!(Modifier::bane(4).is_err());
        assert_eq!(Modifier::boon(2).unwrap(), Modifier::Boon(2));
        assert!(Modifier::Bane(9).validate().is_err());
        assert!(Modifier::None.validate().is_ok());
    }

    #[test]
    fn extra_dice() {
        assert_eq!(Modifier::None.extra_dice(), 0);
        assert_eq!(Modifier::Boon(2).extra_dice(), 2);
        assert_eq!(Modifier::Bane(3).extra_dice(), 3);
    }
}
