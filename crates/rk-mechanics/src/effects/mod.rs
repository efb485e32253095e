//! Turning classified outcomes into state changes.
//!
//! [`dispatch`] maps a roll to a [`VitalsDelta`] plus side effects outside
//! the character (advancement marks, initiative). [`DirectTransition`] is
//! the dice-free path to the same changes. [`Effect`] is what the caller is
//! told actually happened.

pub mod delta;
pub mod direct;
pub mod dispatch;

pub use delta::{ConditionChange, DeathRollChange, TrackChange, VitalsDelta};
pub use direct::DirectTransition;
pub use dispatch::{Dispatch, SideEffect, check_preconditions, dispatch};

use serde::{Deserialize, Serialize};

use crate::id::CombatantId;
use crate::sheet::{CharacterVitals, Condition, LifeState};

/// Something a resolution changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// HP moved.
    HpChanged {
        /// HP before.
        from: i32,
        /// HP after.
        to: i32,
    },
    /// WP moved.
    WpChanged {
        /// WP before.
        from: i32,
        /// WP after.
        to: i32,
    },
    /// A condition was cleared.
    ConditionCleared(Condition),
    /// A condition was set.
    ConditionSet(Condition),
    /// The passed death-roll count went up.
    DeathRollPassed {
        /// Passed rolls so far.
        total: u8,
    },
    /// The failed death-roll count went up.
    DeathRollFailed {
        /// Failed rolls so far.
        total: u8,
    },
    /// The dying character stabilized.
    Stabilized,
    /// The character died.
    Died,
    /// The character came back up from zero HP.
    Revived,
    /// The rallied flag changed.
    RallyChanged(bool),
    /// A skill became eligible for advancement.
    AdvancementMarked {
        /// The skill marked.
        skill: String,
    },
    /// An advancement roll improved a skill.
    SkillImproved {
        /// The skill improved.
        skill: String,
    },
    /// An initiative value was recorded.
    InitiativeRecorded {
        /// Who the value belongs to.
        combatant: CombatantId,
        /// The value drawn.
        value: u32,
    },
}

impl Effect {
    /// The effects visible between two vitals snapshots.
    ///
    /// Life-state transitions are reported only when the state actually
    /// changes, so each one shows up exactly once.
    pub fn diff(before: &CharacterVitals, after: &CharacterVitals) -> Vec<Effect> {
        let mut effects = Vec::new();

        if before.hp.current != after.hp.current {
            effects.push(Self::HpChanged {
                from: before.hp.current,
                to: after.hp.current,
            });
        }
        if before.wp.current != after.wp.current {
            effects.push(Self::WpChanged {
                from: before.wp.current,
                to: after.wp.current,
            });
        }
        for condition in Condition::ALL {
            match (
                before.conditions.is_active(condition),
                after.conditions.is_active(condition),
            ) {
                (true, false) => effects.push(Self::ConditionCleared(condition)),
                (false, true) => effects.push(Self::ConditionSet(condition)),
                _ => {}
            }
        }
        if after.death_rolls_passed > before.death_rolls_passed {
            effects.push(Self::DeathRollPassed {
                total: after.death_rolls_passed,
            });
        }
        if after.death_rolls_failed > before.death_rolls_failed {
            effects.push(Self::DeathRollFailed {
                total: after.death_rolls_failed,
            });
        }
        if before.is_rallied != after.is_rallied {
            effects.push(Self::RallyChanged(after.is_rallied));
        }

        let (was, now) = (before.life_state(), after.life_state());
        if was != now {
            match now {
                LifeState::Stabilized => effects.push(Self::Stabilized),
                LifeState::Deceased => effects.push(Self::Died),
                LifeState::Alive => effects.push(Self::Revived),
                LifeState::Dying => {}
            }
        }

        effects
    }

    /// Returns true for effects that end or start a dying episode.
    pub fn is_life_transition(&self) -> bool {
        matches!(self, Self::Stabilized | Self::Died | Self::Revived)
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HpChanged { from, to } => write!(f, "HP {from} -> {to}"),
            Self::WpChanged { from, to } => write!(f, "WP {from} -> {to}"),
            Self::ConditionCleared(c) => write!(f, "{c} cleared"),
            Self::ConditionSet(c) => write!(f, "{c}"),
            Self::DeathRollPassed { total } => write!(f, "death roll passed ({total}/3)"),
            Self::DeathRollFailed { total } => write!(f, "death roll failed ({total}/3)"),
            Self::Stabilized => write!(f, "stabilized"),
            Self::Died => write!(f, "died"),
            Self::Revived => write!(f, "back on their feet"),
            Self::RallyChanged(true) => write!(f, "rallied"),
            Self::RallyChanged(false) => write!(f, "no longer rallied"),
            Self::AdvancementMarked { skill } => write!(f, "{skill} marked for advancement"),
            Self::SkillImproved { skill } => write!(f, "{skill} improved"),
            Self::InitiativeRecorded { combatant, value } => {
                write!(f, "initiative {value} for {combatant}")
            }
        }
    }
}
