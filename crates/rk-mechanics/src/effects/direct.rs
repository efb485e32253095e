//! Dice-free transitions for manual and GM overrides.

use serde::{Deserialize, Serialize};

use super::delta::{ConditionChange, DeathRollChange, TrackChange, VitalsDelta, points};
use super::dispatch::shift_rest;
use crate::error::{MechError, MechResult};
use crate::sheet::{CharacterVitals, Condition, LifeState, MAX_DEATH_ROLLS};

/// A state change applied without rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectTransition {
    /// Add or remove HP.
    AdjustHp(i32),
    /// Add or remove WP.
    AdjustWp(i32),
    /// Turn a condition on or off.
    SetCondition {
        /// The condition.
        condition: Condition,
        /// Whether it should be active.
        active: bool,
    },
    /// Flip a condition.
    ToggleCondition(Condition),
    /// Overwrite the death-roll counters.
    SetDeathRolls {
        /// Passed rolls.
        passed: u8,
        /// Failed rolls.
        failed: u8,
    },
    /// Set or clear the rallied flag.
    SetRallied(bool),
    /// A round rest with a known WP amount.
    RoundRest {
        /// WP recovered.
        wp: u32,
    },
    /// A stretch rest with known amounts.
    StretchRest {
        /// HP healed.
        hp: u32,
        /// WP recovered.
        wp: u32,
    },
    /// A shift rest.
    ShiftRest,
}

impl DirectTransition {
    /// Build the delta for this transition against the current vitals.
    ///
    /// Toggles and "first active condition" choices are resolved here, so
    /// re-applying the delta later lands on the same result.
    pub fn to_delta(&self, vitals: &CharacterVitals) -> MechResult<VitalsDelta> {
        let state = vitals.life_state();
        let delta = match *self {
            Self::AdjustHp(delta) => VitalsDelta::none().with_hp(TrackChange::Adjust(delta)),
            Self::AdjustWp(delta) => VitalsDelta::none().with_wp(TrackChange::Adjust(delta)),
            Self::SetCondition { condition, active } => {
                VitalsDelta::none().with_condition(ConditionChange::Set(condition, active))
            }
            Self::ToggleCondition(condition) => VitalsDelta::none().with_condition(
                ConditionChange::Set(condition, !vitals.conditions.is_active(condition)),
            ),
            Self::SetDeathRolls { passed, failed } => {
                if passed > MAX_DEATH_ROLLS || failed > MAX_DEATH_ROLLS {
                    return Err(MechError::InvalidRequest(format!(
                        "death rolls range from 0 to {MAX_DEATH_ROLLS}"
                    )));
                }
                if vitals.current_hp() > 0 {
                    return Err(violation("death rolls are only tracked at 0 HP"));
                }
                if passed == MAX_DEATH_ROLLS && failed == MAX_DEATH_ROLLS {
                    return Err(violation(
                        "a character cannot be both stabilized and dead",
                    ));
                }
                VitalsDelta::none().with_death_rolls(DeathRollChange::Set { passed, failed })
            }
            Self::SetRallied(rallied) => {
                if rallied && vitals.current_hp() > 0 {
                    return Err(violation("only a character at 0 HP can rally"));
                }
                if rallied && state == LifeState::Deceased {
                    return Err(violation("the character is dead"));
                }
                VitalsDelta::none().with_rallied(rallied)
            }
            Self::RoundRest { wp } => {
                if state == LifeState::Deceased {
                    return Err(violation("the character is dead"));
                }
                VitalsDelta::none().with_wp(TrackChange::Adjust(points(wp)))
            }
            Self::StretchRest { hp, wp } => {
                if vitals.current_hp() <= 0 {
                    return Err(violation("a stretch rest is not possible at 0 HP"));
                }
                let mut delta = VitalsDelta::none()
                    .with_hp(TrackChange::Adjust(points(hp)))
                    .with_wp(TrackChange::Adjust(points(wp)));
                if let Some(condition) = vitals.conditions.first_active() {
                    delta = delta.with_condition(ConditionChange::Set(condition, false));
                }
                delta
            }
            Self::ShiftRest => {
                if state == LifeState::Deceased {
                    return Err(violation("the character is dead"));
                }
                shift_rest()
            }
        };
        Ok(delta)
    }
}

fn violation(msg: impl Into<String>) -> MechError {
    MechError::DomainViolation(msg.into())
}
