//! The single combined change a resolution makes to a character's vitals.
//!
//! A delta is computed once and applied in one step. Arithmetic is clamped
//! against the vitals it is applied to, so a delta built earlier still
//! respects a maximum that has changed since.

use serde::{Deserialize, Serialize};

use crate::sheet::{CharacterVitals, Condition, MAX_DEATH_ROLLS};

/// A change to an HP or WP track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackChange {
    /// Add (or subtract) this many points.
    Adjust(i32),
    /// Raise to the maximum.
    Fill,
}

/// A change to the death-roll counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathRollChange {
    /// Count passed and failed rolls on top of the current ones.
    Add {
        /// Passed rolls to add.
        passed: u8,
        /// Failed rolls to add.
        failed: u8,
    },
    /// Overwrite both counters.
    Set {
        /// New passed count.
        passed: u8,
        /// New failed count.
        failed: u8,
    },
}

/// A change to the condition set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionChange {
    /// Turn one condition on or off.
    Set(Condition, bool),
    /// Clear every condition.
    ClearAll,
}

/// Everything one resolution changes, applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsDelta {
    /// HP change.
    pub hp: Option<TrackChange>,
    /// WP change.
    pub wp: Option<TrackChange>,
    /// Condition changes, applied in order.
    pub conditions: Vec<ConditionChange>,
    /// Death-roll counter change.
    pub death_rolls: Option<DeathRollChange>,
    /// New rallied flag.
    pub rallied: Option<bool>,
}

impl VitalsDelta {
    /// A delta that changes nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if applying the delta cannot change anything.
    pub fn is_empty(&self) -> bool {
        self.hp.is_none()
            && self.wp.is_none()
            && self.conditions.is_empty()
            && self.death_rolls.is_none()
            && self.rallied.is_none()
    }

    /// Set the HP change.
    pub fn with_hp(mut self, change: TrackChange) -> Self {
        self.hp = Some(change);
        self
    }

    /// Set the WP change.
    pub fn with_wp(mut self, change: TrackChange) -> Self {
        self.wp = Some(change);
        self
    }

    /// Append a condition change.
    pub fn with_condition(mut self, change: ConditionChange) -> Self {
        self.conditions.push(change);
        self
    }

    /// Set the death-roll change.
    pub fn with_death_rolls(mut self, change: DeathRollChange) -> Self {
        self.death_rolls = Some(change);
        self
    }

    /// Set the rallied flag.
    pub fn with_rallied(mut self, rallied: bool) -> Self {
        self.rallied = Some(rallied);
        self
    }

    /// Compute the vitals after this delta.
    ///
    /// Counters stay within `0..=3` and a dying episode that already ended
    /// takes no more death rolls. Coming up from zero HP wipes the death-roll
    /// counters and the rallied flag.
    pub fn apply(&self, before: &CharacterVitals) -> CharacterVitals {
        let mut next = before.clone();

        match self.death_rolls {
            Some(DeathRollChange::Add { passed, failed }) => {
                let ended = next.death_rolls_passed >= MAX_DEATH_ROLLS
                    || next.death_rolls_failed >= MAX_DEATH_ROLLS;
                if !ended {
                    next.death_rolls_passed = next
                        .death_rolls_passed
                        .saturating_add(passed)
                        .min(MAX_DEATH_ROLLS);
                    next.death_rolls_failed = next
                        .death_rolls_failed
                        .saturating_add(failed)
                        .min(MAX_DEATH_ROLLS);
                }
            }
            Some(DeathRollChange::Set { passed, failed }) => {
                next.death_rolls_passed = passed.min(MAX_DEATH_ROLLS);
                next.death_rolls_failed = failed.min(MAX_DEATH_ROLLS);
            }
            None => {}
        }

        if let Some(rallied) = self.rallied {
            next.is_rallied = rallied;
        }

        for change in &self.conditions {
            match *change {
                ConditionChange::Set(condition, active) => {
                    next.conditions.set(condition, active);
                }
                ConditionChange::ClearAll => next.conditions.clear(),
            }
        }

        match self.hp {
            Some(TrackChange::Adjust(delta)) => {
                next.hp.adjust(delta);
            }
            Some(TrackChange::Fill) => next.hp.fill(),
            None => {}
        }
        match self.wp {
            Some(TrackChange::Adjust(delta)) => {
                next.wp.adjust(delta);
            }
            Some(TrackChange::Fill) => next.wp.fill(),
            None => {}
        }

        if before.hp.current <= 0 && next.hp.current > 0 {
            next.death_rolls_passed = 0;
            next.death_rolls_failed = 0;
            next.is_rallied = false;
        }

        next
    }
}

/// Convert a rolled value into a track adjustment.
pub(crate) fn points(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dying(passed: u8, failed: u8) -> CharacterVitals {
        let mut v = CharacterVitals::new(14, 10);
        v.hp.current = 0;
        v.death_rolls_passed = passed;
        v.death_rolls_failed = failed;
        v
    }

    #[test]
    fn empty_delta_changes_nothing() {
        let v = dying(1, 1);
        assert!(VitalsDelta::none().is_empty());
        assert_eq!(VitalsDelta::none().apply(&v), v);
    }

    #[test]
    fn hp_and_wp_are_clamped() {
        let mut v = CharacterVitals::new(10, 10);
        v.hp.current = 8;
        v.wp.current = 2;
        let next = VitalsDelta::none()
            .with_hp(TrackChange::Adjust(5))
            .with_wp(TrackChange::Adjust(-7))
            .apply(&v);
        assert_eq!(next.current_hp(), 10);
        assert_eq!(next.current_wp(), 0);
    }

    #[test]
    fn death_rolls_clamp_at_three() {
        let next = VitalsDelta::none()
            .with_death_rolls(DeathRollChange::Add {
                passed: 2,
                failed: 0,
            })
            .apply(&dying(2, 1));
        assert_eq!(next.death_rolls_passed, 3);
        assert_eq!(next.death_rolls_failed, 1);
    }

    #[test]
    fn ended_episode_takes_no_more_rolls() {
        let next = VitalsDelta::none()
            .with_death_rolls(DeathRollChange::Add {
                passed: 1,
                failed: 0,
            })
            .apply(&dying(0, 3));
        assert_eq!(next.death_rolls_passed, 0);
        assert!(next.is_consistent());
    }

    #[test]
    fn coming_up_from_zero_resets_death_rolls() {
        let mut v = dying(2, 2);
        v.is_rallied = true;
        let next = VitalsDelta::none()
            .with_hp(TrackChange::Adjust(5))
            .apply(&v);
        assert_eq!(next.current_hp(), 5);
        assert_eq!(next.death_rolls_passed, 0);
        assert_eq!(next.death_rolls_failed, 0);
        assert!(!next.is_rallied);
    }

    #[test]
    fn staying_at_zero_keeps_death_rolls() {
        let v = dying(2, 1);
        let next = VitalsDelta::none()
            .with_hp(TrackChange::Adjust(-3))
            .apply(&v);
        assert_eq!(next.death_rolls_passed, 2);
    }

    #[test]
    fn condition_changes_apply_in_order() {
        let v = CharacterVitals::new(10, 10);
        let next = VitalsDelta::none()
            .with_condition(ConditionChange::Set(Condition::Dazed, true))
            .with_condition(ConditionChange::Set(Condition::Angry, true))
            .with_condition(ConditionChange::Set(Condition::Dazed, false))
            .apply(&v);
        assert!(!next.conditions.is_active(Condition::Dazed));
        assert!(next.conditions.is_active(Condition::Angry));

        let cleared = VitalsDelta::none()
            .with_condition(ConditionChange::ClearAll)
            .apply(&next);
        assert!(cleared.conditions.is_empty());
    }

    #[test]
    fn fill_uses_current_max() {
        let mut v = CharacterVitals::new(10, 10);
        v.hp.current = 3;
        v.hp.max = 7;
        let next = VitalsDelta::none().with_hp(TrackChange::Fill).apply(&v);
        assert_eq!(next.current_hp(), 7);
    }

    #[test]
    fn points_saturate() {
        assert_eq!(points(6), 6);
        assert_eq!(points(u32::MAX), i32::MAX);
    }
}
