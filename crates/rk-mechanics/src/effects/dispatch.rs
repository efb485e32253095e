//! Mapping classified rolls to state changes, one rule per roll mode.

use serde::{Deserialize, Serialize};

use super::delta::{ConditionChange, DeathRollChange, TrackChange, VitalsDelta, points};
use crate::dice::{DiceRoller, Die, DieResult};
use crate::error::{MechError, MechResult};
use crate::id::CombatantId;
use crate::resolution::{Critical, RestKind, RollMode, RollOutcome, RollRequest};
use crate::sheet::{CharacterVitals, LifeState};

/// A change outside the character's own vitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Mark a skill as eligible for advancement this session.
    MarkAdvancement {
        /// The skill to mark.
        skill: String,
    },
    /// Report a successful advancement roll.
    SkillImproved {
        /// The skill improved.
        skill: String,
    },
    /// Record an initiative value for a combatant.
    RecordInitiative {
        /// The combatant.
        combatant: CombatantId,
        /// The value drawn.
        value: u32,
    },
}

/// The full result of dispatching one roll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    /// The combined change to the character.
    pub delta: VitalsDelta,
    /// Changes to collaborators.
    pub side_effects: Vec<SideEffect>,
}

/// Reject modes the character's current state does not allow.
///
/// Runs before any dice are drawn. A dead character can only make generic
/// rolls.
pub fn check_preconditions(mode: RollMode, vitals: &CharacterVitals) -> MechResult<()> {
    let state = vitals.life_state();
    if state == LifeState::Deceased && mode != RollMode::Generic {
        return Err(violation("the character is dead"));
    }
    match mode {
        RollMode::DeathRoll => match state {
            LifeState::Alive => Err(violation("death rolls are only made at 0 HP")),
            LifeState::Stabilized => Err(violation("already stabilized; roll for recovery")),
            LifeState::Dying | LifeState::Deceased => Ok(()),
        },
        RollMode::RallyRoll if state == LifeState::Alive => {
            Err(violation("only a character at 0 HP can rally"))
        }
        RollMode::RecoveryRoll if state != LifeState::Stabilized => Err(violation(format!(
            "recovery rolls need a stabilized character, not {state}"
        ))),
        RollMode::Rest(RestKind::Stretch) if vitals.current_hp() <= 0 => Err(violation(
            "a stretch rest is not possible at 0 HP",
        )),
        _ => Ok(()),
    }
}

/// Compute the change a classified roll makes.
///
/// A stretch rest draws its WP die from `roller` here and records it in the
/// outcome's secondary results.
pub fn dispatch<R: DiceRoller + ?Sized>(
    request: &RollRequest,
    outcome: &mut RollOutcome,
    vitals: &CharacterVitals,
    roller: &mut R,
) -> Dispatch {
    let mut result = Dispatch::default();
    let value = outcome.final_value;

    match request.mode {
        RollMode::SkillCheck => {
            if let (1 | 20, Some(skill)) = (value, &request.skill_name) {
                result.side_effects.push(SideEffect::MarkAdvancement {
                    skill: skill.clone(),
                });
            }
        }
        RollMode::DeathRoll => {
            let step = |crit: Critical| if outcome.critical == Some(crit) { 2 } else { 1 };
            let change = match outcome.is_success {
                Some(true) => Some(DeathRollChange::Add {
                    passed: step(Critical::Dragon),
                    failed: 0,
                }),
                Some(false) => Some(DeathRollChange::Add {
                    passed: 0,
                    failed: step(Critical::Demon),
                }),
                None => None,
            };
            result.delta.death_rolls = change;
        }
        RollMode::RallyRoll => {
            result.delta.rallied = outcome.is_success;
        }
        RollMode::RecoveryRoll => {
            result.delta.hp = Some(TrackChange::Adjust(points(value)));
        }
        RollMode::AdvancementRoll => {
            if let (Some(true), Some(skill)) = (outcome.is_success, &request.skill_name) {
                result.side_effects.push(SideEffect::SkillImproved {
                    skill: skill.clone(),
                });
            }
        }
        RollMode::Rest(RestKind::Round) => {
            result.delta.wp = Some(TrackChange::Adjust(points(value)));
        }
        RollMode::Rest(RestKind::Stretch) => {
            let wp_die = DieResult::new(Die::D6, roller.roll_die(Die::D6));
            outcome.secondary_results.push(wp_die);
            result.delta.hp = Some(TrackChange::Adjust(points(value)));
            result.delta.wp = Some(TrackChange::Adjust(points(wp_die.value)));
            if let Some(condition) = vitals.conditions.first_active() {
                result
                    .delta
                    .conditions
                    .push(ConditionChange::Set(condition, false));
            }
        }
        RollMode::Rest(RestKind::Shift) => {
            result.delta = shift_rest();
        }
        RollMode::Initiative => {
            if let Some(combatant) = request.combatant_id {
                result.side_effects.push(SideEffect::RecordInitiative {
                    combatant,
                    value,
                });
            }
        }
        RollMode::Generic => {}
    }

    result
}

/// Full recovery: HP and WP to max, conditions and death rolls wiped.
pub(crate) fn shift_rest() -> VitalsDelta {
    VitalsDelta::none()
        .with_hp(TrackChange::Fill)
        .with_wp(TrackChange::Fill)
        .with_condition(ConditionChange::ClearAll)
        .with_death_rolls(DeathRollChange::Set {
            passed: 0,
            failed: 0,
        })
        .with_rallied(false)
}

fn violation(msg: impl Into<String>) -> MechError {
    MechError::DomainViolation(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DicePool, RollResult, ScriptedRoller};
    use crate::resolution::interpret;
    use crate::sheet::Condition;

    fn dying(passed: u8, failed: u8) -> CharacterVitals {
        let mut v = CharacterVitals::new(14, 10);
        v.hp.current = 0;
        v.death_rolls_passed = passed;
        v.death_rolls_failed = failed;
        v
    }

    /// Roll `request` with scripted faces and apply the result.
    fn resolve(
        request: &RollRequest,
        vitals: &CharacterVitals,
        faces: &[u32],
    ) -> (RollOutcome, Dispatch, CharacterVitals) {
        let mut roller = ScriptedRoller::new(faces.to_vec());
        let raw: RollResult = roller.roll(&request.dice_pool);
        let mut outcome = interpret(request, raw, &mut roller);
        let dispatch = dispatch(request, &mut outcome, vitals, &mut roller);
        let next = dispatch.delta.apply(vitals);
        (outcome, dispatch, next)
    }

    #[test]
    fn dragon_death_roll_stabilizes() {
        let (_, _, next) = resolve(&RollRequest::death_roll(12), &dying(2, 1), &[1]);
        assert_eq!(next.death_rolls_passed, 3);
        assert_eq!(next.life_state(), LifeState::Stabilized);
    }

    #[test]
    fn demon_death_roll_kills() {
        let (_, _, next) = resolve(&RollRequest::death_roll(12), &dying(0, 2), &[20]);
        assert_eq!(next.death_rolls_failed, 3);
        assert_eq!(next.life_state(), LifeState::Deceased);
    }

    #[test]
    fn ordinary_death_rolls_count_one() {
        let (_, _, passed) = resolve(&RollRequest::death_roll(12), &dying(0, 0), &[9]);
        assert_eq!(passed.death_rolls_passed, 1);
        let (_, _, failed) = resolve(&RollRequest::death_roll(12), &dying(0, 0), &[15]);
        assert_eq!(failed.death_rolls_failed, 1);
    }

    #[test]
    fn rally_sets_flag_without_touching_death_rolls() {
        let (_, _, next) = resolve(&RollRequest::rally_roll(10), &dying(1, 1), &[1]);
        assert!(next.is_rallied);
        assert_eq!(next.death_rolls_passed, 1);
        assert_eq!(next.death_rolls_failed, 1);

        let mut rallied = dying(1, 1);
        rallied.is_rallied = true;
        let (_, _, next) = resolve(&RollRequest::rally_roll(10), &rallied, &[20]);
        assert!(!next.is_rallied);
        assert_eq!(next.death_rolls_failed, 1);
    }

    #[test]
    fn skill_check_marks_on_dragon_and_demon_only() {
        let v = CharacterVitals::new(10, 10);
        for face in [1, 20] {
            let (_, d, next) = resolve(&RollRequest::skill_check("Bows", 12), &v, &[face]);
            assert_eq!(
                d.side_effects,
                vec![SideEffect::MarkAdvancement {
                    skill: "Bows".to_string()
                }]
            );
            assert_eq!(next, v);
        }
        let (_, d, _) = resolve(&RollRequest::skill_check("Bows", 12), &v, &[7]);
        assert!(d.side_effects.is_empty());
    }

    #[test]
    fn recovery_heals_and_revives() {
        let mut stable = dying(3, 1);
        stable.is_rallied = true;
        let request = RollRequest::recovery(DicePool::single(Die::D6));
        let (_, _, next) = resolve(&request, &stable, &[4]);
        assert_eq!(next.current_hp(), 4);
        assert_eq!(next.death_rolls_passed, 0);
        assert_eq!(next.death_rolls_failed, 0);
        assert!(!next.is_rallied);
    }

    #[test]
    fn round_rest_recovers_wp() {
        let mut v = CharacterVitals::new(10, 10);
        v.wp.current = 3;
        let (outcome, _, next) = resolve(&RollRequest::round_rest(), &v, &[4]);
        assert_eq!(outcome.final_value, 4);
        assert_eq!(next.current_wp(), 7);
    }

    #[test]
    fn stretch_rest_heals_recovers_and_clears_one_condition() {
        let mut v = CharacterVitals::new(14, 10);
        v.hp.current = 5;
        v.wp.current = 2;
        v.conditions.set(Condition::Scared, true);
        v.conditions.set(Condition::Exhausted, true);

        let (outcome, _, next) = resolve(&RollRequest::stretch_rest(true), &v, &[3, 4, 5]);
        assert_eq!(outcome.final_value, 7);
        assert_eq!(outcome.secondary_results, vec![DieResult::new(Die::D6, 5)]);
        assert_eq!(next.current_hp(), 12);
        assert_eq!(next.current_wp(), 7);
        assert!(!next.conditions.is_active(Condition::Exhausted));
        assert!(next.conditions.is_active(Condition::Scared));
    }

    #[test]
    fn shift_rest_restores_everything() {
        let mut v = CharacterVitals::new(14, 10);
        v.hp.current = 1;
        v.wp.current = 0;
        v.conditions.set(Condition::Dazed, true);
        let next = shift_rest().apply(&v);
        assert_eq!(next, CharacterVitals::new(14, 10));
    }

    #[test]
    fn shift_rest_on_rested_character_is_idempotent() {
        let v = CharacterVitals::new(14, 10);
        assert_eq!(shift_rest().apply(&v), v);
    }

    #[test]
    fn advancement_success_reports_improvement() {
        let v = CharacterVitals::new(10, 10);
        let (_, d, _) = resolve(&RollRequest::advancement("Bows", 8), &v, &[13]);
        assert_eq!(
            d.side_effects,
            vec![SideEffect::SkillImproved {
                skill: "Bows".to_string()
            }]
        );
        let (_, d, _) = resolve(&RollRequest::advancement("Bows", 8), &v, &[3]);
        assert!(d.side_effects.is_empty());
    }

    #[test]
    fn initiative_records_against_combatant() {
        let v = CharacterVitals::new(10, 10);
        let combatant = CombatantId::new();
        let request = RollRequest::initiative(combatant, DicePool::single(Die::D10));
        let (_, d, next) = resolve(&request, &v, &[6]);
        assert_eq!(
            d.side_effects,
            vec![SideEffect::RecordInitiative {
                combatant,
                value: 6
            }]
        );
        assert_eq!(next, v);
    }

    #[test]
    fn preconditions() {
        let alive = CharacterVitals::new(10, 10);
        assert!(check_preconditions(RollMode::DeathRoll, &alive).is_err());
        assert!(check_preconditions(RollMode::RallyRoll, &alive).is_err());
        assert!(check_preconditions(RollMode::RecoveryRoll, &alive).is_err());
        assert!(check_preconditions(RollMode::Rest(RestKind::Stretch), &alive).is_ok());

        assert!(check_preconditions(RollMode::DeathRoll, &dying(1, 1)).is_ok());
        assert!(check_preconditions(RollMode::Rest(RestKind::Stretch), &dying(1, 1)).is_err());
        assert!(check_preconditions(RollMode::RecoveryRoll, &dying(3, 0)).is_ok());
        assert!(check_preconditions(RollMode::DeathRoll, &dying(3, 0)).is_err());

        let dead = dying(0, 3);
        assert!(matches!(
            check_preconditions(RollMode::DeathRoll, &dead),
            Err(MechError::DomainViolation(_))
        ));
        assert!(check_preconditions(RollMode::Rest(RestKind::Round), &dead).is_err());
        assert!(check_preconditions(RollMode::Generic, &dead).is_ok());
    }

    #[test]
    fn dead_characters_only_make_generic_rolls() {
        let dead = dying(0, 3);
        for mode in [
            RollMode::SkillCheck,
            RollMode::AdvancementRoll,
            RollMode::Initiative,
            RollMode::RallyRoll,
            RollMode::RecoveryRoll,
            RollMode::Rest(RestKind::Stretch),
            RollMode::Rest(RestKind::Shift),
        ] {
            assert!(
                matches!(
                    check_preconditions(mode, &dead),
                    Err(MechError::DomainViolation(_))
                ),
                "{mode} allowed for a dead character"
            );
        }
    }
}
