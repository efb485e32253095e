//! Roll requests and the checks made before any dice are drawn.

use serde::{Deserialize, Serialize};

use super::modifier::Modifier;
use crate::dice::{DicePool, Die};
use crate::error::{MechError, MechResult};
use crate::id::CombatantId;

/// The three tiers of rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestKind {
    /// A round rest: recover WP.
    Round,
    /// A stretch rest: recover some HP and WP and shake off one condition.
    Stretch,
    /// A shift rest: recover fully.
    Shift,
}

impl std::fmt::Display for RestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Round => write!(f, "round rest"),
            Self::Stretch => write!(f, "stretch rest"),
            Self::Shift => write!(f, "shift rest"),
        }
    }
}

/// What a roll is for. Decides how it is classified and what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollMode {
    /// A skill or attribute check, rolled under the skill level.
    SkillCheck,
    /// A death roll made while dying.
    DeathRoll,
    /// A rally roll letting a dying character act.
    RallyRoll,
    /// HP recovered once stabilized.
    RecoveryRoll,
    /// A roll to improve a marked skill; must beat the current level.
    AdvancementRoll,
    /// Recovery from resting.
    Rest(RestKind),
    /// An initiative draw for a combatant.
    Initiative,
    /// Any other roll, such as damage.
    Generic,
}

impl RollMode {
    /// Modes that roll one d20 against a target.
    pub fn is_d20_check(self) -> bool {
        matches!(
            self,
            Self::SkillCheck | Self::DeathRoll | Self::RallyRoll | Self::AdvancementRoll
        )
    }
}

impl std::fmt::Display for RollMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkillCheck => write!(f, "skill check"),
            Self::DeathRoll => write!(f, "death roll"),
            Self::RallyRoll => write!(f, "rally roll"),
            Self::RecoveryRoll => write!(f, "recovery roll"),
            Self::AdvancementRoll => write!(f, "advancement roll"),
            Self::Rest(kind) => write!(f, "{kind}"),
            Self::Initiative => write!(f, "initiative"),
            Self::Generic => write!(f, "roll"),
        }
    }
}

/// A request to roll dice for a character.
///
/// Dropping a request before it is resolved has no effect anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// The dice to roll.
    pub dice_pool: DicePool,
    /// What the roll is for.
    pub mode: RollMode,
    /// Boon or bane, for single-d20 pools.
    #[serde(default)]
    pub modifier: Modifier,
    /// The value to roll under (or, for advancement, over).
    #[serde(default)]
    pub target_value: Option<u32>,
    /// The skill being checked or advanced.
    #[serde(default)]
    pub skill_name: Option<String>,
    /// The combatant an initiative draw belongs to.
    #[serde(default)]
    pub combatant_id: Option<CombatantId>,
    /// Whether someone with healing is tending a stretch rest.
    #[serde(default)]
    pub rest_healer_present: bool,
}

impl RollRequest {
    /// A bare request for a pool in a given mode.
    pub fn new(dice_pool: DicePool, mode: RollMode) -> Self {
        Self {
            dice_pool,
            mode,
            modifier: Modifier::None,
            target_value: None,
            skill_name: None,
            combatant_id: None,
            rest_healer_present: false,
        }
    }

    /// A d20 check against a skill level.
    pub fn skill_check(skill: impl Into<String>, level: u32) -> Self {
        Self::new(DicePool::single(Die::D20), RollMode::SkillCheck)
            .with_skill(skill)
            .with_target(level)
    }

    /// A d20 death roll against the character's constitution.
    pub fn death_roll(constitution: u32) -> Self {
        Self::new(DicePool::single(Die::D20), RollMode::DeathRoll).with_target(constitution)
    }

    /// A d20 rally roll against the rallying value.
    pub fn rally_roll(target: u32) -> Self {
        Self::new(DicePool::single(Die::D20), RollMode::RallyRoll).with_target(target)
    }

    /// A d20 advancement roll for a marked skill at its current level.
    pub fn advancement(skill: impl Into<String>, level: u32) -> Self {
        Self::new(DicePool::single(Die::D20), RollMode::AdvancementRoll)
            .with_skill(skill)
            .with_target(level)
    }

    /// A recovery roll for a stabilized character.
    pub fn recovery(pool: DicePool) -> Self {
        Self::new(pool, RollMode::RecoveryRoll)
    }

    /// A round rest, recovering 1d6 WP.
    pub fn round_rest() -> Self {
        Self::new(DicePool::single(Die::D6), RollMode::Rest(RestKind::Round))
    }

    /// A stretch rest, healing 1d6 HP (2d6 with a healer present).
    pub fn stretch_rest(healer_present: bool) -> Self {
        let mut request = Self::new(
            Self::stretch_pool(healer_present),
            RollMode::Rest(RestKind::Stretch),
        );
        request.rest_healer_present = healer_present;
        request
    }

    /// An initiative draw for a combatant.
    pub fn initiative(combatant: CombatantId, pool: DicePool) -> Self {
        let mut request = Self::new(pool, RollMode::Initiative);
        request.combatant_id = Some(combatant);
        request
    }

    /// The HP pool a stretch rest heals with.
    pub fn stretch_pool(healer_present: bool) -> DicePool {
        DicePool::new().add(Die::D6, if healer_present { 2 } else { 1 })
    }

    /// Set the boon or bane.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the target value.
    pub fn with_target(mut self, target: u32) -> Self {
        self.target_value = Some(target);
        self
    }

    /// Set the skill name.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill_name = Some(skill.into());
        self
    }

    /// Reject requests that cannot be rolled as given.
    pub fn validate(&self) -> MechResult<()> {
        if self.dice_pool.is_empty() {
            return Err(invalid("dice pool is empty"));
        }
        self.modifier.validate()?;

        if self.mode.is_d20_check() {
            if !self.dice_pool.is_single_d20() {
                return Err(invalid(format!(
                    "{} needs exactly one d20, got {}",
                    self.mode, self.dice_pool
                )));
            }
            if self.target_value.is_none() {
                return Err(invalid(format!("{} needs a target value", self.mode)));
            }
        }

        match self.mode {
            RollMode::AdvancementRoll if self.skill_name.is_none() => {
                Err(invalid("advancement roll needs a skill name"))
            }
            RollMode::Initiative if self.combatant_id.is_none() => {
                Err(invalid("initiative needs a combatant"))
            }
            RollMode::Rest(RestKind::Stretch)
                if self.dice_pool != Self::stretch_pool(self.rest_healer_present) =>
            {
                Err(invalid(format!(
                    "stretch rest heals {}, got {}",
                    Self::stretch_pool(self.rest_healer_present),
                    self.dice_pool
                )))
            }
            RollMode::Rest(RestKind::Shift) => Err(invalid(
                "shift rest involves no dice; apply it as a direct transition",
            )),
            _ => Ok(()),
        }
    }
}

fn invalid(msg: impl Into<String>) -> MechError {
    MechError::InvalidRequest(msg.into())
}
