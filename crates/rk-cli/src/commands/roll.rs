use clap::Subcommand;

use rk_mechanics::{CombatantId, DicePool, RollMode, RollRequest};

use super::{ModifierArgs, Session};

#[derive(Subcommand)]
pub enum RollCommand {
    /// Skill check: roll d20 under the skill level
    Skill {
        /// Skill name (case-insensitive)
        skill: String,

        /// Skill level to roll under (default: the sheet's level)
        #[arg(long)]
        level: Option<u32>,

        #[command(flatten)]
        modifier: ModifierArgs,
    },

    /// Roll any dice expression, e.g. `2d6+d4`
    Dice {
        /// Dice expression
        expr: String,

        /// Roll under this value (single d20 rolls also score Dragon/Demon)
        #[arg(short, long)]
        target: Option<u32>,

        #[command(flatten)]
        modifier: ModifierArgs,
    },

    /// Advancement roll: roll d20 over the skill level to improve it
    Advance {
        /// Skill name (case-insensitive)
        skill: String,

        /// Skill level to beat (default: the sheet's level)
        #[arg(long)]
        level: Option<u32>,
    },

    /// Recovery roll for a stabilized character
    Recovery {
        /// Dice to heal with
        #[arg(default_value = "d6")]
        dice: String,
    },

    /// Initiative draw for this character
    Initiative {
        /// Dice to draw with
        #[arg(default_value = "d10")]
        dice: String,
    },
}

pub fn run(session: &mut Session, command: RollCommand) -> Result<(), String> {
    let request = match command {
        RollCommand::Skill {
            skill,
            level,
            modifier,
        } => {
            let (name, level) = skill_level(session, &skill, level)?;
            RollRequest::skill_check(name, level).with_modifier(modifier.to_modifier()?)
        }
        RollCommand::Dice {
            expr,
            target,
            modifier,
        } => {
            let mut request = RollRequest::new(parse_pool(&expr)?, RollMode::Generic)
                .with_modifier(modifier.to_modifier()?);
            if let Some(target) = target {
                request = request.with_target(target);
            }
            request
        }
        RollCommand::Advance { skill, level } => {
            let (name, level) = skill_level(session, &skill, level)?;
            RollRequest::advancement(name, level)
        }
        RollCommand::Recovery { dice } => RollRequest::recovery(parse_pool(&dice)?),
        RollCommand::Initiative { dice } => {
            let combatant = CombatantId::from(session.character());
            RollRequest::initiative(combatant, parse_pool(&dice)?)
        }
    };
    session.roll(request)
}

fn parse_pool(expr: &str) -> Result<DicePool, String> {
    expr.parse::<DicePool>().map_err(|e| e.to_string())
}

/// Resolve a skill against the sheet, letting an explicit level win.
fn skill_level(
    session: &mut Session,
    skill: &str,
    level: Option<u32>,
) -> Result<(String, u32), String> {
    let id = session.character();
    let character = session
        .engine_mut()
        .character(id)
        .map_err(|e| e.to_string())?;
    match (character.skill(skill), level) {
        (Some((name, _)), Some(level)) => Ok((name.to_string(), level)),
        (Some((name, sheet_level)), None) => Ok((name.to_string(), sheet_level)),
        (None, Some(level)) => Ok((skill.to_string(), level)),
        (None, None) => Err(format!(
            "'{}' has no skill \"{skill}\"; pass --level",
            character.name
        )),
    }
}
