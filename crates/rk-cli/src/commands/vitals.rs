use rk_mechanics::{Condition, DirectTransition, RollRequest};

use super::{ModifierArgs, OnOff, RestArg, Session, Switch, TrackArg};

pub fn adjust(session: &mut Session, track: TrackArg, amount: i32) -> Result<(), String> {
    session.apply(match track {
        TrackArg::Hp => DirectTransition::AdjustHp(amount),
        TrackArg::Wp => DirectTransition::AdjustWp(amount),
    })
}

pub fn condition(session: &mut Session, name: &str, state: Switch) -> Result<(), String> {
    let condition = Condition::from_name(name).ok_or_else(|| {
        let known: Vec<String> = Condition::ALL
            .iter()
            .map(|c| c.to_string().to_lowercase())
            .collect();
        format!(
            "unknown condition \"{name}\" (expected one of: {})",
            known.join(", ")
        )
    })?;
    session.apply(match state {
        Switch::On => DirectTransition::SetCondition {
            condition,
            active: true,
        },
        Switch::Off => DirectTransition::SetCondition {
            condition,
            active: false,
        },
        Switch::Toggle => DirectTransition::ToggleCondition(condition),
    })
}

pub fn death(
    session: &mut Session,
    target: Option<u32>,
    passed: Option<u8>,
    failed: Option<u8>,
    modifier: ModifierArgs,
) -> Result<(), String> {
    if let Some(constitution) = target {
        let request = RollRequest::death_roll(constitution).with_modifier(modifier.to_modifier()?);
        return session.roll(request);
    }

    let id = session.character();
    let vitals = session
        .engine_mut()
        .vitals(id)
        .map_err(|e| e.to_string())?;
    session.apply(DirectTransition::SetDeathRolls {
        passed: passed.unwrap_or(vitals.death_rolls_passed),
        failed: failed.unwrap_or(vitals.death_rolls_failed),
    })
}

pub fn rally(
    session: &mut Session,
    target: Option<u32>,
    set: Option<OnOff>,
    modifier: ModifierArgs,
) -> Result<(), String> {
    match (target, set) {
        (Some(target), _) => {
            session.roll(RollRequest::rally_roll(target).with_modifier(modifier.to_modifier()?))
        }
        (None, Some(state)) => session.apply(DirectTransition::SetRallied(matches!(
            state,
            OnOff::On
        ))),
        (None, None) => Err("pass a rally target or --set on|off".into()),
    }
}

pub fn rest(
    session: &mut Session,
    kind: RestArg,
    healer: bool,
    hp: Option<u32>,
    wp: Option<u32>,
) -> Result<(), String> {
    match kind {
        RestArg::Round => match wp {
            Some(wp) => session.apply(DirectTransition::RoundRest { wp }),
            None => session.roll(RollRequest::round_rest()),
        },
        RestArg::Stretch => match (hp, wp) {
            (None, None) => session.roll(RollRequest::stretch_rest(healer)),
            (hp, wp) => session.apply(DirectTransition::StretchRest {
                hp: hp.unwrap_or(0),
                wp: wp.unwrap_or(0),
            }),
        },
        RestArg::Shift => session.apply(DirectTransition::ShiftRest),
    }
}
