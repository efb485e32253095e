use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use rk_mechanics::{AdvancementTracker, CombatantId, LifeState};

use super::Session;

pub fn run(session: &mut Session) -> Result<(), String> {
    let id = session.character();
    let character = session
        .engine_mut()
        .character(id)
        .map_err(|e| e.to_string())?
        .clone();
    let vitals = &character.vitals;

    let state = vitals.life_state();
    let state_str = match state {
        LifeState::Alive => state.to_string().green(),
        LifeState::Dying => state.to_string().red().bold(),
        LifeState::Stabilized => state.to_string().yellow(),
        LifeState::Deceased => state.to_string().dimmed(),
    };
    println!("  {} [{}]", character.name.bold(), state_str);
    let sheet = session.engine().characters().path().display().to_string();
    println!("  {}", format!("{sheet} ({})", character.id.0).dimmed());
    println!();

    println!("  HP  {}", vitals.hp);
    println!("  WP  {}", vitals.wp);
    if vitals.current_hp() == 0 {
        println!(
            "  death rolls  {} passed, {} failed",
            vitals.death_rolls_passed, vitals.death_rolls_failed
        );
        if vitals.is_rallied {
            println!("  {}", "rallied".bold());
        }
    }
    if !vitals.conditions.is_empty() {
        let names: Vec<String> = vitals.conditions.iter().map(|c| c.to_string()).collect();
        println!("  conditions   {}", names.join(", "));
    }

    let engine = session.engine();
    if let Some(initiative) = engine.encounter().initiative_of(CombatantId::from(id)) {
        println!("  initiative   {initiative}");
    }

    if !character.skills.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Skill", "Level", "Advancement"]);
        for (skill, level) in &character.skills {
            let marked = if engine.advancements().is_eligible(id, skill) {
                "marked"
            } else {
                ""
            };
            table.add_row(vec![skill.clone(), level.to_string(), marked.to_string()]);
        }
        println!();
        println!("{table}");
    }

    Ok(())
}
