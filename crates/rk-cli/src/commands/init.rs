use std::path::Path;

use rk_mechanics::Character;

use crate::sheet_file::JsonFileCharacters;

pub fn run(path: &Path, name: &str, hp: i32, wp: i32, skills: &[String]) -> Result<(), String> {
    if hp < 1 || wp < 1 {
        return Err("maximum HP and WP must be at least 1".into());
    }

    let mut character = Character::new(name, hp, wp);
    for entry in skills {
        let (skill, level) = parse_skill(entry)?;
        character = character.with_skill(skill, level);
    }

    JsonFileCharacters::create(path, &character)?;

    println!("Created {} in {}", name, path.display());
    println!("  HP {hp}  WP {wp}  skills {}", character.skills.len());
    println!();
    println!("Get started:");
    println!("  rk show              # Show the sheet");
    println!("  rk roll skill <name> # Roll a skill check");
    println!("  rk play              # Interactive session");

    Ok(())
}

fn parse_skill(entry: &str) -> Result<(&str, u32), String> {
    let (name, level) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=LEVEL, got \"{entry}\""))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing skill name in \"{entry}\""));
    }
    let level = level
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid skill level in \"{entry}\""))?;
    Ok((name, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_skill_specs() {
        assert_eq!(parse_skill("Swords=12"), Ok(("Swords", 12)));
        assert_eq!(parse_skill(" Bows = 9 "), Ok(("Bows", 9)));
        assert!(parse_skill("Swords").is_err());
        assert!(parse_skill("=3").is_err());
        assert!(parse_skill("Swords=high").is_err());
    }
}
