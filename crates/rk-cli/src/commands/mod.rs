pub mod init;
pub mod play;
pub mod roll;
pub mod show;
pub mod vitals;

use std::fs;

use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;

use rk_mechanics::{
    CharacterId, CombatantId, DirectTransition, EngineConfig, Modifier, RollEngine, RollReport,
    RollRequest,
};

use crate::SessionArgs;
use crate::sheet_file::JsonFileCharacters;

/// Commands that act on an open sheet, from the shell or inside `play`.
#[derive(Subcommand)]
pub enum SheetCommand {
    /// Show the character sheet
    Show,

    /// Roll dice
    Roll {
        #[command(subcommand)]
        roll: roll::RollCommand,
    },

    /// Add or remove HP or WP
    Adjust {
        /// Which track to change
        #[arg(value_enum)]
        track: TrackArg,

        /// Points to add (negative to remove)
        #[arg(allow_hyphen_values = true)]
        amount: i32,
    },

    /// Set, clear or toggle a condition
    Condition {
        /// Condition name (exhausted, sickly, dazed, angry, scared, disheartened)
        name: String,

        /// What to do with it
        #[arg(value_enum, default_value = "toggle")]
        state: Switch,
    },

    /// Make a death roll against CON, or set the counters directly
    Death {
        /// CON target for the roll
        #[arg(required_unless_present_any = ["passed", "failed"])]
        target: Option<u32>,

        /// Set passed death rolls instead of rolling
        #[arg(long, conflicts_with = "target")]
        passed: Option<u8>,

        /// Set failed death rolls instead of rolling
        #[arg(long, conflicts_with = "target")]
        failed: Option<u8>,

        #[command(flatten)]
        modifier: ModifierArgs,
    },

    /// Make a rally roll, or set the rallied flag directly
    Rally {
        /// Target for the roll (the rallying character's skill level)
        #[arg(required_unless_present = "set")]
        target: Option<u32>,

        /// Set the flag instead of rolling
        #[arg(long, value_enum, conflicts_with = "target")]
        set: Option<OnOff>,

        #[command(flatten)]
        modifier: ModifierArgs,
    },

    /// Rest: round (d6 WP), stretch (d6 HP, d6 WP, one condition) or shift (full)
    Rest {
        /// Length of the rest
        #[arg(value_enum)]
        kind: RestArg,

        /// Someone with healing skill helps (stretch heals 2d6)
        #[arg(long)]
        healer: bool,

        /// Apply a known HP amount instead of rolling
        #[arg(long)]
        hp: Option<u32>,

        /// Apply a known WP amount instead of rolling
        #[arg(long)]
        wp: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TrackArg {
    Hp,
    Wp,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OnOff {
    On,
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RestArg {
    Round,
    Stretch,
    Shift,
}

/// Boon or bane dice for a d20 roll.
#[derive(Args, Clone, Copy, Default)]
pub struct ModifierArgs {
    /// Roll extra d20s and keep the lowest (1-3)
    #[arg(long, value_name = "N", conflicts_with = "bane")]
    boon: Option<u8>,

    /// Roll extra d20s and keep the highest (1-3)
    #[arg(long, value_name = "N")]
    bane: Option<u8>,
}

impl ModifierArgs {
    fn to_modifier(self) -> Result<Modifier, String> {
        let modifier = match (self.boon, self.bane) {
            (Some(n), _) => Modifier::boon(n),
            (None, Some(n)) => Modifier::bane(n),
            (None, None) => Ok(Modifier::None),
        };
        modifier.map_err(|e| e.to_string())
    }
}

pub type SheetEngine = RollEngine<JsonFileCharacters>;

/// An engine bound to one character sheet.
pub struct Session {
    engine: SheetEngine,
    character: CharacterId,
    json: bool,
}

impl Session {
    pub fn open(args: &SessionArgs) -> Result<Self, String> {
        let config = load_config(args)?;
        let sheet = JsonFileCharacters::new(&args.sheet);
        let character = sheet.read().map_err(|e| e.to_string())?;

        tracing::debug!(
            sheet = %args.sheet.display(),
            seed = ?config.seed,
            history = config.history_capacity,
            "opening sheet"
        );
        let mut engine = RollEngine::new(sheet, config);
        engine
            .encounter_mut()
            .enlist(CombatantId::from(character.id), character.name.clone());

        Ok(Self {
            engine,
            character: character.id,
            json: args.json,
        })
    }

    pub fn run(&mut self, command: SheetCommand) -> Result<(), String> {
        match command {
            SheetCommand::Show => show::run(self),
            SheetCommand::Roll { roll } => roll::run(self, roll),
            SheetCommand::Adjust { track, amount } => vitals::adjust(self, track, amount),
            SheetCommand::Condition { name, state } => vitals::condition(self, &name, state),
            SheetCommand::Death {
                target,
                passed,
                failed,
                modifier,
            } => vitals::death(self, target, passed, failed, modifier),
            SheetCommand::Rally {
                target,
                set,
                modifier,
            } => vitals::rally(self, target, set, modifier),
            SheetCommand::Rest {
                kind,
                healer,
                hp,
                wp,
            } => vitals::rest(self, kind, healer, hp, wp),
        }
    }

    pub fn character(&self) -> CharacterId {
        self.character
    }

    pub fn engine(&self) -> &SheetEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SheetEngine {
        &mut self.engine
    }

    /// Roll, then print what happened.
    pub fn roll(&mut self, request: RollRequest) -> Result<(), String> {
        let report = self
            .engine
            .request_roll(self.character, request)
            .map_err(|e| e.to_string())?;
        self.print_report(&report)
    }

    /// Apply a dice-free change, then print what happened.
    pub fn apply(&mut self, transition: DirectTransition) -> Result<(), String> {
        let report = self
            .engine
            .apply_direct_transition(self.character, transition)
            .map_err(|e| e.to_string())?;
        self.print_report(&report)
    }

    fn print_report(&self, report: &RollReport) -> Result<(), String> {
        if self.json {
            let json = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
            println!("{json}");
            return Ok(());
        }

        if let (Some(outcome), Some(entry)) = (&report.outcome, self.engine.history().latest()) {
            let line = entry.to_string();
            let line = match (outcome.critical.is_some(), outcome.is_success) {
                (true, Some(true)) => line.green().bold(),
                (true, _) => line.red().bold(),
                (false, Some(true)) => line.green(),
                (false, Some(false)) => line.red(),
                (false, None) => line.normal(),
            };
            println!("  {line}");
            for die in &outcome.secondary_results {
                println!("  {} {} [{}]", "+".dimmed(), die.die, die.value);
            }
        }

        if report.effects.is_empty() {
            println!("  {}", "no change".dimmed());
        }
        for effect in &report.effects {
            if effect.is_life_transition() {
                println!("  {} {}", "•".dimmed(), effect.to_string().yellow().bold());
            } else {
                println!("  {} {effect}", "•".dimmed());
            }
        }
        Ok(())
    }
}

fn load_config(args: &SessionArgs) -> Result<EngineConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
            EngineConfig::from_json_str(&text).map_err(|e| e.to_string())?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(capacity) = args.history {
        config = config.with_history_capacity(capacity);
    }
    Ok(config)
}
