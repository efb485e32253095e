//! History entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::CharacterId;
use crate::resolution::{RollOutcome, RollRequest};

/// A resolved roll, frozen at the moment it was classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollHistoryEntry {
    /// Who rolled.
    pub character: CharacterId,
    /// What was asked for.
    pub request: RollRequest,
    /// How it came out.
    pub outcome: RollOutcome,
    /// When it was rolled.
    pub timestamp: DateTime<Utc>,
}

impl RollHistoryEntry {
    /// Snapshot a roll, stamped with the current time.
    pub fn new(character: CharacterId, request: RollRequest, outcome: RollOutcome) -> Self {
        Self {
            character,
            request,
            outcome,
            timestamp: Utc::now(),
        }
    }

    /// The skill the roll was for, if any.
    pub fn skill(&self) -> Option<&str> {
        self.request.skill_name.as_deref()
    }

    /// Every face drawn, pool first, then boon/bane dice, then secondary dice.
    pub fn all_faces(&self) -> Vec<u32> {
        self.outcome
            .raw_results
            .iter()
            .chain(&self.outcome.modifier_results)
            .chain(&self.outcome.secondary_results)
            .map(|d| d.value)
            .collect()
    }
}

impl std::fmt::Display for RollHistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let raw: Vec<String> = self
            .outcome
            .raw_results
            .iter()
            .map(|d| d.value.to_string())
            .collect();
        write!(
            f,
            "{} {} [{}]",
            self.request.mode,
            self.request.dice_pool,
            raw.join(", ")
        )?;
        if !self.outcome.modifier_results.is_empty() {
            let extra: Vec<String> = self
                .outcome
                .modifier_results
                .iter()
                .map(|d| d.value.to_string())
                .collect();
            write!(f, " {} [{}]", self.request.modifier, extra.join(", "))?;
        }
        if let Some(skill) = self.skill() {
            write!(f, " ({skill})")?;
        }
        write!(f, " = {}", self.outcome)
    }
}
