//! Bounded roll history and export.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::entry::RollHistoryEntry;

/// Rolls kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// The most recent rolls of a session, oldest evicted first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollHistory {
    entries: VecDeque<RollHistoryEntry>,
    capacity: usize,
}

impl Default for RollHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RollHistory {
    /// An empty history holding at most `capacity` rolls (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn append(&mut self, entry: RollHistoryEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &RollHistoryEntry> + '_ {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&RollHistoryEntry> {
        self.entries.back()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export the history as markdown, newest first.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Roll History\n\n");
        for entry in self.entries.iter().rev() {
            out.push_str(&format!(
                "- `{}` **{}** {}\n",
                entry.timestamp.format("%H:%M:%S"),
                entry.request.mode,
                describe(entry),
            ));
        }
        out
    }

    /// Export the history as plain text, newest first.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Roll History\n============\n\n");
        for entry in self.entries.iter().rev() {
            out.push_str(&format!(
                "[{}] {entry}\n",
                entry.timestamp.format("%H:%M:%S")
            ));
        }
        out
    }
}

fn describe(entry: &RollHistoryEntry) -> String {
    let faces: Vec<String> = entry.all_faces().iter().map(|v| v.to_string()).collect();
    let mut out = format!("{}: [{}]", entry.request.dice_pool, faces.join(", "));
    if let Some(skill) = entry.skill() {
        out.push_str(&format!(" ({skill})"));
    }
    out.push_str(&format!(" = {}", entry.outcome));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DicePool, Die, DieResult};
    use crate::id::CharacterId;
    use crate::resolution::{Critical, Modifier, RollOutcome, RollRequest};

    fn entry(value: u32) -> RollHistoryEntry {
        RollHistoryEntry::new(
            CharacterId::new(),
            RollRequest::skill_check("Awareness", 12),
            RollOutcome {
                raw_results: vec![DieResult::new(Die::D20, value)],
                modifier_results: Vec::new(),
                secondary_results: Vec::new(),
                final_value: value,
                critical: None,
                is_success: Some(value <= 12),
            },
        )
    }

    #[test]
    fn empty_history() {
        let h = RollHistory::default();
        assert!(h.is_empty());
        assert_eq!(h.len(), 0);
        assert_eq!(h.capacity(), 20);
        assert!(h.latest().is_none());
    }

    #[test]
    fn evicts_oldest_first() {
        let mut h = RollHistory::default();
        for value in 1..=25 {
            h.append(entry(value));
        }
        assert_eq!(h.len(), 20);
        let finals: Vec<u32> = h.entries().map(|e| e.outcome.final_value).collect();
        assert_eq!(finals, (6..=25).collect::<Vec<_>>());
        assert_eq!(h.latest().map(|e| e.outcome.final_value), Some(25));
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut h = RollHistory::new(0);
        h.append(entry(3));
        h.append(entry(4));
        assert_eq!(h.len(), 1);
        assert_eq!(h.latest().map(|e| e.outcome.final_value), Some(4));
    }

    #[test]
    fn clear_empties() {
        let mut h = RollHistory::default();
        h.append(entry(3));
        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    fn export_markdown_lists_newest_first() {
        let mut h = RollHistory::default();
        h.append(entry(3));
        h.append(entry(15));
        let md = h.export_markdown();
        assert!(md.starts_with("# Roll History"));
        let first = md.find("[15]").unwrap();
        let second = md.find("[3]").unwrap();
        assert!(first < second);
        assert!(md.contains("(Awareness) = 3 (success)"));
    }

    #[test]
    fn export_text_shows_modifier_dice_and_criticals() {
        let mut h = RollHistory::default();
        let request = RollRequest::skill_check("Bows", 10).with_modifier(Modifier::Boon(1));
        h.append(RollHistoryEntry::new(
            CharacterId::new(),
            request,
            RollOutcome {
                raw_results: vec![DieResult::new(Die::D20, 14)],
                modifier_results: vec![DieResult::new(Die::D20, 1)],
                secondary_results: Vec::new(),
                final_value: 1,
                critical: Some(Critical::Dragon),
                is_success: Some(true),
            },
        ));
        let txt = h.export_text();
        assert!(txt.contains("skill check d20 [14] boon x1 [1] (Bows) = Dragon (success)"));
    }

    #[test]
    fn all_faces_in_draw_order() {
        let mut e = entry(9);
        e.outcome.secondary_results.push(DieResult::new(Die::D6, 2));
        assert_eq!(e.all_faces(), vec![9, 2]);
        assert_eq!(e.request.dice_pool, DicePool::single(Die::D20));
    }

    #[test]
    fn history_serde_roundtrip() {
        let mut h = RollHistory::new(5);
        h.append(entry(7));
        let json = serde_json::to_string(&h).unwrap();
        let back: RollHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.capacity(), 5);
    }
}
