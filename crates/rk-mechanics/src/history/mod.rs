//! Session-scoped record of resolved rolls.

pub mod entry;
pub mod log;

pub use entry::RollHistoryEntry;
pub use log::{DEFAULT_HISTORY_CAPACITY, RollHistory};
