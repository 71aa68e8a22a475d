//! Domain records read by the reminder engine.
//!
//! Goals and intake entries are owned by the host application; the engine
//! only reads them.

mod entry;
mod goal;

pub use entry::IntakeEntry;
pub use goal::Goal;

/// Whether two intake names refer to the same thing (Unicode case-insensitive).
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
