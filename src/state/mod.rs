//! Per-guild bot settings.
//!
//! - `store`: the three guild-keyed mappings (`ConfigStore`)
//! - `gate`: the command restriction check

pub mod gate;
pub mod store;

pub use store::{AnnouncementTarget, ConfigStore};
