//! Roster and encounter tracking engine for tabletop skirmish games.
//!
//! This crate provides:
//! - A player roster with hit point and condition tracking
//! - A read-only catalog of enemy team templates
//! - A combat session with armor-ordered turn resolution
//! - Serializable snapshots for presentation layers
//!
//! Everything is synchronous and in memory. Each store owns its list and
//! every mutation takes `&mut self`.
//!
//! # Quick Start
//!
//! ```
//! use skirmish_core::{MonsterId, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::new(TrackerConfig::new())?;
//!
//! let raul = tracker.add_character("Raul", "Operative", 5)?.id();
//! tracker.enlist_character(raul)?;
//! let necron = tracker.enlist_monster(&MonsterId::from("m2"))?.id();
//!
//! tracker.combat_mut().adjust_hp(necron, -4)?;
//! let first = tracker.combat().turn_order()[0].name().to_string();
//! assert_eq!(first, "Necron Team");
//! # Ok::<(), skirmish_core::TrackerError>(())
//! ```

pub mod catalog;
pub mod combat;
pub mod error;
pub mod roster;
pub mod sample;
pub mod tracker;
pub mod world;

// Primary public API
pub use catalog::Catalog;
pub use combat::CombatSession;
pub use error::TrackerError;
pub use roster::{resolve_avatar, RosterStore};
pub use tracker::{DashboardStats, MissionBrief, Tracker, TrackerConfig, TrackerSnapshot};
pub use world::{
    Character, CharacterId, Combatant, Condition, ConditionSet, HitPoints, Monster, MonsterId,
};
