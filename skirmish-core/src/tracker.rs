//! Tracker - the primary public API for running a skirmish table.
//!
//! Bundles the roster, the enemy catalog and the current encounter into a
//! single owned value with an explicit lifecycle: build one when the
//! session starts, drop it when the session ends.

use crate::catalog::Catalog;
use crate::combat::CombatSession;
use crate::error::TrackerError;
use crate::roster::{RosterStore, DEFAULT_AVATAR_BASE_URL, DEFAULT_HP};
use crate::sample;
use crate::world::{Character, CharacterId, Combatant, Monster, MonsterId};
use serde::Serialize;
use tracing::info;

/// Configuration for creating a new tracker.
#[derive(Debug, Clone)]
///
/// Fields are only set through the `with_*` builders, which validate.
pub struct TrackerConfig {
    /// Hit points given to newly added operatives.
    default_hp: i32,

    /// Generated-avatar service used when a character has no custom image.
    avatar_base_url: String,

    /// Start with the sample team, opening encounter and mission brief.
    seed_sample_data: bool,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self {
            default_hp: DEFAULT_HP,
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
            seed_sample_data: false,
        }
    }

    /// Read overrides from `SKIRMISH_DEFAULT_HP`, `SKIRMISH_AVATAR_BASE_URL`
    /// and `SKIRMISH_SEED`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, TrackerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TrackerError> {
        let mut config = Self::new();

        if let Some(raw) = lookup("SKIRMISH_DEFAULT_HP") {
            let hp: i32 = raw.trim().parse().map_err(|_| {
                TrackerError::validation(format!("SKIRMISH_DEFAULT_HP is not a number: {raw}"))
            })?;
            config = config.with_default_hp(hp)?;
        }
        if let Some(url) = lookup("SKIRMISH_AVATAR_BASE_URL") {
            config = config.with_avatar_base_url(url);
        }
        if let Some(raw) = lookup("SKIRMISH_SEED") {
            let seed = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(TrackerError::validation(format!(
                        "SKIRMISH_SEED is not a boolean: {raw}"
                    )))
                }
            };
            config = config.with_sample_data(seed);
        }

        Ok(config)
    }

    /// Set the starting hit points. Must be positive.
    pub fn with_default_hp(mut self, hp: i32) -> Result<Self, TrackerError> {
        if hp <= 0 {
            return Err(TrackerError::validation(format!(
                "default hp must be positive, got {hp}"
            )));
        }
        self.default_hp = hp;
        Ok(self)
    }

    pub fn with_avatar_base_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_base_url = url.into();
        self
    }

    pub fn with_sample_data(mut self, seed: bool) -> Self {
        self.seed_sample_data = seed;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Static briefing for the team's current mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionBrief {
    pub team_name: String,
    pub faction: String,
    pub current_match: String,
    pub active_matches: u32,
}

/// Headline numbers for the team overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub team_size: usize,
    /// Team hit points as a rounded percentage of team maximum.
    pub operational_status_pct: u32,
    pub combatants: usize,
    pub active_combatant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission: Option<MissionBrief>,
}

/// A roster entry with display values already resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    #[serde(flatten)]
    pub character: Character,
    pub avatar: String,
    pub display_ac: i32,
    /// Fill of the health bar, `hp / maxHp` in `[0, 1]`.
    pub hp_ratio: f32,
}

/// A combatant in its turn-order slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEntry {
    pub position: usize,
    pub active: bool,
    #[serde(flatten)]
    pub combatant: Combatant,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub dashboard: DashboardStats,
    pub roster: Vec<RosterEntry>,
    pub catalog: Vec<Monster>,
    pub turn_order: Vec<TurnEntry>,
}

impl TrackerSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The roster, the catalog and the live encounter for one session.
#[derive(Debug, Clone)]
pub struct Tracker {
    mission: Option<MissionBrief>,
    roster: RosterStore,
    catalog: Catalog,
    combat: CombatSession,
}

impl Tracker {
    /// Create a tracker with the standard catalog.
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        Self::with_catalog(config, Catalog::standard()?)
    }

    pub fn with_catalog(config: TrackerConfig, catalog: Catalog) -> Result<Self, TrackerError> {
        let mut roster = RosterStore::new()
            .with_default_hp(config.default_hp)?
            .with_avatar_base_url(config.avatar_base_url);
        let mut combat = CombatSession::new();
        let mut mission = None;

        if config.seed_sample_data {
            sample::seed(&mut roster, &mut combat)?;
            mission = Some(sample::mission());
        }

        info!(
            roster = roster.len(),
            catalog = catalog.len(),
            combatants = combat.len(),
            "Tracker ready"
        );

        Ok(Self {
            mission,
            roster,
            catalog,
            combat,
        })
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut RosterStore {
        &mut self.roster
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn combat(&self) -> &CombatSession {
        &self.combat
    }

    pub fn combat_mut(&mut self) -> &mut CombatSession {
        &mut self.combat
    }

    pub fn add_character(
        &mut self,
        name: impl Into<String>,
        class: impl Into<String>,
        level: u8,
    ) -> Result<&Character, TrackerError> {
        self.roster.add(name, class, level)
    }

    /// Copy a roster character into the encounter.
    pub fn enlist_character(&mut self, id: CharacterId) -> Result<&Combatant, TrackerError> {
        let character = self.roster.get(id)?;
        Ok(self.combat.add_from_character(character))
    }

    /// Instantiate a catalog template into the encounter.
    pub fn enlist_monster(&mut self, id: &MonsterId) -> Result<&Combatant, TrackerError> {
        let monster = self.catalog.get(id)?;
        self.combat.add_from_monster(monster)
    }

    pub fn avatar(&self, character: &Character) -> String {
        self.roster.resolve_avatar(character)
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats {
            team_size: self.roster.len(),
            operational_status_pct: operational_status_pct(self.roster.list()),
            combatants: self.combat.len(),
            active_combatant: self
                .combat
                .active_combatant()
                .map(|c| c.name().to_string()),
            mission: self.mission.clone(),
        }
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let roster = self
            .roster
            .list()
            .iter()
            .map(|c| RosterEntry {
                character: c.clone(),
                avatar: self.avatar(c),
                display_ac: c.display_ac(),
                hp_ratio: c.hit_points().ratio(),
            })
            .collect();

        let turn_order = self
            .combat
            .turn_order()
            .into_iter()
            .enumerate()
            .map(|(position, c)| TurnEntry {
                position,
                active: position == 0,
                combatant: c.clone(),
            })
            .collect();

        TrackerSnapshot {
            dashboard: self.dashboard(),
            roster,
            catalog: self.catalog.list().to_vec(),
            turn_order,
        }
    }
}

/// Rounded `sum(hp) / sum(maxHp)` as a percentage, 0 for an empty team.
fn operational_status_pct(characters: &[Character]) -> u32 {
    let (hp, max) = characters.iter().fold((0i64, 0i64), |(hp, max), c| {
        (hp + i64::from(c.hp()), max + i64::from(c.max_hp()))
    });
    if max == 0 {
        return 0;
    }
    // Half rounds up.
    ((hp * 200 + max) / (2 * max)) as u32
}
