//! Skirmish entity types.
//!
//! Contains the value types shared by the roster, the enemy catalog and the
//! combat session: characters (and combatants, which reuse the character
//! shape), monster templates, status conditions and hit points.

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters and combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell combatants apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a catalog template, e.g. `m1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonsterId(pub String);

impl MonsterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MonsterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// Status conditions a character or combatant can carry.
///
/// Declaration order is display order; `ConditionSet` iterates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Condition {
    Poisoned,
    Prone,
    Paralyzed,
    Concentration,
    Advantage,
    Disadvantage,
    Invisible,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::Poisoned,
        Condition::Prone,
        Condition::Paralyzed,
        Condition::Concentration,
        Condition::Advantage,
        Condition::Disadvantage,
        Condition::Invisible,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Condition::Poisoned => "Poisoned",
            Condition::Prone => "Prone",
            Condition::Paralyzed => "Paralyzed",
            Condition::Concentration => "Concentration",
            Condition::Advantage => "Advantage",
            Condition::Disadvantage => "Disadvantage",
            Condition::Invisible => "Invisible",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Condition {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Condition::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TrackerError::validation(format!("unknown condition: {wanted}")))
    }
}

/// A duplicate-free set of conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(BTreeSet<Condition>);

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.0.contains(&condition)
    }

    /// Flip membership of `condition`. Returns whether it is now present.
    pub fn toggle(&mut self, condition: Condition) -> bool {
        if self.0.remove(&condition) {
            false
        } else {
            self.0.insert(condition);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|c| c.name()).collect()
    }
}

impl FromIterator<Condition> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Hit Points
// ============================================================================

/// Hit points tracking.
///
/// Fields are private so `0 <= current <= maximum` and `maximum > 0` hold
/// for every value that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHitPoints")]
pub struct HitPoints {
    #[serde(rename = "hp")]
    current: i32,
    #[serde(rename = "maxHp")]
    maximum: i32,
}

impl HitPoints {
    /// Full health. A non-positive maximum is raised to 1.
    pub fn new(maximum: i32) -> Self {
        let maximum = maximum.max(1);
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Store `value` clamped into `[0, maximum]`. Returns the stored value.
    pub fn set(&mut self, value: i32) -> i32 {
        self.current = value.clamp(0, self.maximum);
        self.current
    }

    /// Shift by `delta`, clamped into `[0, maximum]`. Returns the stored value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.set(self.current.saturating_add(delta))
    }

    pub fn is_down(&self) -> bool {
        self.current == 0
    }

    pub fn ratio(&self) -> f32 {
        self.current as f32 / self.maximum as f32
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHitPoints {
    hp: i32,
    max_hp: i32,
}

impl TryFrom<RawHitPoints> for HitPoints {
    type Error = TrackerError;

    fn try_from(raw: RawHitPoints) -> Result<Self, Self::Error> {
        if raw.max_hp <= 0 {
            return Err(TrackerError::validation(format!(
                "maxHp must be positive, got {}",
                raw.max_hp
            )));
        }
        if !(0..=raw.max_hp).contains(&raw.hp) {
            return Err(TrackerError::validation(format!(
                "hp {} outside 0..={}",
                raw.hp, raw.max_hp
            )));
        }
        Ok(Self {
            current: raw.hp,
            maximum: raw.max_hp,
        })
    }
}

// ============================================================================
// Characters
// ============================================================================

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;

/// Armor shown for a character whose armor was never recorded.
pub const DISPLAY_AC_FALLBACK: i32 = 10;

/// Armor used for turn order when none was recorded. Never written back.
pub const RANKING_AC_FALLBACK: i32 = 0;

/// Roles offered by the creation form. `class` itself is free text.
pub const CHARACTER_CLASSES: [&str; 6] = [
    "Gunner",
    "Sniper",
    "Leader",
    "Scout",
    "Specialist",
    "Demolitions",
];

/// A player-controlled unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: String,
    class: String,
    level: u8,
    #[serde(flatten)]
    hit_points: HitPoints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ac: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spell_slots: Option<u32>,
    #[serde(default)]
    conditions: ConditionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_image: Option<String>,
}

/// A participant in the current encounter. Same shape as a character, but
/// owned by the combat session and independent of any roster entry.
pub type Combatant = Character;

impl Character {
    /// Create a character at full health with a fresh id.
    ///
    /// Fails if `name` is blank or `level` is outside 1..=20.
    pub fn new(
        name: impl Into<String>,
        class: impl Into<String>,
        level: u8,
        max_hp: i32,
    ) -> Result<Self, TrackerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TrackerError::validation("name must not be empty"));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(TrackerError::validation(format!(
                "level must be between {MIN_LEVEL} and {MAX_LEVEL}, got {level}"
            )));
        }

        Ok(Self {
            id: CharacterId::new(),
            name,
            class: class.into(),
            level,
            hit_points: HitPoints::new(max_hp),
            ac: None,
            spell_slots: None,
            conditions: ConditionSet::new(),
            custom_image: None,
        })
    }

    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = Some(ac);
        self
    }

    pub fn with_spell_slots(mut self, slots: u32) -> Self {
        self.spell_slots = Some(slots);
        self
    }

    pub fn with_custom_image(mut self, image: impl Into<String>) -> Self {
        self.custom_image = Some(image.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        if !self.conditions.contains(condition) {
            self.conditions.toggle(condition);
        }
        self
    }

    pub fn with_current_hp(mut self, hp: i32) -> Self {
        self.hit_points.set(hp);
        self
    }

    /// Value copy of the current state under a fresh id.
    pub fn copy_with_fresh_id(&self) -> Self {
        Self {
            id: CharacterId::new(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn hit_points(&self) -> HitPoints {
        self.hit_points
    }

    pub fn hp(&self) -> i32 {
        self.hit_points.current()
    }

    pub fn max_hp(&self) -> i32 {
        self.hit_points.maximum()
    }

    pub fn ac(&self) -> Option<i32> {
        self.ac
    }

    pub fn display_ac(&self) -> i32 {
        self.ac.unwrap_or(DISPLAY_AC_FALLBACK)
    }

    pub fn ranking_ac(&self) -> i32 {
        self.ac.unwrap_or(RANKING_AC_FALLBACK)
    }

    pub fn spell_slots(&self) -> Option<u32> {
        self.spell_slots
    }

    pub fn available_spell_slots(&self) -> u32 {
        self.spell_slots.unwrap_or(0)
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(condition)
    }

    pub fn custom_image(&self) -> Option<&str> {
        self.custom_image.as_deref()
    }

    pub fn set_hp(&mut self, value: i32) -> i32 {
        self.hit_points.set(value)
    }

    pub fn adjust_hp(&mut self, delta: i32) -> i32 {
        self.hit_points.adjust(delta)
    }

    pub fn toggle_condition(&mut self, condition: Condition) -> bool {
        self.conditions.toggle(condition)
    }

    pub fn set_custom_image(&mut self, image: impl Into<String>) {
        self.custom_image = Some(image.into());
    }
}

// ============================================================================
// Monsters
// ============================================================================

/// An enemy team template from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    /// Faction label. Becomes the combatant's class.
    #[serde(rename = "type")]
    pub kind: String,
    pub ac: i32,
    pub hp: i32,
    /// Dice notation, kept as opaque text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<String>,
}

impl Monster {
    pub fn new(
        id: impl Into<MonsterId>,
        name: impl Into<String>,
        kind: impl Into<String>,
        ac: i32,
        hp: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            ac,
            hp,
            damage: None,
            abilities: Vec::new(),
        }
    }

    pub fn with_damage(mut self, damage: impl Into<String>) -> Self {
        self.damage = Some(damage.into());
        self
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    /// Build a fresh level-1 combatant from this template.
    ///
    /// A template with `hp <= 0` yields a 1/1 combatant; use
    /// `CombatSession::add_from_monster` to reject such templates instead.
    pub fn instantiate(&self) -> Combatant {
        Character {
            id: CharacterId::new(),
            name: self.name.clone(),
            class: self.kind.clone(),
            level: MIN_LEVEL,
            hit_points: HitPoints::new(self.hp),
            ac: Some(self.ac),
            spell_slots: Some(0),
            conditions: ConditionSet::new(),
            custom_image: None,
        }
    }
}

impl From<String> for MonsterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_points_clamp() {
        let mut hp = HitPoints::new(30);
        assert_eq!(hp.current(), 30);

        assert_eq!(hp.set(-5), 0);
        assert!(hp.is_down());
        assert_eq!(hp.set(99), 30);
        assert_eq!(hp.set(12), 12);

        assert_eq!(hp.adjust(-20), 0);
        assert_eq!(hp.adjust(i32::MAX), 30);
        assert_eq!(hp.adjust(i32::MIN), 0);
    }

    #[test]
    fn test_hit_points_minimum_maximum() {
        let hp = HitPoints::new(0);
        assert_eq!(hp.maximum(), 1);
        assert_eq!(hp.current(), 1);
    }

    #[test]
    fn test_condition_parse() {
        assert_eq!("poisoned".parse::<Condition>().unwrap(), Condition::Poisoned);
        assert_eq!(
            " CONCENTRATION ".parse::<Condition>().unwrap(),
            Condition::Concentration
        );
        assert!(matches!(
            "Sleepy".parse::<Condition>(),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn test_condition_set_display_order() {
        let mut set = ConditionSet::new();
        set.toggle(Condition::Invisible);
        set.toggle(Condition::Poisoned);
        set.toggle(Condition::Concentration);
        assert_eq!(set.names(), vec!["Poisoned", "Concentration", "Invisible"]);

        assert!(!set.toggle(Condition::Poisoned));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_character_validation() {
        assert!(Character::new("   ", "Operative", 1, 30).is_err());
        assert!(Character::new("Raul", "Operative", 0, 30).is_err());
        assert!(Character::new("Raul", "Operative", 21, 30).is_err());

        let raul = Character::new("Raul", "Operative", 20, 30).unwrap();
        assert_eq!(raul.hp(), 30);
        assert_eq!(raul.max_hp(), 30);
        assert_eq!(raul.ac(), None);
        assert_eq!(raul.display_ac(), 10);
        assert_eq!(raul.ranking_ac(), 0);
        assert_eq!(raul.available_spell_slots(), 0);
        assert!(raul.conditions().is_empty());
    }

    #[test]
    fn test_class_is_free_text() {
        let odd = Character::new("Vex", "Chaplain of Nowhere", 3, 20).unwrap();
        assert_eq!(odd.class(), "Chaplain of Nowhere");
        assert!(!CHARACTER_CLASSES.contains(&odd.class()));
    }

    #[test]
    fn test_monster_instantiate() {
        let necron = Monster::new("m2", "Necron Team", "Xenos", 13, 15);
        let a = necron.instantiate();
        let b = necron.instantiate();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), "Necron Team");
        assert_eq!(a.class(), "Xenos");
        assert_eq!(a.level(), 1);
        assert_eq!(a.hp(), 15);
        assert_eq!(a.max_hp(), 15);
        assert_eq!(a.ac(), Some(13));
        assert_eq!(a.spell_slots(), Some(0));
        assert!(a.conditions().is_empty());
    }

    #[test]
    fn test_character_serialization_shape() {
        let raul = Character::new("Raul", "Operative", 5, 45)
            .unwrap()
            .with_ac(16)
            .with_condition(Condition::Prone);
        let json = serde_json::to_value(&raul).unwrap();

        assert_eq!(json["hp"], 45);
        assert_eq!(json["maxHp"], 45);
        assert_eq!(json["class"], "Operative");
        assert_eq!(json["conditions"][0], "Prone");
        assert!(json.get("customImage").is_none());

        let back: Character = serde_json::from_value(json).unwrap();
        assert_eq!(back, raul);
    }

    #[test]
    fn test_deserialize_rejects_broken_hit_points() {
        let json = serde_json::json!({
            "id": CharacterId::new(),
            "name": "Broken",
            "class": "Operative",
            "level": 1,
            "hp": 40,
            "maxHp": 30,
        });
        assert!(serde_json::from_value::<Character>(json).is_err());
    }
}
