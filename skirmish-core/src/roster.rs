//! The player roster.
//!
//! `RosterStore` owns the authoritative list of player characters. It is
//! the only place characters are created, so id uniqueness and the hit
//! point bounds are enforced here for the whole team.

use crate::error::TrackerError;
use crate::world::{Character, CharacterId, Condition};
use tracing::{debug, info, warn};

/// Hit points given to a freshly added operative.
pub const DEFAULT_HP: i32 = 30;

/// Generated-avatar service used when a character has no custom image.
pub const DEFAULT_AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/lorelei/svg";

/// Resolve the picture for a character against the default avatar service.
pub fn resolve_avatar(character: &Character) -> String {
    resolve_avatar_with(character, DEFAULT_AVATAR_BASE_URL)
}

/// Resolve the picture for a character: its custom image if one was set,
/// otherwise a generated avatar seeded by its name. An empty image counts
/// as unset.
pub fn resolve_avatar_with(character: &Character, base_url: &str) -> String {
    match character.custom_image() {
        Some(image) if !image.is_empty() => image.to_string(),
        _ => format!(
            "{base_url}?seed={}&scale=80&backgroundColor=b6e3f5",
            urlencoding::encode(character.name())
        ),
    }
}

/// Owns the player team.
#[derive(Debug, Clone)]
pub struct RosterStore {
    characters: Vec<Character>,
    default_hp: i32,
    avatar_base_url: String,
}

impl RosterStore {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
            default_hp: DEFAULT_HP,
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
        }
    }

    /// Set the hit points new operatives start with. Must be positive.
    pub fn with_default_hp(mut self, hp: i32) -> Result<Self, TrackerError> {
        if hp <= 0 {
            return Err(TrackerError::validation(format!(
                "default hp must be positive, got {hp}"
            )));
        }
        self.default_hp = hp;
        Ok(self)
    }

    /// Set the generated-avatar service base URL.
    pub fn with_avatar_base_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_base_url = url.into();
        self
    }

    /// Add a new operative at full health.
    ///
    /// Fails without touching the roster if the name is blank or the level
    /// is outside 1..=20.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        class: impl Into<String>,
        level: u8,
    ) -> Result<&Character, TrackerError> {
        let character = Character::new(name, class, level, self.default_hp).inspect_err(|e| {
            warn!(error = %e, "Rejected new operative");
        })?;
        self.insert(character)
    }

    /// Insert a fully built character, e.g. when seeding a team.
    ///
    /// Fails if a character with the same id is already on the roster.
    pub fn insert(&mut self, character: Character) -> Result<&Character, TrackerError> {
        if self.contains(character.id()) {
            return Err(TrackerError::validation(format!(
                "duplicate character id {}",
                character.id()
            )));
        }

        info!(id = %character.id(), name = character.name(), class = character.class(), "Operative added to roster");
        self.characters.push(character);
        Ok(&self.characters[self.characters.len() - 1])
    }

    /// Set hit points, clamped into `[0, maxHp]`.
    pub fn set_hp(&mut self, id: CharacterId, value: i32) -> Result<&Character, TrackerError> {
        let character = self.find_mut(id)?;
        let stored = character.set_hp(value);
        debug!(%id, requested = value, stored, "Roster hp set");
        Ok(character)
    }

    /// Remove a character. Unknown ids are ignored.
    pub fn remove(&mut self, id: CharacterId) {
        let before = self.characters.len();
        self.characters.retain(|c| c.id() != id);
        if self.characters.len() < before {
            info!(%id, "Operative removed from roster");
        } else {
            debug!(%id, "Remove ignored, operative not on roster");
        }
    }

    /// Add the condition if absent, remove it if present.
    pub fn toggle_condition(
        &mut self,
        id: CharacterId,
        condition: Condition,
    ) -> Result<&Character, TrackerError> {
        let character = self.find_mut(id)?;
        let applied = character.toggle_condition(condition);
        debug!(%id, %condition, applied, "Roster condition toggled");
        Ok(character)
    }

    /// Replace the character's custom image reference.
    pub fn set_image(
        &mut self,
        id: CharacterId,
        image: impl Into<String>,
    ) -> Result<&Character, TrackerError> {
        let character = self.find_mut(id)?;
        character.set_custom_image(image);
        debug!(%id, "Roster image replaced");
        Ok(character)
    }

    /// Resolve a character's picture against this roster's avatar service.
    pub fn resolve_avatar(&self, character: &Character) -> String {
        resolve_avatar_with(character, &self.avatar_base_url)
    }

    pub fn get(&self, id: CharacterId) -> Result<&Character, TrackerError> {
        self.characters
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| TrackerError::not_found("Character", id))
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.characters.iter().any(|c| c.id() == id)
    }

    /// Characters in the order they joined.
    pub fn list(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    fn find_mut(&mut self, id: CharacterId) -> Result<&mut Character, TrackerError> {
        self.characters
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| TrackerError::not_found("Character", id))
    }
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_defaults() {
        let mut roster = RosterStore::new();
        let added = roster.add("Kasrkin", "Sniper", 3).unwrap().clone();

        assert_eq!(added.name(), "Kasrkin");
        assert_eq!(added.class(), "Sniper");
        assert_eq!(added.level(), 3);
        assert_eq!(added.hp(), 30);
        assert_eq!(added.max_hp(), 30);
        assert_eq!(added.ac(), None);
        assert_eq!(added.spell_slots(), None);
        assert!(added.conditions().is_empty());
        assert_eq!(added.custom_image(), None);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let mut roster = RosterStore::new();
        let err = roster.add("   \t", "Operative", 1).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_add_rejects_bad_level() {
        let mut roster = RosterStore::new();
        assert!(roster.add("Raul", "Operative", 0).is_err());
        assert!(roster.add("Raul", "Operative", 21).is_err());
        assert!(roster.is_empty());
    }

    #[test]
    fn test_configured_default_hp() {
        let mut roster = RosterStore::new().with_default_hp(12).unwrap();
        let added = roster.add("Raul", "Operative", 1).unwrap();
        assert_eq!(added.hp(), 12);
        assert_eq!(added.max_hp(), 12);
    }

    #[test]
    fn test_default_hp_must_be_positive() {
        for hp in [0, -5, i32::MIN] {
            let err = RosterStore::new().with_default_hp(hp).unwrap_err();
            assert!(matches!(err, TrackerError::Validation(_)));
        }
    }

    #[test]
    fn test_set_hp_clamps() {
        let mut roster = RosterStore::new();
        let id = roster.add("Raul", "Operative", 1).unwrap().id();

        assert_eq!(roster.set_hp(id, -4).unwrap().hp(), 0);
        assert_eq!(roster.set_hp(id, 31).unwrap().hp(), 30);
        assert_eq!(roster.set_hp(id, 17).unwrap().hp(), 17);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut roster = RosterStore::new();
        roster.add("Raul", "Operative", 1).unwrap();
        let ghost = CharacterId::new();

        assert!(roster.set_hp(ghost, 5).unwrap_err().is_not_found());
        assert!(roster
            .toggle_condition(ghost, Condition::Prone)
            .unwrap_err()
            .is_not_found());
        assert!(roster.set_image(ghost, "x").unwrap_err().is_not_found());
        assert!(roster.get(ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut roster = RosterStore::new();
        let keep = roster.add("Raul", "Operative", 1).unwrap().id();
        let gone = roster.add("Sog.Wog", "Specialist", 1).unwrap().id();

        roster.remove(gone);
        assert_eq!(roster.len(), 1);
        roster.remove(gone);
        roster.remove(CharacterId::new());
        assert_eq!(roster.len(), 1);
        assert!(roster.contains(keep));
    }

    #[test]
    fn test_toggle_condition_twice_restores() {
        let mut roster = RosterStore::new();
        let id = roster.add("Raul", "Operative", 1).unwrap().id();

        let c = roster.toggle_condition(id, Condition::Poisoned).unwrap();
        assert!(c.has_condition(Condition::Poisoned));
        let c = roster.toggle_condition(id, Condition::Poisoned).unwrap();
        assert!(c.conditions().is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut roster = RosterStore::new();
        let raul = Character::new("Raul", "Operative", 5, 45).unwrap();
        roster.insert(raul.clone()).unwrap();
        assert!(roster.insert(raul).is_err());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_avatar_fallback_and_custom_image() {
        let mut roster = RosterStore::new();
        let id = roster.add("Sog Wog/2", "Specialist", 1).unwrap().id();

        let avatar = roster.resolve_avatar(roster.get(id).unwrap());
        assert_eq!(
            avatar,
            "https://api.dicebear.com/7.x/lorelei/svg?seed=Sog%20Wog%2F2&scale=80&backgroundColor=b6e3f5"
        );

        roster.set_image(id, "data:image/png;base64,AAAA").unwrap();
        assert_eq!(
            roster.resolve_avatar(roster.get(id).unwrap()),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_avatar_is_deterministic() {
        let a = Character::new("Raul", "Operative", 1, 30).unwrap();
        let b = Character::new("Raul", "Leader", 9, 50).unwrap();
        assert_eq!(resolve_avatar(&a), resolve_avatar(&b));
        assert_eq!(
            resolve_avatar_with(&a, "http://localhost/avatar"),
            "http://localhost/avatar?seed=Raul&scale=80&backgroundColor=b6e3f5"
        );
    }
}
