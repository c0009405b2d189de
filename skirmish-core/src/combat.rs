//! Encounter tracking.
//!
//! Combatants, hit point adjustment, conditions, and the armor-based turn
//! order.

use crate::error::TrackerError;
use crate::world::{Character, CharacterId, Combatant, Condition, Monster};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

/// The live encounter.
///
/// Combatants are value copies of roster characters or fresh monster
/// instances; nothing here points back at the roster or the catalog.
#[derive(Debug, Clone, Default)]
pub struct CombatSession {
    combatants: Vec<Combatant>,
}

impl CombatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring a copy of a roster character into the encounter.
    pub fn add_from_character(&mut self, character: &Character) -> &Combatant {
        let combatant = character.copy_with_fresh_id();
        info!(id = %combatant.id(), source = %character.id(), name = combatant.name(), "Character joined combat");
        self.push(combatant)
    }

    /// Bring a new instance of a catalog template into the encounter.
    ///
    /// Fails if the template has no hit points to start with.
    pub fn add_from_monster(&mut self, monster: &Monster) -> Result<&Combatant, TrackerError> {
        if monster.hp <= 0 {
            warn!(template = %monster.id, hp = monster.hp, "Rejected monster without hit points");
            return Err(TrackerError::validation(format!(
                "monster {} must have positive hp, got {}",
                monster.id, monster.hp
            )));
        }

        let combatant = monster.instantiate();
        info!(id = %combatant.id(), template = %monster.id, name = combatant.name(), "Monster joined combat");
        Ok(self.push(combatant))
    }

    /// Shift hit points by `delta`, clamped into `[0, maxHp]`.
    pub fn adjust_hp(&mut self, id: CharacterId, delta: i32) -> Result<&Combatant, TrackerError> {
        let combatant = self.find_mut(id)?;
        let stored = combatant.adjust_hp(delta);
        debug!(%id, delta, stored, "Combatant hp adjusted");
        Ok(combatant)
    }

    /// Add the condition if absent, remove it if present.
    pub fn toggle_condition(
        &mut self,
        id: CharacterId,
        condition: Condition,
    ) -> Result<&Combatant, TrackerError> {
        let combatant = self.find_mut(id)?;
        let applied = combatant.toggle_condition(condition);
        debug!(%id, %condition, applied, "Combatant condition toggled");
        Ok(combatant)
    }

    /// Take a combatant out of the encounter. Unknown ids are ignored.
    pub fn remove(&mut self, id: CharacterId) {
        let before = self.combatants.len();
        self.combatants.retain(|c| c.id() != id);
        if self.combatants.len() < before {
            info!(%id, "Combatant left combat");
        }
    }

    /// End the encounter.
    pub fn clear(&mut self) {
        info!(count = self.combatants.len(), "Combat cleared");
        self.combatants.clear();
    }

    /// Combatants by armor, highest first.
    ///
    /// Missing armor ranks as 0. Equal armor keeps join order. Recomputed
    /// from current state on every call.
    pub fn turn_order(&self) -> Vec<&Combatant> {
        let mut ordered: Vec<&Combatant> = self.combatants.iter().collect();
        ordered.sort_by_key(|c| Reverse(c.ranking_ac()));
        ordered
    }

    /// Whoever heads the turn order.
    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.turn_order().into_iter().next()
    }

    pub fn get(&self, id: CharacterId) -> Result<&Combatant, TrackerError> {
        self.combatants
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| TrackerError::not_found("Combatant", id))
    }

    /// Combatants in join order.
    pub fn list(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    fn push(&mut self, combatant: Combatant) -> &Combatant {
        self.combatants.push(combatant);
        &self.combatants[self.combatants.len() - 1]
    }

    fn find_mut(&mut self, id: CharacterId) -> Result<&mut Combatant, TrackerError> {
        self.combatants
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| TrackerError::not_found("Combatant", id))
    }
}
