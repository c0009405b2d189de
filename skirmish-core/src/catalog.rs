//! Read-only catalog of enemy team templates.

use crate::error::TrackerError;
use crate::sample;
use crate::world::{Monster, MonsterId};
use std::collections::HashSet;

/// Enemy templates loaded once per session. Nothing hands out `&mut` to a
/// template, so entries cannot change after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    monsters: Vec<Monster>,
}

impl Catalog {
    /// Build a catalog, checking every template first.
    pub fn new(monsters: Vec<Monster>) -> Result<Self, TrackerError> {
        let mut seen = HashSet::new();
        for monster in &monsters {
            if monster.name.trim().is_empty() {
                return Err(TrackerError::validation(format!(
                    "template {} has no name",
                    monster.id
                )));
            }
            if monster.hp <= 0 {
                return Err(TrackerError::validation(format!(
                    "template {} must have positive hp, got {}",
                    monster.id, monster.hp
                )));
            }
            if !seen.insert(&monster.id) {
                return Err(TrackerError::validation(format!(
                    "duplicate template id {}",
                    monster.id
                )));
            }
        }

        Ok(Self { monsters })
    }

    /// The built-in enemy teams.
    pub fn standard() -> Result<Self, TrackerError> {
        Self::new(sample::monsters())
    }

    pub fn empty() -> Self {
        Self {
            monsters: Vec::new(),
        }
    }

    /// Templates in catalog order.
    pub fn list(&self) -> &[Monster] {
        &self.monsters
    }

    pub fn get(&self, id: &MonsterId) -> Result<&Monster, TrackerError> {
        self.monsters
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| TrackerError::not_found("Monster", id))
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}
