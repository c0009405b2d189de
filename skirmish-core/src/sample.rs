//! Starting data for a new tracker: the Nemesis Claw kill team, the
//! standard enemy teams, and an opening encounter.

use crate::combat::CombatSession;
use crate::error::TrackerError;
use crate::roster::RosterStore;
use crate::tracker::MissionBrief;
use crate::world::{Character, Condition, Monster};

/// The two founding operatives.
pub fn characters() -> Result<Vec<Character>, TrackerError> {
    let raul = Character::new("Raul", "Operative", 5, 45)?
        .with_ac(16)
        .with_spell_slots(0)
        .with_custom_image("/images/raul.jpg");

    let sog_wog = Character::new("Sog.Wog", "Specialist", 5, 32)?
        .with_ac(15)
        .with_spell_slots(0);

    Ok(vec![raul, sog_wog])
}

/// The standard enemy teams.
pub fn monsters() -> Vec<Monster> {
    vec![
        Monster::new("m1", "Eldar Team", "Astra Militarum", 15, 7)
            .with_damage("1d6+2")
            .with_abilities(["Lasgun", "Bayonet"]),
        Monster::new("m2", "Necron Team", "Xenos", 13, 15)
            .with_damage("1d8+3")
            .with_abilities(["Gauss Flayer", "Melee"]),
        Monster::new("m3", "Chaos Team", "Heretic Astartes", 16, 27)
            .with_damage("1d8+4")
            .with_abilities(["Bolter", "Chain Sword"]),
    ]
}

/// The Nemesis Claw briefing for the tournament in progress.
pub fn mission() -> MissionBrief {
    MissionBrief {
        team_name: "Nemesis Claw".to_string(),
        faction: "Astra Militarum".to_string(),
        current_match: "Jawn Team Gaming Tournament".to_string(),
        active_matches: 3,
    }
}

/// Fill an empty roster and encounter with the starting team and an
/// opening skirmish: Raul concentrating, facing an Eldar operative.
pub fn seed(roster: &mut RosterStore, combat: &mut CombatSession) -> Result<(), TrackerError> {
    for character in characters()? {
        roster.insert(character)?;
    }

    if let Some(raul) = roster.list().first() {
        let id = combat.add_from_character(raul).id();
        combat.toggle_condition(id, Condition::Concentration)?;
    }

    combat.add_from_monster(&Monster::new("e1", "Eldar Operative", "Xenos Team", 15, 7))?;
    Ok(())
}
