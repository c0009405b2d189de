//! Scenario tests for the tracker's public API.
//!
//! Run with: `cargo test -p skirmish-core --test combat_tracking`

use skirmish_core::{
    Character, CharacterId, CombatSession, Condition, Monster, MonsterId, RosterStore, Tracker,
    TrackerConfig, TrackerError,
};

// =============================================================================
// Roster hit points
// =============================================================================

#[test]
fn test_set_hp_clamps_every_direction() {
    let mut roster = RosterStore::new();
    let id = roster.add("Raul", "Operative", 5).unwrap().id();

    for (requested, expected) in [(-1, 0), (i32::MIN, 0), (0, 0), (12, 12), (30, 30), (31, 30), (i32::MAX, 30)] {
        let stored = roster.set_hp(id, requested).unwrap().hp();
        assert_eq!(stored, expected, "set_hp({requested})");
    }
}

#[test]
fn test_failed_add_leaves_roster_unchanged() {
    let mut roster = RosterStore::new();
    roster.add("Raul", "Operative", 5).unwrap();
    let before = roster.list().to_vec();

    assert!(matches!(
        roster.add("", "Operative", 1),
        Err(TrackerError::Validation(_))
    ));
    assert_eq!(roster.list(), before.as_slice());
}

// =============================================================================
// Turn order
// =============================================================================

#[test]
fn test_turn_order_example_team() {
    let mut combat = CombatSession::new();
    let mut ids = Vec::new();
    for (name, ac) in [("First", 15), ("Second", 15), ("Heavy", 18), ("Scout", 10)] {
        let monster = Monster::new(name.to_lowercase().as_str(), name, "Xenos", ac, 10);
        ids.push(combat.add_from_monster(&monster).unwrap().id());
    }

    let order = combat.turn_order();
    let acs: Vec<_> = order.iter().map(|c| c.ac().unwrap()).collect();
    assert_eq!(acs, vec![18, 15, 15, 10]);

    let names: Vec<_> = order.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["Heavy", "First", "Second", "Scout"]);
    assert_eq!(combat.active_combatant().unwrap().id(), ids[2]);
}

#[test]
fn test_active_turn_follows_armor_not_damage() {
    let mut tracker = Tracker::new(TrackerConfig::new()).unwrap();
    let chaos = tracker.enlist_monster(&MonsterId::from("m3")).unwrap().id();
    tracker.enlist_monster(&MonsterId::from("m1")).unwrap();

    tracker.combat_mut().adjust_hp(chaos, -27).unwrap();
    let active = tracker.combat().active_combatant().unwrap();
    assert_eq!(active.id(), chaos);
    assert_eq!(active.hp(), 0);
}

// =============================================================================
// Copy independence
// =============================================================================

#[test]
fn test_combatant_is_independent_of_roster() {
    let mut tracker = Tracker::new(TrackerConfig::new()).unwrap();
    let source = tracker.add_character("Raul", "Operative", 5).unwrap().id();
    let copy = tracker.enlist_character(source).unwrap().id();

    tracker.combat_mut().adjust_hp(copy, -10).unwrap();
    tracker
        .combat_mut()
        .toggle_condition(copy, Condition::Prone)
        .unwrap();
    assert_eq!(tracker.roster().get(source).unwrap().hp(), 30);
    assert!(tracker.roster().get(source).unwrap().conditions().is_empty());

    tracker.roster_mut().set_hp(source, 3).unwrap();
    assert_eq!(tracker.combat().get(copy).unwrap().hp(), 20);

    tracker.roster_mut().remove(source);
    assert!(tracker.combat().get(copy).is_ok());
}

#[test]
fn test_copy_takes_current_snapshot() {
    let mut roster = RosterStore::new();
    let id = roster.add("Sog.Wog", "Specialist", 5).unwrap().id();
    roster.set_hp(id, 11).unwrap();
    roster.toggle_condition(id, Condition::Invisible).unwrap();

    let mut combat = CombatSession::new();
    let combatant = combat.add_from_character(roster.get(id).unwrap());
    assert_eq!(combatant.hp(), 11);
    assert!(combatant.has_condition(Condition::Invisible));
    assert_eq!(combatant.name(), "Sog.Wog");
    assert_ne!(combatant.id(), id);
}

// =============================================================================
// Monster instantiation
// =============================================================================

#[test]
fn test_monster_mapping() {
    let mut combat = CombatSession::new();
    let necron = Monster::new("m2", "Necron Team", "Xenos", 13, 15);
    let c = combat.add_from_monster(&necron).unwrap();

    assert_eq!(c.hp(), 15);
    assert_eq!(c.max_hp(), 15);
    assert_eq!(c.ac(), Some(13));
    assert_eq!(c.class(), "Xenos");
    assert_eq!(c.level(), 1);
    assert_eq!(c.spell_slots(), Some(0));
    assert!(c.conditions().is_empty());
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn test_remove_twice_and_unknown() {
    let mut roster = RosterStore::new();
    let a = roster.add("A", "Medic", 1).unwrap().id();
    roster.add("B", "Leader", 2).unwrap();

    roster.remove(a);
    let after_first = roster.list().to_vec();
    roster.remove(a);
    assert_eq!(roster.list(), after_first.as_slice());

    roster.remove(CharacterId::new());
    assert_eq!(roster.list(), after_first.as_slice());
}

// =============================================================================
// Images and avatars
// =============================================================================

#[test]
fn test_set_image_replaces_unconditionally() {
    let mut tracker = Tracker::new(TrackerConfig::new().with_sample_data(true)).unwrap();
    let raul = tracker.roster().list()[0].id();

    tracker.roster_mut().set_image(raul, "data:image/png;base64,QQ==").unwrap();
    tracker.roster_mut().set_image(raul, "").unwrap();

    let raul = tracker.roster().get(raul).unwrap();
    assert_eq!(raul.custom_image(), Some(""));
    assert_eq!(
        tracker.avatar(raul),
        "https://api.dicebear.com/7.x/lorelei/svg?seed=Raul&scale=80&backgroundColor=b6e3f5"
    );
}

#[test]
fn test_avatar_uses_configured_service() {
    let config = TrackerConfig::new().with_avatar_base_url("http://avatars.local/svg");
    let mut tracker = Tracker::new(config).unwrap();
    let id = tracker.add_character("Kell Vox", "Sniper", 2).unwrap().id();

    let character: &Character = tracker.roster().get(id).unwrap();
    assert_eq!(
        tracker.avatar(character),
        "http://avatars.local/svg?seed=Kell%20Vox&scale=80&backgroundColor=b6e3f5"
    );
}
