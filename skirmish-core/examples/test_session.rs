//! Quick walkthrough of the tracker API

use skirmish_core::{Condition, MonsterId, Tracker, TrackerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Testing Skirmish Core ===\n");

    // Test 1: Create a tracker
    println!("1. Creating tracker with the sample team...");
    let config = TrackerConfig::new().with_sample_data(true);
    let mut tracker = Tracker::new(config)?;
    println!("   Roster: {} operatives", tracker.roster().len());
    println!("   Catalog: {} enemy teams", tracker.catalog().len());

    // Test 2: Grow the team
    println!("\n2. Adding an operative...");
    let kell = tracker.add_character("Kell Vox", "Sniper", 3)?.id();
    tracker.roster_mut().set_hp(kell, 22)?;
    tracker
        .roster_mut()
        .toggle_condition(kell, Condition::Invisible)?;
    let stats = tracker.dashboard();
    println!(
        "   Team size {}, operational status {}%",
        stats.team_size, stats.operational_status_pct
    );

    // Test 3: Build the encounter
    println!("\n3. Building the encounter...");
    tracker.enlist_character(kell)?;
    let chaos = tracker.enlist_monster(&MonsterId::from("m3"))?.id();
    tracker.combat_mut().adjust_hp(chaos, -5)?;

    for (i, c) in tracker.combat().turn_order().iter().enumerate() {
        let marker = if i == 0 { " (active)" } else { "" };
        println!(
            "   {}. {} AC {} HP {}/{}{marker}",
            i + 1,
            c.name(),
            c.display_ac(),
            c.hp(),
            c.max_hp()
        );
    }

    // Test 4: Snapshot
    println!("\n4. Snapshot:");
    println!("{}", tracker.snapshot().to_json()?);

    println!("\n=== All checks passed ===");
    Ok(())
}
