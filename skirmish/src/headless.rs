//! Headless mode for the skirmish tracker.
//!
//! A line-oriented text interface over a `Tracker`, suitable for scripted
//! sessions and automated testing. Every command starts with `#`; ids can
//! be given by any unique prefix.

use crate::image;
use anyhow::{bail, Context, Result};
use skirmish_core::world::CHARACTER_CLASSES;
use skirmish_core::{
    Character, CharacterId, Condition, MonsterId, Tracker, TrackerError,
};
use std::path::PathBuf;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

const HELP: &str = "\
Roster:
  #roster                      - List the team
  #add <level> <class> <name>  - Add an operative (use _ for spaces in class)
  #hp <id> <value>             - Set hit points
  #cond <id> <condition>       - Toggle a condition
  #image <id> <path>           - Load a portrait from a file
  #remove <id>                 - Remove an operative
Enemies:
  #catalog                     - List enemy teams
Combat:
  #enlist <roster-id>          - Copy an operative into combat
  #spawn <monster-id>          - Add an enemy team to combat
  #dmg <id> <amount>           - Damage a combatant
  #heal <id> <amount>          - Heal a combatant
  #ccond <id> <condition>      - Toggle a combatant condition
  #drop <id>                   - Take a combatant out of combat
  #clear                       - End the encounter
  #order                       - Show turn order
General:
  #status                      - Team overview
  #json                        - Full snapshot as JSON
  #help                        - Show this help
  #quit                        - Exit";

/// A parsed headless command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Roster,
    Add { level: u8, class: String, name: String },
    Hp { id: String, value: i32 },
    Cond { id: String, condition: Condition },
    Image { id: String, path: PathBuf },
    Remove { id: String },
    Catalog,
    Enlist { id: String },
    Spawn { monster: MonsterId },
    Damage { id: String, amount: i32 },
    Heal { id: String, amount: i32 },
    CombatCond { id: String, condition: Condition },
    Drop { id: String },
    Clear,
    Order,
    Status,
    Json,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let Some(body) = line.trim().strip_prefix('#') else {
            bail!("Commands start with '#'. Type #help for help.");
        };
        let parts: Vec<&str> = body.split_whitespace().collect();

        let command = match parts.as_slice() {
            ["roster"] => Command::Roster,
            ["add", level, class, name @ ..] if !name.is_empty() => Command::Add {
                level: level
                    .parse()
                    .with_context(|| format!("Invalid level: {level}"))?,
                class: class.replace('_', " "),
                name: name.join(" "),
            },
            ["hp", id, value] => Command::Hp {
                id: id.to_string(),
                value: parse_number(value)?,
            },
            ["cond", id, condition] => Command::Cond {
                id: id.to_string(),
                condition: condition.parse()?,
            },
            ["image", id, path @ ..] if !path.is_empty() => Command::Image {
                id: id.to_string(),
                path: PathBuf::from(path.join(" ")),
            },
            ["remove", id] => Command::Remove { id: id.to_string() },
            ["catalog"] => Command::Catalog,
            ["enlist", id] => Command::Enlist { id: id.to_string() },
            ["spawn", monster] => Command::Spawn {
                monster: MonsterId::from(*monster),
            },
            ["dmg", id, amount] => Command::Damage {
                id: id.to_string(),
                amount: parse_number(amount)?,
            },
            ["heal", id, amount] => Command::Heal {
                id: id.to_string(),
                amount: parse_number(amount)?,
            },
            ["ccond", id, condition] => Command::CombatCond {
                id: id.to_string(),
                condition: condition.parse()?,
            },
            ["drop", id] => Command::Drop { id: id.to_string() },
            ["clear"] => Command::Clear,
            ["order"] => Command::Order,
            ["status"] => Command::Status,
            ["json"] => Command::Json,
            ["help"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            _ => bail!("Unknown command. Type #help for help."),
        };
        Ok(command)
    }
}

fn parse_number(raw: &str) -> Result<i32> {
    raw.parse().with_context(|| format!("Invalid number: {raw}"))
}

/// Run the tracker in headless mode until `#quit` or end of input.
pub async fn run_headless(mut tracker: Tracker) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    stdout
        .write_all(b"=== Skirmish Tracker Headless Mode ===\nType #help for commands.\n\n")
        .await?;
    for line in status_lines(&tracker) {
        stdout.write_all(format!("{line}\n").as_bytes()).await?;
    }
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = match Command::parse(&line) {
            Ok(Command::Quit) => {
                stdout.write_all(b"Goodbye!\n").await?;
                break;
            }
            Ok(command) => match execute(&mut tracker, command).await {
                Ok(lines) => lines,
                Err(e) => {
                    warn!("Command failed: {e:#}");
                    vec![format!("[ERROR] {e:#}")]
                }
            },
            Err(e) => vec![format!("[ERROR] {e:#}")],
        };

        for out in output {
            stdout.write_all(format!("{out}\n").as_bytes()).await?;
        }
        stdout.flush().await?;
    }

    Ok(())
}

/// Apply one command and return the lines to print.
pub async fn execute(tracker: &mut Tracker, command: Command) -> Result<Vec<String>> {
    let lines = match command {
        Command::Roster => {
            if tracker.roster().is_empty() {
                vec!["[ROSTER] empty".to_string()]
            } else {
                let mut lines = vec!["[ROSTER]".to_string()];
                lines.extend(tracker.roster().list().iter().map(|c| {
                    format!("  {} avatar={}", describe(c), tracker.avatar(c))
                }));
                lines
            }
        }
        Command::Add { level, class, name } => {
            let added = tracker.add_character(name, class, level)?;
            vec![format!("[ADDED] {}", describe(added))]
        }
        Command::Hp { id, value } => {
            let id = roster_id(tracker, &id)?;
            let updated = tracker.roster_mut().set_hp(id, value)?;
            vec![format!("[UPDATED] {}", describe(updated))]
        }
        Command::Cond { id, condition } => {
            let id = roster_id(tracker, &id)?;
            let updated = tracker.roster_mut().toggle_condition(id, condition)?;
            vec![format!("[UPDATED] {}", describe(updated))]
        }
        Command::Image { id, path } => {
            let id = roster_id(tracker, &id)?;
            let data_url = image::load_data_url(&path).await?;
            let updated = tracker.roster_mut().set_image(id, data_url)?;
            vec![format!(
                "[IMAGE] {} now uses {}",
                updated.name(),
                path.display()
            )]
        }
        Command::Remove { id: prefix } => {
            let ids = tracker.roster().list().iter().map(|c| c.id());
            match find_prefix(ids, &prefix, "Character")? {
                Some(id) => {
                    tracker.roster_mut().remove(id);
                    vec![format!("[REMOVED] {}", id.short())]
                }
                None => vec![format!("[REMOVED] nothing matched {prefix}")],
            }
        }
        Command::Catalog => {
            let mut lines = vec!["[CATALOG]".to_string()];
            lines.extend(tracker.catalog().list().iter().map(|m| {
                let mut line = format!(
                    "  {} {} ({}) AC {} HP {}",
                    m.id, m.name, m.kind, m.ac, m.hp
                );
                if let Some(damage) = &m.damage {
                    line.push_str(&format!(" DMG {damage}"));
                }
                if !m.abilities.is_empty() {
                    line.push_str(&format!(" [{}]", m.abilities.join(", ")));
                }
                line
            }));
            lines
        }
        Command::Enlist { id } => {
            let id = roster_id(tracker, &id)?;
            let combatant = tracker.enlist_character(id)?;
            vec![format!("[COMBAT] {} joins", describe(combatant))]
        }
        Command::Spawn { monster } => {
            let combatant = tracker.enlist_monster(&monster)?;
            vec![format!("[COMBAT] {} joins", describe(combatant))]
        }
        Command::Damage { id, amount } => {
            let id = combatant_id(tracker, &id)?;
            let updated = tracker.combat_mut().adjust_hp(id, amount.saturating_neg())?;
            vec![format!("[COMBAT] {}", describe(updated))]
        }
        Command::Heal { id, amount } => {
            let id = combatant_id(tracker, &id)?;
            let updated = tracker.combat_mut().adjust_hp(id, amount)?;
            vec![format!("[COMBAT] {}", describe(updated))]
        }
        Command::CombatCond { id, condition } => {
            let id = combatant_id(tracker, &id)?;
            let updated = tracker.combat_mut().toggle_condition(id, condition)?;
            vec![format!("[COMBAT] {}", describe(updated))]
        }
        Command::Drop { id: prefix } => {
            let ids = tracker.combat().list().iter().map(|c| c.id());
            match find_prefix(ids, &prefix, "Combatant")? {
                Some(id) => {
                    tracker.combat_mut().remove(id);
                    vec![format!("[COMBAT] {} leaves", id.short())]
                }
                None => vec![format!("[COMBAT] nothing matched {prefix}")],
            }
        }
        Command::Clear => {
            tracker.combat_mut().clear();
            vec!["[COMBAT] Encounter cleared".to_string()]
        }
        Command::Order => order_lines(tracker),
        Command::Status => status_lines(tracker),
        Command::Json => vec![tracker.snapshot().to_json()?],
        Command::Help => {
            let mut lines: Vec<String> = HELP.lines().map(str::to_string).collect();
            lines.push(format!("Classes: {}", CHARACTER_CLASSES.join(", ")));
            lines
        }
        Command::Quit => Vec::new(),
    };
    Ok(lines)
}

fn describe(c: &Character) -> String {
    let mut line = format!(
        "{} {} ({} L{}) HP {}/{} AC {}",
        c.id().short(),
        c.name(),
        c.class(),
        c.level(),
        c.hp(),
        c.max_hp(),
        c.display_ac()
    );
    if !c.conditions().is_empty() {
        line.push_str(&format!(" [{}]", c.conditions().names().join(", ")));
    }
    line
}

fn order_lines(tracker: &Tracker) -> Vec<String> {
    let order = tracker.combat().turn_order();
    if order.is_empty() {
        return vec!["[ORDER] No combatants".to_string()];
    }

    let mut lines = vec!["[ORDER]".to_string()];
    lines.extend(order.iter().enumerate().map(|(i, c)| {
        let marker = if i == 0 { "  <- active turn" } else { "" };
        format!("  {}. {}{marker}", i + 1, describe(c))
    }));
    lines
}

fn status_lines(tracker: &Tracker) -> Vec<String> {
    let stats = tracker.dashboard();
    let mut lines = vec![
        "[STATUS]".to_string(),
        format!("  Team size: {}", stats.team_size),
        format!("  Avg operational status: {}%", stats.operational_status_pct),
        format!("  Combatants: {}", stats.combatants),
        format!(
            "  Active turn: {}",
            stats.active_combatant.as_deref().unwrap_or("-")
        ),
    ];
    if let Some(mission) = stats.mission {
        lines.push(format!(
            "  Mission: {} ({}) at {}, {} active matches",
            mission.team_name, mission.faction, mission.current_match, mission.active_matches
        ));
    }
    lines
}

fn roster_id(tracker: &Tracker, prefix: &str) -> Result<CharacterId> {
    resolve_prefix(
        tracker.roster().list().iter().map(|c| c.id()),
        prefix,
        "Character",
    )
}

fn combatant_id(tracker: &Tracker, prefix: &str) -> Result<CharacterId> {
    resolve_prefix(
        tracker.combat().list().iter().map(|c| c.id()),
        prefix,
        "Combatant",
    )
}

fn resolve_prefix(
    ids: impl Iterator<Item = CharacterId>,
    prefix: &str,
    kind: &'static str,
) -> Result<CharacterId> {
    match find_prefix(ids, prefix, kind)? {
        Some(id) => Ok(id),
        None => Err(TrackerError::not_found(kind, prefix.to_ascii_lowercase()).into()),
    }
}

/// The single id starting with `prefix`, if any. Several matches is an error.
fn find_prefix(
    ids: impl Iterator<Item = CharacterId>,
    prefix: &str,
    kind: &'static str,
) -> Result<Option<CharacterId>> {
    let prefix = prefix.to_ascii_lowercase();
    let matches: Vec<CharacterId> = ids
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => bail!("Ambiguous {kind} id '{prefix}' matches {}", matches.len()),
    }
}
