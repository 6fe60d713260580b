//! Example showing how to parse and summarize an .h3m map file

use h3m::{H3mParser, ParserOptions, ReservedCheck};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let path = if args.len() > 1 {
        &args[1]
    } else {
        println!("Usage: {} <path_to_h3m_file> [--lenient]", args[0]);
        println!("\nMaps live under the game's Maps directory, e.g.:");
        println!("  Maps/Arrogance.h3m");
        println!("  Maps/Back for Revenge - Allied.h3m");
        return Ok(());
    };
    let lenient = args.iter().any(|a| a == "--lenient");

    let data = std::fs::read(path)?;
    let parser = H3mParser::new(ParserOptions {
        reserved_check: if lenient {
            ReservedCheck::Lenient
        } else {
            ReservedCheck::Strict
        },
        ..ParserOptions::default()
    });
    let map = parser.parse(&data)?;

    println!("Map: {path}");
    println!("Name: {}", map.header.name);
    println!("Version: {}", map.version());
    println!(
        "Size: {0}x{0}{1}",
        map.header.size.edge(),
        if map.header.has_underground {
            " with underground"
        } else {
            ""
        }
    );
    println!("Difficulty: {:?}", map.header.difficulty);
    if let Some(cap) = map.header.hero_level_cap {
        println!("Hero level cap: {cap}");
    }
    println!("Checksum: {:08x}", map.checksum);

    println!("\nPlayers: {} playable", map.players_info.playable_count());
    for player in &map.players_info.players {
        if !player.is_playable() {
            continue;
        }
        let who = match (player.playable_by_human, player.playable_by_computer) {
            (true, true) => "human or computer",
            (true, false) => "human only",
            _ => "computer only",
        };
        println!("  {} ({who})", player.color);
    }
    println!("Teams: {}", map.players_info.teams.teams.len());

    println!("\nVictory conditions:");
    for condition in &map.header.conditions.victory {
        println!("  {condition:?}");
    }
    println!("Loss conditions:");
    for condition in &map.header.conditions.loss {
        println!("  {condition:?}");
    }

    println!("\nTiles: {}", map.terrain.tiles.len());
    println!("Templates: {}", map.templates.len());
    println!("Objects: {}", map.objects.len());
    match &map.timed_events {
        Some(events) => println!("Timed events: {}", events.len()),
        None => println!("Timed events: section absent"),
    }
    println!("Rumors: {}", map.additional_info.rumors.len());

    if !map.diagnostics.is_clean() {
        println!("\nUnresolved sprites:");
        for unknown in &map.diagnostics.unknown_sprites {
            println!("  template {}: {}", unknown.template_index, unknown.animation_file);
        }
    }

    Ok(())
}
