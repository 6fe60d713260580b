//! End-to-end decoding tests over synthetic Shadow of Death maps built
//! byte by byte.

use h3m::objects::{BuildingId, ObjectPayload};
use h3m::player::PlayerColor;
use h3m::templates::Sprite;
use h3m::terrain::TerrainKind;
use h3m::{FormatVersion, H3mError, H3mParser, Inspector, Map, ParserOptions, ReservedCheck};
use pretty_assertions::assert_eq;

struct SyntheticMap {
    data: Vec<u8>,
    /// Offset of the 31-byte reserved block after the hero lists
    info_reserved_offset: usize,
    /// Offset of the template count field
    template_count_offset: usize,
    /// Offset of the town object's template index, when a town exists
    town_template_index_offset: Option<usize>,
}

fn push_string(data: &mut Vec<u8>, s: &str) {
    data.extend_from_slice(&(s.len() as u32).to_le_bytes());
    data.extend_from_slice(s.as_bytes());
}

fn push_active_player(data: &mut Vec<u8>) {
    data.push(1); // human
    data.push(1); // computer
    data.push(0); // random tactic
    data.push(0); // faction set not customized
    data.extend_from_slice(&[0xff, 0x01]); // all nine factions
    data.push(0); // fixed faction
    data.push(0); // no main town
    data.push(0); // no random hero
    data.push(0xff); // no main hero
    data.push(0);
    data.extend_from_slice(&0u32.to_le_bytes()); // no named heroes
}

fn push_inactive_player(data: &mut Vec<u8>) {
    data.push(0);
    data.push(0);
    data.extend_from_slice(&[0; 13]);
}

/// A 36x36 all-water Shadow of Death map with one playable slot and,
/// optionally, a single town with the default building set.
fn build_sod_map(with_town: bool) -> SyntheticMap {
    let mut data = Vec::new();
    data.extend_from_slice(&0x1cu32.to_le_bytes());

    data.push(1); // any players
    data.extend_from_slice(&36i32.to_le_bytes());
    data.push(0); // no underground
    push_string(&mut data, "Offshore");
    push_string(&mut data, "All water, one town.");
    data.push(1); // normal difficulty
    data.push(0); // no hero level cap

    push_active_player(&mut data); // red
    for _ in 0..7 {
        push_inactive_player(&mut data);
    }
    data.extend_from_slice(&[0xff, 0xff]); // standard conditions only
    data.push(0); // no declared teams

    data.extend_from_slice(&[0xff; 20]); // every hero allowed
    data.extend_from_slice(&0u32.to_le_bytes()); // no campaign-reserved heroes
    data.push(0); // no disposed heroes
    let info_reserved_offset = data.len();
    data.extend_from_slice(&[0; 31]);
    data.extend_from_slice(&[0; 18]); // no artifact banned
    data.extend_from_slice(&[0; 9]); // no spell banned
    data.extend_from_slice(&[0; 4]); // no skill banned
    data.extend_from_slice(&0u32.to_le_bytes()); // no rumors
    data.extend_from_slice(&[0; 156]); // no predefined heroes

    for _ in 0..36 * 36 {
        data.extend_from_slice(&[8, 0, 0, 0, 0, 0, 0]); // calm water
    }

    let template_count_offset = data.len();
    let mut town_template_index_offset = None;
    if with_town {
        data.extend_from_slice(&1u32.to_le_bytes());
        push_string(&mut data, "AVCCAST0.DEF");
        data.extend_from_slice(&[0xff; 6]); // nothing blocked
        data.extend_from_slice(&[0; 6]); // nothing visitable
        data.extend_from_slice(&0x1ffu16.to_le_bytes()); // every terrain
        data.extend_from_slice(&0x1ffu16.to_le_bytes());
        data.extend_from_slice(&98u32.to_le_bytes()); // town
        data.extend_from_slice(&0u32.to_le_bytes()); // castle
        data.push(0); // editor group
        data.push(0); // renders below
        data.extend_from_slice(&[0; 16]);

        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[10, 10, 0]); // position
        town_template_index_offset = Some(data.len());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[0; 5]);
        data.extend_from_slice(&1u32.to_le_bytes()); // identifier
        data.push(0); // red
        data.push(0); // no custom name
        data.push(0); // no garrison
        data.push(0); // spread formation
        data.push(0); // no stored building list
        data.push(1); // with a fort
        data.extend_from_slice(&[0; 9]); // no obligatory spells
        data.extend_from_slice(&[0; 9]); // every spell possible
        data.extend_from_slice(&0u32.to_le_bytes()); // no town events
        data.push(0xff); // no alignment group
        data.extend_from_slice(&[0; 3]);
    } else {
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
    }

    data.extend_from_slice(&0u32.to_le_bytes()); // no timed events

    SyntheticMap {
        data,
        info_reserved_offset,
        template_count_offset,
        town_template_index_offset,
    }
}

#[test]
fn test_minimal_map_decodes_end_to_end() {
    let synthetic = build_sod_map(false);
    let map = Map::decode(&synthetic.data).unwrap();

    assert_eq!(map.version(), FormatVersion::ShadowOfDeath);
    assert_eq!(map.header.name, "Offshore");
    assert_eq!(map.header.size.edge(), 36);
    assert!(!map.header.has_underground);
    assert_eq!(map.header.hero_level_cap, None);

    assert_eq!(map.players_info.playable_count(), 1);
    let red = map.players_info.player(PlayerColor::Red);
    assert!(red.playable_by_human && red.playable_by_computer);
    assert_eq!(red.allowed_factions.len(), 9);
    assert_eq!(map.players_info.teams.teams, vec![vec![PlayerColor::Red]]);

    assert_eq!(map.additional_info.allowed_heroes.len(), 156);
    assert_eq!(map.additional_info.allowed_artifacts.len(), 144);
    assert_eq!(map.additional_info.allowed_spells.len(), 70);
    assert_eq!(map.additional_info.allowed_skills.len(), 28);
    assert!(map.additional_info.rumors.is_empty());

    assert_eq!(map.terrain.tiles.len(), 1296);
    assert!(map
        .terrain
        .tiles
        .iter()
        .all(|t| t.terrain == TerrainKind::Water));

    assert!(map.templates.is_empty());
    assert!(map.objects.is_empty());
    assert_eq!(map.timed_events, Some(Vec::new()));
    assert!(map.diagnostics.is_clean());
    assert_eq!(map.checksum, crc32fast::hash(&synthetic.data));
}

#[test]
fn test_missing_event_section_decodes_to_none() {
    let mut synthetic = build_sod_map(false);
    let len = synthetic.data.len();
    synthetic.data.truncate(len - 4);
    let map = Map::decode(&synthetic.data).unwrap();
    assert_eq!(map.timed_events, None);
}

#[test]
fn test_reserved_byte_rejected_strictly_tolerated_leniently() {
    let mut synthetic = build_sod_map(false);
    let bad_offset = synthetic.info_reserved_offset + 20;
    synthetic.data[bad_offset] = 7;

    let err = Map::decode(&synthetic.data).unwrap_err();
    assert!(matches!(
        err,
        H3mError::ReservedRegionNotZero { offset } if offset == bad_offset
    ));

    let parser = H3mParser::new(ParserOptions {
        reserved_check: ReservedCheck::Lenient,
        rng_seed: None,
        max_objects: None,
    });
    parser.parse(&synthetic.data).unwrap();
}

#[test]
fn test_absurd_template_count_is_rejected() {
    let mut synthetic = build_sod_map(false);
    let at = synthetic.template_count_offset;
    synthetic.data[at..at + 4].copy_from_slice(&1296u32.to_le_bytes());
    let err = Map::decode(&synthetic.data).unwrap_err();
    assert!(matches!(err, H3mError::SanityBoundViolation { .. }));
}

#[test]
fn test_object_count_over_configured_cap_is_rejected() {
    let synthetic = build_sod_map(true);
    let parser = H3mParser::new(ParserOptions {
        reserved_check: ReservedCheck::Strict,
        rng_seed: Some(1),
        max_objects: Some(0),
    });
    let err = parser.parse(&synthetic.data).unwrap_err();
    assert!(matches!(err, H3mError::SanityBoundViolation { .. }));
}

#[test]
fn test_dangling_template_reference_is_rejected() {
    let mut synthetic = build_sod_map(true);
    let at = synthetic.town_template_index_offset.unwrap();
    synthetic.data[at..at + 4].copy_from_slice(&5u32.to_le_bytes());
    let err = Map::decode(&synthetic.data).unwrap_err();
    assert!(matches!(
        err,
        H3mError::UnknownObjectTemplateReference {
            index: 5,
            table_len: 1,
            ..
        }
    ));
}

#[test]
fn test_town_map_with_seed_is_deterministic() {
    let synthetic = build_sod_map(true);
    let parser = H3mParser::new(ParserOptions {
        reserved_check: ReservedCheck::Strict,
        rng_seed: Some(7),
        max_objects: None,
    });
    let first = parser.parse(&synthetic.data).unwrap();
    let second = parser.parse(&synthetic.data).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.templates.len(), 1);
    assert_eq!(first.templates[0].sprite, Sprite::Town);
    assert!(first.diagnostics.is_clean());

    assert_eq!(first.objects.len(), 1);
    let ObjectPayload::Town(town) = &first.objects[0].payload else {
        panic!("expected a town payload");
    };
    assert_eq!(town.owner, Some(PlayerColor::Red));
    for required in [
        BuildingId::FORT,
        BuildingId::VILLAGE_HALL,
        BuildingId::TAVERN,
        BuildingId::DWELLING_1,
    ] {
        assert!(town.buildings.built.contains(&required));
    }
    assert_eq!(town.possible_spells.len(), 70);
}

#[test]
fn test_inspector_observes_sections_in_file_order() {
    #[derive(Default)]
    struct SectionRecorder {
        seen: Vec<&'static str>,
    }

    impl Inspector for SectionRecorder {
        fn header_parsed(&mut self, _: &h3m::header::MapHeader) {
            self.seen.push("header");
        }
        fn players_parsed(&mut self, _: &h3m::PlayersInfo) {
            self.seen.push("players");
        }
        fn additional_info_parsed(&mut self, _: &h3m::additional_info::AdditionalInfo) {
            self.seen.push("additional info");
        }
        fn terrain_parsed(&mut self, _: &h3m::terrain::Terrain) {
            self.seen.push("terrain");
        }
        fn templates_parsed(&mut self, _: &[h3m::templates::ObjectTemplate]) {
            self.seen.push("templates");
        }
        fn objects_parsed(&mut self, _: &[h3m::objects::ObjectInstance]) {
            self.seen.push("objects");
        }
        fn timed_events_parsed(&mut self, _: Option<&[h3m::events::TimedEvent]>) {
            self.seen.push("timed events");
        }
    }

    let synthetic = build_sod_map(true);
    let mut recorder = SectionRecorder::default();
    let parser = H3mParser::new(ParserOptions {
        reserved_check: ReservedCheck::Strict,
        rng_seed: Some(1),
        max_objects: None,
    });
    parser
        .parse_with_inspector(&synthetic.data, &mut recorder)
        .unwrap();
    assert_eq!(
        recorder.seen,
        vec![
            "header",
            "players",
            "additional info",
            "terrain",
            "templates",
            "objects",
            "timed events",
        ]
    );
}
