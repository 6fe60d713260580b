//! Whole-map decoding: wires the section parsers together in file
//! order and assembles the [`Map`] aggregate.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::additional_info::AdditionalInfo;
use crate::error::{H3mError, Result};
use crate::events::{read_timed_events, TimedEvent};
use crate::header::{read_basic_header, MapHeader, VictoryLossConditions};
use crate::objects::{read_objects, ObjectInstance};
use crate::player::{read_player, Player, PlayerColor, Teams};
use crate::reader::{ByteReader, ReservedCheck};
use crate::templates::{read_templates, ObjectTemplate, TemplateDiagnostics};
use crate::terrain::Terrain;
use crate::version::FormatVersion;

/// Knobs for the decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// How reserved always-zero regions are treated
    pub reserved_check: ReservedCheck,
    /// Seed for the rolls the format leaves to the loader, such as the
    /// second dwelling of a default-built town. `None` draws entropy
    /// from the operating system.
    pub rng_seed: Option<u64>,
    /// Upper bound on the object count the file may declare. `None`
    /// accepts any count that fits the remaining data.
    pub max_objects: Option<u32>,
}

/// Observer notified after each section is decoded.
///
/// Every method has an empty default body, so implementors override
/// only what they care about. Useful for progress reporting and for
/// tests asserting on intermediate state.
pub trait Inspector {
    fn header_parsed(&mut self, _header: &MapHeader) {}
    fn players_parsed(&mut self, _players: &PlayersInfo) {}
    fn additional_info_parsed(&mut self, _info: &AdditionalInfo) {}
    fn terrain_parsed(&mut self, _terrain: &Terrain) {}
    fn templates_parsed(&mut self, _templates: &[ObjectTemplate]) {}
    fn objects_parsed(&mut self, _objects: &[ObjectInstance]) {}
    fn timed_events_parsed(&mut self, _events: Option<&[TimedEvent]>) {}
}

struct NoopInspector;

impl Inspector for NoopInspector {}

/// Player setup and team assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayersInfo {
    /// One record per color, in fixed color order
    pub players: Vec<Player>,
    /// Team grouping over the playable colors
    pub teams: Teams,
}

impl PlayersInfo {
    /// The record for a color.
    pub fn player(&self, color: PlayerColor) -> &Player {
        &self.players[color as usize]
    }

    /// How many slots a player can take.
    pub fn playable_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_playable()).count()
    }
}

/// A fully decoded map file.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Header fields and win/loss conditions
    pub header: MapHeader,
    /// Player setup and teams
    pub players_info: PlayersInfo,
    /// Availability masks, hero customization and rumors
    pub additional_info: AdditionalInfo,
    /// The tile grid
    pub terrain: Terrain,
    /// Shared object templates
    pub templates: Vec<ObjectTemplate>,
    /// Placed objects
    pub objects: Vec<ObjectInstance>,
    /// Scheduled events, `None` when the file ends before the section
    pub timed_events: Option<Vec<TimedEvent>>,
    /// Findings that did not stop the decode
    pub diagnostics: TemplateDiagnostics,
    /// CRC32 of the entire file
    pub checksum: u32,
}

impl Map {
    /// Decode a map with default options.
    pub fn decode(data: &[u8]) -> Result<Self> {
        H3mParser::new(ParserOptions::default()).parse(data)
    }

    /// The format version the file was written for.
    pub fn version(&self) -> FormatVersion {
        self.header.version
    }
}

/// Decoder for the versioned map format.
#[derive(Debug)]
pub struct H3mParser {
    options: ParserOptions,
}

impl H3mParser {
    /// Create a parser with the given options.
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Decode a map.
    pub fn parse(&self, data: &[u8]) -> Result<Map> {
        self.parse_with_inspector(data, &mut NoopInspector)
    }

    /// Decode a map, notifying the inspector after each section.
    pub fn parse_with_inspector(
        &self,
        data: &[u8],
        inspector: &mut dyn Inspector,
    ) -> Result<Map> {
        let checksum = crc32fast::hash(data);
        let reserved = self.options.reserved_check;
        let mut rng = match self.options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut reader = ByteReader::new(data);
        let at = reader.offset();
        let magic = reader.read_u32_le()?;
        let version = FormatVersion::from_magic(magic).ok_or(H3mError::InvalidEnumValue {
            what: "format magic",
            value: magic,
            offset: at,
        })?;
        log::debug!("decoding {version} map, {} bytes", data.len());

        let basic = read_basic_header(&mut reader, version)?;

        let mut players = Vec::with_capacity(8);
        for color in PlayerColor::ALL {
            players.push(read_player(&mut reader, version, color)?);
        }

        let conditions = VictoryLossConditions::read(&mut reader, version)?;
        let teams = Teams::read(&mut reader, &players)?;
        let players_info = PlayersInfo { players, teams };
        let usable_colors: Vec<PlayerColor> = players_info
            .players
            .iter()
            .filter(|player| player.is_playable())
            .map(|player| player.color)
            .collect();

        let header = basic.into_header(version, conditions);
        inspector.header_parsed(&header);
        inspector.players_parsed(&players_info);

        let additional_info = AdditionalInfo::read(&mut reader, version, reserved)?;
        inspector.additional_info_parsed(&additional_info);

        let terrain = Terrain::read(&mut reader, header.size, header.has_underground)?;
        inspector.terrain_parsed(&terrain);

        let at = reader.offset();
        let template_count = reader.read_u32_le()?;
        let levels = if header.has_underground { 2 } else { 1 };
        let tile_count = header.size.tiles_per_level() * levels;
        if template_count as usize >= tile_count {
            return Err(H3mError::SanityBoundViolation {
                detail: format!(
                    "template count {template_count} not below tile count {tile_count}"
                ),
                offset: at,
            });
        }
        let mut diagnostics = TemplateDiagnostics::default();
        let templates = read_templates(&mut reader, template_count, reserved, &mut diagnostics)?;
        inspector.templates_parsed(&templates);

        let objects = read_objects(
            &mut reader,
            version,
            reserved,
            &templates,
            self.options.max_objects,
            &usable_colors,
            &mut rng,
        )?;
        inspector.objects_parsed(&objects);

        let timed_events = read_timed_events(&mut reader, version, reserved, &usable_colors)?;
        inspector.timed_events_parsed(timed_events.as_deref());

        if !diagnostics.is_clean() {
            log::info!(
                "map decoded with {} unresolved sprites",
                diagnostics.unknown_sprites.len()
            );
        }

        Ok(Map {
            header,
            players_info,
            additional_info,
            terrain,
            templates,
            objects,
            timed_events,
            diagnostics,
            checksum,
        })
    }
}
