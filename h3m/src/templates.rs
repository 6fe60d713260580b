//! Object attribute templates: the shared look-and-footprint records
//! that map objects reference by index.

use crate::error::Result;
use crate::reader::{ByteReader, ReservedCheck};
use crate::terrain::TerrainKind;

/// How a single footprint cell behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// Units can stand on and pass through the cell
    #[default]
    Passable,
    /// The cell is occupied by the object
    Blocked,
    /// Entering the cell triggers the object
    Visitable,
}

/// The 8 by 6 cell grid an object occupies. Cell (0, 0) is the top-left
/// corner; the object anchor is the bottom-right cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    cells: [[CellKind; Self::WIDTH]; Self::HEIGHT],
}

impl Footprint {
    /// Cells per row.
    pub const WIDTH: usize = 8;
    /// Rows.
    pub const HEIGHT: usize = 6;

    /// Decode the two six-byte masks. On disk both masks count cells
    /// from the bottom-right corner; a zero block bit means blocked and
    /// a set visit bit means visitable.
    pub fn from_masks(block: &[u8; 6], visit: &[u8; 6]) -> Self {
        let mut cells = [[CellKind::Passable; Self::WIDTH]; Self::HEIGHT];
        for (row_index, row) in cells.iter_mut().enumerate() {
            for (col_index, cell) in row.iter_mut().enumerate() {
                let byte = Self::HEIGHT - 1 - row_index;
                let bit = Self::WIDTH - 1 - col_index;
                if (block[byte] >> bit) & 1 == 0 {
                    *cell = CellKind::Blocked;
                }
                if (visit[byte] >> bit) & 1 == 1 {
                    *cell = CellKind::Visitable;
                }
            }
        }
        Self { cells }
    }

    /// The cell at the given column and row, counted from the top left.
    pub fn cell(&self, x: usize, y: usize) -> Option<CellKind> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Whether any cell triggers the object on entry.
    pub fn is_visitable(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|c| *c == CellKind::Visitable)
    }

    /// How many cells the object occupies or triggers from.
    pub fn blocked_cell_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c != CellKind::Passable)
            .count()
    }
}

/// A sprite the renderer knows how to draw. Unrecognized animation
/// files decode to [`Sprite::Placeholder`] so the map still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Town,
    Hero,
    Monster,
    Mine,
    Resource,
    Artifact,
    TreasureChest,
    Event,
    Grail,
    SpellScroll,
    /// Stand-in for a sprite the catalog does not know
    Placeholder,
}

impl Sprite {
    /// Resolve an animation file name to a known sprite.
    fn resolve(animation_file: &str) -> Option<Self> {
        let stem = animation_file
            .split('.')
            .next()
            .unwrap_or(animation_file)
            .to_ascii_uppercase();
        match stem.as_str() {
            "AVCCAST0" | "AVCRAMP0" | "AVCTOWR0" | "AVCINFT0" | "AVCNECR0" | "AVCDUNG0"
            | "AVCSTRO0" | "AVCFTRT0" | "AVCHFOR0" | "AVCRAND0" => Some(Self::Town),
            "AH00_E" | "AH01_E" | "AH02_E" | "AH03_E" | "AH04_E" | "AH05_E" | "AH06_E"
            | "AH07_E" | "AH08_E" | "AH15_E" | "AH16_E" | "AH17_E" => Some(Self::Hero),
            "AVWMRND0" | "AVWMON1" | "AVWMON2" | "AVWMON3" | "AVWMON4" | "AVWMON5"
            | "AVWMON6" | "AVWMON7" => Some(Self::Monster),
            "AVMSAWG0" | "AVMSAWD0" | "AVMALCH0" | "AVMORE0" | "AVMCRDR0" | "AVMGEMS0"
            | "AVMGOLD0" | "AVMSULF0" | "AVMABMG" => Some(Self::Mine),
            "AVTWOOD0" | "AVTMERC0" | "AVTORE0" | "AVTSULF0" | "AVTCRYS0" | "AVTGEMS0"
            | "AVTGOLD0" | "AVTRNDM0" => Some(Self::Resource),
            "AVA0128" | "AVARND" => Some(Self::Artifact),
            "AVTCHST0" => Some(Self::TreasureChest),
            "AVZEVNT0" => Some(Self::Event),
            "AVZGRAIL" | "AVZGRHL" => Some(Self::Grail),
            "AVA0001" => Some(Self::SpellScroll),
            _ => None,
        }
    }
}

/// A template index paired with the animation file the sprite catalog
/// could not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSprite {
    /// Index into the template table
    pub template_index: u32,
    /// The file name the template carries
    pub animation_file: String,
}

/// Non-fatal findings collected while decoding the template table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateDiagnostics {
    /// Templates whose sprite decoded to a placeholder
    pub unknown_sprites: Vec<UnknownSprite>,
}

impl TemplateDiagnostics {
    /// Whether every template resolved cleanly.
    pub fn is_clean(&self) -> bool {
        self.unknown_sprites.is_empty()
    }
}

/// One shared object template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTemplate {
    /// Animation file name as stored
    pub animation_file: String,
    /// Resolved sprite, placeholder when unknown
    pub sprite: Sprite,
    /// Which cells the object occupies and triggers from
    pub footprint: Footprint,
    /// Terrains the object may be placed on
    pub allowed_terrains: Vec<TerrainKind>,
    /// Terrains the editor lists the object under
    pub editor_terrains: Vec<TerrainKind>,
    /// Object type id, resolved to a kind when an instance references
    /// the template
    pub object_type: u32,
    /// Object subtype id
    pub object_subtype: u32,
    /// Editor object group, absent when stored as the sentinel
    pub editor_group: Option<u8>,
    /// Whether the editor files the object under the underground level
    pub in_underground: bool,
}

/// The nine terrains a template bitmask can name, in bit order.
const TERRAIN_BIT_ORDER: [TerrainKind; 9] = [
    TerrainKind::Dirt,
    TerrainKind::Sand,
    TerrainKind::Grass,
    TerrainKind::Snow,
    TerrainKind::Swamp,
    TerrainKind::Rough,
    TerrainKind::Subterranean,
    TerrainKind::Lava,
    TerrainKind::Water,
];

fn decode_terrain_mask(mask: u16) -> Vec<TerrainKind> {
    TERRAIN_BIT_ORDER
        .iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, kind)| *kind)
        .collect()
}

/// Longest animation file name accepted before the decode is treated as
/// desynchronized.
const ANIMATION_FILE_CAP: usize = 256;

/// Stored editor-group value meaning "no group".
const EDITOR_GROUP_NONE: u8 = 0xff;

fn read_template(
    reader: &mut ByteReader<'_>,
    reserved: ReservedCheck,
    index: u32,
    diagnostics: &mut TemplateDiagnostics,
) -> Result<ObjectTemplate> {
    let animation_file = reader.read_string_capped(ANIMATION_FILE_CAP)?;

    let mut block = [0u8; 6];
    block.copy_from_slice(reader.read_bytes(6)?);
    let mut visit = [0u8; 6];
    visit.copy_from_slice(reader.read_bytes(6)?);
    let footprint = Footprint::from_masks(&block, &visit);

    let allowed_terrains = decode_terrain_mask(reader.read_u16_le()?);
    let editor_terrains = decode_terrain_mask(reader.read_u16_le()?);

    let object_type = reader.read_u32_le()?;
    let object_subtype = reader.read_u32_le()?;
    // Every classic edition stores the group byte first and the level
    // flag second; the mod formats that rearrange this tail are
    // rejected at the magic check.
    let group = reader.read_u8()?;
    let editor_group = (group != EDITOR_GROUP_NONE).then_some(group);
    let in_underground = reader.read_u8()? != 0;
    reader.skip_reserved(16, reserved)?;

    let sprite = match Sprite::resolve(&animation_file) {
        Some(sprite) => sprite,
        None => {
            log::warn!("template {index}: unknown animation file {animation_file:?}");
            diagnostics.unknown_sprites.push(UnknownSprite {
                template_index: index,
                animation_file: animation_file.clone(),
            });
            Sprite::Placeholder
        }
    };

    Ok(ObjectTemplate {
        animation_file,
        sprite,
        footprint,
        allowed_terrains,
        editor_terrains,
        object_type,
        object_subtype,
        editor_group,
        in_underground,
    })
}

/// Read the template table. The count sanity bound is enforced by the
/// caller, which knows the map dimensions.
pub fn read_templates(
    reader: &mut ByteReader<'_>,
    count: u32,
    reserved: ReservedCheck,
    diagnostics: &mut TemplateDiagnostics,
) -> Result<Vec<ObjectTemplate>> {
    let mut templates = Vec::with_capacity(count as usize);
    for index in 0..count {
        templates.push(read_template(reader, reserved, index, diagnostics)?);
    }
    Ok(templates)
}
