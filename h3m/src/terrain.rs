//! Terrain tile grid decoding.

use bitflags::bitflags;

use crate::common::Position;
use crate::error::{H3mError, Result};
use crate::header::MapSize;
use crate::reader::ByteReader;

/// Ground type of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    Dirt,
    Sand,
    Grass,
    Snow,
    Swamp,
    Rough,
    Subterranean,
    Lava,
    Water,
    Rock,
}

impl TerrainKind {
    /// Decode the ground type byte.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Dirt),
            1 => Some(Self::Sand),
            2 => Some(Self::Grass),
            3 => Some(Self::Snow),
            4 => Some(Self::Swamp),
            5 => Some(Self::Rough),
            6 => Some(Self::Subterranean),
            7 => Some(Self::Lava),
            8 => Some(Self::Water),
            9 => Some(Self::Rock),
            _ => None,
        }
    }

    /// Whether ships can sail this tile.
    pub fn is_water(self) -> bool {
        self == Self::Water
    }

    /// Whether the tile can never be entered.
    pub fn is_blocked(self) -> bool {
        self == Self::Rock
    }
}

/// River overlay type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiverKind {
    Clear,
    Icy,
    Muddy,
    Lava,
}

impl RiverKind {
    /// Decode the river byte; zero means no river.
    pub fn from_u8(raw: u8) -> Option<Option<Self>> {
        match raw {
            0 => Some(None),
            1 => Some(Some(Self::Clear)),
            2 => Some(Some(Self::Icy)),
            3 => Some(Some(Self::Muddy)),
            4 => Some(Some(Self::Lava)),
            _ => None,
        }
    }
}

/// Road overlay type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadKind {
    Dirt,
    Gravel,
    Cobblestone,
}

impl RoadKind {
    /// Decode the road byte; zero means no road.
    pub fn from_u8(raw: u8) -> Option<Option<Self>> {
        match raw {
            0 => Some(None),
            1 => Some(Some(Self::Dirt)),
            2 => Some(Some(Self::Gravel)),
            3 => Some(Some(Self::Cobblestone)),
            _ => None,
        }
    }
}

bitflags! {
    /// Flag bits of the tile mirroring byte. The low bits hold sprite
    /// mirroring state and are kept verbatim.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TileFlags: u8 {
        /// Land tile adjacent to water
        const COASTAL = 0x40;
        /// Water tile with the favourable-winds effect
        const FAVOURABLE_WINDS = 0x80;

        const _ = !0;
    }
}

/// One terrain tile, seven bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Where the tile sits, derived from read order
    pub position: Position,
    /// Ground type
    pub terrain: TerrainKind,
    /// Ground sprite frame
    pub terrain_sprite: u8,
    /// River overlay, if any
    pub river: Option<RiverKind>,
    /// River sprite frame
    pub river_sprite: u8,
    /// Road overlay, if any
    pub road: Option<RoadKind>,
    /// Road sprite frame
    pub road_sprite: u8,
    /// Mirroring and property flags
    pub flags: TileFlags,
}

impl Tile {
    /// Whether the tile touches water without being water.
    pub fn is_coastal(&self) -> bool {
        self.flags.contains(TileFlags::COASTAL)
    }

    /// Whether a ship passing here gets the favourable-winds bonus.
    pub fn has_favourable_winds(&self) -> bool {
        self.flags.contains(TileFlags::FAVOURABLE_WINDS)
    }

    fn read(reader: &mut ByteReader<'_>, position: Position) -> Result<Self> {
        let at = reader.offset();
        let raw = reader.read_u8()?;
        let terrain = TerrainKind::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
            what: "terrain kind",
            value: raw as u32,
            offset: at,
        })?;
        let terrain_sprite = reader.read_u8()?;

        let at = reader.offset();
        let raw = reader.read_u8()?;
        let river = RiverKind::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
            what: "river kind",
            value: raw as u32,
            offset: at,
        })?;
        let river_sprite = reader.read_u8()?;

        let at = reader.offset();
        let raw = reader.read_u8()?;
        let road = RoadKind::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
            what: "road kind",
            value: raw as u32,
            offset: at,
        })?;
        let road_sprite = reader.read_u8()?;

        let flags = TileFlags::from_bits_retain(reader.read_u8()?);

        Ok(Self {
            position,
            terrain,
            terrain_sprite,
            river,
            river_sprite,
            road,
            road_sprite,
            flags,
        })
    }
}

/// The full tile grid, above ground first and underground second when
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terrain {
    /// Edge length category
    pub size: MapSize,
    /// Whether an underground level exists
    pub has_underground: bool,
    /// Tiles in read order, row by row, level by level
    pub tiles: Vec<Tile>,
}

impl Terrain {
    /// Read one or two full levels of tiles. Positions are assigned
    /// from read order: x fastest, then y, then level.
    pub fn read(
        reader: &mut ByteReader<'_>,
        size: MapSize,
        has_underground: bool,
    ) -> Result<Self> {
        let edge = size.edge();
        let levels = if has_underground { 2 } else { 1 };
        let mut tiles = Vec::with_capacity(size.tiles_per_level() * levels);
        for z in 0..levels {
            for y in 0..edge {
                for x in 0..edge {
                    let position = Position {
                        x: x as u8,
                        y: y as u8,
                        z: z as u8,
                    };
                    tiles.push(Tile::read(reader, position)?);
                }
            }
        }
        Ok(Self {
            size,
            has_underground,
            tiles,
        })
    }

    /// The tile at a position, if the position is on the map.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        let edge = self.size.edge();
        let (x, y, z) = (
            position.x as usize,
            position.y as usize,
            position.z as usize,
        );
        if x >= edge || y >= edge || z >= if self.has_underground { 2 } else { 1 } {
            return None;
        }
        self.tiles.get(z * self.size.tiles_per_level() + y * edge + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn water_tile_bytes(flags: u8) -> [u8; 7] {
        [8, 20, 0, 0, 0, 0, flags]
    }

    #[test]
    fn test_positions_follow_read_order() {
        let mut data = Vec::new();
        for _ in 0..36 * 36 {
            data.extend_from_slice(&water_tile_bytes(0));
        }
        let mut reader = ByteReader::new(&data);
        let terrain = Terrain::read(&mut reader, MapSize::Small, false).unwrap();
        assert_eq!(terrain.tiles.len(), 1296);
        assert_eq!(
            terrain.tiles[37].position,
            Position { x: 1, y: 1, z: 0 }
        );
        assert!(terrain.tiles.iter().all(|t| t.terrain == TerrainKind::Water));
    }

    #[test]
    fn test_flag_bits() {
        let data = water_tile_bytes(0x80);
        let mut reader = ByteReader::new(&data);
        let tile = Tile::read(&mut reader, Position { x: 0, y: 0, z: 0 }).unwrap();
        assert!(tile.has_favourable_winds());
        assert!(!tile.is_coastal());
    }

    #[test]
    fn test_unknown_terrain_kind_is_rejected() {
        let data = [10, 0, 0, 0, 0, 0, 0];
        let mut reader = ByteReader::new(&data);
        let err = Tile::read(&mut reader, Position { x: 0, y: 0, z: 0 }).unwrap_err();
        assert!(matches!(
            err,
            H3mError::InvalidEnumValue {
                what: "terrain kind",
                value: 10,
                offset: 0
            }
        ));
    }

    #[test]
    fn test_tile_at_indexing() {
        let mut data = Vec::new();
        for _ in 0..2 * 36 * 36 {
            data.extend_from_slice(&water_tile_bytes(0));
        }
        let mut reader = ByteReader::new(&data);
        let terrain = Terrain::read(&mut reader, MapSize::Small, true).unwrap();
        let position = Position { x: 5, y: 7, z: 1 };
        assert_eq!(terrain.tile_at(position).unwrap().position, position);
        assert_eq!(terrain.tile_at(Position { x: 36, y: 0, z: 0 }), None);
    }
}
