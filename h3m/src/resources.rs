//! The seven resource kinds and resource amount records.

use crate::error::Result;
use crate::reader::ByteReader;

/// The seven tradeable resources, in bitmask and record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Wood,
    Mercury,
    Ore,
    Sulfur,
    Crystal,
    Gems,
    Gold,
}

impl ResourceKind {
    /// All resource kinds in file order.
    pub const ALL: [Self; 7] = [
        Self::Wood,
        Self::Mercury,
        Self::Ore,
        Self::Sulfur,
        Self::Crystal,
        Self::Gems,
        Self::Gold,
    ];

    /// Decode a resource index byte.
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

/// An amount of each resource. Amounts may be negative in event
/// bounties, where they act as a levy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resources {
    pub wood: i32,
    pub mercury: i32,
    pub ore: i32,
    pub sulfur: i32,
    pub crystal: i32,
    pub gems: i32,
    pub gold: i32,
}

impl Resources {
    /// Read seven 32-bit amounts in kind order.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            wood: reader.read_i32_le()?,
            mercury: reader.read_i32_le()?,
            ore: reader.read_i32_le()?,
            sulfur: reader.read_i32_le()?,
            crystal: reader.read_i32_le()?,
            gems: reader.read_i32_le()?,
            gold: reader.read_i32_le()?,
        })
    }

    /// The amount of one kind.
    pub fn amount(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Mercury => self.mercury,
            ResourceKind::Ore => self.ore,
            ResourceKind::Sulfur => self.sulfur,
            ResourceKind::Crystal => self.crystal,
            ResourceKind::Gems => self.gems,
            ResourceKind::Gold => self.gold,
        }
    }

    /// Whether every amount is zero.
    pub fn is_empty(&self) -> bool {
        ResourceKind::ALL.iter().all(|k| self.amount(*k) == 0)
    }
}
