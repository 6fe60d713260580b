//! Creature identifiers and army slot records.

use crate::error::Result;
use crate::reader::ByteReader;
use crate::version::FormatVersion;

/// Identifies a creature kind. `u8` on disk before Armageddon's Blade,
/// `u16` from it onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreatureId(pub u16);

/// A stack of creatures in one army slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatureStack {
    /// What kind of creature
    pub creature: CreatureId,
    /// How many of them
    pub count: u16,
}

/// A full seven-slot army. Empty slots are `None`.
pub type CreatureSlots = [Option<CreatureStack>; 7];

/// Read one army slot. The all-ones creature id marks an empty slot;
/// its count is read and discarded.
pub fn read_slot(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<Option<CreatureStack>> {
    let id = if version.has_wide_ids() {
        reader.read_u16_le()?
    } else {
        reader.read_u8()? as u16
    };
    let count = reader.read_u16_le()?;
    let empty = if version.has_wide_ids() {
        id == 0xffff
    } else {
        id == 0xff
    };
    Ok((!empty).then_some(CreatureStack {
        creature: CreatureId(id),
        count,
    }))
}

/// Read a full seven-slot army.
pub fn read_slots(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<CreatureSlots> {
    let mut slots: CreatureSlots = [None; 7];
    for slot in &mut slots {
        *slot = read_slot(reader, version)?;
    }
    Ok(slots)
}
