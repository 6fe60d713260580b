//! Smaller object payloads: pickups, mines, garrisons, dwellings and
//! the various one-byte-plus-padding records.

use super::guards::MessageAndGuards;
use crate::bitmask;
use crate::common::{SkillId, SpellId};
use crate::creature::{self, CreatureSlots};
use crate::error::{H3mError, Result};
use crate::player::{Faction, PlayerColor};
use crate::reader::ByteReader;
use crate::resources::ResourceKind;
use crate::version::FormatVersion;

/// An artifact lying on the map, possibly guarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactObject {
    /// Approach message and guards, if any
    pub guards: Option<MessageAndGuards>,
}

impl ArtifactObject {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        Ok(Self {
            guards: MessageAndGuards::read(reader, version)?,
        })
    }
}

/// A spell scroll pickup: a guarded artifact that names its spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellScrollObject {
    /// Approach message and guards, if any
    pub guards: Option<MessageAndGuards>,
    /// The spell written on the scroll
    pub spell: SpellId,
}

impl SpellScrollObject {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let guards = MessageAndGuards::read(reader, version)?;
        let spell = SpellId(reader.read_u32_le()? as u8);
        Ok(Self { guards, spell })
    }
}

/// A resource pile, possibly guarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceObject {
    /// Approach message and guards, if any
    pub guards: Option<MessageAndGuards>,
    /// Pile size; for gold this is stored in units of one hundred
    pub amount: u32,
}

impl ResourceObject {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let guards = MessageAndGuards::read(reader, version)?;
        let amount = reader.read_u32_le()?;
        reader.skip(4)?;
        Ok(Self { guards, amount })
    }
}

/// A mine or abandoned mine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineObject {
    /// A working mine with an optional owner
    Owned { owner: Option<PlayerColor> },
    /// An abandoned mine that may yield one of the listed resources
    /// once cleared
    Abandoned { possible_resources: Vec<ResourceKind> },
}

impl MineObject {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let owner = PlayerColor::from_u8(reader.read_u8()?);
        reader.skip(3)?;
        Ok(Self::Owned { owner })
    }

    pub fn read_abandoned(reader: &mut ByteReader<'_>) -> Result<Self> {
        let possible_resources = bitmask::read_enum_set(reader, 1, &ResourceKind::ALL)?;
        reader.skip(3)?;
        Ok(Self::Abandoned { possible_resources })
    }
}

/// A free-standing garrison army.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarrisonObject {
    /// Owning player
    pub owner: Option<PlayerColor>,
    /// The stationed army
    pub army: CreatureSlots,
    /// Whether the owner may take creatures out
    pub removable_units: bool,
}

impl GarrisonObject {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let owner = PlayerColor::from_u8(reader.read_u8()?);
        reader.skip(3)?;
        let army = creature::read_slots(reader, version)?;
        let removable_units = if version.has_object_identifiers() {
            reader.read_bool()?
        } else {
            true
        };
        reader.skip(8)?;
        Ok(Self {
            owner,
            army,
            removable_units,
        })
    }
}

/// What a scholar teaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScholarBonus {
    /// Rolled at game start
    Random,
    /// A primary skill point, by skill index
    PrimarySkill(u8),
    /// A secondary skill
    SecondarySkill(SkillId),
    /// A spell
    Spell(SpellId),
}

/// A scholar standing on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScholarObject {
    /// What visiting him grants
    pub bonus: ScholarBonus,
}

impl ScholarObject {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let at = reader.offset();
        let kind = reader.read_u8()?;
        let id = reader.read_u8()?;
        let bonus = match kind {
            0xff => ScholarBonus::Random,
            0 => ScholarBonus::PrimarySkill(id),
            1 => ScholarBonus::SecondarySkill(SkillId(id)),
            2 => ScholarBonus::Spell(SpellId(id)),
            _ => {
                return Err(H3mError::InvalidEnumValue {
                    what: "scholar bonus",
                    value: kind as u32,
                    offset: at,
                })
            }
        };
        reader.skip(6)?;
        Ok(Self { bonus })
    }
}

/// Where a random dwelling takes its faction from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DwellingFactions {
    /// Same faction as the town with the given identifier
    SameAsTown(u32),
    /// Rolled from the listed factions
    Any(Vec<Faction>),
}

/// A random creature dwelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomDwellingObject {
    /// Owning player
    pub owner: Option<PlayerColor>,
    /// Faction roll, `None` when fixed by the object subtype
    pub factions: Option<DwellingFactions>,
    /// Creature level range, `None` when fixed by the object subtype
    pub levels: Option<(u8, u8)>,
}

impl RandomDwellingObject {
    /// Read a random dwelling record. The preset variants omit the
    /// faction roll or the level range.
    pub fn read(
        reader: &mut ByteReader<'_>,
        random_faction: bool,
        random_level: bool,
    ) -> Result<Self> {
        let owner = PlayerColor::from_u8(reader.read_u32_le()? as u8);
        let factions = if random_faction {
            let identifier = reader.read_u32_le()?;
            if identifier != 0 {
                Some(DwellingFactions::SameAsTown(identifier))
            } else {
                Some(DwellingFactions::Any(bitmask::read_enum_set(
                    reader,
                    2,
                    &Faction::ALL,
                )?))
            }
        } else {
            None
        };
        let levels = if random_level {
            Some((reader.read_u8()?, reader.read_u8()?))
        } else {
            None
        };
        Ok(Self {
            owner,
            factions,
            levels,
        })
    }
}

/// The skills a witch hut may teach. The oldest format has no mask and
/// allows every skill.
pub fn read_witch_hut_skills(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<Vec<SkillId>> {
    let ids: Vec<SkillId> = (0..version.skill_count()).map(|i| SkillId(i as u8)).collect();
    if version.has_witch_hut_skills() {
        bitmask::read_enum_set(reader, version.skill_count().div_ceil(8), &ids)
    } else {
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_abandoned_mine_resource_roll() {
        let data = [0b0000_0101, 0, 0, 0];
        let mut reader = ByteReader::new(&data);
        let mine = MineObject::read_abandoned(&mut reader).unwrap();
        assert_eq!(
            mine,
            MineObject::Abandoned {
                possible_resources: vec![ResourceKind::Wood, ResourceKind::Ore],
            }
        );
        assert_eq!(reader.offset(), 4);
    }

    #[test]
    fn test_unowned_mine() {
        let data = [0xff, 0, 0, 0];
        let mut reader = ByteReader::new(&data);
        let mine = MineObject::read(&mut reader).unwrap();
        assert_eq!(mine, MineObject::Owned { owner: None });
    }

    #[test]
    fn test_dwelling_tied_to_town() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes()); // tan
        data.extend_from_slice(&77u32.to_le_bytes()); // town identifier
        data.push(1);
        data.push(5);
        let mut reader = ByteReader::new(&data);
        let dwelling = RandomDwellingObject::read(&mut reader, true, true).unwrap();
        assert_eq!(dwelling.owner, Some(PlayerColor::Tan));
        assert_eq!(dwelling.factions, Some(DwellingFactions::SameAsTown(77)));
        assert_eq!(dwelling.levels, Some((1, 5)));
    }

    #[test]
    fn test_witch_hut_mask_gates_skills() {
        let data = [0b0000_0010, 0, 0, 0];
        let mut reader = ByteReader::new(&data);
        let skills =
            read_witch_hut_skills(&mut reader, FormatVersion::ShadowOfDeath).unwrap();
        assert_eq!(skills, vec![SkillId(1)]);

        let mut reader = ByteReader::new(&[]);
        let skills =
            read_witch_hut_skills(&mut reader, FormatVersion::RestorationOfErathia).unwrap();
        assert_eq!(skills.len(), 28);
    }

    #[test]
    fn test_scholar_spell_bonus() {
        let data = [2, 0x14, 0, 0, 0, 0, 0, 0];
        let mut reader = ByteReader::new(&data);
        let scholar = ScholarObject::read(&mut reader).unwrap();
        assert_eq!(scholar.bonus, ScholarBonus::Spell(SpellId(0x14)));
        assert_eq!(reader.offset(), 8);
    }
}
