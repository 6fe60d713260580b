//! Wandering monster payloads.

use crate::common::{read_artifact_id, ArtifactId};
use crate::error::{H3mError, Result};
use crate::reader::ByteReader;
use crate::resources::Resources;
use crate::version::FormatVersion;

/// How willing a monster stack is to join or fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Disposition {
    /// Always joins
    Compliant,
    /// Joins if not outmatched
    Friendly,
    /// May join for money
    Aggressive,
    /// Rarely joins
    Hostile,
    /// Never joins
    Savage,
}

impl Disposition {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Compliant),
            1 => Some(Self::Friendly),
            2 => Some(Self::Aggressive),
            3 => Some(Self::Hostile),
            4 => Some(Self::Savage),
            _ => None,
        }
    }
}

/// What defeating the stack yields, beyond the fight itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterTreasure {
    /// Message shown on approach
    pub message: String,
    /// Resources dropped
    pub resources: Resources,
    /// Artifact dropped, if any
    pub artifact: Option<ArtifactId>,
}

/// A monster stack blocking the map, placed or random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterObject {
    /// Identifier quests can reference, absent in the oldest format
    pub quest_identifier: Option<u32>,
    /// Stack size, zero means rolled at game start
    pub count: u16,
    /// Join/fight temperament
    pub disposition: Disposition,
    /// Treasure yielded on defeat, if any
    pub treasure: Option<MonsterTreasure>,
    /// Whether the stack never retreats
    pub never_flees: bool,
    /// Whether the stack is exempt from weekly growth
    pub does_not_grow: bool,
}

impl MonsterObject {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let quest_identifier = if version.has_object_identifiers() {
            Some(reader.read_u32_le()?)
        } else {
            None
        };
        let count = reader.read_u16_le()?;
        let at = reader.offset();
        let raw = reader.read_u8()?;
        let disposition = Disposition::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
            what: "monster disposition",
            value: raw as u32,
            offset: at,
        })?;
        let treasure = if reader.read_bool()? {
            let message = reader.read_string()?;
            let resources = Resources::read(reader)?;
            let artifact = read_artifact_id(reader, version)?;
            Some(MonsterTreasure {
                message,
                resources,
                artifact,
            })
        } else {
            None
        };
        let never_flees = reader.read_bool()?;
        let does_not_grow = reader.read_bool()?;
        reader.skip(2)?;
        Ok(Self {
            quest_identifier,
            count,
            disposition,
            treasure,
            never_flees,
            does_not_grow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_monster_without_treasure() {
        let mut data = Vec::new();
        data.extend_from_slice(&9u32.to_le_bytes());
        data.extend_from_slice(&40u16.to_le_bytes());
        data.push(4); // savage
        data.push(0); // no treasure
        data.push(1); // never flees
        data.push(0);
        data.extend_from_slice(&[0; 2]);
        let mut reader = ByteReader::new(&data);
        let monster = MonsterObject::read(&mut reader, FormatVersion::ShadowOfDeath).unwrap();
        assert_eq!(monster.quest_identifier, Some(9));
        assert_eq!(monster.count, 40);
        assert_eq!(monster.disposition, Disposition::Savage);
        assert!(monster.never_flees);
        assert!(!monster.does_not_grow);
        assert_eq!(reader.offset(), data.len());
    }

    #[test]
    fn test_roe_monster_has_no_identifier() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u16.to_le_bytes()); // random count
        data.push(2);
        data.push(1); // treasure
        data.extend_from_slice(&0u32.to_le_bytes()); // empty message
        data.extend_from_slice(&[0; 28]); // no resources
        data.push(0xff); // no artifact, narrow id
        data.push(0);
        data.push(0);
        data.extend_from_slice(&[0; 2]);
        let mut reader = ByteReader::new(&data);
        let monster =
            MonsterObject::read(&mut reader, FormatVersion::RestorationOfErathia).unwrap();
        assert_eq!(monster.quest_identifier, None);
        assert_eq!(monster.count, 0);
        let treasure = monster.treasure.unwrap();
        assert!(treasure.resources.is_empty());
        assert_eq!(treasure.artifact, None);
        assert_eq!(reader.offset(), data.len());
    }
}
