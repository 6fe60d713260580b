//! Small shared identifiers and records used across several sections.

use crate::error::{H3mError, Result};
use crate::reader::ByteReader;
use crate::version::FormatVersion;

/// A tile position: x, y and level (0 = above ground, 1 = underground).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Column, counted from the west edge
    pub x: u8,
    /// Row, counted from the north edge
    pub y: u8,
    /// 0 above ground, 1 underground
    pub z: u8,
}

impl Position {
    /// Read an x/y/z triple as stored in the file.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            x: reader.read_u8()?,
            y: reader.read_u8()?,
            z: reader.read_u8()?,
        })
    }
}

/// Identifies a hero (also used for portrait ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeroId(pub u8);

/// Identifies an artifact. `u8` on disk before Armageddon's Blade,
/// `u16` from it onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(pub u16);

/// Identifies a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpellId(pub u8);

/// Identifies a secondary-skill kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkillId(pub u8);

/// Read an artifact id at the width of the given format version.
/// The all-ones sentinel means "no artifact".
pub fn read_artifact_id(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<Option<ArtifactId>> {
    if version.has_wide_ids() {
        let id = reader.read_u16_le()?;
        Ok((id != 0xffff).then_some(ArtifactId(id)))
    } else {
        let id = reader.read_u8()?;
        Ok((id != 0xff).then_some(ArtifactId(id as u16)))
    }
}

/// Mastery level of a secondary skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkillLevel {
    /// Basic mastery
    Basic,
    /// Advanced mastery
    Advanced,
    /// Expert mastery
    Expert,
}

impl SkillLevel {
    /// Decode the on-disk level byte (1-based).
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Basic),
            2 => Some(Self::Advanced),
            3 => Some(Self::Expert),
            _ => None,
        }
    }
}

/// A learned secondary skill with its mastery level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondarySkill {
    /// Which skill
    pub skill: SkillId,
    /// At which mastery
    pub level: SkillLevel,
}

impl SecondarySkill {
    /// Read one skill/level pair.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let skill = SkillId(reader.read_u8()?);
        let at = reader.offset();
        let raw = reader.read_u8()?;
        let level = SkillLevel::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
            what: "secondary skill level",
            value: raw as u32,
            offset: at,
        })?;
        Ok(Self { skill, level })
    }
}

/// The four primary hero skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimarySkills {
    /// Attack rating
    pub attack: u8,
    /// Defense rating
    pub defense: u8,
    /// Spell power
    pub spell_power: u8,
    /// Knowledge
    pub knowledge: u8,
}

impl PrimarySkills {
    /// Read the four ratings in file order.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            attack: reader.read_u8()?,
            defense: reader.read_u8()?,
            spell_power: reader.read_u8()?,
            knowledge: reader.read_u8()?,
        })
    }
}

/// Hero gender override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
}

impl Gender {
    /// Decode the gender byte; `0xff` means "default for the hero".
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Male),
            1 => Some(Self::Female),
            _ => None,
        }
    }
}

/// Army display formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formation {
    /// Units spread over the whole line
    #[default]
    Spread,
    /// Units grouped tightly
    Tight,
}

impl Formation {
    /// Decode the formation byte.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Spread),
            1 => Some(Self::Tight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_id_width_by_version() {
        let data = [0x03, 0x00, 0xff, 0xff];
        let mut reader = ByteReader::new(&data);
        assert_eq!(
            read_artifact_id(&mut reader, FormatVersion::ShadowOfDeath).unwrap(),
            Some(ArtifactId(3))
        );
        assert_eq!(
            read_artifact_id(&mut reader, FormatVersion::ShadowOfDeath).unwrap(),
            None
        );

        let data = [0x03, 0xff];
        let mut reader = ByteReader::new(&data);
        assert_eq!(
            read_artifact_id(&mut reader, FormatVersion::RestorationOfErathia).unwrap(),
            Some(ArtifactId(3))
        );
        assert_eq!(
            read_artifact_id(&mut reader, FormatVersion::RestorationOfErathia).unwrap(),
            None
        );
    }

    #[test]
    fn test_secondary_skill_rejects_bad_level() {
        let data = [0x05, 0x09];
        let mut reader = ByteReader::new(&data);
        let err = SecondarySkill::read(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            H3mError::InvalidEnumValue {
                what: "secondary skill level",
                value: 9,
                offset: 1
            }
        ));
    }
}
