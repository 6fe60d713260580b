//! Placed hero payloads, shared by heroes, random heroes and prisons.

use crate::additional_info::HeroArtifacts;
use crate::bitmask;
use crate::common::{Formation, Gender, HeroId, PrimarySkills, SecondarySkill, SpellId};
use crate::creature::{self, CreatureSlots};
use crate::error::{H3mError, Result};
use crate::player::PlayerColor;
use crate::reader::{ByteReader, ReservedCheck};
use crate::version::FormatVersion;

/// A hero standing on the map, held in a prison, or rolled at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroObject {
    /// Identifier quests can reference, absent in the oldest format
    pub quest_identifier: Option<u32>,
    /// Owning player, `None` for prisons
    pub owner: Option<PlayerColor>,
    /// Which hero, `0xff` subtype means rolled at start
    pub hero_id: HeroId,
    /// Custom name, if overridden
    pub name: Option<String>,
    /// Starting experience, if overridden
    pub experience: Option<u32>,
    /// Portrait override
    pub portrait: Option<HeroId>,
    /// Secondary skills, if overridden
    pub secondary_skills: Option<Vec<SecondarySkill>>,
    /// Army, if overridden
    pub garrison: Option<CreatureSlots>,
    /// Army display formation
    pub formation: Formation,
    /// Equipment, if overridden
    pub artifacts: Option<HeroArtifacts>,
    /// Patrol radius in tiles, `None` when the hero roams freely
    pub patrol_radius: Option<u8>,
    /// Biography, if overridden
    pub biography: Option<String>,
    /// Gender, if overridden
    pub gender: Option<Gender>,
    /// Spell book, if overridden
    pub spells: Option<Vec<SpellId>>,
    /// Primary skills, if overridden
    pub primary_skills: Option<PrimarySkills>,
}

impl HeroObject {
    /// Read the full hero record. Its tail is a sixteen byte reserved
    /// area used as an alignment self-check.
    pub fn read(
        reader: &mut ByteReader<'_>,
        version: FormatVersion,
        reserved: ReservedCheck,
    ) -> Result<Self> {
        let quest_identifier = if version.has_object_identifiers() {
            Some(reader.read_u32_le()?)
        } else {
            None
        };
        let owner = PlayerColor::from_u8(reader.read_u8()?);
        let hero_id = HeroId(reader.read_u8()?);

        let name = reader.read_bool()?.then(|| reader.read_string()).transpose()?;

        let experience = if version.has_hero_spell_set() {
            reader
                .read_bool()?
                .then(|| reader.read_u32_le())
                .transpose()?
        } else {
            let experience = reader.read_u32_le()?;
            (experience != 0).then_some(experience)
        };

        let portrait = if version.has_hero_portraits() {
            reader
                .read_bool()?
                .then(|| reader.read_u8())
                .transpose()?
                .map(HeroId)
        } else {
            None
        };

        let secondary_skills = if reader.read_bool()? {
            let count = reader.read_u32_le()?;
            let mut skills = Vec::new();
            for _ in 0..count {
                skills.push(SecondarySkill::read(reader)?);
            }
            Some(skills)
        } else {
            None
        };

        let garrison = if reader.read_bool()? {
            Some(creature::read_slots(reader, version)?)
        } else {
            None
        };

        let at = reader.offset();
        let raw = reader.read_u8()?;
        let formation = Formation::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
            what: "army formation",
            value: raw as u32,
            offset: at,
        })?;

        let artifacts = if reader.read_bool()? {
            Some(HeroArtifacts::read(reader, version)?)
        } else {
            None
        };

        let patrol = reader.read_u8()?;
        let patrol_radius = (patrol != 0xff).then_some(patrol);

        let mut biography = None;
        let mut gender = None;
        if version.has_wide_ids() {
            biography = reader.read_bool()?.then(|| reader.read_string()).transpose()?;
            gender = Gender::from_u8(reader.read_u8()?);
        }

        let spells = if version.has_hero_spell_set() {
            if reader.read_bool()? {
                let ids: Vec<SpellId> =
                    (0..version.spell_count()).map(|i| SpellId(i as u8)).collect();
                Some(bitmask::read_enum_set(
                    reader,
                    version.spell_count().div_ceil(8),
                    &ids,
                )?)
            } else {
                None
            }
        } else if version.has_wide_ids() {
            // A single starting spell, all-ones when unset.
            let spell = reader.read_u8()?;
            (spell != 0xff).then(|| vec![SpellId(spell)])
        } else {
            None
        };

        let primary_skills = if version.has_hero_spell_set() {
            reader
                .read_bool()?
                .then(|| PrimarySkills::read(reader))
                .transpose()?
        } else {
            None
        };

        reader.skip_reserved(16, reserved)?;

        Ok(Self {
            quest_identifier,
            owner,
            hero_id,
            name,
            experience,
            portrait,
            secondary_skills,
            garrison,
            formation,
            artifacts,
            patrol_radius,
            biography,
            gender,
            spells,
            primary_skills,
        })
    }
}

/// A campaign stand-in for a hero carried over from earlier scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroPlaceholder {
    /// Owning player
    pub owner: Option<PlayerColor>,
    /// The specific hero, or `None` when filled by strength
    pub hero_id: Option<HeroId>,
    /// Strength rank used when no specific hero is named
    pub power_rating: Option<u8>,
}

impl HeroPlaceholder {
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let owner = PlayerColor::from_u8(reader.read_u8()?);
        let id = reader.read_u8()?;
        if id != 0xff {
            Ok(Self {
                owner,
                hero_id: Some(HeroId(id)),
                power_rating: None,
            })
        } else {
            Ok(Self {
                owner,
                hero_id: None,
                power_rating: Some(reader.read_u8()?),
            })
        }
    }
}
