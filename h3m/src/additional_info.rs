//! The sections between the team list and the terrain grid: availability
//! bitmasks, disposed and predefined heroes, and rumors.

use crate::bitmask;
use crate::common::{
    read_artifact_id, ArtifactId, Gender, HeroId, PrimarySkills, SecondarySkill, SkillId, SpellId,
};
use crate::error::Result;
use crate::player::PlayerColor;
use crate::reader::{ByteReader, ReservedCheck};
use crate::version::FormatVersion;

/// A hero removed from the tavern pool for some players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposedHero {
    /// Which hero
    pub id: HeroId,
    /// Portrait shown if the hero does appear
    pub portrait: HeroId,
    /// Custom name, empty if unchanged
    pub name: String,
    /// Players the hero is still available to
    pub available_to: Vec<PlayerColor>,
}

/// A tavern rumor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rumor {
    /// Short label shown in the editor
    pub name: String,
    /// The rumor text itself
    pub text: String,
}

/// An artifact worn in a specific equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WornArtifact {
    /// Equipment slot index
    pub slot: u8,
    /// The artifact in it
    pub artifact: ArtifactId,
}

/// Scenario-level overrides for one hero, keyed by hero id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedHero {
    /// Which hero the overrides apply to
    pub id: HeroId,
    /// Starting experience, if overridden
    pub experience: Option<u32>,
    /// Secondary skills, if overridden
    pub secondary_skills: Option<Vec<SecondarySkill>>,
    /// Worn artifacts and backpack, if overridden
    pub artifacts: Option<HeroArtifacts>,
    /// Biography, if overridden
    pub biography: Option<String>,
    /// Gender, if overridden
    pub gender: Option<Gender>,
    /// Spell book contents, if overridden
    pub spells: Option<Vec<SpellId>>,
    /// Primary skills, if overridden
    pub primary_skills: Option<PrimarySkills>,
}

/// A hero's equipment: worn artifacts plus the backpack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeroArtifacts {
    /// Artifacts in equipment slots
    pub worn: Vec<WornArtifact>,
    /// Artifacts carried but not worn
    pub backpack: Vec<ArtifactId>,
}

impl HeroArtifacts {
    /// Read the fixed slot sequence and the counted backpack.
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let mut worn = Vec::new();
        for slot in 0..version.artifact_slot_count() {
            if let Some(artifact) = read_artifact_id(reader, version)? {
                worn.push(WornArtifact {
                    slot: slot as u8,
                    artifact,
                });
            }
        }
        let count = reader.read_u16_le()?;
        let mut backpack = Vec::new();
        for _ in 0..count {
            if let Some(artifact) = read_artifact_id(reader, version)? {
                backpack.push(artifact);
            }
        }
        Ok(Self { worn, backpack })
    }
}

/// Everything the file stores between the team list and the terrain
/// grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalInfo {
    /// Heroes players may recruit
    pub allowed_heroes: Vec<HeroId>,
    /// Heroes a campaign holds back from this scenario
    pub reserved_campaign_heroes: Vec<HeroId>,
    /// Heroes removed from the pool for some players
    pub disposed_heroes: Vec<DisposedHero>,
    /// Artifacts that may appear
    pub allowed_artifacts: Vec<ArtifactId>,
    /// Spells that may appear
    pub allowed_spells: Vec<SpellId>,
    /// Secondary skills heroes may learn
    pub allowed_skills: Vec<SkillId>,
    /// Tavern rumors, in file order
    pub rumors: Vec<Rumor>,
    /// Per-hero scenario overrides
    pub predefined_heroes: Vec<PredefinedHero>,
}

/// Guard against absurd counted lists in corrupt files.
const LIST_CAP: u32 = 10_000;

fn check_count(reader: &ByteReader<'_>, count: u32, what: &str) -> Result<()> {
    if count > LIST_CAP {
        return Err(crate::error::H3mError::SanityBoundViolation {
            detail: format!("{what} count {count} exceeds {LIST_CAP}"),
            offset: reader.offset(),
        });
    }
    Ok(())
}

impl AdditionalInfo {
    /// Read the whole section.
    pub fn read(
        reader: &mut ByteReader<'_>,
        version: FormatVersion,
        reserved: ReservedCheck,
    ) -> Result<Self> {
        let hero_ids: Vec<HeroId> = (0..version.hero_count()).map(|i| HeroId(i as u8)).collect();
        let allowed_heroes =
            bitmask::read_enum_set(reader, version.hero_bitmask_bytes(), &hero_ids)?;

        let mut reserved_campaign_heroes = Vec::new();
        if version.has_wide_ids() {
            let count = reader.read_u32_le()?;
            check_count(reader, count, "campaign-reserved hero")?;
            for _ in 0..count {
                reserved_campaign_heroes.push(HeroId(reader.read_u8()?));
            }
        }

        let mut disposed_heroes = Vec::new();
        if version.has_disposed_heroes() {
            let count = reader.read_u8()?;
            for _ in 0..count {
                let id = HeroId(reader.read_u8()?);
                let portrait = HeroId(reader.read_u8()?);
                let name = reader.read_string()?;
                let available_to = bitmask::read_enum_set(reader, 1, &PlayerColor::ALL)?;
                disposed_heroes.push(DisposedHero {
                    id,
                    portrait,
                    name,
                    available_to,
                });
            }
        }

        reader.skip_reserved(31, reserved)?;

        let mut allowed_artifacts = Vec::new();
        if version.has_allowed_artifacts() {
            let ids: Vec<ArtifactId> = (0..version.artifact_count())
                .map(|i| ArtifactId(i as u16))
                .collect();
            // The mask stores banned artifacts, so invert it.
            allowed_artifacts =
                bitmask::read_enum_set_inverted(reader, version.artifact_bitmask_bytes(), &ids)?;
        }

        let mut allowed_spells = Vec::new();
        let mut allowed_skills = Vec::new();
        if version.has_allowed_spells_and_skills() {
            let spell_ids: Vec<SpellId> =
                (0..version.spell_count()).map(|i| SpellId(i as u8)).collect();
            allowed_spells = bitmask::read_enum_set_inverted(
                reader,
                version.spell_count().div_ceil(8),
                &spell_ids,
            )?;

            let skill_ids: Vec<SkillId> =
                (0..version.skill_count()).map(|i| SkillId(i as u8)).collect();
            allowed_skills = bitmask::read_enum_set_inverted(
                reader,
                version.skill_count().div_ceil(8),
                &skill_ids,
            )?;
        }

        let count = reader.read_u32_le()?;
        check_count(reader, count, "rumor")?;
        let mut rumors = Vec::new();
        for _ in 0..count {
            let name = reader.read_string()?;
            let text = reader.read_string()?;
            rumors.push(Rumor { name, text });
        }

        let mut predefined_heroes = Vec::new();
        if version.has_predefined_heroes() {
            for id in 0..version.hero_count() {
                if !reader.read_bool()? {
                    continue;
                }
                predefined_heroes.push(read_predefined_hero(reader, version, HeroId(id as u8))?);
            }
        }

        Ok(Self {
            allowed_heroes,
            reserved_campaign_heroes,
            disposed_heroes,
            allowed_artifacts,
            allowed_spells,
            allowed_skills,
            rumors,
            predefined_heroes,
        })
    }
}

fn read_predefined_hero(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    id: HeroId,
) -> Result<PredefinedHero> {
    let experience = reader.read_bool()?.then(|| reader.read_u32_le()).transpose()?;

    let secondary_skills = if reader.read_bool()? {
        let count = reader.read_u32_le()?;
        check_count(reader, count, "secondary skill")?;
        let mut skills = Vec::new();
        for _ in 0..count {
            skills.push(SecondarySkill::read(reader)?);
        }
        Some(skills)
    } else {
        None
    };

    let artifacts = if reader.read_bool()? {
        Some(HeroArtifacts::read(reader, version)?)
    } else {
        None
    };

    let biography = if reader.read_bool()? {
        Some(reader.read_string()?)
    } else {
        None
    };

    let gender = Gender::from_u8(reader.read_u8()?);

    let spells = if reader.read_bool()? {
        let ids: Vec<SpellId> = (0..version.spell_count()).map(|i| SpellId(i as u8)).collect();
        Some(bitmask::read_enum_set(
            reader,
            version.spell_count().div_ceil(8),
            &ids,
        )?)
    } else {
        None
    };

    let primary_skills = if reader.read_bool()? {
        Some(PrimarySkills::read(reader)?)
    } else {
        None
    };

    Ok(PredefinedHero {
        id,
        experience,
        secondary_skills,
        artifacts,
        biography,
        gender,
        spells,
        primary_skills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::H3mError;
    use pretty_assertions::assert_eq;

    fn roe_section(reserved: &[u8; 31]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xff; 16]); // all heroes allowed
        data.extend_from_slice(reserved);
        data.extend_from_slice(&0u32.to_le_bytes()); // no rumors
        data
    }

    #[test]
    fn test_roe_section_minimal() {
        let data = roe_section(&[0; 31]);
        let mut reader = ByteReader::new(&data);
        let info =
            AdditionalInfo::read(&mut reader, FormatVersion::RestorationOfErathia, ReservedCheck::Strict)
                .unwrap();
        assert_eq!(info.allowed_heroes.len(), 128);
        assert!(info.allowed_artifacts.is_empty());
        assert!(info.rumors.is_empty());
        assert_eq!(reader.offset(), data.len());
    }

    #[test]
    fn test_nonzero_reserved_region_is_rejected() {
        let mut reserved = [0u8; 31];
        reserved[4] = 1;
        let data = roe_section(&reserved);
        let mut reader = ByteReader::new(&data);
        let err = AdditionalInfo::read(
            &mut reader,
            FormatVersion::RestorationOfErathia,
            ReservedCheck::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, H3mError::ReservedRegionNotZero { offset: 20 }));
    }

    #[test]
    fn test_nonzero_reserved_region_tolerated_when_lenient() {
        let mut reserved = [0u8; 31];
        reserved[4] = 1;
        let data = roe_section(&reserved);
        let mut reader = ByteReader::new(&data);
        let info = AdditionalInfo::read(
            &mut reader,
            FormatVersion::RestorationOfErathia,
            ReservedCheck::Lenient,
        )
        .unwrap();
        assert!(info.disposed_heroes.is_empty());
    }

    #[test]
    fn test_sod_artifact_mask_is_inverted() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xff; 20]); // heroes
        data.extend_from_slice(&0u32.to_le_bytes()); // campaign reserved
        data.push(0); // disposed
        data.extend_from_slice(&[0; 31]);
        let mut artifact_bits = [0u8; 18];
        artifact_bits[0] = 0b0000_0001; // ban artifact 0
        data.extend_from_slice(&artifact_bits);
        data.extend_from_slice(&[0; 9]); // all spells allowed
        data.extend_from_slice(&[0; 4]); // all skills allowed
        data.extend_from_slice(&0u32.to_le_bytes()); // rumors
        data.extend_from_slice(&[0; 156]); // no predefined heroes
        let mut reader = ByteReader::new(&data);
        let info = AdditionalInfo::read(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
        )
        .unwrap();
        assert_eq!(info.allowed_artifacts.len(), 143);
        assert!(!info.allowed_artifacts.contains(&ArtifactId(0)));
        assert_eq!(info.allowed_spells.len(), 70);
        assert_eq!(info.allowed_skills.len(), 28);
        assert_eq!(reader.offset(), data.len());
    }
}
