//! Map object instances and their per-kind payloads.
//!
//! The object list stores a position, a reference into the template
//! table and a payload whose shape depends on the template's object
//! type id. Unknown type ids abort the decode, since nothing after the
//! unknown payload can be located.

mod guards;
mod hero;
mod misc;
mod monster;
mod quest;
mod town;

pub use guards::{EventObject, MessageAndGuards, PandorasBox, TreasureBundle};
pub use hero::{HeroObject, HeroPlaceholder};
pub use misc::{
    ArtifactObject, DwellingFactions, GarrisonObject, MineObject, RandomDwellingObject,
    ResourceObject, ScholarBonus, ScholarObject, SpellScrollObject,
};
pub use monster::{Disposition, MonsterObject, MonsterTreasure};
pub use quest::{Quest, QuestMission, QuestReward, SeerHut};
pub use town::{BuildingId, TownBuildings, TownEvent, TownObject};

use crate::common::{Position, SkillId, SpellId};
use crate::error::{H3mError, Result};
use crate::player::PlayerColor;
use crate::reader::{ByteReader, ReservedCheck};
use crate::templates::ObjectTemplate;
use crate::version::FormatVersion;

use rand::rngs::StdRng;

/// What a template's object type id means for payload decoding.
///
/// Several type ids share one payload shape, e.g. every random-monster
/// id decodes like a placed monster. The raw id stays available on the
/// referenced template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Artifact pickups, placed or random
    Artifact,
    PandorasBox,
    Event,
    Garrison,
    /// Heroes, random heroes and prisons
    Hero,
    Grail,
    /// Objects whose whole payload is an owner: lighthouses, shipyards
    /// and creature generators
    Flaggable,
    Mine,
    AbandonedMine,
    /// Monsters, placed or random of any level
    Monster,
    /// Signs and ocean bottles
    Sign,
    RandomResource,
    Resource,
    Scholar,
    SeerHut,
    Shrine,
    SpellScroll,
    /// Towns and random towns
    Town,
    WitchHut,
    HeroPlaceholder,
    QuestGuard,
    RandomDwelling,
    RandomDwellingPresetLevel,
    RandomDwellingPresetFaction,
    /// Decorative or fully runtime-driven objects with no payload
    Passive,
}

impl ObjectKind {
    /// Resolve an object type id. Returns `None` for ids outside the
    /// classic id set, which the caller treats as fatal.
    pub fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            5 | 65..=69 => Self::Artifact,
            6 => Self::PandorasBox,
            17..=20 | 42 | 87 => Self::Flaggable,
            26 => Self::Event,
            33 | 219 => Self::Garrison,
            34 | 62 | 70 => Self::Hero,
            36 => Self::Grail,
            53 => Self::Mine,
            54 | 71..=75 | 162..=164 => Self::Monster,
            59 | 91 => Self::Sign,
            76 => Self::RandomResource,
            79 => Self::Resource,
            81 => Self::Scholar,
            83 => Self::SeerHut,
            88..=90 => Self::Shrine,
            93 => Self::SpellScroll,
            77 | 98 => Self::Town,
            113 => Self::WitchHut,
            214 => Self::HeroPlaceholder,
            215 => Self::QuestGuard,
            216 => Self::RandomDwelling,
            217 => Self::RandomDwellingPresetLevel,
            218 => Self::RandomDwellingPresetFaction,
            220 => Self::AbandonedMine,
            2..=231 => Self::Passive,
            _ => return None,
        })
    }
}

/// Payload decoded for one object instance.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPayload {
    Artifact(ArtifactObject),
    PandorasBox(Box<PandorasBox>),
    Event(Box<EventObject>),
    Garrison(GarrisonObject),
    Hero(Box<HeroObject>),
    Grail {
        /// How far from the marker the grail may be buried
        radius: u32,
    },
    Flaggable {
        owner: Option<PlayerColor>,
    },
    Mine(MineObject),
    Monster(Box<MonsterObject>),
    Sign {
        text: String,
    },
    Resource(ResourceObject),
    Scholar(ScholarObject),
    SeerHut(Box<SeerHut>),
    Shrine {
        /// `None` means the spell is rolled at game start
        spell: Option<SpellId>,
    },
    SpellScroll(SpellScrollObject),
    Town(Box<TownObject>),
    WitchHut {
        /// Skills the hut may teach
        skills: Vec<SkillId>,
    },
    HeroPlaceholder(HeroPlaceholder),
    QuestGuard(Quest),
    RandomDwelling(RandomDwellingObject),
    Passive,
}

/// One object placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    /// Anchor tile of the object's bottom-right footprint cell
    pub position: Position,
    /// Index into the template table
    pub template_index: u32,
    /// Payload decoded according to the template's object type
    pub payload: ObjectPayload,
}

fn read_payload(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    reserved: ReservedCheck,
    kind: ObjectKind,
    usable: &[PlayerColor],
    rng: &mut StdRng,
) -> Result<ObjectPayload> {
    Ok(match kind {
        ObjectKind::Artifact => ObjectPayload::Artifact(ArtifactObject::read(reader, version)?),
        ObjectKind::PandorasBox => {
            ObjectPayload::PandorasBox(Box::new(PandorasBox::read(reader, version)?))
        }
        ObjectKind::Event => ObjectPayload::Event(Box::new(EventObject::read(reader, version)?)),
        ObjectKind::Garrison => ObjectPayload::Garrison(GarrisonObject::read(reader, version)?),
        ObjectKind::Hero => {
            ObjectPayload::Hero(Box::new(HeroObject::read(reader, version, reserved)?))
        }
        ObjectKind::Grail => ObjectPayload::Grail {
            radius: reader.read_u32_le()?,
        },
        ObjectKind::Flaggable => {
            let owner = PlayerColor::from_u8(reader.read_u8()?);
            reader.skip(3)?;
            ObjectPayload::Flaggable { owner }
        }
        ObjectKind::Mine => ObjectPayload::Mine(MineObject::read(reader)?),
        ObjectKind::AbandonedMine => ObjectPayload::Mine(MineObject::read_abandoned(reader)?),
        ObjectKind::Monster => {
            ObjectPayload::Monster(Box::new(MonsterObject::read(reader, version)?))
        }
        ObjectKind::Sign => {
            let text = reader.read_string()?;
            reader.skip(4)?;
            ObjectPayload::Sign { text }
        }
        ObjectKind::RandomResource | ObjectKind::Resource => {
            ObjectPayload::Resource(ResourceObject::read(reader, version)?)
        }
        ObjectKind::Scholar => ObjectPayload::Scholar(ScholarObject::read(reader)?),
        ObjectKind::SeerHut => ObjectPayload::SeerHut(Box::new(SeerHut::read(reader, version)?)),
        ObjectKind::Shrine => {
            let spell = reader.read_u8()?;
            reader.skip(3)?;
            ObjectPayload::Shrine {
                spell: (spell != 0xff).then_some(SpellId(spell)),
            }
        }
        ObjectKind::SpellScroll => {
            ObjectPayload::SpellScroll(SpellScrollObject::read(reader, version)?)
        }
        ObjectKind::Town => ObjectPayload::Town(Box::new(TownObject::read(
            reader, version, reserved, usable, rng,
        )?)),
        ObjectKind::WitchHut => ObjectPayload::WitchHut {
            skills: misc::read_witch_hut_skills(reader, version)?,
        },
        ObjectKind::HeroPlaceholder => {
            ObjectPayload::HeroPlaceholder(HeroPlaceholder::read(reader)?)
        }
        ObjectKind::QuestGuard => ObjectPayload::QuestGuard(quest::read_quest(reader, version)?),
        ObjectKind::RandomDwelling => ObjectPayload::RandomDwelling(
            RandomDwellingObject::read(reader, true, true)?,
        ),
        ObjectKind::RandomDwellingPresetLevel => ObjectPayload::RandomDwelling(
            RandomDwellingObject::read(reader, true, false)?,
        ),
        ObjectKind::RandomDwellingPresetFaction => ObjectPayload::RandomDwelling(
            RandomDwellingObject::read(reader, false, true)?,
        ),
        ObjectKind::Passive => ObjectPayload::Passive,
    })
}

/// Read the object list. Each record names a template by index; the
/// template's object type id selects the payload decoder.
pub fn read_objects(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    reserved: ReservedCheck,
    templates: &[ObjectTemplate],
    max_objects: Option<u32>,
    usable: &[PlayerColor],
    rng: &mut StdRng,
) -> Result<Vec<ObjectInstance>> {
    let at = reader.offset();
    let count = reader.read_u32_le()?;
    if let Some(cap) = max_objects {
        if count > cap {
            return Err(H3mError::SanityBoundViolation {
                detail: format!("object count {count} exceeds the configured cap {cap}"),
                offset: at,
            });
        }
    }
    let mut objects = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let position = Position::read(reader)?;
        let at = reader.offset();
        let template_index = reader.read_u32_le()?;
        let template = templates.get(template_index as usize).ok_or(
            H3mError::UnknownObjectTemplateReference {
                index: template_index,
                table_len: templates.len(),
                offset: at,
            },
        )?;
        reader.skip_reserved(5, reserved)?;

        let at = reader.offset();
        let kind =
            ObjectKind::from_id(template.object_type).ok_or(H3mError::UnknownObjectKind {
                id: template.object_type,
                offset: at,
            })?;
        let payload = read_payload(reader, version, reserved, kind, usable, rng)?;
        objects.push(ObjectInstance {
            position,
            template_index,
            payload,
        });
    }
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(98, Some(ObjectKind::Town); "town")]
    #[test_case(77, Some(ObjectKind::Town); "random town")]
    #[test_case(62, Some(ObjectKind::Hero); "prison decodes like a hero")]
    #[test_case(163, Some(ObjectKind::Monster); "random monster level six")]
    #[test_case(135, Some(ObjectKind::Passive); "oak trees")]
    #[test_case(0, None; "id zero is not placeable")]
    #[test_case(300, None; "id beyond the classic set")]
    fn test_kind_from_id(id: u32, expected: Option<ObjectKind>) {
        assert_eq!(ObjectKind::from_id(id), expected);
    }
}
