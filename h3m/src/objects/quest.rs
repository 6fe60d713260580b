//! Quests, seer hut rewards and quest guards.

use crate::common::{
    read_artifact_id, ArtifactId, HeroId, PrimarySkills, SecondarySkill, SpellId,
};
use crate::creature::{CreatureId, CreatureStack};
use crate::error::{H3mError, Result};
use crate::player::PlayerColor;
use crate::reader::ByteReader;
use crate::resources::{ResourceKind, Resources};
use crate::version::FormatVersion;

/// What a quest giver asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestMission {
    /// Reach the given primary skill ratings
    PrimarySkills(PrimarySkills),
    /// Reach the given experience level
    ExperienceLevel(u32),
    /// Defeat the hero with the given quest identifier
    DefeatHero(u32),
    /// Defeat the monster with the given quest identifier
    DefeatMonster(u32),
    /// Bring the listed artifacts
    Artifacts(Vec<ArtifactId>),
    /// Bring the listed creatures
    Creatures(Vec<CreatureStack>),
    /// Bring the listed resources
    Resources(Resources),
    /// Arrive as a specific hero
    BeHero(HeroId),
    /// Arrive as a specific player
    BePlayer(PlayerColor),
}

/// A quest with its deadline and prompt texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    /// What is asked for
    pub mission: QuestMission,
    /// Last day the quest can be completed, `None` for no deadline
    pub deadline: Option<u32>,
    /// Text shown on the first visit
    pub first_visit_text: String,
    /// Text shown on later visits
    pub next_visit_text: String,
    /// Text shown on completion
    pub completed_text: String,
}

/// Read a full quest record. Returns `None` when the mission type byte
/// says no quest is set.
pub fn read_optional_quest(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<Option<Quest>> {
    let at = reader.offset();
    let mission_type = reader.read_u8()?;
    let mission = match mission_type {
        0 => return Ok(None),
        1 => QuestMission::PrimarySkills(PrimarySkills::read(reader)?),
        2 => QuestMission::ExperienceLevel(reader.read_u32_le()?),
        3 => QuestMission::DefeatHero(reader.read_u32_le()?),
        4 => QuestMission::DefeatMonster(reader.read_u32_le()?),
        5 => {
            let count = reader.read_u8()?;
            let mut artifacts = Vec::new();
            for _ in 0..count {
                if let Some(artifact) = read_artifact_id(reader, version)? {
                    artifacts.push(artifact);
                }
            }
            QuestMission::Artifacts(artifacts)
        }
        6 => {
            let count = reader.read_u8()?;
            let mut creatures = Vec::new();
            for _ in 0..count {
                let creature = CreatureId(reader.read_u16_le()?);
                let count = reader.read_u16_le()?;
                creatures.push(CreatureStack { creature, count });
            }
            QuestMission::Creatures(creatures)
        }
        7 => QuestMission::Resources(Resources::read(reader)?),
        8 => QuestMission::BeHero(HeroId(reader.read_u8()?)),
        9 => {
            let raw = reader.read_u8()?;
            let player = PlayerColor::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
                what: "quest player",
                value: raw as u32,
                offset: at,
            })?;
            QuestMission::BePlayer(player)
        }
        _ => {
            return Err(H3mError::InvalidEnumValue {
                what: "quest mission",
                value: mission_type as u32,
                offset: at,
            })
        }
    };

    let deadline = reader.read_i32_le()?;
    let deadline = (deadline >= 0).then_some(deadline as u32);
    let first_visit_text = reader.read_string()?;
    let next_visit_text = reader.read_string()?;
    let completed_text = reader.read_string()?;

    Ok(Some(Quest {
        mission,
        deadline,
        first_visit_text,
        next_visit_text,
        completed_text,
    }))
}

/// Read a quest where the format requires one to be present.
pub fn read_quest(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Quest> {
    let at = reader.offset();
    read_optional_quest(reader, version)?.ok_or(H3mError::InvalidEnumValue {
        what: "quest mission",
        value: 0,
        offset: at,
    })
}

/// What a seer grants for a completed quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestReward {
    Experience(u32),
    SpellPoints(u32),
    Morale(u8),
    Luck(u8),
    Resource {
        kind: ResourceKind,
        amount: u32,
    },
    PrimarySkill {
        /// Index into attack, defense, power, knowledge
        which: u8,
        amount: u8,
    },
    SecondarySkill(SecondarySkill),
    Artifact(ArtifactId),
    Spell(SpellId),
    Creatures(CreatureStack),
}

fn read_reward(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<Option<QuestReward>> {
    let at = reader.offset();
    let reward_type = reader.read_u8()?;
    Ok(Some(match reward_type {
        0 => return Ok(None),
        1 => QuestReward::Experience(reader.read_u32_le()?),
        2 => QuestReward::SpellPoints(reader.read_u32_le()?),
        3 => QuestReward::Morale(reader.read_u8()?),
        4 => QuestReward::Luck(reader.read_u8()?),
        5 => {
            let raw = reader.read_u8()?;
            let kind = ResourceKind::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
                what: "reward resource",
                value: raw as u32,
                offset: at,
            })?;
            QuestReward::Resource {
                kind,
                amount: reader.read_u32_le()?,
            }
        }
        6 => QuestReward::PrimarySkill {
            which: reader.read_u8()?,
            amount: reader.read_u8()?,
        },
        7 => QuestReward::SecondarySkill(SecondarySkill::read(reader)?),
        8 => {
            let artifact =
                read_artifact_id(reader, version)?.ok_or(H3mError::InvalidEnumValue {
                    what: "reward artifact",
                    value: 0xffff,
                    offset: at,
                })?;
            QuestReward::Artifact(artifact)
        }
        9 => QuestReward::Spell(SpellId(reader.read_u8()?)),
        10 => {
            let creature = if version.has_wide_ids() {
                CreatureId(reader.read_u16_le()?)
            } else {
                CreatureId(reader.read_u8()? as u16)
            };
            QuestReward::Creatures(CreatureStack {
                creature,
                count: reader.read_u16_le()?,
            })
        }
        _ => {
            return Err(H3mError::InvalidEnumValue {
                what: "quest reward",
                value: reward_type as u32,
                offset: at,
            })
        }
    }))
}

/// A seer hut: a quest and the reward for completing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeerHut {
    /// The quest, `None` when the hut is empty
    pub quest: Option<Quest>,
    /// The reward, `None` when the seer gives nothing
    pub reward: Option<QuestReward>,
}

impl SeerHut {
    /// Read a seer hut record. The oldest format can only ask for a
    /// single artifact and stores it as one id byte.
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let quest = if version.has_object_identifiers() {
            read_optional_quest(reader, version)?
        } else {
            let artifact = reader.read_u8()?;
            (artifact != 0xff).then(|| Quest {
                mission: QuestMission::Artifacts(vec![ArtifactId(artifact as u16)]),
                deadline: None,
                first_visit_text: String::new(),
                next_visit_text: String::new(),
                completed_text: String::new(),
            })
        };

        if quest.is_some() {
            let reward = read_reward(reader, version)?;
            reader.skip(2)?;
            Ok(Self { quest, reward })
        } else {
            reader.skip(3)?;
            Ok(Self {
                quest: None,
                reward: None,
            })
        }
    }
}
