//! Guarded-message records and the treasure bundle shared by Pandora's
//! boxes and map events.

use crate::bitmask;
use crate::common::{read_artifact_id, ArtifactId, SecondarySkill, SpellId};
use crate::creature::{self, CreatureSlots, CreatureStack};
use crate::error::Result;
use crate::player::PlayerColor;
use crate::reader::ByteReader;
use crate::resources::Resources;
use crate::version::FormatVersion;

/// A message shown on approach, optionally backed by a guard army.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAndGuards {
    /// Text shown before the fight or pickup
    pub message: String,
    /// Guards that must be defeated first, if any
    pub guards: Option<CreatureSlots>,
}

impl MessageAndGuards {
    /// Read the optional message-and-guards prefix used by pickup
    /// objects.
    pub fn read(
        reader: &mut ByteReader<'_>,
        version: FormatVersion,
    ) -> Result<Option<Self>> {
        if !reader.read_bool()? {
            return Ok(None);
        }
        let message = reader.read_string()?;
        let guards = if reader.read_bool()? {
            Some(creature::read_slots(reader, version)?)
        } else {
            None
        };
        reader.skip(4)?;
        Ok(Some(Self { message, guards }))
    }
}

/// Everything a Pandora's box or event can grant at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreasureBundle {
    /// Experience points granted
    pub experience: u32,
    /// Spell points granted or drained
    pub mana: i32,
    /// Morale change
    pub morale: i8,
    /// Luck change
    pub luck: i8,
    /// Resources granted or levied
    pub resources: Resources,
    /// Permanent primary skill increases, attack through knowledge
    pub primary_skills: [u8; 4],
    /// Secondary skills taught
    pub secondary_skills: Vec<SecondarySkill>,
    /// Artifacts granted
    pub artifacts: Vec<ArtifactId>,
    /// Spells taught
    pub spells: Vec<SpellId>,
    /// Creatures that join
    pub creatures: Vec<CreatureStack>,
}

impl TreasureBundle {
    /// Read the fixed-order bundle. Ends with an eight byte reserved
    /// area the game never populated.
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let experience = reader.read_u32_le()?;
        let mana = reader.read_i32_le()?;
        let morale = reader.read_i8()?;
        let luck = reader.read_i8()?;
        let resources = Resources::read(reader)?;
        let mut primary_skills = [0u8; 4];
        for skill in &mut primary_skills {
            *skill = reader.read_u8()?;
        }

        let count = reader.read_u8()?;
        let mut secondary_skills = Vec::new();
        for _ in 0..count {
            secondary_skills.push(SecondarySkill::read(reader)?);
        }

        let count = reader.read_u8()?;
        let mut artifacts = Vec::new();
        for _ in 0..count {
            if let Some(artifact) = read_artifact_id(reader, version)? {
                artifacts.push(artifact);
            }
        }

        let count = reader.read_u8()?;
        let mut spells = Vec::new();
        for _ in 0..count {
            spells.push(SpellId(reader.read_u8()?));
        }

        let count = reader.read_u8()?;
        let mut creatures = Vec::new();
        for _ in 0..count {
            if let Some(stack) = creature::read_slot(reader, version)? {
                creatures.push(stack);
            }
        }

        reader.skip(8)?;
        Ok(Self {
            experience,
            mana,
            morale,
            luck,
            resources,
            primary_skills,
            secondary_skills,
            artifacts,
            spells,
            creatures,
        })
    }
}

/// A Pandora's box: an optional guard fight, then a treasure bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PandorasBox {
    /// Approach message and guards, if any
    pub guards: Option<MessageAndGuards>,
    /// What opening the box grants
    pub contents: TreasureBundle,
}

impl PandorasBox {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let guards = MessageAndGuards::read(reader, version)?;
        let contents = TreasureBundle::read(reader, version)?;
        Ok(Self { guards, contents })
    }
}

/// A map event tile: a Pandora payload plus activation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventObject {
    /// Approach message and guards, if any
    pub guards: Option<MessageAndGuards>,
    /// What triggering the event grants
    pub contents: TreasureBundle,
    /// Players whose heroes trigger the event
    pub affected_players: Vec<PlayerColor>,
    /// Whether computer-controlled heroes trigger it
    pub computer_can_activate: bool,
    /// Whether the event disappears after the first trigger
    pub remove_after_visit: bool,
}

impl EventObject {
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let guards = MessageAndGuards::read(reader, version)?;
        let contents = TreasureBundle::read(reader, version)?;
        let affected_players = bitmask::read_enum_set(reader, 1, &PlayerColor::ALL)?;
        let computer_can_activate = reader.read_bool()?;
        let remove_after_visit = reader.read_bool()?;
        reader.skip(4)?;
        Ok(Self {
            guards,
            contents,
            affected_players,
            computer_can_activate,
            remove_after_visit,
        })
    }
}
