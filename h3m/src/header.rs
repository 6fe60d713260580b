//! Map header: size, difficulty, descriptive text and the victory and
//! loss condition lists.

use crate::common::{read_artifact_id, ArtifactId, Position};
use crate::creature::CreatureId;
use crate::error::{H3mError, Result};
use crate::reader::ByteReader;
use crate::resources::ResourceKind;
use crate::version::FormatVersion;

/// The four square map sizes the format supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MapSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl MapSize {
    /// Decode the stored edge length.
    pub fn from_edge(edge: i32) -> Option<Self> {
        match edge {
            36 => Some(Self::Small),
            72 => Some(Self::Medium),
            108 => Some(Self::Large),
            144 => Some(Self::ExtraLarge),
            _ => None,
        }
    }

    /// Tiles per edge.
    pub fn edge(self) -> usize {
        match self {
            Self::Small => 36,
            Self::Medium => 72,
            Self::Large => 108,
            Self::ExtraLarge => 144,
        }
    }

    /// Tiles per level.
    pub fn tiles_per_level(self) -> usize {
        self.edge() * self.edge()
    }
}

/// Scenario difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
    Impossible,
}

impl Difficulty {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Easy),
            1 => Some(Self::Normal),
            2 => Some(Self::Hard),
            3 => Some(Self::Expert),
            4 => Some(Self::Impossible),
            _ => None,
        }
    }
}

/// Town hall upgrade tiers named by the upgrade-town victory condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HallLevel {
    Town,
    City,
    Capitol,
}

/// Fortification tiers named by the upgrade-town victory condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CastleLevel {
    Fort,
    Citadel,
    Castle,
}

/// A way to win the scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VictoryCondition {
    /// Defeat every opponent
    Standard,
    AcquireArtifact {
        artifact: ArtifactId,
    },
    AccumulateCreatures {
        creature: CreatureId,
        amount: u32,
    },
    AccumulateResources {
        resource: ResourceKind,
        amount: u32,
    },
    UpgradeTown {
        position: Position,
        hall: HallLevel,
        castle: CastleLevel,
    },
    BuildGrailBuilding {
        position: Position,
    },
    DefeatHero {
        position: Position,
    },
    CaptureTown {
        position: Position,
    },
    DefeatMonster {
        position: Position,
    },
    FlagAllDwellings,
    FlagAllMines,
    TransportArtifact {
        artifact: ArtifactId,
        position: Position,
    },
}

/// A way to lose the scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LossCondition {
    /// Lose every town and hero
    Standard,
    LoseTown { position: Position },
    LoseHero { position: Position },
    TimeExpires { days: u16 },
}

/// The victory and loss condition lists, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VictoryLossConditions {
    /// Ways to win, special condition first when one exists
    pub victory: Vec<VictoryCondition>,
    /// Whether the special victory condition also applies to computer
    /// players
    pub victory_applies_to_computer: bool,
    /// Ways to lose, special condition first when one exists
    pub loss: Vec<LossCondition>,
}

impl VictoryLossConditions {
    /// Read the special victory and loss condition records and expand
    /// them into lists. The standard conditions are appended unless the
    /// file disables normal victory.
    pub fn read(reader: &mut ByteReader<'_>, version: FormatVersion) -> Result<Self> {
        let at = reader.offset();
        let code = reader.read_u8()?;
        let mut victory = Vec::new();
        let mut applies_to_computer = false;
        let mut allow_standard = true;
        if code != 0xff {
            allow_standard = reader.read_bool()?;
            applies_to_computer = reader.read_bool()?;
            victory.push(Self::read_special_victory(reader, version, code, at)?);
        }
        if allow_standard {
            victory.push(VictoryCondition::Standard);
        }

        let at = reader.offset();
        let code = reader.read_u8()?;
        let mut loss = Vec::new();
        if code != 0xff {
            loss.push(Self::read_special_loss(reader, code, at)?);
        }
        loss.push(LossCondition::Standard);

        Ok(Self {
            victory,
            victory_applies_to_computer: applies_to_computer,
            loss,
        })
    }

    fn read_special_victory(
        reader: &mut ByteReader<'_>,
        version: FormatVersion,
        code: u8,
        at: usize,
    ) -> Result<VictoryCondition> {
        Ok(match code {
            0 => {
                let artifact =
                    read_artifact_id(reader, version)?.ok_or(H3mError::InvalidEnumValue {
                        what: "victory condition artifact",
                        value: 0xffff,
                        offset: at,
                    })?;
                VictoryCondition::AcquireArtifact { artifact }
            }
            1 => {
                let creature = if version.has_wide_ids() {
                    CreatureId(reader.read_u16_le()?)
                } else {
                    CreatureId(reader.read_u8()? as u16)
                };
                let amount = reader.read_u32_le()?;
                VictoryCondition::AccumulateCreatures { creature, amount }
            }
            2 => {
                let raw = reader.read_u8()?;
                let resource = ResourceKind::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
                    what: "victory condition resource",
                    value: raw as u32,
                    offset: at,
                })?;
                let amount = reader.read_u32_le()?;
                VictoryCondition::AccumulateResources { resource, amount }
            }
            3 => {
                let position = Position::read(reader)?;
                let raw = reader.read_u8()?;
                let hall = match raw {
                    0 => HallLevel::Town,
                    1 => HallLevel::City,
                    2 => HallLevel::Capitol,
                    _ => {
                        return Err(H3mError::InvalidEnumValue {
                            what: "hall level",
                            value: raw as u32,
                            offset: at,
                        })
                    }
                };
                let raw = reader.read_u8()?;
                let castle = match raw {
                    0 => CastleLevel::Fort,
                    1 => CastleLevel::Citadel,
                    2 => CastleLevel::Castle,
                    _ => {
                        return Err(H3mError::InvalidEnumValue {
                            what: "castle level",
                            value: raw as u32,
                            offset: at,
                        })
                    }
                };
                VictoryCondition::UpgradeTown {
                    position,
                    hall,
                    castle,
                }
            }
            4 => VictoryCondition::BuildGrailBuilding {
                position: Position::read(reader)?,
            },
            5 => VictoryCondition::DefeatHero {
                position: Position::read(reader)?,
            },
            6 => VictoryCondition::CaptureTown {
                position: Position::read(reader)?,
            },
            7 => VictoryCondition::DefeatMonster {
                position: Position::read(reader)?,
            },
            8 => VictoryCondition::FlagAllDwellings,
            9 => VictoryCondition::FlagAllMines,
            10 => {
                let artifact =
                    read_artifact_id(reader, version)?.ok_or(H3mError::InvalidEnumValue {
                        what: "victory condition artifact",
                        value: 0xffff,
                        offset: at,
                    })?;
                let position = Position::read(reader)?;
                VictoryCondition::TransportArtifact { artifact, position }
            }
            _ => {
                return Err(H3mError::InvalidEnumValue {
                    what: "victory condition",
                    value: code as u32,
                    offset: at,
                })
            }
        })
    }

    fn read_special_loss(
        reader: &mut ByteReader<'_>,
        code: u8,
        at: usize,
    ) -> Result<LossCondition> {
        Ok(match code {
            0 => LossCondition::LoseTown {
                position: Position::read(reader)?,
            },
            1 => LossCondition::LoseHero {
                position: Position::read(reader)?,
            },
            2 => LossCondition::TimeExpires {
                days: reader.read_u16_le()?,
            },
            _ => {
                return Err(H3mError::InvalidEnumValue {
                    what: "loss condition",
                    value: code as u32,
                    offset: at,
                })
            }
        })
    }
}

/// Everything the file states about the map before the per-player
/// records begin, plus the victory and loss conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    /// Format version the file was written for
    pub version: FormatVersion,
    /// Whether any player slot is active
    pub any_players: bool,
    /// Edge length category
    pub size: MapSize,
    /// Whether an underground level exists
    pub has_underground: bool,
    /// Scenario name
    pub name: String,
    /// Scenario description
    pub description: String,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Level heroes cannot grow past, `None` when uncapped
    pub hero_level_cap: Option<u8>,
    /// How the scenario is won and lost
    pub conditions: VictoryLossConditions,
}

/// Maximum stored length accepted for the name and description strings.
const TEXT_CAP: usize = 10_000;

/// Read the leading header fields, up to and including the difficulty
/// and optional hero level cap. The caller supplies the version, which
/// it has already read from the magic.
pub fn read_basic_header(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<BasicHeader> {
    let any_players = reader.read_bool()?;
    let at = reader.offset();
    let edge = reader.read_i32_le()?;
    let size = MapSize::from_edge(edge).ok_or(H3mError::InvalidEnumValue {
        what: "map size",
        value: edge as u32,
        offset: at,
    })?;
    let has_underground = reader.read_bool()?;
    let name = reader.read_string_capped(TEXT_CAP)?;
    let description = reader.read_string_capped(TEXT_CAP)?;
    let at = reader.offset();
    let raw = reader.read_u8()?;
    let difficulty = Difficulty::from_u8(raw).ok_or(H3mError::InvalidEnumValue {
        what: "difficulty",
        value: raw as u32,
        offset: at,
    })?;
    let hero_level_cap = if version.has_hero_level_cap() {
        let cap = reader.read_u8()?;
        (cap != 0).then_some(cap)
    } else {
        None
    };
    Ok(BasicHeader {
        any_players,
        size,
        has_underground,
        name,
        description,
        difficulty,
        hero_level_cap,
    })
}

/// The header fields that precede the player records in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicHeader {
    pub any_players: bool,
    pub size: MapSize,
    pub has_underground: bool,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub hero_level_cap: Option<u8>,
}

impl BasicHeader {
    /// Combine with the conditions read later in the file.
    pub fn into_header(
        self,
        version: FormatVersion,
        conditions: VictoryLossConditions,
    ) -> MapHeader {
        MapHeader {
            version,
            any_players: self.any_players,
            size: self.size,
            has_underground: self.has_underground,
            name: self.name,
            description: self.description,
            difficulty: self.difficulty,
            hero_level_cap: self.hero_level_cap,
            conditions,
        }
    }
}
