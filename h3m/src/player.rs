//! Player colors, factions and per-player setup records.

use crate::bitmask;
use crate::common::{HeroId, Position};
use crate::error::{H3mError, Result};
use crate::reader::ByteReader;
use crate::version::FormatVersion;

/// The eight player colors, in the fixed order used by every
/// per-player section of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerColor {
    Red,
    Blue,
    Tan,
    Green,
    Orange,
    Purple,
    Teal,
    Pink,
}

impl PlayerColor {
    /// All colors in file order.
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Blue,
        Self::Tan,
        Self::Green,
        Self::Orange,
        Self::Purple,
        Self::Teal,
        Self::Pink,
    ];

    /// Decode a color index byte.
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Tan => "Tan",
            Self::Green => "Green",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::Teal => "Teal",
            Self::Pink => "Pink",
        };
        f.write_str(name)
    }
}

/// Town factions. Conflux only exists from Armageddon's Blade onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Castle,
    Rampart,
    Tower,
    Inferno,
    Necropolis,
    Dungeon,
    Stronghold,
    Fortress,
    Conflux,
}

impl Faction {
    /// All factions in bitmask order.
    pub const ALL: [Self; 9] = [
        Self::Castle,
        Self::Rampart,
        Self::Tower,
        Self::Inferno,
        Self::Necropolis,
        Self::Dungeon,
        Self::Stronghold,
        Self::Fortress,
        Self::Conflux,
    ];

    /// The factions a given format version can express in its bitmask.
    pub fn roster(version: FormatVersion) -> &'static [Self] {
        if version.has_conflux() {
            &Self::ALL
        } else {
            &Self::ALL[..8]
        }
    }

    /// Decode a faction index byte.
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

/// Computer player behaviour preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiTactic {
    /// Engine picks a tactic
    #[default]
    Random,
    Warrior,
    Builder,
    Explorer,
}

impl AiTactic {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Random),
            1 => Some(Self::Warrior),
            2 => Some(Self::Builder),
            3 => Some(Self::Explorer),
            _ => None,
        }
    }
}

/// Location of a player's designated main town.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainTown {
    /// Town position on the map
    pub position: Position,
    /// Whether a hero is generated at the town on game start
    pub generate_hero: bool,
}

/// A hero pre-placed for a player, as named in the player record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedHero {
    /// The hero
    pub id: HeroId,
    /// Custom name, empty if unchanged
    pub name: String,
}

/// Starting hero choice for a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainHero {
    /// The hero
    pub id: HeroId,
    /// Portrait override, if any
    pub portrait: Option<HeroId>,
    /// Custom name, empty if unchanged
    pub name: String,
}

/// Setup record for one player slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Which slot this record describes
    pub color: PlayerColor,
    /// Whether a human may take the slot
    pub playable_by_human: bool,
    /// Whether the computer may take the slot
    pub playable_by_computer: bool,
    /// AI behaviour, meaningful when computer-playable
    pub ai_tactic: AiTactic,
    /// Factions the player may start as
    pub allowed_factions: Vec<Faction>,
    /// Whether the starting faction is rolled at game start
    pub random_faction: bool,
    /// The designated main town, if any
    pub main_town: Option<MainTown>,
    /// Whether the starting hero is random
    pub random_hero: bool,
    /// The fixed starting hero, if any
    pub main_hero: Option<MainHero>,
    /// Heroes of this player placed on the map, with names
    pub named_heroes: Vec<NamedHero>,
}

impl Player {
    fn inactive(color: PlayerColor) -> Self {
        Self {
            color,
            playable_by_human: false,
            playable_by_computer: false,
            ai_tactic: AiTactic::Random,
            allowed_factions: Vec::new(),
            random_faction: false,
            main_town: None,
            random_hero: false,
            main_hero: None,
            named_heroes: Vec::new(),
        }
    }

    /// Whether any kind of player can take this slot.
    pub fn is_playable(&self) -> bool {
        self.playable_by_human || self.playable_by_computer
    }
}

/// Number of bytes an unplayable slot occupies after its two
/// playability flags.
fn inactive_record_len(version: FormatVersion) -> usize {
    match version {
        FormatVersion::RestorationOfErathia => 6,
        FormatVersion::ArmageddonsBlade => 12,
        FormatVersion::ShadowOfDeath | FormatVersion::WakeOfGods => 13,
    }
}

/// Read one player record.
pub fn read_player(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    color: PlayerColor,
) -> Result<Player> {
    let playable_by_human = reader.read_bool()?;
    let playable_by_computer = reader.read_bool()?;
    if !playable_by_human && !playable_by_computer {
        reader.skip(inactive_record_len(version))?;
        return Ok(Player::inactive(color));
    }

    let at = reader.offset();
    let raw_tactic = reader.read_u8()?;
    let ai_tactic = AiTactic::from_u8(raw_tactic).ok_or(H3mError::InvalidEnumValue {
        what: "ai tactic",
        value: raw_tactic as u32,
        offset: at,
    })?;

    if version >= FormatVersion::ShadowOfDeath {
        // Editor-only flag telling whether the faction set was customized.
        reader.skip(1)?;
    }

    let allowed_factions = bitmask::read_enum_set(
        reader,
        version.faction_bitmask_bytes(),
        Faction::roster(version),
    )?;
    let random_faction = reader.read_bool()?;

    let main_town = if reader.read_bool()? {
        let generate_hero = if version.has_wide_ids() {
            let generate = reader.read_bool()?;
            // Town type of the generated hero, unused by the game.
            reader.skip(1)?;
            generate
        } else {
            true
        };
        let position = Position::read(reader)?;
        Some(MainTown {
            position,
            generate_hero,
        })
    } else {
        None
    };

    let random_hero = reader.read_bool()?;
    let hero_id = reader.read_u8()?;
    let main_hero = if hero_id != 0xff {
        let portrait = reader.read_u8()?;
        let name = reader.read_string()?;
        Some(MainHero {
            id: HeroId(hero_id),
            portrait: (portrait != 0xff).then_some(HeroId(portrait)),
            name,
        })
    } else {
        None
    };

    let mut named_heroes = Vec::new();
    if version.has_wide_ids() {
        reader.skip(1)?;
        let count = reader.read_u32_le()?;
        for _ in 0..count {
            let id = HeroId(reader.read_u8()?);
            let name = reader.read_string()?;
            named_heroes.push(NamedHero { id, name });
        }
    }

    Ok(Player {
        color,
        playable_by_human,
        playable_by_computer,
        ai_tactic,
        allowed_factions,
        random_faction,
        main_town,
        random_hero,
        main_hero,
        named_heroes,
    })
}

/// Team assignments. Every playable player belongs to exactly one team;
/// players the file leaves unassigned each form a singleton team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teams {
    /// Teams as lists of members, in discovery order
    pub teams: Vec<Vec<PlayerColor>>,
}

impl Teams {
    /// The team a color belongs to, if the color is playable.
    pub fn team_of(&self, color: PlayerColor) -> Option<usize> {
        self.teams.iter().position(|t| t.contains(&color))
    }

    /// Read the team section and fill in singleton teams for playable
    /// players the file does not assign.
    pub fn read(reader: &mut ByteReader<'_>, players: &[Player]) -> Result<Self> {
        let declared = reader.read_u8()? as usize;
        let mut teams: Vec<Vec<PlayerColor>> = vec![Vec::new(); declared];
        let mut assigned = [false; 8];
        if declared > 0 {
            for (slot, color) in PlayerColor::ALL.iter().enumerate() {
                let at = reader.offset();
                let team = reader.read_u8()? as usize;
                if !players[slot].is_playable() {
                    continue;
                }
                if team >= declared {
                    return Err(H3mError::InvalidEnumValue {
                        what: "team index",
                        value: team as u32,
                        offset: at,
                    });
                }
                teams[team].push(*color);
                assigned[slot] = true;
            }
        }
        for (slot, color) in PlayerColor::ALL.iter().enumerate() {
            if players[slot].is_playable() && !assigned[slot] {
                teams.push(vec![*color]);
            }
        }
        teams.retain(|t| !t.is_empty());
        Ok(Self { teams })
    }
}
