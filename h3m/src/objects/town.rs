//! Town payloads: buildings, spell policies and town events.

use rand::rngs::StdRng;
use rand::Rng;

use crate::bitmask;
use crate::common::{Formation, SpellId};
use crate::creature::{self, CreatureSlots};
use crate::error::{H3mError, Result};
use crate::player::PlayerColor;
use crate::reader::{ByteReader, ReservedCheck};
use crate::resources::Resources;
use crate::version::FormatVersion;

/// One of the forty-four town building slots the file can name.
///
/// Slot meaning beyond the common core differs per faction, so the id
/// is kept raw with constants for the slots the loader itself needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingId(pub u8);

impl BuildingId {
    pub const TAVERN: Self = Self(5);
    pub const FORT: Self = Self(7);
    pub const VILLAGE_HALL: Self = Self(10);
    pub const DWELLING_1: Self = Self(30);
    pub const DWELLING_2: Self = Self(31);

    /// Number of building slots the bitmask can address.
    pub const COUNT: u8 = 44;
}

fn read_building_set(reader: &mut ByteReader<'_>) -> Result<Vec<BuildingId>> {
    let ids: Vec<BuildingId> = (0..BuildingId::COUNT).map(BuildingId).collect();
    bitmask::read_enum_set(reader, 6, &ids)
}

/// Which buildings a town starts with and which it may never build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownBuildings {
    /// Buildings standing on day one
    pub built: Vec<BuildingId>,
    /// Buildings the town may never construct
    pub forbidden: Vec<BuildingId>,
}

impl TownBuildings {
    /// The starting set for a town without a stored building list: a
    /// village hall, a tavern, the first dwelling, optionally a fort,
    /// and a coin flip on the second dwelling.
    pub fn default_set(include_fort: bool, rng: &mut StdRng) -> Self {
        let mut built = Vec::new();
        if include_fort {
            built.push(BuildingId::FORT);
        }
        built.push(BuildingId::VILLAGE_HALL);
        built.push(BuildingId::TAVERN);
        built.push(BuildingId::DWELLING_1);
        if rng.random() {
            built.push(BuildingId::DWELLING_2);
        }
        Self {
            built,
            forbidden: Vec::new(),
        }
    }
}

/// A scheduled event inside one town.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownEvent {
    /// Editor-facing event name
    pub name: String,
    /// Message shown when the event fires
    pub message: String,
    /// Resources granted or levied
    pub resources: Resources,
    /// Players the event applies to
    pub affected_players: Vec<PlayerColor>,
    /// Whether human-controlled towns are affected
    pub affects_human: bool,
    /// Whether computer-controlled towns are affected
    pub affects_computer: bool,
    /// Day the event first fires, one-based
    pub first_occurrence: u16,
    /// Days between repeats, zero for one-shot events
    pub repeat_every: u8,
    /// Buildings granted outright
    pub buildings: Vec<BuildingId>,
    /// Extra creature growth per dwelling level
    pub creature_growth: [u16; 7],
}

fn read_town_event(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    reserved: ReservedCheck,
    usable: &[PlayerColor],
) -> Result<TownEvent> {
    let name = reader.read_string()?;
    let message = reader.read_string()?;
    let resources = Resources::read(reader)?;
    let mut affected_players = bitmask::read_enum_set(reader, 1, &PlayerColor::ALL)?;
    affected_players.retain(|color| usable.contains(color));
    let affects_human = if version.has_town_event_human_flag() {
        reader.read_bool()?
    } else {
        true
    };
    let affects_computer = reader.read_bool()?;
    let first_occurrence = reader.read_u16_le()?;
    let repeat_every = reader.read_u8()?;
    reader.skip_reserved(17, reserved)?;
    let buildings = read_building_set(reader)?;
    let mut creature_growth = [0u16; 7];
    for growth in &mut creature_growth {
        *growth = reader.read_u16_le()?;
    }
    reader.skip(4)?;
    Ok(TownEvent {
        name,
        message,
        resources,
        affected_players,
        affects_human,
        affects_computer,
        first_occurrence,
        repeat_every,
        buildings,
        creature_growth,
    })
}

/// A town on the map, placed or random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownObject {
    /// Identifier town events and dwellings reference, absent in the
    /// oldest format
    pub identifier: Option<u32>,
    /// Owning player
    pub owner: Option<PlayerColor>,
    /// Custom name, if overridden
    pub name: Option<String>,
    /// Stationed army, if overridden
    pub garrison: Option<CreatureSlots>,
    /// Army display formation
    pub formation: Formation,
    /// Starting and forbidden buildings
    pub buildings: TownBuildings,
    /// Spells the mage guild must offer
    pub obligatory_spells: Vec<SpellId>,
    /// Spells the mage guild may offer
    pub possible_spells: Vec<SpellId>,
    /// Scheduled town events, in file order
    pub events: Vec<TownEvent>,
    /// Alignment group byte, absent before its introduction
    pub alignment: Option<u8>,
}

/// Upper bound on the stored town event count.
const TOWN_EVENT_CAP: u32 = 8192;

impl TownObject {
    pub fn read(
        reader: &mut ByteReader<'_>,
        version: FormatVersion,
        reserved: ReservedCheck,
        usable: &[PlayerColor],
        rng: &mut StdRng,
    ) -> Result<Self> {
        let identifier = if version.has_object_identifiers() {
            Some(reader.read_u32_le()?)
        } else {
            None
        };
        let owner = PlayerColor::from_u8(reader.read_u8()?);
        let name = reader.read_bool()?.then(|| reader.read_string()).transpose()?;
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

        let buildings = if reader.read_bool()? {
            let built = read_building_set(reader)?;
            let forbidden = read_building_set(reader)?;
            TownBuildings { built, forbidden }
        } else {
            let include_fort = reader.read_bool()?;
            TownBuildings::default_set(include_fort, rng)
        };

        let spell_ids: Vec<SpellId> =
            (0..version.spell_count()).map(|i| SpellId(i as u8)).collect();
        let spell_bytes = version.spell_count().div_ceil(8);
        let obligatory_spells = if version.has_obligatory_spells() {
            bitmask::read_enum_set(reader, spell_bytes, &spell_ids)?
        } else {
            Vec::new()
        };
        let possible_spells =
            bitmask::read_enum_set_inverted(reader, spell_bytes, &spell_ids)?;

        let at = reader.offset();
        let event_count = reader.read_u32_le()?;
        if event_count > TOWN_EVENT_CAP {
            return Err(H3mError::SanityBoundViolation {
                detail: format!("town event count {event_count} exceeds {TOWN_EVENT_CAP}"),
                offset: at,
            });
        }
        let mut events = Vec::with_capacity(event_count as usize);
        for _ in 0..event_count {
            events.push(read_town_event(reader, version, reserved, usable)?);
        }

        let alignment = if version.has_town_alignment() {
            Some(reader.read_u8()?)
        } else {
            None
        };
        reader.skip(3)?;

        Ok(Self {
            identifier,
            owner,
            name,
            garrison,
            formation,
            buildings,
            obligatory_spells,
            possible_spells,
            events,
            alignment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;

    fn sod_town_bytes(custom_buildings: bool) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&3u32.to_le_bytes()); // identifier
        data.push(0); // red
        data.push(0); // no name
        data.push(0); // no garrison
        data.push(0); // spread formation
        if custom_buildings {
            data.push(1);
            let mut built = [0u8; 6];
            built[0] = 0b1000_0000; // fort, slot seven
            data.extend_from_slice(&built);
            data.extend_from_slice(&[0; 6]); // nothing forbidden
        } else {
            data.push(0);
            data.push(1); // has fort
        }
        data.extend_from_slice(&[0; 9]); // no obligatory spells
        data.extend_from_slice(&[0; 9]); // all spells possible
        data.extend_from_slice(&0u32.to_le_bytes()); // no events
        data.push(0xff); // no alignment group
        data.extend_from_slice(&[0; 3]);
        data
    }

    #[test]
    fn test_custom_buildings() {
        let data = sod_town_bytes(true);
        let mut reader = ByteReader::new(&data);
        let mut rng = StdRng::seed_from_u64(1);
        let town = TownObject::read(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &PlayerColor::ALL,
            &mut rng,
        )
        .unwrap();
        assert_eq!(town.identifier, Some(3));
        assert_eq!(town.buildings.built, vec![BuildingId::FORT]);
        assert!(town.buildings.forbidden.is_empty());
        assert_eq!(town.possible_spells.len(), 70);
        assert_eq!(reader.offset(), data.len());
    }

    #[test]
    fn test_default_buildings_are_seed_deterministic() {
        let data = sod_town_bytes(false);
        let mut reader = ByteReader::new(&data);
        let mut rng = StdRng::seed_from_u64(42);
        let town = TownObject::read(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &PlayerColor::ALL,
            &mut rng,
        )
        .unwrap();
        assert!(town.buildings.built.contains(&BuildingId::FORT));
        assert!(town.buildings.built.contains(&BuildingId::VILLAGE_HALL));
        assert!(town.buildings.built.contains(&BuildingId::DWELLING_1));

        let mut reader = ByteReader::new(&data);
        let mut rng = StdRng::seed_from_u64(42);
        let again = TownObject::read(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &PlayerColor::ALL,
            &mut rng,
        )
        .unwrap();
        assert_eq!(town.buildings, again.buildings);
    }

    #[test]
    fn test_town_event_players_limited_to_usable_colors() {
        let mut data = Vec::new();
        data.extend_from_slice(&3u32.to_le_bytes()); // identifier
        data.push(0); // red
        data.push(0); // no name
        data.push(0); // no garrison
        data.push(0); // spread formation
        data.push(0); // default buildings
        data.push(1); // has fort
        data.extend_from_slice(&[0; 9]); // no obligatory spells
        data.extend_from_slice(&[0; 9]); // all spells possible
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // empty event name
        data.extend_from_slice(&0u32.to_le_bytes()); // empty message
        data.extend_from_slice(&[0; 28]); // no resources
        data.push(0xff); // every color in the stored mask
        data.push(1); // humans
        data.push(0); // not computers
        data.extend_from_slice(&7u16.to_le_bytes());
        data.push(0); // one-shot
        data.extend_from_slice(&[0; 17]);
        data.extend_from_slice(&[0; 6]); // no buildings granted
        data.extend_from_slice(&[0; 14]); // no extra growth
        data.extend_from_slice(&[0; 4]);
        data.push(0xff); // no alignment group
        data.extend_from_slice(&[0; 3]);
        let mut reader = ByteReader::new(&data);
        let mut rng = StdRng::seed_from_u64(5);
        let town = TownObject::read(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &[PlayerColor::Red, PlayerColor::Blue],
            &mut rng,
        )
        .unwrap();
        assert_eq!(
            town.events[0].affected_players,
            vec![PlayerColor::Red, PlayerColor::Blue]
        );
        assert_eq!(reader.offset(), data.len());
    }

    #[test]
    fn test_absurd_event_count_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&3u32.to_le_bytes());
        data.push(0);
        data.push(0);
        data.push(0);
        data.push(0);
        data.push(0);
        data.push(0); // no fort
        data.extend_from_slice(&[0; 9]);
        data.extend_from_slice(&[0; 9]);
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        let mut reader = ByteReader::new(&data);
        let mut rng = StdRng::seed_from_u64(0);
        let err = TownObject::read(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &PlayerColor::ALL,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, H3mError::SanityBoundViolation { .. }));
    }
}
