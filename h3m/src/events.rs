//! Map-level timed events.

use crate::bitmask;
use crate::error::{H3mError, Result};
use crate::player::PlayerColor;
use crate::reader::{ByteReader, ReservedCheck};
use crate::resources::Resources;
use crate::version::FormatVersion;

/// A scheduled map event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedEvent {
    /// Editor-facing event name
    pub name: String,
    /// Message shown when the event fires
    pub message: String,
    /// Resources granted or levied
    pub resources: Resources,
    /// Players the event applies to
    pub affected_players: Vec<PlayerColor>,
    /// Whether human players are affected
    pub affects_human: bool,
    /// Whether computer players are affected
    pub affects_computer: bool,
    /// Day the event first fires, one-based
    pub first_occurrence: u16,
    /// Days between repeats, zero for one-shot events
    pub repeat_every: u8,
}

/// Upper bound on the stored event count.
const EVENT_CAP: u32 = 8192;

/// Read the timed event list. Returns `None` when the file ends before
/// the section, which older editors produced for maps without events.
///
/// Bits set for colors outside `usable` are dropped; the stored mask
/// always covers all eight colors, playable or not.
///
/// Events are returned sorted by first occurrence, earliest first; the
/// sort is stable so same-day events keep their file order.
pub fn read_timed_events(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    reserved: ReservedCheck,
    usable: &[PlayerColor],
) -> Result<Option<Vec<TimedEvent>>> {
    if reader.remaining() == 0 {
        return Ok(None);
    }
    let at = reader.offset();
    let count = reader.read_u32_le()?;
    if count > EVENT_CAP {
        return Err(H3mError::SanityBoundViolation {
            detail: format!("timed event count {count} exceeds {EVENT_CAP}"),
            offset: at,
        });
    }
    let mut events = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = reader.read_string()?;
        let message = reader.read_string()?;
        let resources = Resources::read(reader)?;
        let mut affected_players = bitmask::read_enum_set(reader, 1, &PlayerColor::ALL)?;
        affected_players.retain(|color| usable.contains(color));
        let affects_human = if version.has_timed_event_human_flag() {
            reader.read_bool()?
        } else {
            true
        };
        let affects_computer = reader.read_bool()?;
        let first_occurrence = reader.read_u16_le()?;
        let repeat_every = reader.read_u8()?;
        reader.skip_reserved(17, reserved)?;
        events.push(TimedEvent {
            name,
            message,
            resources,
            affected_players,
            affects_human,
            affects_computer,
            first_occurrence,
            repeat_every,
        });
    }
    events.sort_by_key(|e| e.first_occurrence);
    Ok(Some(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event_bytes(name: &str, first: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&(name.len() as u32).to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // empty message
        data.extend_from_slice(&[0; 28]); // no resources
        data.push(0xff); // everyone
        data.push(1); // humans
        data.push(0); // not computers
        data.extend_from_slice(&first.to_le_bytes());
        data.push(7); // weekly
        data.extend_from_slice(&[0; 17]);
        data
    }

    #[test]
    fn test_absent_section_is_none() {
        let mut reader = ByteReader::new(&[]);
        assert_eq!(
            read_timed_events(
                &mut reader,
                FormatVersion::ShadowOfDeath,
                ReservedCheck::Strict,
                &PlayerColor::ALL,
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn test_empty_section_is_some_empty() {
        let data = 0u32.to_le_bytes();
        let mut reader = ByteReader::new(&data);
        assert_eq!(
            read_timed_events(
                &mut reader,
                FormatVersion::ShadowOfDeath,
                ReservedCheck::Strict,
                &PlayerColor::ALL,
            )
            .unwrap(),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_events_sorted_by_first_occurrence() {
        let mut data = Vec::new();
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&event_bytes("late", 30));
        data.extend_from_slice(&event_bytes("early", 1));
        data.extend_from_slice(&event_bytes("middle", 14));
        let mut reader = ByteReader::new(&data);
        let events = read_timed_events(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &PlayerColor::ALL,
        )
        .unwrap()
        .unwrap();
        let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["early", "middle", "late"]);
        assert!(events.iter().all(|e| e.affects_human));
        assert_eq!(reader.offset(), data.len());
    }

    #[test]
    fn test_affected_players_limited_to_usable_colors() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&event_bytes("tax day", 7));
        let mut reader = ByteReader::new(&data);
        let events = read_timed_events(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &[PlayerColor::Red, PlayerColor::Teal],
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            events[0].affected_players,
            vec![PlayerColor::Red, PlayerColor::Teal]
        );
    }

    #[test]
    fn test_nonzero_reserved_tail_is_rejected_strictly() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&event_bytes("stray byte", 2));
        let tail = data.len() - 1;
        data[tail] = 9;
        let mut reader = ByteReader::new(&data);
        let err = read_timed_events(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Strict,
            &PlayerColor::ALL,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            H3mError::ReservedRegionNotZero { offset } if offset == tail
        ));

        let mut reader = ByteReader::new(&data);
        let events = read_timed_events(
            &mut reader,
            FormatVersion::ShadowOfDeath,
            ReservedCheck::Lenient,
            &PlayerColor::ALL,
        )
        .unwrap()
        .unwrap();
        assert_eq!(events.len(), 1);
    }
}
