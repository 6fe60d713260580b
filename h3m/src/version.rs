//! Map format versions and version-gated layout queries.
//!
//! The format version is read once from the first four bytes of the file
//! and never changes afterwards. Every optional-field decision elsewhere
//! in the decoder goes through the predicates here; no other module
//! compares raw magic values.

use std::fmt;

/// The game edition a map file was produced by, in release order.
///
/// Later editions extend the binary layout of earlier ones, so layout
/// gates are ordered comparisons against these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    /// Restoration of Erathia (the base game)
    RestorationOfErathia,
    /// Armageddon's Blade (first expansion)
    ArmageddonsBlade,
    /// Shadow of Death (second expansion)
    ShadowOfDeath,
    /// In the Wake of Gods; uses the Shadow of Death layout
    WakeOfGods,
}

impl FormatVersion {
    /// Decode the version from the file's magic value.
    ///
    /// HotA/VCMI magics are mod extensions and are rejected here.
    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            0x0e => Some(Self::RestorationOfErathia),
            0x15 => Some(Self::ArmageddonsBlade),
            0x1c => Some(Self::ShadowOfDeath),
            0x33 => Some(Self::WakeOfGods),
            _ => None,
        }
    }

    /// The magic value this version is stored as.
    pub fn magic(self) -> u32 {
        match self {
            Self::RestorationOfErathia => 0x0e,
            Self::ArmageddonsBlade => 0x15,
            Self::ShadowOfDeath => 0x1c,
            Self::WakeOfGods => 0x33,
        }
    }

    /// The header carries a strongest-hero experience cap byte.
    pub fn has_hero_level_cap(self) -> bool {
        self >= Self::ArmageddonsBlade
    }

    /// Conflux joined the faction roster, widening faction bitmasks to
    /// two bytes.
    pub fn has_conflux(self) -> bool {
        self >= Self::ArmageddonsBlade
    }

    /// Artifact and creature ids are stored as `u16` instead of `u8`.
    pub fn has_wide_ids(self) -> bool {
        self >= Self::ArmageddonsBlade
    }

    /// The allowed-artifacts bitmask section is present.
    pub fn has_allowed_artifacts(self) -> bool {
        self >= Self::ArmageddonsBlade
    }

    /// Allowed-spells and allowed-secondary-skills bitmasks are present.
    pub fn has_allowed_spells_and_skills(self) -> bool {
        self >= Self::ShadowOfDeath
    }

    /// The disposed-heroes list is present.
    pub fn has_disposed_heroes(self) -> bool {
        self >= Self::ShadowOfDeath
    }

    /// The predefined (custom-configured) heroes section is present.
    pub fn has_predefined_heroes(self) -> bool {
        self >= Self::ShadowOfDeath
    }

    /// Towns and heroes carry a quest-linkable `u32` identifier.
    pub fn has_object_identifiers(self) -> bool {
        self > Self::RestorationOfErathia
    }

    /// Town payloads carry an obligatory-spells bitmask.
    pub fn has_obligatory_spells(self) -> bool {
        self >= Self::ArmageddonsBlade
    }

    /// Town payloads carry an alignment byte.
    pub fn has_town_alignment(self) -> bool {
        self > Self::ArmageddonsBlade
    }

    /// Town-scoped events carry a human-activation flag.
    pub fn has_town_event_human_flag(self) -> bool {
        self > Self::ArmageddonsBlade
    }

    /// Global timed events carry a human-activation flag.
    pub fn has_timed_event_human_flag(self) -> bool {
        self >= Self::ShadowOfDeath
    }

    /// Heroes can carry a custom portrait id.
    pub fn has_hero_portraits(self) -> bool {
        self >= Self::ShadowOfDeath
    }

    /// Heroes can carry a custom spell *set*; Armageddon's Blade instead
    /// stores a single spell byte.
    pub fn has_hero_spell_set(self) -> bool {
        self >= Self::ShadowOfDeath
    }

    /// Witch huts list their teachable skills explicitly.
    pub fn has_witch_hut_skills(self) -> bool {
        self > Self::RestorationOfErathia
    }

    /// Total number of hero ids addressable by bitmask sections.
    pub fn hero_count(self) -> usize {
        if self >= Self::ArmageddonsBlade { 156 } else { 128 }
    }

    /// Byte length of the allowed-heroes bitmask.
    pub fn hero_bitmask_bytes(self) -> usize {
        self.hero_count().div_ceil(8)
    }

    /// Total number of artifact ids addressable by bitmask sections.
    pub fn artifact_count(self) -> usize {
        match self {
            Self::RestorationOfErathia => 127,
            Self::ArmageddonsBlade => 129,
            Self::ShadowOfDeath | Self::WakeOfGods => 144,
        }
    }

    /// Byte length of the allowed-artifacts bitmask.
    pub fn artifact_bitmask_bytes(self) -> usize {
        self.artifact_count().div_ceil(8)
    }

    /// Number of equipment slots stored per hero artifact set.
    pub fn artifact_slot_count(self) -> usize {
        if self >= Self::ShadowOfDeath { 19 } else { 18 }
    }

    /// Number of spells addressable by spell bitmasks (9 bytes on disk).
    pub fn spell_count(self) -> usize {
        70
    }

    /// Number of secondary skills addressable by skill bitmasks (4 bytes).
    pub fn skill_count(self) -> usize {
        28
    }

    /// Byte length of per-player faction bitmasks.
    pub fn faction_bitmask_bytes(self) -> usize {
        if self.has_conflux() { 2 } else { 1 }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RestorationOfErathia => write!(f, "Restoration of Erathia"),
            Self::ArmageddonsBlade => write!(f, "Armageddon's Blade"),
            Self::ShadowOfDeath => write!(f, "Shadow of Death"),
            Self::WakeOfGods => write!(f, "In the Wake of Gods"),
        }
    }
}
