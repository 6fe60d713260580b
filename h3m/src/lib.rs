//! Parser for Heroes of Might and Magic III map files (.h3m)
//!
//! This crate decodes the binary map format used by the original game
//! editions: Restoration of Erathia, Armageddon's Blade, Shadow of
//! Death, and the Wake of Gods mod. The format is little-endian with
//! length-prefixed strings; later editions widen identifiers and append
//! optional sections, so one pass decodes every edition behind a single
//! version gate.
//!
//! ## Supported Editions
//!
//! - Restoration of Erathia (magic `0x0E`)
//! - Armageddon's Blade (magic `0x15`)
//! - Shadow of Death (magic `0x1C`)
//! - Wake of Gods (magic `0x33`)
//!
//! Maps produced by later mods such as Horn of the Abyss use their own
//! magics and are rejected.
//!
//! ## Example
//!
//! ```no_run
//! use h3m::Map;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("maps/arrogance.h3m")?;
//! let map = Map::decode(&data)?;
//!
//! println!("{} ({})", map.header.name, map.version());
//! println!("{} tiles, {} objects", map.terrain.tiles.len(), map.objects.len());
//! # Ok(())
//! # }
//! ```
//!
//! Decoding knobs live on [`ParserOptions`]: a lenient mode for files
//! with non-zero reserved regions, and a seed for the rolls the format
//! leaves to the loader. [`Inspector`] observes each section as it is
//! decoded.

#![forbid(unsafe_code)]

pub mod additional_info;
pub mod bitmask;
pub mod common;
pub mod creature;
mod error;
pub mod events;
pub mod header;
mod map;
pub mod objects;
pub mod player;
pub mod reader;
pub mod resources;
pub mod templates;
pub mod terrain;
pub mod version;

pub use error::{H3mError, Result};
pub use map::{H3mParser, Inspector, Map, ParserOptions, PlayersInfo};
pub use reader::ReservedCheck;
pub use version::FormatVersion;
