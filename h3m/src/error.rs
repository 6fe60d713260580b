//! Error handling for H3M map decoding

use thiserror::Error;

/// Errors that can occur when decoding an H3M map buffer.
///
/// Every variant carries the byte offset the cursor was at when the
/// failure was detected, so a bad map can be diagnosed at the byte level.
#[derive(Debug, Error)]
pub enum H3mError {
    /// The cursor ran past the end of the buffer
    #[error("unexpected end of data at byte {offset}")]
    UnexpectedEndOfData {
        /// Cursor offset when the read was attempted
        offset: usize,
    },

    /// A tag byte did not map to any value of a closed enumeration
    #[error("invalid {what} value {value} at byte {offset}")]
    InvalidEnumValue {
        /// Which enumeration was being decoded
        what: &'static str,
        /// The raw value found in the file
        value: u32,
        /// Cursor offset of the offending tag
        offset: usize,
    },

    /// An object-type id is not in the dispatch table.
    ///
    /// Fatal: the per-kind payload layout is unknown, so every subsequent
    /// read would be desynchronized. There is no resynchronization.
    #[error("unknown object kind {id} at byte {offset}")]
    UnknownObjectKind {
        /// The raw object-type id
        id: u32,
        /// Cursor offset of the object record
        offset: usize,
    },

    /// An object instance referenced a template index outside the table
    #[error(
        "object references template {index} but the table has {table_len} entries (at byte {offset})"
    )]
    UnknownObjectTemplateReference {
        /// Index read from the file
        index: u32,
        /// Number of entries in the template table
        table_len: usize,
        /// Cursor offset of the reference
        offset: usize,
    },

    /// A reserved byte span contained a non-zero byte.
    ///
    /// Reserved regions double as alignment self-checks: a non-zero byte
    /// signals either an unknown file variant or a desynchronized cursor.
    #[error("reserved region not zero at byte {offset}")]
    ReservedRegionNotZero {
        /// Offset of the first non-zero reserved byte
        offset: usize,
    },

    /// A cross-check between decoded sections failed
    #[error("sanity bound violated: {detail} (at byte {offset})")]
    SanityBoundViolation {
        /// Human-readable description of the violated bound
        detail: String,
        /// Cursor offset when the check ran
        offset: usize,
    },
}

impl H3mError {
    /// The byte offset at which this error was raised.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEndOfData { offset }
            | Self::InvalidEnumValue { offset, .. }
            | Self::UnknownObjectKind { offset, .. }
            | Self::UnknownObjectTemplateReference { offset, .. }
            | Self::ReservedRegionNotZero { offset }
            | Self::SanityBoundViolation { offset, .. } => *offset,
        }
    }
}

/// Type alias for Results from H3M decoding operations
pub type Result<T> = std::result::Result<T, H3mError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = H3mError::UnexpectedEndOfData { offset: 17 };
        assert_eq!(format!("{}", error), "unexpected end of data at byte 17");

        let error = H3mError::InvalidEnumValue {
            what: "difficulty",
            value: 9,
            offset: 30,
        };
        assert_eq!(format!("{}", error), "invalid difficulty value 9 at byte 30");
    }

    #[test]
    fn test_error_offset_accessor() {
        let error = H3mError::ReservedRegionNotZero { offset: 1234 };
        assert_eq!(error.offset(), 1234);

        let error = H3mError::UnknownObjectKind { id: 999, offset: 55 };
        assert_eq!(error.offset(), 55);
    }
}
