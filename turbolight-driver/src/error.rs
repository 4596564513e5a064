//! Driver errors

/// Errors reported by display operations
///
/// Bus faults never show up here: the transport cannot observe them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Coordinates outside the 128x64 panel; nothing was changed
    OutOfRange,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::OutOfRange => f.write_str("pixel coordinates out of range"),
        }
    }
}
