//! Error and result types for the crate.

use derive_more::{Display, Error};

/// Errors returned by this crate.
///
/// Most strand failures are absorbed rather than reported: out-of-range
/// indexes are ignored and an oversized buffer degrades to an empty strand.
/// See [`PixelStrand`](crate::PixelStrand) for the contract.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Neither PIO0 nor PIO1 has an unclaimed state machine left.
    #[display("no free PIO state machine on PIO0 or PIO1")]
    NoFreeStateMachine,

    /// A bit rate that no state machine clock divider can produce.
    #[display("{frequency_hz} Hz is out of the PIO clock divider range")]
    FrequencyOutOfRange {
        /// Bit rate that was asked for.
        frequency_hz: u32,
    },

    /// A strand asked for more pixels than its buffer can hold.
    #[display("{requested} pixels exceed the strand capacity of {capacity}")]
    CapacityExceeded {
        /// Pixel count that was asked for.
        requested: usize,
        /// Buffer capacity (`MAX_LEN`) of the strand.
        capacity: usize,
    },
}

/// Result type alias for this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
