//! PIO resource identities and the hardware seams a [`PixelStrand`](crate::PixelStrand) talks through.
//!
//! A strand never touches PIO registers itself. It goes through three traits:
//!
//! - [`StateMachineAllocator`] hands out unclaimed state machines (auto-binding only),
//! - [`ProgramLoader`] loads the WS2812 program and configures a state machine (activation only),
//! - [`TxFifo`] pushes one 32-bit word into a state machine's TX FIFO (show only).
//!
//! [`RpPio`](crate::pio_rp::RpPio) implements them on real hardware and
//! [`HostPio`](crate::pio_host::HostPio) records what would have happened.

use crate::{Error, Result};

/// Number of PIO blocks a strand can bind to.
pub const PIO_COUNT: usize = 2;

/// Number of state machines in each PIO block.
pub const STATE_MACHINES_PER_PIO: usize = 4;

/// WS2812 bit rate in Hz (800 kbit/s).
pub const WS2812_FREQUENCY_HZ_DEFAULT: u32 = 800_000;

/// PIO cycles the WS2812 program spends on one bit.
pub const WS2812_CYCLES_PER_BIT: u32 = 10;

/// Smallest state machine clock divider (1.0), as `U24F8` bits.
pub const CLOCK_DIVIDER_MIN_BITS: u32 = 1 << 8;

/// Largest state machine clock divider (just under 65536), as `U24F8` bits.
pub const CLOCK_DIVIDER_MAX_BITS: u32 = (1 << 24) - 1;

/// Identity of a PIO block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PioId {
    /// PIO0, tried first by auto-binding.
    Pio0,
    /// PIO1, the fallback for auto-binding.
    Pio1,
}

impl PioId {
    /// All PIO blocks in auto-binding search order.
    pub const ALL: [Self; PIO_COUNT] = [Self::Pio0, Self::Pio1];

    /// Position of this block in [`PioId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Pio0 => 0,
            Self::Pio1 => 1,
        }
    }
}

/// Index of a state machine within a PIO block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmIndex {
    /// State machine 0.
    Sm0,
    /// State machine 1.
    Sm1,
    /// State machine 2.
    Sm2,
    /// State machine 3.
    Sm3,
}

impl SmIndex {
    /// All state machines in claim order.
    pub const ALL: [Self; STATE_MACHINES_PER_PIO] = [Self::Sm0, Self::Sm1, Self::Sm2, Self::Sm3];

    /// Position of this state machine in [`SmIndex::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Sm0 => 0,
            Self::Sm1 => 1,
            Self::Sm2 => 2,
            Self::Sm3 => 3,
        }
    }

    /// State machine at `index`, or `None` past the last one.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Sm0),
            1 => Some(Self::Sm1),
            2 => Some(Self::Sm2),
            3 => Some(Self::Sm3),
            _ => None,
        }
    }
}

/// The output channel a strand is bound to: one state machine on one PIO block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateMachineBinding {
    /// PIO block.
    pub pio: PioId,
    /// State machine within `pio`.
    pub sm: SmIndex,
}

impl StateMachineBinding {
    /// Bind to state machine `sm` of `pio`.
    #[must_use]
    pub const fn new(pio: PioId, sm: SmIndex) -> Self {
        Self { pio, sm }
    }
}

/// Instruction-memory offset where the WS2812 program was loaded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgramOffset(pub u8);

/// How a state machine is configured when a strand is activated.
///
/// The data line is driven non-inverted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ws2812Config {
    /// Bit rate on the data line.
    pub frequency_hz: u32,
    /// `true` for 32-bit RGBW framing, `false` for 24-bit RGB framing.
    pub rgbw: bool,
}

impl Ws2812Config {
    /// 800 kHz RGB framing, what a WS2812 strand expects.
    pub const DEFAULT: Self = Self {
        frequency_hz: WS2812_FREQUENCY_HZ_DEFAULT,
        rgbw: false,
    };

    /// Bits the state machine pulls from each FIFO word before refilling.
    #[must_use]
    pub const fn bits_per_pixel(&self) -> u8 {
        if self.rgbw { 32 } else { 24 }
    }
}

impl Default for Ws2812Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Clock divider, as `U24F8` bits, that runs the WS2812 program at `frequency_hz` bits
/// per second from a `clk_sys_hz` system clock. Rounds to the nearest 1/256.
///
/// # Errors
///
/// Returns [`Error::FrequencyOutOfRange`] if `frequency_hz` is zero or needs a divider
/// outside [`CLOCK_DIVIDER_MIN_BITS`]`..=`[`CLOCK_DIVIDER_MAX_BITS`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    reason = "u64 math; the result is range checked before narrowing"
)]
pub const fn clock_divider_bits(clk_sys_hz: u32, frequency_hz: u32) -> Result<u32> {
    let out_of_range = Err(Error::FrequencyOutOfRange { frequency_hz });
    if frequency_hz == 0 {
        return out_of_range;
    }
    let numerator = (clk_sys_hz as u64) << 8;
    let denominator = frequency_hz as u64 * WS2812_CYCLES_PER_BIT as u64;
    let bits = (numerator + denominator / 2) / denominator;
    if bits < CLOCK_DIVIDER_MIN_BITS as u64 || bits > CLOCK_DIVIDER_MAX_BITS as u64 {
        return out_of_range;
    }
    Ok(bits as u32)
}

/// Claims unused state machines.
pub trait StateMachineAllocator {
    /// Claim an unused state machine on `pio`, or `None` if all are taken.
    ///
    /// Never blocks. A claimed state machine stays claimed.
    fn claim_unused(&self, pio: PioId) -> Option<SmIndex>;
}

/// Loads the WS2812 program and configures state machines to run it.
///
/// `Pin` is whatever the backend needs to route the data line to the PIO.
pub trait ProgramLoader<Pin> {
    /// Load the WS2812 program into `pio` and return where it lives.
    fn add_program(&self, pio: PioId) -> ProgramOffset;

    /// Configure and enable `binding` to run the program at `offset` on `pin`.
    fn init_state_machine(
        &self,
        binding: StateMachineBinding,
        offset: ProgramOffset,
        pin: Pin,
        config: &Ws2812Config,
    );
}

/// Pushes words into a state machine's TX FIFO.
pub trait TxFifo {
    /// Push `word` if the FIFO has room. Returns `false`, without waiting, if it is full.
    fn try_put(&self, binding: StateMachineBinding, word: u32) -> bool;

    /// Push `word`, retrying [`try_put`](Self::try_put) while the FIFO is full.
    ///
    /// Each attempt is separate, so a backend can guard `try_put` with a short lock.
    /// There is no timeout: a state machine that never drains blocks forever.
    fn put_blocking(&self, binding: StateMachineBinding, word: u32) {
        while !self.try_put(binding, word) {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CLOCK_DIVIDER_MAX_BITS, CLOCK_DIVIDER_MIN_BITS, WS2812_FREQUENCY_HZ_DEFAULT,
        clock_divider_bits,
    };
    use crate::Error;

    const PICO1_CLK_SYS_HZ: u32 = 125_000_000;
    const PICO2_CLK_SYS_HZ: u32 = 150_000_000;

    #[test]
    fn default_rate_divides_stock_clocks() {
        // 15.625 and 18.75
        assert_eq!(
            clock_divider_bits(PICO1_CLK_SYS_HZ, WS2812_FREQUENCY_HZ_DEFAULT),
            Ok(4000)
        );
        assert_eq!(
            clock_divider_bits(PICO2_CLK_SYS_HZ, WS2812_FREQUENCY_HZ_DEFAULT),
            Ok(4800)
        );
    }

    #[test]
    fn fractional_khz_is_not_truncated() {
        assert_eq!(clock_divider_bits(PICO1_CLK_SYS_HZ, 400_500), Ok(7990));
        assert_ne!(
            clock_divider_bits(PICO1_CLK_SYS_HZ, 400_500),
            clock_divider_bits(PICO1_CLK_SYS_HZ, 400_000)
        );
    }

    #[test]
    fn sub_khz_rate_within_range_is_accepted() {
        assert_eq!(clock_divider_bits(PICO1_CLK_SYS_HZ, 500), Ok(25_000 << 8));
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert_eq!(
            clock_divider_bits(PICO1_CLK_SYS_HZ, 0),
            Err(Error::FrequencyOutOfRange { frequency_hz: 0 })
        );
    }

    #[test]
    fn rates_needing_a_divider_out_of_range_are_rejected() {
        assert_eq!(
            clock_divider_bits(PICO1_CLK_SYS_HZ, 100),
            Err(Error::FrequencyOutOfRange { frequency_hz: 100 })
        );
        assert_eq!(
            clock_divider_bits(PICO1_CLK_SYS_HZ, 20_000_000),
            Err(Error::FrequencyOutOfRange {
                frequency_hz: 20_000_000
            })
        );
    }

    #[test]
    fn divider_range_edges_are_inclusive() {
        assert_eq!(
            clock_divider_bits(PICO1_CLK_SYS_HZ, 12_500_000),
            Ok(CLOCK_DIVIDER_MIN_BITS)
        );
        let slowest_hz = 191;
        let bits = clock_divider_bits(PICO1_CLK_SYS_HZ, slowest_hz);
        assert!(matches!(bits, Ok(bits) if bits <= CLOCK_DIVIDER_MAX_BITS));
        assert!(clock_divider_bits(PICO1_CLK_SYS_HZ, slowest_hz - 1).is_err());
    }
}
