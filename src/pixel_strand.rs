//! A device abstraction for a NeoPixel-style (WS2812) LED strand driven by one PIO state machine.
//!
//! A [`PixelStrand`] owns a buffer of [`Rgb`] pixels. You mutate the buffer freely, then call
//! [`PixelStrand::show`] to push it to the LEDs, one FIFO word per pixel.
//!
//! Setting up a strand takes two steps. Construction binds a PIO state machine and allocates the
//! buffer. [`PixelStrand::begin`] then loads the WS2812 program and starts the state machine.
//! Nothing is committed to the PIO until `begin`, so a strand can be fully configured first.
//!
//! # Example: Three Pixels on the Host Backend
//!
//! ```
//! use pio_strand::pio_host::HostPio;
//! use pio_strand::pio_resources::{PioId, SmIndex, StateMachineBinding};
//! use pio_strand::PixelStrand;
//!
//! let host_pio = HostPio::new();
//! let mut strand: PixelStrand<'_, HostPio, u8> = PixelStrand::new(3, 2, &host_pio);
//! strand.begin();
//!
//! strand.set_pixel_color(0, 255, 0, 0);
//! strand.set_pixel_packed(1, 0x00_FF_00);
//! strand.set_pixel_color(7, 1, 2, 3); // out of range: ignored
//! strand.show();
//!
//! let binding = StateMachineBinding::new(PioId::Pio0, SmIndex::Sm0);
//! assert_eq!(strand.pixel_packed(1), 0x00_FF_00);
//! assert_eq!(host_pio.words(binding), [0x00FF_0000, 0xFF00_0000, 0x0000_0000]);
//! ```
//!
//! # Example: Auto-Bind on a Pico
//!
//! ```ignore
//! let p = embassy_rp::init(Default::default());
//! let rp_pio = RpPio::new(p.PIO0, p.PIO1);
//!
//! let mut strand: PixelStrand<'_, _, _, 8> = PixelStrand::new(8, p.PIN_0, &rp_pio);
//! strand.begin();
//! strand.fill(colors::BLUE);
//! strand.show();
//! ```

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

use core::convert::Infallible;

use heapless::Vec;
use smart_leds::{RGB8, SmartLedsWrite};

use crate::pio_resources::{
    PioId, ProgramLoader, ProgramOffset, StateMachineAllocator, StateMachineBinding, TxFifo,
    Ws2812Config,
};
use crate::{Error, Result};

pub mod packed_color;

pub use packed_color::{pack_color, pack_rgb, unpack_color, wire_word};

/// RGB color representation re-exported from the `smart_leds` crate.
pub type Rgb = RGB8;

/// Default buffer capacity, in pixels, of a [`PixelStrand`].
pub const PIXELS_MAX_DEFAULT: usize = 256;

const OFF: Rgb = Rgb::new(0, 0, 0);

/// A WS2812 LED strand bound to one PIO state machine.
///
/// `H` is the PIO backend (see [`pio_resources`](crate::pio_resources)), `Pin` the data pin type
/// that backend accepts, and `MAX_LEN` the buffer capacity in pixels.
///
/// # Out-of-range indexes
///
/// Writes past [`len`](Self::len) are silently ignored, and
/// [`pixel_packed`](Self::pixel_packed) past `len` returns `0`, the same value as black.
/// Check against `len` when you need to tell the two apart, or use [`pixel`](Self::pixel).
///
/// # Capacity
///
/// Asking for more than `MAX_LEN` pixels (at construction or in [`resize`](Self::resize))
/// leaves an empty strand. Every mutator is then a no-op and every query reads zero.
pub struct PixelStrand<'a, H, Pin, const MAX_LEN: usize = PIXELS_MAX_DEFAULT> {
    hardware: &'a H,
    pixels: Vec<Rgb, MAX_LEN>,
    binding: StateMachineBinding,
    pin: Option<Pin>,
    program_offset: Option<ProgramOffset>,
    config: Ws2812Config,
}

impl<'a, H, Pin, const MAX_LEN: usize> PixelStrand<'a, H, Pin, MAX_LEN> {
    /// Create a strand of `len` pixels on a state machine the caller picked.
    ///
    /// The binding is not checked or claimed. Giving two strands the same binding, or a
    /// binding some other driver uses, is the caller's mistake to avoid.
    pub fn new_with_binding(
        len: usize,
        pin: Pin,
        binding: StateMachineBinding,
        hardware: &'a H,
    ) -> Self {
        let mut pixels = Vec::new();
        if let Err(err) = allocate(&mut pixels, len) {
            warn!("PixelStrand on {}: {}", binding, err);
        }
        debug!("PixelStrand: {} pixels on {}", pixels.len(), binding);
        Self {
            hardware,
            pixels,
            binding,
            pin: Some(pin),
            program_offset: None,
            config: Ws2812Config::DEFAULT,
        }
    }

    /// Replace the configuration [`begin`](Self::begin) will use.
    ///
    /// Has no effect on a strand that is already active.
    #[must_use]
    pub const fn with_config(mut self, config: Ws2812Config) -> Self {
        self.config = config;
        self
    }

    /// Set pixel `index` to a color. Ignored if `index >= len`.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    /// Set pixel `index` from separate components. Ignored if `index >= len`.
    pub fn set_pixel_color(&mut self, index: usize, red: u8, green: u8, blue: u8) {
        self.set_pixel(index, Rgb::new(red, green, blue));
    }

    /// Set pixel `index` from a packed `0xRRGGBB` value. Ignored if `index >= len`.
    pub fn set_pixel_packed(&mut self, index: usize, packed: u32) {
        self.set_pixel(index, unpack_color(packed));
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.pixels.fill(OFF);
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Set every pixel from separate components.
    pub fn fill_color(&mut self, red: u8, green: u8, blue: u8) {
        self.fill(Rgb::new(red, green, blue));
    }

    /// Change the strand length. All pixels are turned off, even when `len` is unchanged.
    ///
    /// If `len` exceeds `MAX_LEN` the strand becomes empty.
    pub fn resize(&mut self, len: usize) {
        if let Err(err) = allocate(&mut self.pixels, len) {
            warn!("PixelStrand on {}: {}", self.binding, err);
        }
    }

    /// Number of pixels in the strand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the strand has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color of pixel `index`, or `None` if `index >= len`.
    #[must_use]
    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    /// Color of pixel `index` packed as `0xRRGGBB`.
    ///
    /// Returns `0` if `index >= len`, which reads the same as a black pixel.
    #[must_use]
    pub fn pixel_packed(&self, index: usize) -> u32 {
        self.pixel(index).map_or(0, pack_rgb)
    }

    /// All pixels, in strand order.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// The state machine this strand drives.
    #[must_use]
    pub const fn binding(&self) -> StateMachineBinding {
        self.binding
    }

    /// The configuration used (or to be used) by [`begin`](Self::begin).
    #[must_use]
    pub const fn config(&self) -> Ws2812Config {
        self.config
    }

    /// Returns `true` once [`begin`](Self::begin) has run.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.program_offset.is_some()
    }
}

impl<'a, H, Pin, const MAX_LEN: usize> PixelStrand<'a, H, Pin, MAX_LEN>
where
    H: StateMachineAllocator,
{
    /// Create a strand of `len` pixels on the first free state machine of PIO0, else PIO1.
    ///
    /// # Panics
    ///
    /// Panics if both PIO blocks are out of state machines. Use [`try_new`](Self::try_new)
    /// to handle that case instead.
    pub fn new(len: usize, pin: Pin, hardware: &'a H) -> Self {
        match Self::try_new(len, pin, hardware) {
            Ok(pixel_strand) => pixel_strand,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`new`](Self::new), but reports an exhausted PIO budget instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFreeStateMachine`] if neither PIO0 nor PIO1 has a free state machine.
    pub fn try_new(len: usize, pin: Pin, hardware: &'a H) -> Result<Self> {
        let binding = PioId::ALL
            .into_iter()
            .find_map(|pio| {
                hardware
                    .claim_unused(pio)
                    .map(|sm| StateMachineBinding::new(pio, sm))
            })
            .ok_or(Error::NoFreeStateMachine)?;
        Ok(Self::new_with_binding(len, pin, binding, hardware))
    }
}

impl<H, Pin, const MAX_LEN: usize> PixelStrand<'_, H, Pin, MAX_LEN>
where
    H: ProgramLoader<Pin>,
{
    /// Load the WS2812 program into the bound PIO block and start the state machine.
    ///
    /// Only the first call does anything.
    pub fn begin(&mut self) {
        let Some(pin) = self.pin.take() else {
            warn!("PixelStrand on {}: already active", self.binding);
            return;
        };
        let offset = self.hardware.add_program(self.binding.pio);
        self.hardware
            .init_state_machine(self.binding, offset, pin, &self.config);
        self.program_offset = Some(offset);
        info!(
            "PixelStrand on {}: program at {}, {} Hz",
            self.binding, offset, self.config.frequency_hz
        );
    }
}

impl<H, Pin, const MAX_LEN: usize> PixelStrand<'_, H, Pin, MAX_LEN>
where
    H: TxFifo,
{
    /// Push every pixel, in order, to the bound state machine.
    ///
    /// Each push waits for room in the TX FIFO, so this takes as long as the wire needs
    /// for all but the last few pixels. If the state machine never drains (not started,
    /// or no hardware), this never returns.
    pub fn show(&self) {
        for pixel in &self.pixels {
            self.hardware.put_blocking(self.binding, wire_word(*pixel));
        }
    }
}

impl<H, Pin, const MAX_LEN: usize> SmartLedsWrite for PixelStrand<'_, H, Pin, MAX_LEN>
where
    H: TxFifo,
{
    type Error = Infallible;
    type Color = Rgb;

    /// Copy colors into the strand from pixel 0 on, then [`show`](PixelStrand::show) it.
    ///
    /// Colors past the end are dropped. Pixels past the last color keep their value.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for (pixel, color) in self.pixels.iter_mut().zip(iterator) {
            *pixel = color.into();
        }
        self.show();
        Ok(())
    }
}

/// Discard `pixels` and refill it with `len` black pixels.
fn allocate<const MAX_LEN: usize>(pixels: &mut Vec<Rgb, MAX_LEN>, len: usize) -> Result<()> {
    pixels.clear();
    pixels.resize(len, OFF).map_err(|()| Error::CapacityExceeded {
        requested: len,
        capacity: MAX_LEN,
    })
}
