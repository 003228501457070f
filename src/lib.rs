//! Drive a NeoPixel-style (WS2812) LED strand from a PIO state machine on Pico 1 and Pico 2.
//!
//! Start with [`PixelStrand`]: it owns the pixel buffer and hands it to the PIO, one FIFO
//! word per pixel, when you call [`show`](PixelStrand::show).
//!
//! # Glossary
//!
//! Resources available on the Pico 1 and Pico 2:
//!
//! - **PIO ([Programmable I/O](https://medium.com/data-science/nine-pico-pio-wats-with-rust-part-1-9d062067dc25)):** Pico 1 has 2. Pico 2 has 3; this crate uses the first 2.
//! - **State machine:** each PIO has 4. One state machine runs one strand.
//! - **Strand:** a chain of individually colorable LEDs on one data line.
//! - **Packed color:** a `u32` holding `0xRRGGBB`.
#![cfg_attr(not(feature = "host"), no_std)]

// Compile-time checks: at most one board, and a board needs an architecture (unless testing with host feature)
#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(
    any(feature = "pico1", feature = "pico2"),
    not(feature = "arm"),
    not(feature = "host")
))]
compile_error!("A board feature ('pico1' or 'pico2') needs the 'arm' architecture feature");

// Logging macros must come first so every module below can use them.
#[macro_use]
mod fmt;

mod error;
#[cfg(feature = "host")]
pub mod pio_host;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub(crate) mod pio_irqs;
pub mod pio_resources;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod pio_rp;
pub mod pixel_strand;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
pub use crate::pixel_strand::{PIXELS_MAX_DEFAULT, PixelStrand, Rgb, colors};
