#![allow(missing_docs)]
//! Host-level tests for `show`: what reaches the TX FIFO, and in which order.

use pio_strand::pio_host::HostPio;
use pio_strand::pio_resources::{PioId, SmIndex, StateMachineBinding};
use pio_strand::pixel_strand::wire_word;
use pio_strand::{PixelStrand, Rgb, colors};
use smart_leds::SmartLedsWrite;

const BINDING: StateMachineBinding = StateMachineBinding::new(PioId::Pio1, SmIndex::Sm2);

#[test]
fn red_green_blue_scenario_pushes_three_words() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(3, 0, BINDING, &host_pio);
    strand.begin();

    strand.set_pixel_color(0, 255, 0, 0);
    strand.set_pixel_color(1, 0, 255, 0);
    strand.set_pixel_color(2, 0, 0, 255);
    strand.show();

    assert_eq!(
        host_pio.words(BINDING),
        [0x00FF_0000, 0xFF00_0000, 0x0000_FF00]
    );
}

#[test]
fn words_follow_the_wire_formula() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(4, 0, BINDING, &host_pio);
    let colors_in = [
        Rgb::new(0x12, 0x34, 0x56),
        Rgb::new(1, 2, 3),
        Rgb::new(0xFF, 0xFF, 0xFF),
        Rgb::new(0x80, 0x00, 0x01),
    ];
    for (index, color) in colors_in.iter().enumerate() {
        strand.set_pixel(index, *color);
    }

    strand.show();

    let expected: Vec<u32> = colors_in
        .iter()
        .map(|color| {
            ((u32::from(color.r) << 8) | (u32::from(color.g) << 16) | u32::from(color.b)) << 8
        })
        .collect();
    assert_eq!(host_pio.words(BINDING), expected);
    assert_eq!(host_pio.words(BINDING)[0], 0x3412_5600);
    assert_eq!(wire_word(colors_in[1]), 0x0201_0300);
}

#[test]
fn show_pushes_one_word_per_pixel_every_time() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(5, 0, BINDING, &host_pio);
    strand.fill(colors::WHITE);

    strand.show();
    strand.show();

    assert_eq!(host_pio.word_count(), 10);
    assert!(
        host_pio
            .words(BINDING)
            .iter()
            .all(|word| *word == 0xFFFF_FF00)
    );

    host_pio.clear_words();
    strand.set_pixel_color(4, 0, 0, 1);
    strand.show();
    assert_eq!(host_pio.words(BINDING).len(), 5);
    assert_eq!(host_pio.words(BINDING)[4], 0x0000_0100);
}

#[test]
fn show_on_empty_strand_pushes_nothing() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8, 4> =
        PixelStrand::new_with_binding(5, 0, BINDING, &host_pio);
    strand.begin();

    strand.show();

    assert!(strand.is_empty());
    assert_eq!(host_pio.word_count(), 0);
}

#[test]
fn show_before_begin_still_pushes() {
    let host_pio = HostPio::new();
    let strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(2, 0, BINDING, &host_pio);

    strand.show();

    assert!(!strand.is_active());
    assert_eq!(host_pio.words(BINDING), [0, 0]);
}

#[test]
fn show_after_resize_pushes_new_length_of_black() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(2, 0, BINDING, &host_pio);
    strand.fill(colors::RED);

    strand.resize(3);
    strand.show();

    assert_eq!(host_pio.words(BINDING), [0, 0, 0]);
}

#[test]
fn two_strands_push_to_their_own_state_machines() {
    let host_pio = HostPio::new();
    let mut first: PixelStrand<'_, HostPio, u8> = PixelStrand::new(1, 2, &host_pio);
    let mut second: PixelStrand<'_, HostPio, u8> = PixelStrand::new(2, 3, &host_pio);
    first.fill(colors::BLUE);
    second.fill(colors::RED);

    second.show();
    first.show();

    assert_eq!(host_pio.words(first.binding()), [0x0000_FF00]);
    assert_eq!(host_pio.words(second.binding()), [0x00FF_0000, 0x00FF_0000]);
}

#[test]
fn smart_leds_write_copies_then_shows() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(3, 0, BINDING, &host_pio);
    strand.fill(colors::WHITE);

    let result = strand.write([Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);

    assert!(result.is_ok());
    assert_eq!(strand.pixel_packed(0), 0xFF_0000);
    assert_eq!(strand.pixel_packed(1), 0x00_FF00);
    assert_eq!(strand.pixel_packed(2), 0xFF_FFFF);
    assert_eq!(
        host_pio.words(BINDING),
        [0x00FF_0000, 0xFF00_0000, 0xFFFF_FF00]
    );
}

#[test]
fn smart_leds_write_drops_extra_colors() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(1, 0, BINDING, &host_pio);

    let result = strand.write([Rgb::new(0, 255, 0), colors::RED, colors::BLUE]);

    assert!(result.is_ok());
    assert_eq!(strand.len(), 1);
    assert_eq!(host_pio.words(BINDING), [0xFF00_0000]);
}

#[test]
fn show_retries_each_word_while_the_fifo_is_full() {
    let host_pio = HostPio::new();
    let mut strand: PixelStrand<'_, HostPio, u8> =
        PixelStrand::new_with_binding(2, 0, BINDING, &host_pio);
    strand.set_pixel_color(0, 255, 0, 0);
    strand.set_pixel_color(1, 0, 0, 255);
    host_pio.stall_pushes(3);

    strand.show();

    // Each refused attempt returns, so the backend state is free between retries.
    assert_eq!(host_pio.push_attempts(), 5);
    assert_eq!(host_pio.words(BINDING), [0x00FF_0000, 0x0000_FF00]);

    strand.show();
    assert_eq!(host_pio.push_attempts(), 7);
}
