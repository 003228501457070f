#![allow(missing_docs)]
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::convert::Infallible;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use pio_strand::{
    PixelStrand, Result, colors,
    pio_resources::{PioId, SmIndex, StateMachineBinding},
    pio_rp::RpPio,
};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());
    let rp_pio = RpPio::new(p.PIO0, p.PIO1);

    // Explicit bindings are not claimed, so keep them apart by hand.
    let mut strand_a: PixelStrand<'_, _, _, 8> = PixelStrand::new_with_binding(
        8,
        p.PIN_0,
        StateMachineBinding::new(PioId::Pio1, SmIndex::Sm3),
        &rp_pio,
    );
    let mut strand_b: PixelStrand<'_, _, _, 12> = PixelStrand::new_with_binding(
        12,
        p.PIN_4,
        StateMachineBinding::new(PioId::Pio0, SmIndex::Sm1),
        &rp_pio,
    );
    strand_a.begin();
    strand_b.begin();

    let mut dot: usize = 0;
    loop {
        strand_a.fill(colors::BLUE);
        strand_a.set_pixel(dot % strand_a.len(), colors::WHITE);
        strand_b.fill_color(0, 32, 0);
        strand_b.set_pixel(dot % strand_b.len(), colors::YELLOW);
        strand_a.show();
        strand_b.show();

        dot = dot.wrapping_add(1);
        Timer::after(Duration::from_millis(100)).await;
    }
}
