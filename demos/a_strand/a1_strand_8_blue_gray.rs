#![allow(missing_docs)]
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::convert::Infallible;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use pio_strand::{PixelStrand, Result, colors, pio_rp::RpPio};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());
    let rp_pio = RpPio::new(p.PIO0, p.PIO1);

    let mut strand8: PixelStrand<'_, _, _, 8> = PixelStrand::try_new(8, p.PIN_0, &rp_pio)?;
    strand8.begin();

    let palette = [colors::BLUE, colors::LIGHT_GRAY];
    let mut phase = 0;
    loop {
        for pixel_index in 0..strand8.len() {
            strand8.set_pixel(pixel_index, palette[(pixel_index + phase) % 2]);
        }
        strand8.show();
        phase = (phase + 1) % 2;
        Timer::after(Duration::from_millis(150)).await;
    }
}
