#![allow(missing_docs)]
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::convert::Infallible;

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use pio_strand::{PixelStrand, Result, pio_rp::RpPio};
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

    // Walk a red, green, blue triple down the strand, packed as 0xRRGGBB.
    let packed_colors = [0xFF_0000, 0x00_FF00, 0x00_00FF];
    let mut head = 0;
    loop {
        strand8.clear();
        for (offset, packed) in packed_colors.iter().enumerate() {
            strand8.set_pixel_packed((head + offset) % strand8.len(), *packed);
        }
        strand8.show();
        info!("head at {}", head);

        head = (head + 1) % strand8.len();
        Timer::after(Duration::from_millis(250)).await;
    }
}
