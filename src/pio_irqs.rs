//! Interrupt bindings for PIO0 and PIO1, the two blocks strands can bind to.
//!
//! PIO2 on the RP2350 is left alone: nothing here binds its interrupt, so another
//! driver may own it.

use embassy_rp::interrupt::typelevel::Binding;
use embassy_rp::pio::{Instance, InterruptHandler};

/// A PIO block whose `IRQ_0` interrupt is bound for [`Pio::new`](embassy_rp::pio::Pio::new).
#[doc(hidden)]
pub trait PioIrqMap: Instance {
    /// Binding type handed to `Pio::new`.
    type Irqs: Binding<Self::Interrupt, InterruptHandler<Self>>;

    /// The binding for this block.
    fn irqs() -> Self::Irqs;
}

macro_rules! pio_irq_map {
    ($($pio:ident: $irqs:ident => $irq:ident),+ $(,)?) => {
        $(
            ::embassy_rp::bind_interrupts! {
                pub struct $irqs {
                    $irq => InterruptHandler<::embassy_rp::peripherals::$pio>;
                }
            }

            impl PioIrqMap for ::embassy_rp::peripherals::$pio {
                type Irqs = $irqs;

                fn irqs() -> Self::Irqs {
                    $irqs
                }
            }
        )+
    };
}

pio_irq_map! {
    PIO0: Pio0Irqs => PIO0_IRQ_0,
    PIO1: Pio1Irqs => PIO1_IRQ_0,
}
