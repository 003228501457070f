//! `embassy-rp` PIO backend: drives WS2812 strands from PIO0 and PIO1.
//!
//! [`RpPio`] takes ownership of both PIO blocks and lends them to any number of
//! [`PixelStrand`](crate::PixelStrand)s by shared reference. Each block loads the WS2812
//! program once, the first time a strand on it calls `begin`.

use core::cell::RefCell;

use embassy_rp::Peri;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::peripherals::{PIO0, PIO1};
use embassy_rp::pio::{
    Common, Config, Direction, FifoJoin, Instance, LoadedProgram, Pio, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use fixed::types::U24F8;

use crate::pio_irqs::PioIrqMap;
use crate::pio_resources::{
    CLOCK_DIVIDER_MIN_BITS, PioId, ProgramLoader, ProgramOffset, STATE_MACHINES_PER_PIO, SmIndex,
    StateMachineAllocator, StateMachineBinding, TxFifo, WS2812_FREQUENCY_HZ_DEFAULT,
    Ws2812Config, clock_divider_bits,
};

macro_rules! with_state_machine {
    ($block:expr, $sm_index:expr, $sm:ident => $body:expr) => {
        match $sm_index {
            SmIndex::Sm0 => {
                let $sm = &mut $block.sm0;
                $body
            }
            SmIndex::Sm1 => {
                let $sm = &mut $block.sm1;
                $body
            }
            SmIndex::Sm2 => {
                let $sm = &mut $block.sm2;
                $body
            }
            SmIndex::Sm3 => {
                let $sm = &mut $block.sm3;
                $body
            }
        }
    };
}

/// One PIO block: its common resource, its four state machines, and the loaded program.
struct PioBlock<'d, PIO: Instance> {
    common: Common<'d, PIO>,
    sm0: StateMachine<'d, PIO, 0>,
    sm1: StateMachine<'d, PIO, 1>,
    sm2: StateMachine<'d, PIO, 2>,
    sm3: StateMachine<'d, PIO, 3>,
    claimed: [bool; STATE_MACHINES_PER_PIO],
    ws2812_program: Option<LoadedProgram<'d, PIO>>,
}

impl<'d, PIO: PioIrqMap> PioBlock<'d, PIO> {
    fn new(pio: Peri<'d, PIO>) -> Self {
        let Pio {
            common,
            sm0,
            sm1,
            sm2,
            sm3,
            ..
        } = Pio::new(pio, PIO::irqs());
        Self {
            common,
            sm0,
            sm1,
            sm2,
            sm3,
            claimed: [false; STATE_MACHINES_PER_PIO],
            ws2812_program: None,
        }
    }
}

impl<'d, PIO: Instance> PioBlock<'d, PIO> {
    fn claim_unused(&mut self) -> Option<SmIndex> {
        let position = self.claimed.iter().position(|claimed| !claimed)?;
        let claimed = self.claimed.get_mut(position)?;
        *claimed = true;
        SmIndex::from_index(position)
    }

    /// Load the WS2812 program (only loaded once)
    fn add_program(&mut self) -> ProgramOffset {
        let common = &mut self.common;
        let loaded_program = self.ws2812_program.get_or_insert_with(|| {
            // ws2812.pio from the Pico SDK
            let prg = pio::pio_asm!(
                r#"
                .side_set 1
                .define public T1 2
                .define public T2 5
                .define public T3 3

                .wrap_target
                bitloop:
                    out x, 1       side 0 [T3 - 1] ; side-set still takes place when instruction stalls
                    jmp !x do_zero side 1 [T1 - 1] ; branch on the bit we shifted out, positive pulse
                do_one:
                    jmp bitloop    side 1 [T2 - 1] ; continue driving high, for a long pulse
                do_zero:
                    nop            side 0 [T2 - 1] ; or drive low, for a short pulse
                .wrap
                "#
            );
            common.load_program(&prg.program)
        });
        ProgramOffset(loaded_program.origin)
    }

    fn init_state_machine(
        &mut self,
        sm_index: SmIndex,
        pin: Peri<'d, impl PioPin + 'd>,
        config: &Ws2812Config,
    ) {
        let Some(loaded_program) = self.ws2812_program.as_ref() else {
            warn!("RpPio: init_state_machine before add_program on {}", sm_index);
            return;
        };
        let out_pin = self.common.make_pio_pin(pin);

        let mut cfg = Config::default();
        cfg.use_program(loaded_program, &[&out_pin]);
        cfg.clock_divider = clock_divider(config.frequency_hz);

        // Join FIFOs to make a larger transmit FIFO
        cfg.fifo_join = FifoJoin::TxOnly;

        // Output shift register: shift left, autopull after one pixel
        let mut shift_config = ShiftConfig::default();
        shift_config.direction = ShiftDirection::Left;
        shift_config.auto_fill = true;
        shift_config.threshold = config.bits_per_pixel();
        cfg.shift_out = shift_config;

        with_state_machine!(self, sm_index, state_machine => {
            state_machine.set_config(&cfg);
            state_machine.set_pin_dirs(Direction::Out, &[&out_pin]);
            state_machine.set_enable(true);
        });
    }

    fn try_push(&mut self, sm_index: SmIndex, word: u32) -> bool {
        with_state_machine!(self, sm_index, state_machine => state_machine.tx().try_push(word))
    }
}

/// Clock divider that runs the program at `frequency_hz` bits per second.
///
/// Out-of-range rates fall back to the WS2812 default rate.
fn clock_divider(frequency_hz: u32) -> U24F8 {
    let clk_sys_hz = clk_sys_freq();
    let bits = clock_divider_bits(clk_sys_hz, frequency_hz).unwrap_or_else(|err| {
        warn!("RpPio: {}; using {} Hz", err, WS2812_FREQUENCY_HZ_DEFAULT);
        clock_divider_bits(clk_sys_hz, WS2812_FREQUENCY_HZ_DEFAULT)
            .unwrap_or(CLOCK_DIVIDER_MIN_BITS)
    });
    U24F8::from_bits(bits)
}

type SharedPioBlock<'d, PIO> = Mutex<CriticalSectionRawMutex, RefCell<PioBlock<'d, PIO>>>;

/// Hardware PIO backend owning PIO0 and PIO1.
///
/// Data pins are any `Peri<'d, impl PioPin>`, for example `p.PIN_0`.
///
/// ```ignore
/// let p = embassy_rp::init(Default::default());
/// let rp_pio = RpPio::new(p.PIO0, p.PIO1);
/// let mut strand: PixelStrand<'_, _, _, 8> = PixelStrand::new(8, p.PIN_0, &rp_pio);
/// strand.begin();
/// ```
pub struct RpPio<'d> {
    pio0: SharedPioBlock<'d, PIO0>,
    pio1: SharedPioBlock<'d, PIO1>,
}

impl<'d> RpPio<'d> {
    /// Take ownership of both PIO blocks. All eight state machines start unclaimed.
    #[must_use]
    pub fn new(pio0: Peri<'d, PIO0>, pio1: Peri<'d, PIO1>) -> Self {
        Self {
            pio0: Mutex::new(RefCell::new(PioBlock::new(pio0))),
            pio1: Mutex::new(RefCell::new(PioBlock::new(pio1))),
        }
    }
}

macro_rules! with_pio_block {
    ($rp_pio:expr, $pio:expr, $block:ident => $body:expr) => {
        match $pio {
            PioId::Pio0 => $rp_pio.pio0.lock(|block_cell| {
                let mut block_ref = block_cell.borrow_mut();
                let $block = &mut *block_ref;
                $body
            }),
            PioId::Pio1 => $rp_pio.pio1.lock(|block_cell| {
                let mut block_ref = block_cell.borrow_mut();
                let $block = &mut *block_ref;
                $body
            }),
        }
    };
}

impl StateMachineAllocator for RpPio<'_> {
    fn claim_unused(&self, pio: PioId) -> Option<SmIndex> {
        with_pio_block!(self, pio, block => block.claim_unused())
    }
}

impl<'d, P: PioPin + 'd> ProgramLoader<Peri<'d, P>> for RpPio<'d> {
    fn add_program(&self, pio: PioId) -> ProgramOffset {
        with_pio_block!(self, pio, block => block.add_program())
    }

    fn init_state_machine(
        &self,
        binding: StateMachineBinding,
        _offset: ProgramOffset,
        pin: Peri<'d, P>,
        config: &Ws2812Config,
    ) {
        // The block already holds the program loaded at `_offset`.
        with_pio_block!(self, binding.pio, block => {
            block.init_state_machine(binding.sm, pin, config);
        });
    }
}

impl TxFifo for RpPio<'_> {
    // The lock masks interrupts, so it covers one attempt, never the wait.
    fn try_put(&self, binding: StateMachineBinding, word: u32) -> bool {
        with_pio_block!(self, binding.pio, block => block.try_push(binding.sm, word))
    }

    fn put_blocking(&self, binding: StateMachineBinding, word: u32) {
        while !self.try_put(binding, word) {
            cortex_m::asm::nop();
        }
    }
}
