//! Host PIO backend that records instead of driving hardware.
//!
//! [`HostPio`] implements the same traits as [`RpPio`](crate::pio_rp::RpPio), so strand code
//! runs unchanged on a workstation. It keeps a log of claims, program loads, state machine
//! activations, and every word pushed into each TX FIFO. Pushes never block unless a test
//! stalls them with [`HostPio::stall_pushes`].
//!
//! Pins are plain GPIO numbers (`u8`).

#![cfg(feature = "host")]

use core::cell::RefCell;

use crate::pio_resources::{
    PIO_COUNT, PioId, ProgramLoader, ProgramOffset, STATE_MACHINES_PER_PIO, SmIndex,
    StateMachineAllocator, StateMachineBinding, TxFifo, Ws2812Config,
};

/// Length of the WS2812 program in instructions.
const WS2812_PROGRAM_LEN: u8 = 4;

/// PIO instruction memory size.
const INSTRUCTION_MEMORY_LEN: u8 = 32;

/// One call to [`ProgramLoader::init_state_machine`], as recorded by [`HostPio`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HostActivation {
    /// State machine that was configured.
    pub binding: StateMachineBinding,
    /// Program offset it was pointed at.
    pub offset: ProgramOffset,
    /// GPIO number of the data pin.
    pub pin: u8,
    /// Configuration it was given.
    pub config: Ws2812Config,
}

#[derive(Default)]
struct HostPioState {
    claimed: [[bool; STATE_MACHINES_PER_PIO]; PIO_COUNT],
    program_offsets: [Option<ProgramOffset>; PIO_COUNT],
    program_loads: usize,
    activations: Vec<HostActivation>,
    words: Vec<(StateMachineBinding, u32)>,
    full_attempts_left: usize,
    push_attempts: usize,
}

/// Recording PIO backend for host tests.
///
/// See the [module documentation](mod@crate::pio_host).
#[derive(Default)]
pub struct HostPio {
    state: RefCell<HostPioState>,
}

impl HostPio {
    /// Create a backend with every state machine free.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `binding` as claimed, as if some other driver owned it.
    pub fn reserve(&self, binding: StateMachineBinding) {
        let mut state = self.state.borrow_mut();
        if let Some(claimed) = state
            .claimed
            .get_mut(binding.pio.index())
            .and_then(|pio_claims| pio_claims.get_mut(binding.sm.index()))
        {
            *claimed = true;
        }
    }

    /// Mark every state machine of `pio` as claimed.
    pub fn reserve_all(&self, pio: PioId) {
        for sm in SmIndex::ALL {
            self.reserve(StateMachineBinding::new(pio, sm));
        }
    }

    /// Returns `true` if `binding` has been claimed or reserved.
    #[must_use]
    pub fn is_claimed(&self, binding: StateMachineBinding) -> bool {
        self.state
            .borrow()
            .claimed
            .get(binding.pio.index())
            .and_then(|pio_claims| pio_claims.get(binding.sm.index()))
            .copied()
            .unwrap_or(false)
    }

    /// How many times a program was actually loaded, across both PIO blocks.
    #[must_use]
    pub fn program_loads(&self) -> usize {
        self.state.borrow().program_loads
    }

    /// Every state machine activation, in call order.
    #[must_use]
    pub fn activations(&self) -> Vec<HostActivation> {
        self.state.borrow().activations.clone()
    }

    /// Words pushed to `binding`'s TX FIFO, in push order.
    #[must_use]
    pub fn words(&self, binding: StateMachineBinding) -> Vec<u32> {
        self.state
            .borrow()
            .words
            .iter()
            .filter(|(word_binding, _)| *word_binding == binding)
            .map(|(_, word)| *word)
            .collect()
    }

    /// Total number of words pushed to any state machine.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.state.borrow().words.len()
    }

    /// Report the FIFO as full for the next `attempts` pushes, on any state machine.
    pub fn stall_pushes(&self, attempts: usize) {
        self.state.borrow_mut().full_attempts_left = attempts;
    }

    /// Every push attempt so far, including the ones refused while stalled.
    #[must_use]
    pub fn push_attempts(&self) -> usize {
        self.state.borrow().push_attempts
    }

    /// Forget all pushed words, keeping claims and activations.
    pub fn clear_words(&self) {
        self.state.borrow_mut().words.clear();
    }
}

impl StateMachineAllocator for HostPio {
    fn claim_unused(&self, pio: PioId) -> Option<SmIndex> {
        let mut state = self.state.borrow_mut();
        let pio_claims = state.claimed.get_mut(pio.index())?;
        let position = pio_claims.iter().position(|claimed| !claimed)?;
        let claimed = pio_claims.get_mut(position)?;
        *claimed = true;
        SmIndex::from_index(position)
    }
}

impl ProgramLoader<u8> for HostPio {
    fn add_program(&self, pio: PioId) -> ProgramOffset {
        let mut state = self.state.borrow_mut();
        if let Some(Some(offset)) = state.program_offsets.get(pio.index()) {
            return *offset;
        }
        // Like the SDK allocator, place the program at the top of instruction memory.
        let offset = ProgramOffset(INSTRUCTION_MEMORY_LEN - WS2812_PROGRAM_LEN);
        if let Some(slot) = state.program_offsets.get_mut(pio.index()) {
            *slot = Some(offset);
        }
        state.program_loads += 1;
        offset
    }

    fn init_state_machine(
        &self,
        binding: StateMachineBinding,
        offset: ProgramOffset,
        pin: u8,
        config: &Ws2812Config,
    ) {
        self.state.borrow_mut().activations.push(HostActivation {
            binding,
            offset,
            pin,
            config: *config,
        });
    }
}

impl TxFifo for HostPio {
    fn try_put(&self, binding: StateMachineBinding, word: u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.push_attempts += 1;
        if state.full_attempts_left > 0 {
            state.full_attempts_left -= 1;
            return false;
        }
        state.words.push((binding, word));
        true
    }
}
