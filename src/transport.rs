//! Half-duplex serial byte transport
//!
//! Each byte is written to the peripheral's transmit register and the caller
//! polls a [`CompletionCell`] until the transfer-complete interrupt publishes
//! the received byte. The poll is bounded: a completion that never arrives
//! surfaces as [`Error::TransportTimeout`] instead of hanging the caller.
//!
//! ```text
//!   caller                      completion handler (interrupt)
//!   ------                      ------------------------------
//!   cell.clear()
//!   peripheral.start_transfer(b)
//!   loop { cell.take() } <----- cell.complete(rx)
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use display_interface::DisplayError;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::delay::settle_us;
use crate::error::Error;

/// Single-producer/single-consumer hand-off between the completion interrupt
/// and the transferring caller.
///
/// The received byte is stored before the flag is raised with `Release`; the
/// caller reads the flag with `Acquire`, so a set flag always carries its byte.
pub struct CompletionCell {
    done: AtomicBool,
    rx: AtomicU8,
}

impl CompletionCell {
    /// An idle cell, usable in a `static`
    pub const fn new() -> Self {
        CompletionCell {
            done: AtomicBool::new(false),
            rx: AtomicU8::new(0),
        }
    }

    /// Arm the cell before starting a transfer
    pub fn clear(&self) {
        self.done.store(false, Ordering::Release);
    }

    /// Publish a received byte. Called from the completion interrupt.
    pub fn complete(&self, rx: u8) {
        self.rx.store(rx, Ordering::Relaxed);
        self.done.store(true, Ordering::Release);
    }

    /// The transfer finished but the data register was written mid-transfer;
    /// the received byte is meaningless and reads as zero.
    pub fn complete_collision(&self) {
        self.complete(0x00);
    }

    /// The received byte, once the transfer has completed
    pub fn take(&self) -> Option<u8> {
        if self.done.load(Ordering::Acquire) {
            Some(self.rx.load(Ordering::Relaxed))
        } else {
            None
        }
    }
}

impl Default for CompletionCell {
    fn default() -> Self {
        Self::new()
    }
}

/// The transmit side of a serial peripheral
pub trait SerialPeripheral {
    /// Write `byte` to the transmit register, starting the shift
    fn start_transfer(&mut self, byte: u8);
}

/// Timing of a block transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Pause after asserting and after releasing the select line
    pub settle_us: u32,
    /// Pause between two polls of the completion cell
    pub poll_us: u32,
    /// Give up on a byte after this long
    pub timeout_us: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            settle_us: 100,
            poll_us: 1,
            timeout_us: 10_000,
        }
    }
}

/// Block transfers over a [`SerialPeripheral`] framed by a select line
pub struct ByteTransport<'c, P, SS, D> {
    peripheral: P,
    /// Mode select, low while a block is in flight
    select: SS,
    completion: &'c CompletionCell,
    delay: D,
    config: TransportConfig,
}

impl<'c, P, SS, D> ByteTransport<'c, P, SS, D> {
    /// Create a transport. `completion` must be the cell the peripheral's
    /// interrupt handler publishes into.
    pub fn new(
        peripheral: P,
        select: SS,
        completion: &'c CompletionCell,
        delay: D,
        config: TransportConfig,
    ) -> Self {
        ByteTransport {
            peripheral,
            select,
            completion,
            delay,
            config,
        }
    }

    /// Current timing
    pub fn config(&self) -> TransportConfig {
        self.config
    }

    /// Give the peripheral, select pin and delay back
    pub fn release(self) -> (P, SS, D) {
        (self.peripheral, self.select, self.delay)
    }
}

impl<P, SS, D> ByteTransport<'_, P, SS, D>
where
    P: SerialPeripheral,
    SS: OutputPin,
    D: DelayNs,
{
    /// Send every byte of `tx` in order and store the answer to byte `i` in `rx[i]`.
    ///
    /// The select line is held low for the whole block and released afterwards,
    /// also when a byte times out.
    pub fn transfer_block(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Error> {
        if tx.len() != rx.len() {
            return Err(Error::LengthMismatch {
                tx: tx.len(),
                rx: rx.len(),
            });
        }
        log::debug!("serial block transfer, {} bytes", tx.len());

        self.select.set_low().map_err(|_| DisplayError::CSError)?;
        settle_us(&mut self.delay, self.config.settle_us);

        let mut result = Ok(());
        for (index, (&byte, slot)) in tx.iter().zip(rx.iter_mut()).enumerate() {
            match self.transfer_byte(index, byte) {
                Ok(received) => *slot = received,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        self.release_select()?;
        result
    }

    /// Drive the select line high and let it settle
    pub fn release_select(&mut self) -> Result<(), Error> {
        self.select.set_high().map_err(|_| DisplayError::CSError)?;
        settle_us(&mut self.delay, self.config.settle_us);
        Ok(())
    }

    fn transfer_byte(&mut self, index: usize, byte: u8) -> Result<u8, Error> {
        self.completion.clear();
        self.peripheral.start_transfer(byte);
        let received = self.wait_for_completion(index)?;
        log::trace!("tx 0x{:02X} rx 0x{:02X}", byte, received);
        Ok(received)
    }

    fn wait_for_completion(&mut self, index: usize) -> Result<u8, Error> {
        let mut waited_us = 0u32;
        loop {
            if let Some(received) = self.completion.take() {
                return Ok(received);
            }
            if waited_us >= self.config.timeout_us {
                log::error!(
                    "serial transfer: no completion for byte {} after {}us",
                    index,
                    waited_us
                );
                return Err(Error::TransportTimeout { index });
            }
            self.delay.delay_us(self.config.poll_us);
            waited_us = waited_us.saturating_add(self.config.poll_us.max(1));
        }
    }
}
