//! ILI9341 Bring-up Driver Implementation
//!
//! Drives the controller from power-on to an active, addressable display:
//!
//! 1. hardware reset through the dedicated RST line ([`Transmit::hard_reset`])
//! 1. every record of the init table, in order: the opcode, its parameters,
//!    then the record's settle time
//!
//! ## Critical Implementation Details
//!
//! ### Hardware reset comes first
//!
//! The `SWRESET` record at the head of the table is not enough on its own. A
//! controller that powers up in an undefined register state ignores the first
//! commands, so the RST pulse always precedes the first table record.
//!
//! ### Open loop
//!
//! The 8080 write path has no acknowledge and the driver never reads back. A
//! wiring or timing fault shows up as a blank or garbled panel, not as an error.
//!
//! ### One-byte settle times
//!
//! A record's delay is one byte, so a single record waits at most 255ms.
//! Longer pauses need several records.

use embedded_hal::delay::DelayNs;

use crate::cmd::Cmd;
use crate::delay::settle_ms;
use crate::error::Error;
use crate::flag::Flag;
use crate::interface::Transmit;
use crate::table::{InitRecord, InitTable, PackedTable};

/// ILI9341 bring-up sequence, 16 bits per pixel, portrait, 70Hz
pub const DEFAULT_INIT_TABLE: InitTable<'static> = InitTable::new(&[
    // t > 5ms
    InitRecord { opcode: Cmd::SWRESET, args: &[], delay_ms: 10 },
    InitRecord { opcode: Cmd::DISPOFF, args: &[], delay_ms: 0 },
    InitRecord { opcode: Cmd::PWCTR1, args: &[Flag::PWCTR1_GVDD_4V75], delay_ms: 0 },
    InitRecord { opcode: Cmd::PWCTR2, args: &[Flag::PWCTR2_STEP_UP], delay_ms: 0 },
    InitRecord {
        opcode: Cmd::VMCTR1,
        args: &[Flag::VMCTR1_VCOMH_4V325, Flag::VMCTR1_VCOML_N0V600],
        delay_ms: 0,
    },
    InitRecord { opcode: Cmd::VMCTR2, args: &[Flag::VMCTR2_NVM_OFFSET], delay_ms: 0 },
    InitRecord { opcode: Cmd::PIXFMT, args: &[Flag::PIXFMT_16BPP], delay_ms: 0 },
    InitRecord {
        opcode: Cmd::FRMCTR1,
        args: &[Flag::FRMCTR1_DIVA_FOSC, Flag::FRMCTR1_70HZ],
        delay_ms: 0,
    },
    InitRecord { opcode: Cmd::GAMSET, args: &[Flag::GAMSET_CURVE_1], delay_ms: 0 },
    InitRecord { opcode: Cmd::ETMOD, args: &[Flag::ETMOD_NORMAL], delay_ms: 0 },
    InitRecord {
        opcode: Cmd::DFUNCTR,
        args: &[
            Flag::DFUNCTR_PTG_PT,
            Flag::DFUNCTR_REV_ISC,
            Flag::DFUNCTR_320_LINES,
            Flag::DFUNCTR_PCDIV,
        ],
        delay_ms: 0,
    },
    InitRecord { opcode: Cmd::MADCTL, args: &[Flag::MADCTL_NORMAL], delay_ms: 0 },
    // t > 120ms
    InitRecord { opcode: Cmd::SLPOUT, args: &[], delay_ms: 150 },
    InitRecord { opcode: Cmd::DISPON, args: &[], delay_ms: 20 },
]);

/// Where the init sequence currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    /// No init has run, or the last one failed
    NotStarted,
    /// Sending the opcode and parameters of record `n`
    ApplyingRecord(usize),
    /// Waiting out the settle time of record `n`
    AwaitingSettle(usize),
    /// The whole table was sent
    Done,
}

/// ILI9341 Bring-up Driver
///
/// ## Type Parameters
///
/// - `IFACE` - bus the bytes go out on, see [`Transmit`]
/// - `DELAY` - Delay provider for reset and settle timing
pub struct Ili9341<IFACE, DELAY> {
    interface: IFACE,
    delay: DELAY,
    state: InitState,
}

impl<IFACE, DELAY> Ili9341<IFACE, DELAY>
where
    IFACE: Transmit,
    DELAY: DelayNs,
{
    /// Create the driver. Nothing is sent until [`Self::initialize`].
    pub fn new(interface: IFACE, delay: DELAY) -> Self {
        log::debug!("creating new Ili9341 instance");
        Ili9341 {
            interface,
            delay,
            state: InitState::NotStarted,
        }
    }

    /// Reset the controller and run [`DEFAULT_INIT_TABLE`]
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.initialize_with(DEFAULT_INIT_TABLE.records())
    }

    /// Reset the controller and run a caller supplied sequence.
    ///
    /// Safe to call again: every run starts from the hardware reset.
    pub fn initialize_with<'t, I>(&mut self, records: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = InitRecord<'t>>,
    {
        log::info!("Initializing ILI9341");
        self.state = InitState::NotStarted;

        let result = self.run(records);
        match &result {
            Ok(()) => {
                self.state = InitState::Done;
                log::info!("ILI9341 init sequence complete");
            }
            Err(e) => {
                log::error!("ILI9341 init failed in {:?}: {}", self.state, e);
                self.state = InitState::NotStarted;
            }
        }
        result
    }

    /// Validate a table in the packed byte layout, then run it.
    ///
    /// A malformed table is rejected before any pin is touched.
    pub fn initialize_packed(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let table = PackedTable::parse(bytes).map_err(|e| {
            log::error!("rejecting init table: {}", e);
            e
        })?;
        self.initialize_with(table.records())
    }

    fn run<'t, I>(&mut self, records: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = InitRecord<'t>>,
    {
        self.interface.hard_reset(&mut self.delay)?;

        for (index, record) in records.into_iter().enumerate() {
            log::debug!(
                "init record {}: cmd 0x{:02X}, {} args, {}ms",
                index,
                record.opcode,
                record.arg_count(),
                record.delay_ms
            );
            self.state = InitState::ApplyingRecord(index);
            self.interface.transmit_command(record.opcode)?;
            for &arg in record.args {
                self.interface.transmit_data(arg)?;
            }

            self.state = InitState::AwaitingSettle(index);
            settle_ms(&mut self.delay, u32::from(record.delay_ms));
        }
        Ok(())
    }

    /// Send one command byte
    pub fn transmit_command(&mut self, command: u8) -> Result<(), Error> {
        self.interface.transmit_command(command)
    }

    /// Send one data byte
    pub fn transmit_data(&mut self, data: u8) -> Result<(), Error> {
        self.interface.transmit_data(data)
    }

    /// Busy-wait `ms` milliseconds, 0 returns at once
    pub fn delay(&mut self, ms: u16) {
        settle_ms(&mut self.delay, u32::from(ms));
    }

    /// Progress of the last init run
    pub fn state(&self) -> InitState {
        self.state
    }

    /// Whether the last [`Self::initialize`] ran to completion
    pub fn is_initialized(&self) -> bool {
        self.state == InitState::Done
    }

    /// Direct access to the bus, e.g. for bulk pixel writes
    pub fn interface(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Give the interface and the delay back
    pub fn release(self) -> (IFACE, DELAY) {
        (self.interface, self.delay)
    }
}
