//! ILI9341 TFT Bring-up Driver
//!
//! Used with the common 2.4"/2.8" ILI9341 TFT modules wired for the
//! 8080-I series parallel interface (`RST`, `CS`, `RS`, `WR`, `RD`, `D[7:0]`),
//! or with a serial byte transport in place of the parallel bus.
//!
//! This driver only does the part that has to be exactly right for the panel to
//! respond at all: the hardware reset, the table-driven init sequence and the
//! command/data framing on the bus. Drawing (fonts, lines, clearing) is left to
//! whatever sits on top of [`driver::Ili9341::transmit_command`] and
//! [`driver::Ili9341::transmit_data`].
//!
//! ### Usage
//!
//! 1. hand the pins to a [`port::ParallelPort`] and wrap it in an
//!    [`interface::ParallelInterface`]
//! 1. create the driver with [`driver::Ili9341::new`]
//! 1. call [`driver::Ili9341::initialize`] once after power-up
//!
//! ```rust, ignore
//! let port = ParallelPort::new(rst, cs, dc, wr, rd, data_pins);
//! let mut lcd = Ili9341::new(ParallelInterface::new(port), delay);
//! lcd.initialize()?;
//! lcd.transmit_command(Cmd::RAMWR)?;
//! ```
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod cmd;
pub mod delay;
pub mod driver;
pub mod error;
pub mod flag;
pub mod interface;
pub mod pins;
pub mod port;
pub mod table;
pub mod transport;

#[cfg(test)]
mod mock;

/// Display width, pixels horizontally (portrait)
pub const WIDTH: u16 = 240;

/// Display height, pixels vertically (portrait)
pub const HEIGHT: u16 = 320;

/// Useful exports
pub mod prelude {
    pub use crate::cmd::Cmd;
    pub use crate::driver::{Ili9341, InitState, DEFAULT_INIT_TABLE};
    pub use crate::error::Error;
    pub use crate::interface::{ParallelInterface, SerialInterface, Transmit};
    pub use crate::port::{DataBus, ParallelPort};
    pub use crate::table::{InitRecord, InitTable, PackedTable};
    pub use crate::transport::{ByteTransport, CompletionCell, SerialPeripheral, TransportConfig};
}
