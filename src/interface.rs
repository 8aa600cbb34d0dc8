//! Command/data framing on the wire
//!
//! ```text
//! Write cycle, 8080-I
//!            __                    __
//! CS           \__________________/
//!            __      (cmd)       ______
//! RS           \________________/        (held high for data)
//!                _____________
//! D0 - D7   ____/             \________
//!            _______    ___________
//! WR                \__/                  latched on the rising edge
//! ```
//!
//! Both framings return with CS high and RS in data mode, so calls can be issued
//! back to back with no setup in between.

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::delay::{settle_ms, settle_us};
use crate::error::Error;
use crate::port::{DataBus, Line, ParallelPort};
use crate::transport::{ByteTransport, SerialPeripheral};

/// Time each reset level is held before it changes, > 10us
pub const RESET_SETTLE_US: u32 = 100;

/// Time after releasing reset before the first command, > 5ms
pub const RESET_RECOVERY_MS: u32 = 5;

/// The two framed operations every bus flavour provides, plus the electrical reset.
pub trait Transmit {
    /// Send one opcode byte
    fn transmit_command(&mut self, command: u8) -> Result<(), Error>;

    /// Send one parameter or pixel byte
    fn transmit_data(&mut self, data: u8) -> Result<(), Error>;

    /// Claim the pins, drive them idle and pulse the reset line
    fn hard_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error>;
}

/// 8080-I parallel interface
pub struct ParallelInterface<RST, CS, DC, WR, RD, BUS> {
    port: ParallelPort<RST, CS, DC, WR, RD, BUS>,
}

impl<RST, CS, DC, WR, RD, BUS> ParallelInterface<RST, CS, DC, WR, RD, BUS> {
    /// Wrap a port
    pub fn new(port: ParallelPort<RST, CS, DC, WR, RD, BUS>) -> Self {
        ParallelInterface { port }
    }

    /// Direct access to the port, e.g. for inspecting line configuration
    pub fn port(&mut self) -> &mut ParallelPort<RST, CS, DC, WR, RD, BUS> {
        &mut self.port
    }

    /// Give the port back
    pub fn release(self) -> ParallelPort<RST, CS, DC, WR, RD, BUS> {
        self.port
    }
}

impl<RST, CS, DC, WR, RD, BUS> ParallelInterface<RST, CS, DC, WR, RD, BUS>
where
    RST: OutputPin,
    CS: OutputPin,
    DC: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    BUS: DataBus,
{
    /// Send every byte of `data` as a data write
    pub fn transmit_data_slice(&mut self, data: &[u8]) -> Result<(), Error> {
        self.write_bytes(data.iter().copied(), false)
    }

    /// Bus value, then the WR pulse. CS and DC must already be set.
    fn strobe(&mut self, byte: u8) -> Result<(), Error> {
        // the bus has to be stable before the falling WR edge
        self.port.write_bus(byte)?;
        self.port.clear_line(Line::WriteStrobe)?;
        self.port.set_line(Line::WriteStrobe)
    }

    /// Return every control line to idle after a write cycle, also when the
    /// cycle failed half way. The first error wins.
    fn end_cycle(&mut self, sent: Result<(), Error>, command: bool) -> Result<(), Error> {
        let failed = sent.is_err();
        let wr = if failed {
            self.port.set_line(Line::WriteStrobe)
        } else {
            Ok(())
        };
        // a data cycle already left DC high
        let dc = if command || failed {
            self.port.set_line(Line::DataCommand)
        } else {
            Ok(())
        };
        let cs = self.port.set_line(Line::ChipSelect);
        sent.and(wr).and(dc).and(cs)
    }

    fn write_bytes(&mut self, bytes: impl Iterator<Item = u8>, command: bool) -> Result<(), Error> {
        for byte in bytes {
            if command {
                self.transmit_command(byte)?;
            } else {
                self.transmit_data(byte)?;
            }
        }
        Ok(())
    }

    fn write_format(&mut self, buf: DataFormat<'_>, command: bool) -> Result<(), DisplayError> {
        let result = match buf {
            DataFormat::U8(bytes) => self.write_bytes(bytes.iter().copied(), command),
            DataFormat::U8Iter(iter) => self.write_bytes(iter, command),
            DataFormat::U16BE(words) => {
                self.write_bytes(words.iter().flat_map(|w| w.to_be_bytes()), command)
            }
            DataFormat::U16LE(words) => {
                self.write_bytes(words.iter().flat_map(|w| w.to_le_bytes()), command)
            }
            DataFormat::U16BEIter(iter) => self.write_bytes(iter.flat_map(u16::to_be_bytes), command),
            _ => return Err(DisplayError::DataFormatNotImplemented),
        };
        result.map_err(Error::into_display_error)
    }
}

impl<RST, CS, DC, WR, RD, BUS> Transmit for ParallelInterface<RST, CS, DC, WR, RD, BUS>
where
    RST: OutputPin,
    CS: OutputPin,
    DC: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    BUS: DataBus,
{
    fn transmit_command(&mut self, command: u8) -> Result<(), Error> {
        log::trace!("cmd 0x{:02X}", command);
        self.port.clear_line(Line::ChipSelect)?;
        // low for commands
        let sent = self
            .port
            .clear_line(Line::DataCommand)
            .and_then(|()| self.strobe(command));
        self.end_cycle(sent, true)
    }

    fn transmit_data(&mut self, data: u8) -> Result<(), Error> {
        log::trace!("data 0x{:02X}", data);
        self.port.clear_line(Line::ChipSelect)?;
        // high for data
        let sent = self
            .port
            .set_line(Line::DataCommand)
            .and_then(|()| self.strobe(data));
        self.end_cycle(sent, false)
    }

    fn hard_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        log::debug!("hard reset over parallel port");
        self.port.configure_outputs();

        // every control line idles high
        for line in [
            Line::ChipSelect,
            Line::DataCommand,
            Line::WriteStrobe,
            Line::ReadStrobe,
        ] {
            self.port.set_line(line)?;
        }
        self.port.write_bus(0x00)?;

        self.port.set_line(Line::Reset)?;
        settle_us(delay, RESET_SETTLE_US);
        self.port.clear_line(Line::Reset)?;
        settle_us(delay, RESET_SETTLE_US);
        self.port.set_line(Line::Reset)?;
        settle_ms(delay, RESET_RECOVERY_MS);
        Ok(())
    }
}

/// Lets drawing code push whole buffers through the same framing.
impl<RST, CS, DC, WR, RD, BUS> WriteOnlyDataCommand for ParallelInterface<RST, CS, DC, WR, RD, BUS>
where
    RST: OutputPin,
    CS: OutputPin,
    DC: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    BUS: DataBus,
{
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        self.write_format(cmd, true)
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        self.write_format(buf, false)
    }
}

/// Serial interface: the same framing carried over a [`ByteTransport`].
///
/// The transport's own select line frames each byte; DC and RST are separate pins.
pub struct SerialInterface<'c, P, SS, D, DC, RST> {
    transport: ByteTransport<'c, P, SS, D>,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
}

impl<'c, P, SS, D, DC, RST> SerialInterface<'c, P, SS, D, DC, RST> {
    /// Combine a transport with the DC and reset pins
    pub fn new(transport: ByteTransport<'c, P, SS, D>, dc: DC, rst: RST) -> Self {
        SerialInterface { transport, dc, rst }
    }

    /// Give the parts back
    pub fn release(self) -> (ByteTransport<'c, P, SS, D>, DC, RST) {
        (self.transport, self.dc, self.rst)
    }
}

impl<P, SS, D, DC, RST> SerialInterface<'_, P, SS, D, DC, RST>
where
    P: SerialPeripheral,
    SS: OutputPin,
    D: DelayNs,
    DC: OutputPin,
    RST: OutputPin,
{
    fn send(&mut self, byte: u8) -> Result<(), Error> {
        let mut rx = [0u8; 1];
        self.transport.transfer_block(&[byte], &mut rx)
    }
}

impl<P, SS, D, DC, RST> Transmit for SerialInterface<'_, P, SS, D, DC, RST>
where
    P: SerialPeripheral,
    SS: OutputPin,
    D: DelayNs,
    DC: OutputPin,
    RST: OutputPin,
{
    fn transmit_command(&mut self, command: u8) -> Result<(), Error> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        let sent = self.send(command);
        // back to data mode even if the transfer failed
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        sent
    }

    fn transmit_data(&mut self, data: u8) -> Result<(), Error> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.send(data)
    }

    fn hard_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error> {
        log::debug!("hard reset over serial transport");
        self.transport.release_select()?;
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        settle_us(delay, RESET_SETTLE_US);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        settle_us(delay, RESET_SETTLE_US);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        settle_ms(delay, RESET_RECOVERY_MS);
        Ok(())
    }
}
