//! Pin/port controller for the 8080-I parallel bus
//!
//! Owns the five control lines and the 8-bit data bus. The electrical
//! direction of each pin is already fixed by its HAL type; what this module
//! tracks is whether the signal has been *configured* yet, so nothing is driven
//! before start-up has claimed it.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{DisplayError, Error};

/// Control lines of the parallel interface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    /// RST, active low
    Reset,
    /// CS, active low
    ChipSelect,
    /// RS / DC, low for command, high for data
    DataCommand,
    /// WR, latched on the rising edge
    WriteStrobe,
    /// RD, idles high
    ReadStrobe,
}

impl Line {
    /// All control lines
    pub const ALL: [Line; 5] = [
        Line::Reset,
        Line::ChipSelect,
        Line::DataCommand,
        Line::WriteStrobe,
        Line::ReadStrobe,
    ];
}

/// Anything whose direction can be configured: a control line or the data bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// A single control line
    Line(Line),
    /// D0..D7 as a group
    DataBus,
}

impl Signal {
    /// Every signal of the interface
    pub const ALL: [Signal; 6] = [
        Signal::Line(Line::Reset),
        Signal::Line(Line::ChipSelect),
        Signal::Line(Line::DataCommand),
        Signal::Line(Line::WriteStrobe),
        Signal::Line(Line::ReadStrobe),
        Signal::DataBus,
    ];

    const fn mask(self) -> u8 {
        match self {
            Signal::Line(Line::Reset) => 1 << 0,
            Signal::Line(Line::ChipSelect) => 1 << 1,
            Signal::Line(Line::DataCommand) => 1 << 2,
            Signal::Line(Line::WriteStrobe) => 1 << 3,
            Signal::Line(Line::ReadStrobe) => 1 << 4,
            Signal::DataBus => 1 << 5,
        }
    }
}

impl From<Line> for Signal {
    fn from(line: Line) -> Self {
        Signal::Line(line)
    }
}

/// Pin direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Released, must not be driven
    Input,
    /// Driven by this port
    Output,
}

/// 8-bit parallel data bus
pub trait DataBus {
    /// Put `byte` on D0..D7
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError>;
}

/// Eight individual output pins, `[D0, D1, .., D7]`
impl<P: OutputPin> DataBus for [P; 8] {
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.iter_mut().enumerate() {
            pin.set_state(PinState::from(byte & (1 << bit) != 0))
                .map_err(|_| DisplayError::BusWriteError)?;
        }
        Ok(())
    }
}

/// The physical signal lines of one display
pub struct ParallelPort<RST, CS, DC, WR, RD, BUS> {
    /// Reset, active low
    rst: RST,
    /// Chip select, active low
    cs: CS,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Write strobe
    wr: WR,
    /// Read strobe, never pulsed
    rd: RD,
    bus: BUS,
    /// One bit per [`Signal`] configured as output
    outputs: u8,
}

impl<RST, CS, DC, WR, RD, BUS> ParallelPort<RST, CS, DC, WR, RD, BUS> {
    /// Take ownership of the pins. Nothing is driven until the signals are configured.
    pub fn new(rst: RST, cs: CS, dc: DC, wr: WR, rd: RD, bus: BUS) -> Self {
        ParallelPort {
            rst,
            cs,
            dc,
            wr,
            rd,
            bus,
            outputs: 0,
        }
    }

    /// Mark `signal` as driven (`Output`) or released (`Input`)
    pub fn configure_direction(&mut self, signal: Signal, direction: Direction) {
        match direction {
            Direction::Output => self.outputs |= signal.mask(),
            Direction::Input => self.outputs &= !signal.mask(),
        }
    }

    /// Configure every signal as output
    pub fn configure_outputs(&mut self) {
        for signal in Signal::ALL {
            self.configure_direction(signal, Direction::Output);
        }
    }

    /// Whether `signal` may be driven
    pub fn is_output(&self, signal: Signal) -> bool {
        self.outputs & signal.mask() != 0
    }

    /// Give the pins back
    pub fn release(self) -> (RST, CS, DC, WR, RD, BUS) {
        (self.rst, self.cs, self.dc, self.wr, self.rd, self.bus)
    }

    fn ensure_output(&self, signal: Signal) -> Result<(), Error> {
        if self.is_output(signal) {
            Ok(())
        } else {
            Err(Error::LineNotConfigured(signal))
        }
    }
}

impl<RST, CS, DC, WR, RD, BUS> ParallelPort<RST, CS, DC, WR, RD, BUS>
where
    RST: OutputPin,
    CS: OutputPin,
    DC: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    BUS: DataBus,
{
    /// Drive `line` high
    pub fn set_line(&mut self, line: Line) -> Result<(), Error> {
        self.drive(line, PinState::High)
    }

    /// Drive `line` low
    pub fn clear_line(&mut self, line: Line) -> Result<(), Error> {
        self.drive(line, PinState::Low)
    }

    /// Put `byte` on the data bus
    pub fn write_bus(&mut self, byte: u8) -> Result<(), Error> {
        self.ensure_output(Signal::DataBus)?;
        self.bus.write_byte(byte)?;
        Ok(())
    }

    fn drive(&mut self, line: Line, state: PinState) -> Result<(), Error> {
        self.ensure_output(line.into())?;
        match line {
            Line::Reset => self.rst.set_state(state).map_err(|_| DisplayError::RSError)?,
            Line::ChipSelect => self.cs.set_state(state).map_err(|_| DisplayError::CSError)?,
            Line::DataCommand => self.dc.set_state(state).map_err(|_| DisplayError::DCError)?,
            Line::WriteStrobe => self.wr.set_state(state).map_err(|_| DisplayError::BusWriteError)?,
            Line::ReadStrobe => self.rd.set_state(state).map_err(|_| DisplayError::BusWriteError)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{mock_port, Event, EventLog, MockBus, MockPin, PinId};

    #[test]
    fn driving_before_configuration_is_refused() {
        let log = EventLog::new();
        let mut port = mock_port(&log);

        assert_eq!(
            port.set_line(Line::ChipSelect),
            Err(Error::LineNotConfigured(Signal::Line(Line::ChipSelect)))
        );
        assert_eq!(
            port.write_bus(0x5A),
            Err(Error::LineNotConfigured(Signal::DataBus))
        );
        assert!(log.events().is_empty());
    }

    #[test]
    fn released_signal_can_no_longer_be_driven() {
        let log = EventLog::new();
        let mut port = mock_port(&log);
        port.configure_outputs();
        port.configure_direction(Signal::Line(Line::ReadStrobe), Direction::Input);

        assert!(port.is_output(Signal::Line(Line::WriteStrobe)));
        assert!(!port.is_output(Signal::Line(Line::ReadStrobe)));
        assert_eq!(
            port.clear_line(Line::ReadStrobe),
            Err(Error::LineNotConfigured(Signal::Line(Line::ReadStrobe)))
        );
    }

    #[test]
    fn set_and_clear_touch_only_the_named_line() {
        let log = EventLog::new();
        let mut port = mock_port(&log);
        port.configure_outputs();

        port.clear_line(Line::ChipSelect).unwrap();
        port.set_line(Line::DataCommand).unwrap();
        port.write_bus(0xC3).unwrap();

        assert_eq!(
            log.events(),
            vec![
                Event::Low(Line::ChipSelect),
                Event::High(Line::DataCommand),
                Event::Bus(0xC3),
            ]
        );
    }

    #[test]
    fn pin_array_bus_is_lsb_first() {
        let log = EventLog::new();
        let mut bus: [MockPin; 8] = core::array::from_fn(|bit| MockPin::new(PinId::Data(bit as u8), &log));

        bus.write_byte(0b1000_0101).unwrap();

        let levels: Vec<_> = log
            .events()
            .into_iter()
            .map(|e| match e {
                Event::DataPin(bit, high) => (bit, high),
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(
            levels,
            vec![
                (0, true),
                (1, false),
                (2, true),
                (3, false),
                (4, false),
                (5, false),
                (6, false),
                (7, true),
            ]
        );
    }

    #[test]
    fn pin_failures_map_to_the_matching_display_error() {
        let log = EventLog::new();
        let mut port = ParallelPort::new(
            MockPin::failing(PinId::Line(Line::Reset), &log),
            MockPin::failing(PinId::Line(Line::ChipSelect), &log),
            MockPin::failing(PinId::Line(Line::DataCommand), &log),
            MockPin::failing(PinId::Line(Line::WriteStrobe), &log),
            MockPin::new(PinId::Line(Line::ReadStrobe), &log),
            MockBus::new(&log),
        );
        port.configure_outputs();

        assert_eq!(port.set_line(Line::Reset), Err(Error::Interface(DisplayError::RSError)));
        assert_eq!(port.clear_line(Line::ChipSelect), Err(Error::Interface(DisplayError::CSError)));
        assert_eq!(port.clear_line(Line::DataCommand), Err(Error::Interface(DisplayError::DCError)));
        assert_eq!(
            port.clear_line(Line::WriteStrobe),
            Err(Error::Interface(DisplayError::BusWriteError))
        );
        assert_eq!(port.set_line(Line::ReadStrobe), Ok(()));
    }
}
