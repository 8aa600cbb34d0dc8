//! Recording doubles for pins, the data bus, delays and the serial peripheral.
//!
//! Every double appends to one shared [`EventLog`] so tests can assert the exact
//! interleaving of edges, bus writes and settle times.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use crate::error::DisplayError;
use crate::interface::{ParallelInterface, SerialInterface};
use crate::port::{DataBus, Line, ParallelPort};
use crate::transport::{ByteTransport, CompletionCell, SerialPeripheral, TransportConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    High(Line),
    Low(Line),
    DataPin(u8, bool),
    Bus(u8),
    Delay(u64),
    Start(u8),
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Last level written to `line`, if it was ever driven
    pub fn level(&self, line: Line) -> Option<bool> {
        self.0.borrow().iter().rev().find_map(|e| match *e {
            Event::High(l) if l == line => Some(true),
            Event::Low(l) if l == line => Some(false),
            _ => None,
        })
    }

    /// Bytes latched by the controller: the bus value at every falling WR edge,
    /// paired with the DC level at that moment (true = data)
    pub fn latched(&self) -> Vec<(bool, u8)> {
        let mut dc = true;
        let mut bus = 0u8;
        let mut out = Vec::new();
        for e in self.0.borrow().iter() {
            match *e {
                Event::High(Line::DataCommand) => dc = true,
                Event::Low(Line::DataCommand) => dc = false,
                Event::Bus(b) => bus = b,
                Event::Low(Line::WriteStrobe) => out.push((dc, bus)),
                _ => {}
            }
        }
        out
    }

    /// Bytes handed to the serial peripheral, paired with the DC level when the
    /// transfer started (true = data)
    pub fn started(&self) -> Vec<(bool, u8)> {
        let mut dc = true;
        let mut out = Vec::new();
        for e in self.0.borrow().iter() {
            match *e {
                Event::High(Line::DataCommand) => dc = true,
                Event::Low(Line::DataCommand) => dc = false,
                Event::Start(b) => out.push((dc, b)),
                _ => {}
            }
        }
        out
    }

    /// Sum of all recorded delays in nanoseconds
    pub fn total_delay_ns(&self) -> u64 {
        self.0
            .borrow()
            .iter()
            .map(|e| match *e {
                Event::Delay(ns) => ns,
                _ => 0,
            })
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinId {
    Line(Line),
    Data(u8),
}

pub struct MockPin {
    id: PinId,
    log: EventLog,
    fail_low: bool,
    fail_high: bool,
}

impl MockPin {
    pub fn new(id: PinId, log: &EventLog) -> Self {
        Self {
            id,
            log: log.clone(),
            fail_low: false,
            fail_high: false,
        }
    }

    pub fn failing(id: PinId, log: &EventLog) -> Self {
        Self {
            fail_low: true,
            fail_high: true,
            ..Self::new(id, log)
        }
    }

    /// Refuses only the falling edge
    pub fn failing_low(id: PinId, log: &EventLog) -> Self {
        Self {
            fail_low: true,
            ..Self::new(id, log)
        }
    }

    fn record(&mut self, high: bool) -> Result<(), ErrorKind> {
        if (high && self.fail_high) || (!high && self.fail_low) {
            return Err(ErrorKind::Other);
        }
        self.log.push(match self.id {
            PinId::Line(line) if high => Event::High(line),
            PinId::Line(line) => Event::Low(line),
            PinId::Data(bit) => Event::DataPin(bit, high),
        });
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true)
    }
}

pub struct MockBus {
    log: EventLog,
}

impl MockBus {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DataBus for MockBus {
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.log.push(Event::Bus(byte));
        Ok(())
    }
}

pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::Delay(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay(u64::from(ms) * 1_000_000));
    }
}

/// Serial peripheral whose "interrupt" fires synchronously inside
/// `start_transfer`, answering with `respond(byte)`. `None` never completes.
pub struct MockPeripheral<'c> {
    completion: &'c CompletionCell,
    log: EventLog,
    respond: fn(u8) -> Option<u8>,
}

impl<'c> MockPeripheral<'c> {
    pub fn new(completion: &'c CompletionCell, log: &EventLog, respond: fn(u8) -> Option<u8>) -> Self {
        Self {
            completion,
            log: log.clone(),
            respond,
        }
    }
}

impl SerialPeripheral for MockPeripheral<'_> {
    fn start_transfer(&mut self, byte: u8) {
        self.log.push(Event::Start(byte));
        if let Some(rx) = (self.respond)(byte) {
            self.completion.complete(rx);
        }
    }
}

pub type MockPort = ParallelPort<MockPin, MockPin, MockPin, MockPin, MockPin, MockBus>;

pub fn mock_port(log: &EventLog) -> MockPort {
    ParallelPort::new(
        MockPin::new(PinId::Line(Line::Reset), log),
        MockPin::new(PinId::Line(Line::ChipSelect), log),
        MockPin::new(PinId::Line(Line::DataCommand), log),
        MockPin::new(PinId::Line(Line::WriteStrobe), log),
        MockPin::new(PinId::Line(Line::ReadStrobe), log),
        MockBus::new(log),
    )
}

/// Parallel interface with every signal already configured as output
pub fn mock_interface(log: &EventLog) -> ParallelInterface<MockPin, MockPin, MockPin, MockPin, MockPin, MockBus> {
    let mut port = mock_port(log);
    port.configure_outputs();
    ParallelInterface::new(port)
}

pub type MockSerial<'c> = SerialInterface<'c, MockPeripheral<'c>, MockPin, MockDelay, MockPin, MockPin>;

/// Serial interface over a [`MockPeripheral`] with the default transport timing.
/// The select line is logged as `ChipSelect`.
pub fn mock_serial<'c>(cell: &'c CompletionCell, log: &EventLog, respond: fn(u8) -> Option<u8>) -> MockSerial<'c> {
    let transport = ByteTransport::new(
        MockPeripheral::new(cell, log, respond),
        MockPin::new(PinId::Line(Line::ChipSelect), log),
        cell,
        MockDelay::new(log),
        TransportConfig::default(),
    );
    SerialInterface::new(
        transport,
        MockPin::new(PinId::Line(Line::DataCommand), log),
        MockPin::new(PinId::Line(Line::Reset), log),
    )
}
