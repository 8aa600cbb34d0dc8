//! Errors surfaced by the bring-up driver
//!
//! Wiring and timing faults can't be seen from software: the panel just stays
//! blank. What can be detected is reported here instead of hanging or reading
//! past the end of a table.

use core::fmt;

pub use display_interface::DisplayError;

use crate::port::Signal;
use crate::table::TableError;

/// Everything that can go wrong while talking to the controller.
#[derive(Clone, Debug)]
pub enum Error {
    /// A pin or bus write was refused by the HAL
    Interface(DisplayError),
    /// The serial completion signal for byte `index` of a block never arrived
    TransportTimeout {
        /// Position of the byte inside the block
        index: usize,
    },
    /// The packed init table is inconsistent with its own record count
    Table(TableError),
    /// A signal was driven before its direction was configured
    LineNotConfigured(Signal),
    /// Transmit and receive buffers of a block transfer differ in length
    LengthMismatch {
        /// Transmit buffer length
        tx: usize,
        /// Receive buffer length
        rx: usize,
    },
}

impl Error {
    /// Collapse into the `display-interface` error for callers that only speak that.
    pub fn into_display_error(self) -> DisplayError {
        match self {
            Error::Interface(e) => e,
            Error::Table(_) => DisplayError::InvalidFormatError,
            Error::LengthMismatch { .. } => DisplayError::OutOfBoundsError,
            Error::TransportTimeout { .. } | Error::LineNotConfigured(_) => {
                DisplayError::BusWriteError
            }
        }
    }
}

// `DisplayError` has no `PartialEq`, interface errors compare by variant
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Interface(a), Error::Interface(b)) => {
                core::mem::discriminant(a) == core::mem::discriminant(b)
            }
            (Error::TransportTimeout { index: a }, Error::TransportTimeout { index: b }) => a == b,
            (Error::Table(a), Error::Table(b)) => a == b,
            (Error::LineNotConfigured(a), Error::LineNotConfigured(b)) => a == b,
            (Error::LengthMismatch { tx: a, rx: b }, Error::LengthMismatch { tx: c, rx: d }) => {
                a == c && b == d
            }
            _ => false,
        }
    }
}

impl Eq for Error {}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Interface(e)
    }
}

impl From<TableError> for Error {
    fn from(e: TableError) -> Self {
        Error::Table(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "display interface error: {:?}", e),
            Error::TransportTimeout { index } => {
                write!(f, "serial transfer timed out at byte {}", index)
            }
            Error::Table(e) => write!(f, "invalid init table: {}", e),
            Error::LineNotConfigured(signal) => {
                write!(f, "{:?} driven before being configured as output", signal)
            }
            Error::LengthMismatch { tx, rx } => {
                write!(f, "transfer buffers differ: tx {} bytes, rx {} bytes", tx, rx)
            }
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_errors_convert_both_ways() {
        let e: Error = DisplayError::DCError.into();
        assert_eq!(e, Error::Interface(DisplayError::DCError));
        assert!(matches!(e.into_display_error(), DisplayError::DCError));
    }

    #[test]
    fn interface_errors_compare_by_variant() {
        assert_eq!(
            Error::Interface(DisplayError::CSError),
            Error::Interface(DisplayError::CSError)
        );
        assert_ne!(
            Error::Interface(DisplayError::CSError),
            Error::Interface(DisplayError::DCError)
        );
        assert_ne!(
            Error::Interface(DisplayError::BusWriteError),
            Error::TransportTimeout { index: 0 }
        );
    }

    #[test]
    fn timeout_message_names_the_byte() {
        let e = Error::TransportTimeout { index: 3 };
        assert_eq!(e.to_string(), "serial transfer timed out at byte 3");
    }
}
