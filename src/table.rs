//! Init tables
//!
//! A table is an ordered list of records, each one opcode, its parameter bytes
//! and a settle time in milliseconds. The controller's state after record `i`
//! depends on every record before it, so the order is part of the table.
//!
//! Tables are written as typed [`InitRecord`]s. The packed byte layout
//!
//! ```text
//! [count] { [argc] [delay_ms] [opcode] [args; argc] } * count
//! ```
//!
//! is still supported through [`PackedTable`], which checks the declared count
//! against the bytes actually present before anything is sent.

use core::fmt;

/// One controller command of an init sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitRecord<'a> {
    /// Command opcode
    pub opcode: u8,
    /// Parameter bytes, sent in order after the opcode
    pub args: &'a [u8],
    /// Settle time after the last parameter, 0 for none
    pub delay_ms: u8,
}

impl<'a> InitRecord<'a> {
    /// A command with parameters and no settle time
    pub const fn new(opcode: u8, args: &'a [u8]) -> Self {
        InitRecord {
            opcode,
            args,
            delay_ms: 0,
        }
    }

    /// A bare command followed by a settle time
    pub const fn with_delay(opcode: u8, delay_ms: u8) -> Self {
        InitRecord {
            opcode,
            args: &[],
            delay_ms,
        }
    }

    /// Number of parameter bytes
    pub const fn arg_count(&self) -> usize {
        self.args.len()
    }
}

/// Why a table can't be used
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableError {
    /// Not even the record count is present
    MissingCount,
    /// Record `record` runs past the end of the bytes
    Truncated {
        /// Index of the incomplete record
        record: usize,
    },
    /// Bytes left over after the declared number of records
    TrailingBytes {
        /// How many bytes were not consumed
        extra: usize,
    },
    /// More than 255 records, the count byte can't describe them
    TooManyRecords,
    /// Record `record` has more than 255 parameters
    TooManyArgs {
        /// Index of the offending record
        record: usize,
    },
    /// Encoding buffer too small
    BufferTooSmall {
        /// Bytes the encoded table needs
        needed: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MissingCount => write!(f, "no record count"),
            TableError::Truncated { record } => write!(f, "record {} is truncated", record),
            TableError::TrailingBytes { extra } => {
                write!(f, "{} bytes after the last declared record", extra)
            }
            TableError::TooManyRecords => write!(f, "more than 255 records"),
            TableError::TooManyArgs { record } => {
                write!(f, "record {} has more than 255 parameters", record)
            }
            TableError::BufferTooSmall { needed } => {
                write!(f, "encoding needs {} bytes", needed)
            }
        }
    }
}

impl core::error::Error for TableError {}

/// Typed init table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitTable<'a> {
    records: &'a [InitRecord<'a>],
}

impl<'a> InitTable<'a> {
    /// Wrap a list of records
    pub const fn new(records: &'a [InitRecord<'a>]) -> Self {
        InitTable { records }
    }

    /// Number of records
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in table order
    pub fn records(&self) -> impl Iterator<Item = InitRecord<'a>> + 'a {
        self.records.iter().copied()
    }

    /// Sum of all settle times
    pub fn total_delay_ms(&self) -> u32 {
        self.records.iter().map(|r| u32::from(r.delay_ms)).sum()
    }

    /// Size of the packed form
    pub fn encoded_len(&self) -> usize {
        1 + self.records.iter().map(|r| 3 + r.arg_count()).sum::<usize>()
    }

    /// Write the packed form into `buf`, returning the number of bytes used
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize, TableError> {
        let count = u8::try_from(self.records.len()).map_err(|_| TableError::TooManyRecords)?;
        // nothing is written unless the whole table fits the layout
        if let Some(index) = self.records.iter().position(|r| r.arg_count() > usize::from(u8::MAX)) {
            return Err(TableError::TooManyArgs { record: index });
        }
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(TableError::BufferTooSmall { needed });
        }

        buf[0] = count;
        let mut at = 1;
        for record in self.records {
            // checked above
            buf[at] = record.arg_count() as u8;
            buf[at + 1] = record.delay_ms;
            buf[at + 2] = record.opcode;
            at += 3;
            buf[at..at + record.args.len()].copy_from_slice(record.args);
            at += record.args.len();
        }
        Ok(at)
    }
}

/// Init table in the packed byte layout, validated on construction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedTable<'a> {
    count: u8,
    body: &'a [u8],
}

impl<'a> PackedTable<'a> {
    /// Check `bytes` and accept it only if the declared count matches the
    /// records actually present, with nothing left over.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, TableError> {
        let (&count, body) = bytes.split_first().ok_or(TableError::MissingCount)?;

        let mut at = 0;
        for record in 0..usize::from(count) {
            let header = body.get(at..at + 3).ok_or(TableError::Truncated { record })?;
            let end = at + 3 + usize::from(header[0]);
            if end > body.len() {
                return Err(TableError::Truncated { record });
            }
            at = end;
        }
        if at != body.len() {
            return Err(TableError::TrailingBytes {
                extra: body.len() - at,
            });
        }

        Ok(PackedTable { count, body })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Records in table order
    pub fn records(&self) -> PackedRecords<'a> {
        PackedRecords {
            remaining: self.count,
            body: self.body,
        }
    }
}

/// Iterator over the records of a [`PackedTable`]
#[derive(Clone, Debug)]
pub struct PackedRecords<'a> {
    remaining: u8,
    body: &'a [u8],
}

impl<'a> Iterator for PackedRecords<'a> {
    type Item = InitRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // lengths were checked by `PackedTable::parse`
        let (header, rest) = self.body.split_at_checked(3)?;
        let (args, rest) = rest.split_at_checked(usize::from(header[0]))?;
        self.body = rest;
        self.remaining -= 1;
        Some(InitRecord {
            opcode: header[2],
            args,
            delay_ms: header[1],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.remaining);
        (n, Some(n))
    }
}
