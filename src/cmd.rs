//! ILI9341 command opcodes

/// Command opcodes of the ILI9341 level 1 and level 2 command sets.
pub struct Cmd;
#[allow(missing_docs)]
impl Cmd {
    // Level 1
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01; // t > 5ms before the next command
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11; // t > 120ms before the next command
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const GAMSET: u8 = 0x26;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const PIXFMT: u8 = 0x3A;

    // Level 2
    pub const FRMCTR1: u8 = 0xB1;
    pub const DFUNCTR: u8 = 0xB6;
    pub const ETMOD: u8 = 0xB7;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const VMCTR1: u8 = 0xC5;
    pub const VMCTR2: u8 = 0xC7;
}
