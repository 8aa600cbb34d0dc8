//! ILI9341 register parameter values

/// Register values used by the ILI9341 bring-up sequence.
///
/// Grouped by the command they are sent with.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Power Control 1 (0xC0): GVDD level
    pub const PWCTR1_GVDD_4V75: u8 = 0x26;

    // Power Control 2 (0xC1): step-up factor, VGH - VGL <= 32V
    pub const PWCTR2_STEP_UP: u8 = 0x11;

    // VCOM Control 1 (0xC5)
    pub const VMCTR1_VCOMH_4V325: u8 = 0x31;
    pub const VMCTR1_VCOML_N0V600: u8 = 0x3C;

    // VCOM Control 2 (0xC7): nVM set, VMF offset
    pub const VMCTR2_NVM_OFFSET: u8 = 0xC0;

    // Pixel Format Set (0x3A)
    pub const PIXFMT_16BPP: u8 = 0x55;
    pub const PIXFMT_18BPP: u8 = 0x66;

    // Frame Rate Control (0xB1)
    pub const FRMCTR1_DIVA_FOSC: u8 = 0x00;
    pub const FRMCTR1_70HZ: u8 = 0x1B;

    // Gamma Set (0x26)
    pub const GAMSET_CURVE_1: u8 = 0x01;

    // Entry Mode Set (0xB7): 0 0 0 0 DSTB GON DTE GAS
    // DSTB=0 deep standby off, GON:DTE=11 normal display, GAS=1 low voltage detect off
    pub const ETMOD_NORMAL: u8 = 0x07;

    // Display Function Control (0xB6)
    pub const DFUNCTR_PTG_PT: u8 = 0x0A; // 0 0 0 0 PTG[1:0] PT[1:0]
    pub const DFUNCTR_REV_ISC: u8 = 0x82; // REV GS SS SM ISC[3:0]
    pub const DFUNCTR_320_LINES: u8 = 0x27; // 0 0 NL[5:0]
    pub const DFUNCTR_PCDIV: u8 = 0x00; // 0 0 PCDIV[5:0]

    // Memory Access Control (0x36): MY MX MV ML BGR MH - -
    pub const MADCTL_MY: u8 = 0x80; // row address order
    pub const MADCTL_MX: u8 = 0x40; // column address order
    pub const MADCTL_MV: u8 = 0x20; // row / column exchange
    pub const MADCTL_ML: u8 = 0x10; // refresh bottom to top
    pub const MADCTL_BGR: u8 = 0x08;
    pub const MADCTL_MH: u8 = 0x04; // refresh right to left
    pub const MADCTL_NORMAL: u8 = 0x00; // left-up to right-down, RGB
}
