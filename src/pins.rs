//! Pin definitions for the ILI9341 8080-I parallel module
//!
//! GPIO assignments on the ESP32-S3 reference board used by the bring-up binary.

/// Pin configuration constants for the ILI9341 display
pub struct Pins;

impl Pins {
    // Control lines
    /// Reset pin for display (active low)
    pub const RST: u8 = 4;
    /// Chip Select pin (active low)
    pub const CS: u8 = 5;
    /// Register Select / Data-Command pin (High for data, Low for command)
    pub const RS: u8 = 6;
    /// Write strobe, data latched on the rising edge
    pub const WR: u8 = 7;
    /// Read strobe, held high since the driver never reads back
    pub const RD: u8 = 15;

    /// Data bus D0..D7, least significant bit first
    pub const DATA: [u8; 8] = [8, 9, 10, 11, 12, 13, 14, 21];

    /// Every GPIO used by the display, control lines first
    pub const fn all() -> [u8; 13] {
        let mut all = [Self::RST, Self::CS, Self::RS, Self::WR, Self::RD, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut i = 0;
        while i < 8 {
            all[5 + i] = Self::DATA[i];
            i += 1;
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::Pins;

    #[test]
    fn no_gpio_is_assigned_twice() {
        let all = Pins::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b, "GPIO{} assigned twice", a);
            }
        }
    }
}
