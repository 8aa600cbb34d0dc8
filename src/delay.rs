//! Busy-wait settle delays
//!
//! Thin wrappers over [`DelayNs`] for the pauses the datasheet mandates after
//! power-up and after individual commands. A zero delay returns immediately
//! without touching the timer.

use embedded_hal::delay::DelayNs;

/// Wait `ms` whole milliseconds.
pub fn settle_ms(delay: &mut impl DelayNs, ms: u32) {
    if ms == 0 {
        return;
    }
    delay.delay_ms(ms);
}

/// Wait `us` microseconds.
pub fn settle_us(delay: &mut impl DelayNs, us: u32) {
    if us == 0 {
        return;
    }
    delay.delay_us(us);
}
