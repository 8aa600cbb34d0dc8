use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;

use ili9341_bringup::prelude::*;
use ili9341_bringup::pins::Pins;
use ili9341_bringup::{HEIGHT, WIDTH};

type Gpio = PinDriver<'static, AnyOutputPin, Output>;

fn output(pin: impl OutputPin) -> anyhow::Result<Gpio> {
    Ok(PinDriver::output(pin.downgrade_output())?)
}

/// Set the column and page window to the full panel and fill it with one colour
fn clear_gram<IFACE, DELAY>(lcd: &mut Ili9341<IFACE, DELAY>, rgb565: u16) -> anyhow::Result<()>
where
    IFACE: Transmit,
    DELAY: embedded_hal::delay::DelayNs,
{
    let [x_hi, x_lo] = (WIDTH - 1).to_be_bytes();
    let [y_hi, y_lo] = (HEIGHT - 1).to_be_bytes();

    lcd.transmit_command(Cmd::CASET)?;
    for b in [0, 0, x_hi, x_lo] {
        lcd.transmit_data(b)?;
    }
    lcd.transmit_command(Cmd::PASET)?;
    for b in [0, 0, y_hi, y_lo] {
        lcd.transmit_data(b)?;
    }

    let [hi, lo] = rgb565.to_be_bytes();
    lcd.transmit_command(Cmd::RAMWR)?;
    for _ in 0..u32::from(WIDTH) * u32::from(HEIGHT) {
        lcd.transmit_data(hi)?;
        lcd.transmit_data(lo)?;
    }
    Ok(())
}

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    log::info!(
        "ILI9341 on RST {} CS {} RS {} WR {} RD {}, D0-D7 {:?}",
        Pins::RST,
        Pins::CS,
        Pins::RS,
        Pins::WR,
        Pins::RD,
        Pins::DATA
    );

    let data = [
        output(pins.gpio8)?,
        output(pins.gpio9)?,
        output(pins.gpio10)?,
        output(pins.gpio11)?,
        output(pins.gpio12)?,
        output(pins.gpio13)?,
        output(pins.gpio14)?,
        output(pins.gpio21)?,
    ];
    let port = ParallelPort::new(
        output(pins.gpio4)?,  // Pins::RST
        output(pins.gpio5)?,  // Pins::CS
        output(pins.gpio6)?,  // Pins::RS
        output(pins.gpio7)?,  // Pins::WR
        output(pins.gpio15)?, // Pins::RD
        data,
    );

    let mut lcd = Ili9341::new(ParallelInterface::new(port), Delay::default());

    if let Err(e) = lcd.initialize() {
        log::error!("Init failed: {}", e);
        return Err(e.into());
    }
    log::info!("Display is on, state {:?}", lcd.state());

    log::info!("Clearing GRAM");
    clear_gram(&mut lcd, 0x0000)?;
    lcd.delay(500);
    clear_gram(&mut lcd, 0x001F)?;

    log::info!("Panel should be BLUE");
    Ok(())
}
