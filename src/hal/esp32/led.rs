//! Onboard status LED.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::sys::EspError;

use crate::hal::embedded::PinIndicator;

/// Status LED on a GPIO, lit when driven low.
pub type Esp32StatusLed<'d> = PinIndicator<PinDriver<'d, AnyOutputPin, Output>>;

/// Configure `pin` as the status LED and switch it off.
pub fn new_status_led<'d>(pin: AnyOutputPin) -> Result<Esp32StatusLed<'d>, EspError> {
    let mut driver = PinDriver::output(pin)?;
    driver.set_high()?;
    Ok(PinIndicator::active_low(driver))
}
