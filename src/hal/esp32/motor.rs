//! Two DIR/PWM motor channels on the ESP32 LEDC peripheral.
//!
//! Each motor gets a direction GPIO and a PWM GPIO. Both PWM outputs share
//! one LEDC timer at 1kHz with 10-bit resolution, so the drive table's
//! 0/512/1023 duties map one-to-one onto hardware duty steps.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::sys::EspError;

use crate::hal::embedded::HalMotorChannel;

/// One motor channel: GPIO direction output plus LEDC PWM output.
pub type Esp32MotorChannel<'d> = HalMotorChannel<PinDriver<'d, AnyOutputPin, Output>, LedcDriver<'d>>;

/// PWM frequency in Hz
const PWM_FREQ_HZ: u32 = 1_000;

/// PWM resolution (10-bit = 1024 steps)
const PWM_RESOLUTION: Resolution = Resolution::Bits10;

/// GPIOs for one motor.
pub struct ChannelPins<C> {
    /// LEDC channel peripheral
    pub ledc: C,
    /// Direction output
    pub dir: AnyOutputPin,
    /// PWM output
    pub pwm: AnyOutputPin,
}

/// Creates the left and right motor channels.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::gpio::OutputPin;
/// use rs_wifibot::hal::esp32::{new_motor_channels, ChannelPins};
///
/// let p = Peripherals::take()?;
/// let (left, right) = new_motor_channels(
///     p.ledc.timer0,
///     ChannelPins { ledc: p.ledc.channel0, dir: p.pins.gpio6.downgrade_output(), pwm: p.pins.gpio5.downgrade_output() },
///     ChannelPins { ledc: p.ledc.channel1, dir: p.pins.gpio7.downgrade_output(), pwm: p.pins.gpio4.downgrade_output() },
/// )?;
/// ```
///
/// # Errors
///
/// Returns an error if GPIO or LEDC initialization fails.
pub fn new_motor_channels<'d, T, TI, LC, LCI, RC, RCI>(
    timer: T,
    left: ChannelPins<LC>,
    right: ChannelPins<RC>,
) -> Result<(Esp32MotorChannel<'d>, Esp32MotorChannel<'d>), EspError>
where
    TI: esp_idf_hal::ledc::LedcTimer + 'd,
    T: Peripheral<P = TI> + 'd,
    LCI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
    LC: Peripheral<P = LCI> + 'd,
    RCI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
    RC: Peripheral<P = RCI> + 'd,
{
    let timer_config = TimerConfig::default()
        .frequency(PWM_FREQ_HZ.Hz())
        .resolution(PWM_RESOLUTION);
    let timer_driver = LedcTimerDriver::new(timer, &timer_config)?;

    let left_pwm = LedcDriver::new(left.ledc, &timer_driver, left.pwm)?;
    let right_pwm = LedcDriver::new(right.ledc, &timer_driver, right.pwm)?;

    let left_dir = PinDriver::output(left.dir)?;
    let right_dir = PinDriver::output(right.dir)?;

    tracing::info!("motor channels ready: LEDC {}Hz, 10-bit", PWM_FREQ_HZ);

    Ok((
        HalMotorChannel::new(left_dir, left_pwm),
        HalMotorChannel::new(right_dir, right_pwm),
    ))
}
