//! [`MotorChannel`] over the embedded-hal 1.0 traits.
//!
//! Any HAL whose direction pin implements [`OutputPin`] and whose PWM
//! implements [`SetDutyCycle`] can drive a channel through
//! [`HalMotorChannel`]. The 10-bit duty used by the drive table is scaled to
//! the peripheral's own maximum.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::drive::DUTY_MAX;
use crate::traits::{Direction, MotorChannel, StatusIndicator};

/// Error from one half of a [`HalMotorChannel`].
#[derive(Debug, thiserror::Error)]
pub enum HalChannelError<D: core::fmt::Debug, P: core::fmt::Debug> {
    /// Writing the direction pin failed.
    #[error("direction pin write failed: {0:?}")]
    Direction(D),
    /// Writing the PWM duty failed.
    #[error("pwm duty write failed: {0:?}")]
    Pwm(P),
}

/// Motor channel built from an output pin and a PWM output.
pub struct HalMotorChannel<D, P> {
    dir: D,
    pwm: P,
}

impl<D, P> HalMotorChannel<D, P>
where
    D: OutputPin,
    P: SetDutyCycle,
{
    /// Wrap a direction pin and a PWM output.
    pub fn new(dir: D, pwm: P) -> Self {
        Self { dir, pwm }
    }

    /// Give the pins back.
    pub fn release(self) -> (D, P) {
        (self.dir, self.pwm)
    }
}

/// Scale a 10-bit duty to a peripheral whose full scale is `max`.
pub fn scale_duty(duty: u16, max: u16) -> u16 {
    let duty = u32::from(duty.min(DUTY_MAX));
    (duty * u32::from(max) / u32::from(DUTY_MAX)) as u16
}

impl<D, P> MotorChannel for HalMotorChannel<D, P>
where
    D: OutputPin,
    P: SetDutyCycle,
{
    type Error = HalChannelError<D::Error, P::Error>;

    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error> {
        self.dir
            .set_state(dir.is_high().into())
            .map_err(HalChannelError::Direction)
    }

    fn set_duty(&mut self, duty: u16) -> Result<(), Self::Error> {
        let scaled = scale_duty(duty, self.pwm.max_duty_cycle());
        self.pwm
            .set_duty_cycle(scaled)
            .map_err(HalChannelError::Pwm)
    }
}

/// Status LED on a plain output pin.
///
/// Write errors are dropped: the indicator is advisory.
pub struct PinIndicator<O> {
    pin: O,
    active_low: bool,
}

impl<O: OutputPin> PinIndicator<O> {
    /// LED lit when the pin is high.
    pub fn new(pin: O) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// LED lit when the pin is low.
    pub fn active_low(pin: O) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }
}

impl<O: OutputPin> StatusIndicator for PinIndicator<O> {
    fn set(&mut self, on: bool) {
        let _ = self.pin.set_state((on != self.active_low).into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct FakePin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    struct FakePwm {
        max: u16,
        duty: u16,
    }

    impl embedded_hal::pwm::ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn scale_identity_for_10_bit() {
        assert_eq!(scale_duty(0, 1023), 0);
        assert_eq!(scale_duty(512, 1023), 512);
        assert_eq!(scale_duty(1023, 1023), 1023);
    }

    #[test]
    fn scale_to_8_bit() {
        assert_eq!(scale_duty(1023, 255), 255);
        assert_eq!(scale_duty(512, 255), 127);
        assert_eq!(scale_duty(0, 255), 0);
    }

    #[test]
    fn scale_clamps_input() {
        assert_eq!(scale_duty(4000, 1023), 1023);
    }

    #[test]
    fn channel_drives_pins() {
        let mut ch = HalMotorChannel::new(FakePin::default(), FakePwm { max: 1023, duty: 0 });

        ch.set_direction(Direction::Forward).unwrap();
        ch.set_duty(512).unwrap();

        let (pin, pwm) = ch.release();
        assert!(pin.high);
        assert_eq!(pwm.duty, 512);
    }

    #[test]
    fn backward_drives_pin_low() {
        let mut ch = HalMotorChannel::new(FakePin { high: true }, FakePwm { max: 255, duty: 0 });
        ch.set_direction(Direction::Backward).unwrap();
        let (pin, _) = ch.release();
        assert!(!pin.high);
    }

    #[test]
    fn active_low_indicator_inverts() {
        let mut led = PinIndicator::active_low(FakePin::default());
        led.on();
        assert!(!led.pin.high);
        led.off();
        assert!(led.pin.high);
    }
}
