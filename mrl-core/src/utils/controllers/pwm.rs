//! Direction-pin + PWM motor driver for the Pololu chassis.

use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};

use super::MotorDrive;

/// Errors from either side of the motor driver.
#[derive(Debug)]
pub enum DriveError<P, W> {
    Pin(P),
    Pwm(W),
}

/// Duty cycle for `pct` percent of full scale, sign ignored.
///
/// `pct` is clamped to -100..=100; NaN maps to zero duty.
pub fn duty_for(
    max_duty: u16,
    pct: f32,
) -> u16 {
    if pct.is_nan() {
        return 0;
    }
    let magnitude = libm::fabsf(pct.clamp(-100.0, 100.0));
    (max_duty as f32 * magnitude / 100.0) as u16
}

/// Two-channel motor driver: one direction pin and one PWM output per side.
///
/// The direction pin is driven high for forward (speed >= 0).
pub struct PwmMotorDrive<Dir, Pwm> {
    left_dir: Dir,
    right_dir: Dir,
    left_pwm: Pwm,
    right_pwm: Pwm,
}

impl<Dir, Pwm> PwmMotorDrive<Dir, Pwm>
where
    Dir: OutputPin,
    Pwm: SetDutyCycle,
{
    pub fn new(
        left_dir: Dir,
        right_dir: Dir,
        left_pwm: Pwm,
        right_pwm: Pwm,
    ) -> Self {
        Self {
            left_dir,
            right_dir,
            left_pwm,
            right_pwm,
        }
    }

    fn drive_side(
        dir: &mut Dir,
        pwm: &mut Pwm,
        pct: f32,
    ) -> Result<(), DriveError<Dir::Error, Pwm::Error>> {
        let direction = if pct >= 0.0 {
            dir.set_high()
        } else {
            dir.set_low()
        };
        direction.map_err(DriveError::Pin)?;
        let duty = duty_for(pwm.max_duty_cycle(), pct);
        pwm.set_duty_cycle(duty).map_err(DriveError::Pwm)
    }

    /// Release the pins and PWM channels.
    pub fn release(self) -> (Dir, Dir, Pwm, Pwm) {
        (self.left_dir, self.right_dir, self.left_pwm, self.right_pwm)
    }
}

impl<Dir, Pwm> MotorDrive for PwmMotorDrive<Dir, Pwm>
where
    Dir: OutputPin,
    Pwm: SetDutyCycle,
{
    type Error = DriveError<Dir::Error, Pwm::Error>;

    fn set_left_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        Self::drive_side(&mut self.left_dir, &mut self.left_pwm, speed)
    }

    fn set_right_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        Self::drive_side(&mut self.right_dir, &mut self.right_pwm, speed)
    }
}
