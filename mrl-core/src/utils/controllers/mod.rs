//! Module Exports
//!
//! Differential-drive control shared by the simulator and the real robot.
//!
//! - `actions`: scenario-level drive actions
//! - `firmware`: single-byte command handler running on the robot
//! - `pwm`: direction-pin + PWM motor driver

pub mod actions;
pub mod firmware;
pub mod pwm;

use core::fmt::Debug;

pub use actions::DriveAction;
pub use firmware::ByteCommandHandler;
pub use pwm::PwmMotorDrive;

/// Capability of a robot with independently driven left and right motors.
///
/// Hardware drivers take speeds as percent of full scale (-100..=100);
/// simulated robots take wheel velocities.
pub trait MotorDrive {
    type Error: Debug;

    fn set_left_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error>;

    fn set_right_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error>;

    /// Set both motors. Left is applied first.
    fn set_motors(
        &mut self,
        left: f32,
        right: f32,
    ) -> Result<(), Self::Error> {
        self.set_left_motor(left)?;
        self.set_right_motor(right)
    }
}

impl<D: MotorDrive + ?Sized> MotorDrive for &mut D {
    type Error = D::Error;

    fn set_left_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        (**self).set_left_motor(speed)
    }

    fn set_right_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        (**self).set_right_motor(speed)
    }

    fn set_motors(
        &mut self,
        left: f32,
        right: f32,
    ) -> Result<(), Self::Error> {
        (**self).set_motors(left, right)
    }
}
