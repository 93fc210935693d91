//! Scenario drive actions.
//!
//! Serialized as JSON with tag `"action"`.

use serde::{Deserialize, Serialize};

use super::MotorDrive;

/// Speed used by turning actions when none is given.
pub const DEFAULT_TURN_SPEED: f32 = 50.0;

fn default_turn_speed() -> f32 {
    DEFAULT_TURN_SPEED
}

/// Drive actions a scenario can apply to a differential-drive robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DriveAction {
    MoveForward {
        speed: f32,
    },
    MoveBackward {
        speed: f32,
    },
    /// Counter-clockwise in place.
    TurnLeft {
        #[serde(default = "default_turn_speed")]
        speed: f32,
    },
    /// Clockwise in place.
    TurnRight {
        #[serde(default = "default_turn_speed")]
        speed: f32,
    },
    Stop,
    SetMotors {
        left: f32,
        right: f32,
    },
    /// Turn in place towards `angle`; positive turns right, otherwise left.
    TurnByAngle {
        angle: f32,
        #[serde(default = "default_turn_speed")]
        speed: f32,
    },
}

impl DriveAction {
    /// `(left, right)` motor speeds for this action.
    pub fn motor_speeds(&self) -> (f32, f32) {
        match *self {
            DriveAction::MoveForward { speed } => (speed, speed),
            DriveAction::MoveBackward { speed } => (-speed, -speed),
            DriveAction::TurnLeft { speed } => (-speed, speed),
            DriveAction::TurnRight { speed } => (speed, -speed),
            DriveAction::Stop => (0.0, 0.0),
            DriveAction::SetMotors { left, right } => (left, right),
            DriveAction::TurnByAngle { angle, speed } => {
                if angle > 0.0 {
                    (speed, -speed)
                } else {
                    (-speed, speed)
                }
            }
        }
    }

    pub fn apply_to<D: MotorDrive>(
        &self,
        drive: &mut D,
    ) -> Result<(), D::Error> {
        let (left, right) = self.motor_speeds();
        drive.set_motors(left, right)
    }
}
