//! Simulator JSON protocol.
//!
//! The supervisor runs the scenario and emits one JSON packet per motor
//! update; the robot controller decodes packets and drives its wheels.
//! Missing speed fields default to zero; packets with an unknown or missing
//! `"type"` are ignored, matching the controllers already deployed in the
//! simulator.

use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Emitter;
use crate::utils::controllers::MotorDrive;

/// Label attached to a `waypoint_reached` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaypointLabel {
    Number(f64),
    Name(String),
}

impl fmt::Display for WaypointLabel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            WaypointLabel::Number(n) => write!(f, "Waypoint {n} reached!"),
            WaypointLabel::Name(name) => f.write_str(name),
        }
    }
}

/// Messages on the supervisor → robot channel.
///
/// Serialized as JSON with tag `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimMessage {
    MotorCommand {
        #[serde(default)]
        left_speed: f32,
        #[serde(default)]
        right_speed: f32,
    },
    WaypointReached {
        #[serde(default)]
        waypoint_num: Option<WaypointLabel>,
    },
    #[serde(other)]
    Unknown,
}

impl SimMessage {
    pub fn motor_command(
        left_speed: f32,
        right_speed: f32,
    ) -> Self {
        SimMessage::MotorCommand {
            left_speed,
            right_speed,
        }
    }
}

/// Errors raised while sending on the supervisor side.
#[derive(Debug)]
pub enum LinkError<E> {
    Encode(serde_json::Error),
    Emit(E),
}

/// Errors raised while handling a packet on the robot side.
#[derive(Debug)]
pub enum SimError<E> {
    InvalidJson(serde_json::Error),
    Drive(E),
}

/// Supervisor-side [`MotorDrive`] that forwards speeds as JSON packets.
///
/// Single-side updates resend the other side's last value.
pub struct SupervisorLink<E> {
    emitter: E,
    left: f32,
    right: f32,
}

impl<E: Emitter> SupervisorLink<E> {
    pub fn new(emitter: E) -> Self {
        Self {
            emitter,
            left: 0.0,
            right: 0.0,
        }
    }

    /// Emit one `motor_command` packet.
    pub fn send_motor_command(
        &mut self,
        left_speed: f32,
        right_speed: f32,
    ) -> Result<(), LinkError<E::Error>> {
        let payload = serde_json::to_vec(&SimMessage::motor_command(left_speed, right_speed))
            .map_err(LinkError::Encode)?;
        self.emitter.send(&payload).map_err(LinkError::Emit)?;
        self.left = left_speed;
        self.right = right_speed;
        tracing::debug!(left_speed, right_speed, "sent motor command");
        Ok(())
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }
}

impl<E: Emitter> MotorDrive for SupervisorLink<E> {
    type Error = LinkError<E::Error>;

    fn set_left_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        self.send_motor_command(speed, self.right)
    }

    fn set_right_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        self.send_motor_command(self.left, speed)
    }

    fn set_motors(
        &mut self,
        left: f32,
        right: f32,
    ) -> Result<(), Self::Error> {
        self.send_motor_command(left, right)
    }
}

/// Robot-side packet handler.
pub struct SimRobotController<D> {
    drive: D,
    waypoints: usize,
}

impl<D: MotorDrive> SimRobotController<D> {
    pub fn new(drive: D) -> Self {
        Self {
            drive,
            waypoints: 0,
        }
    }

    /// Decode one packet and act on it.
    ///
    /// A JSON object without a `"type"` field decodes as
    /// [`SimMessage::Unknown`].
    pub fn handle_message(
        &mut self,
        raw: &[u8],
    ) -> Result<SimMessage, SimError<D::Error>> {
        let message = match serde_json::from_slice::<SimMessage>(raw) {
            Ok(message) => message,
            Err(error) => match serde_json::from_slice::<Map<String, Value>>(raw) {
                Ok(fields) if !fields.contains_key("type") => SimMessage::Unknown,
                _ => return Err(SimError::InvalidJson(error)),
            },
        };
        self.handle(&message)?;
        Ok(message)
    }

    pub fn handle(
        &mut self,
        message: &SimMessage,
    ) -> Result<(), SimError<D::Error>> {
        match message {
            SimMessage::MotorCommand {
                left_speed,
                right_speed,
            } => self
                .drive
                .set_motors(*left_speed, *right_speed)
                .map_err(SimError::Drive),
            SimMessage::WaypointReached { waypoint_num } => {
                self.waypoints += 1;
                match waypoint_num {
                    Some(label) => tracing::info!("✓ {}", label),
                    None => tracing::info!("✓ ?"),
                }
                Ok(())
            }
            SimMessage::Unknown => {
                tracing::debug!("ignoring unknown simulator message");
                Ok(())
            }
        }
    }

    /// `waypoint_reached` messages seen so far.
    pub fn waypoints(&self) -> usize {
        self.waypoints
    }

    pub fn drive(&self) -> &D {
        &self.drive
    }
}
