//! Module Exports
//!
//! Supervisor ↔ robot messaging for the simulated rig.
//!
//! # Modules
//! - `sim`: JSON motor/waypoint protocol, supervisor link and robot controller.

pub mod sim;

pub use sim::{SimMessage, SimRobotController, SupervisorLink};

/// Outgoing packet channel, e.g. a simulator emitter device.
pub trait Emitter {
    type Error: core::fmt::Debug;

    fn send(
        &mut self,
        payload: &[u8],
    ) -> Result<(), Self::Error>;
}
