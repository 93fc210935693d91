//! Simulated HM-10 link.
//!
//! Stands in for a BLE central connected to the robot's HM-10 bridge: each
//! write is logged and fed through the robot firmware's byte handler so the
//! resulting motor speeds show up in the log.

use std::convert::Infallible;

use embassy_time::{Duration, Timer};
use mrl_core::utils::{
    controllers::{ByteCommandHandler, MotorDrive},
    relay::{
        CommandTransport,
        worker::{COMMAND_CHARACTERISTIC, COMMAND_SERVICE},
    },
};
use tracing::info;

/// Advertised names accepted as the robot's bridge.
pub const TARGET_NAMES: [&str; 3] = ["HMSoft", "HM-10", "DSD TECH"];

/// Motor driver that only logs.
pub struct LoggingDrive;

impl MotorDrive for LoggingDrive {
    type Error = Infallible;

    fn set_left_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        info!(speed, "left motor");
        Ok(())
    }

    fn set_right_motor(
        &mut self,
        speed: f32,
    ) -> Result<(), Self::Error> {
        info!(speed, "right motor");
        Ok(())
    }
}

#[derive(Debug)]
pub enum LinkError {
    NotConnected,
}

pub struct MockBleLink {
    name: &'static str,
    connect_delay: Duration,
    connected: bool,
    robot: ByteCommandHandler<LoggingDrive>,
}

impl MockBleLink {
    pub fn new(connect_delay: Duration) -> Self {
        let robot = match ByteCommandHandler::new(LoggingDrive) {
            Ok(robot) => robot,
            Err(never) => match never {},
        };
        Self {
            name: TARGET_NAMES[0],
            connect_delay,
            connected: false,
            robot,
        }
    }
}

impl CommandTransport for MockBleLink {
    type Error = LinkError;

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        info!("Scanning for HM-10...");
        Timer::after(self.connect_delay).await;
        self.connected = true;
        info!(device = self.name, service = COMMAND_SERVICE, "BLE Connected!");
        Ok(())
    }

    async fn write_command(
        &mut self,
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(LinkError::NotConnected);
        }
        info!(
            characteristic = COMMAND_CHARACTERISTIC,
            payload = ?String::from_utf8_lossy(payload),
            "write_gatt_char"
        );
        match self.robot.handle_bytes(payload) {
            Ok(_) => Ok(()),
            Err(never) => match never {},
        }
    }
}
