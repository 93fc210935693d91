//! Robot-side handler for single-byte drive commands.
//!
//! Bytes arrive from the HM-10 bridge over UART; `F`, `B` and `S` drive the
//! motors, anything else is logged and ignored.

use crate::utils::relay::Command;

use super::MotorDrive;

/// Percent of full scale used for forward and backward motion.
pub const DRIVE_SPEED_PCT: f32 = 20.0;

/// `(left, right)` percent speeds the firmware applies for a command.
pub const fn command_speeds(command: Command) -> (f32, f32) {
    match command {
        Command::Forward => (DRIVE_SPEED_PCT, DRIVE_SPEED_PCT),
        Command::Backward => (-DRIVE_SPEED_PCT, -DRIVE_SPEED_PCT),
        Command::Stop => (0.0, 0.0),
    }
}

pub struct ByteCommandHandler<D> {
    drive: D,
    last: Option<Command>,
}

impl<D: MotorDrive> ByteCommandHandler<D> {
    /// Wrap `drive` and bring the motors to a stop.
    pub fn new(mut drive: D) -> Result<Self, D::Error> {
        drive.set_motors(0.0, 0.0)?;
        Ok(Self { drive, last: None })
    }

    /// Apply one received byte. Returns the command it decoded to, if any.
    pub fn handle_byte(
        &mut self,
        byte: u8,
    ) -> Result<Option<Command>, D::Error> {
        let Some(command) = Command::from_token(byte) else {
            tracing::warn!("Unknown command: 0x{:02X}", byte);
            return Ok(None);
        };
        let (left, right) = command_speeds(command);
        self.drive.set_motors(left, right)?;
        tracing::info!(%command, left, right, "drive command applied");
        self.last = Some(command);
        Ok(Some(command))
    }

    /// Apply every byte of a received chunk in order. Returns how many were
    /// recognised.
    pub fn handle_bytes(
        &mut self,
        bytes: &[u8],
    ) -> Result<usize, D::Error> {
        let mut recognised = 0;
        for &byte in bytes {
            if self.handle_byte(byte)?.is_some() {
                recognised += 1;
            }
        }
        Ok(recognised)
    }

    pub fn last_command(&self) -> Option<Command> {
        self.last
    }

    pub fn drive(&self) -> &D {
        &self.drive
    }

    pub fn into_inner(self) -> D {
        self.drive
    }
}
