//! Utility re-exports for the mocap relay.
//!
//! - `relay`: pose-triggered command policy, deduplication and BLE handoff
//! - `mocap`: pose snapshots and the pose-source callback seam
//! - `controllers`: motor drive capability, scenario actions, firmware handler
//! - `connection`: simulator supervisor/robot JSON protocol

pub mod connection;
pub mod controllers;
pub mod mocap;
pub mod relay;

pub use controllers::MotorDrive;
pub use mocap::{Pose, PoseEstimator, PoseSource};
pub use relay::{Command, PoseRelay, RelayConfig, TransportWorker};
