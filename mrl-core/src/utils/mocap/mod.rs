//! Motion-capture pose types and the pose-source seam.
//!
//! The network client is external; it only has to implement [`PoseSource`]
//! and invoke the registered handler for every rigid body in every frame.

pub mod estimator;

use alloc::boxed::Box;
use core::fmt::Debug;

pub use estimator::PoseEstimator;

/// Rigid-body position `(x, y, z)` in mocap units (metres).
pub type Position = [f32; 3];
/// Rigid-body orientation quaternion `(qx, qy, qz, qw)`.
pub type Orientation = [f32; 4];

/// Rigid-body listener: `(id, position, orientation)`.
///
/// Invoked sequentially on the source's delivery thread.
pub type PoseHandler = Box<dyn FnMut(i32, Position, Orientation) + Send + 'static>;

/// Producer of rigid-body callbacks running on its own thread.
pub trait PoseSource {
    type Error: Debug;

    /// Replace the rigid-body listener. Takes effect on the next `run`.
    fn set_rigid_body_listener(
        &mut self,
        handler: PoseHandler,
    );

    /// Start streaming on the source's own thread.
    fn run(&mut self) -> Result<(), Self::Error>;

    /// Stop streaming and release the delivery thread.
    fn shutdown(&mut self);
}

/// Snapshot of a tracked rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
}

impl Default for Pose {
    /// Origin with identity rotation.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            qx: 0.0,
            qy: 0.0,
            qz: 0.0,
            qw: 1.0,
        }
    }
}

impl Pose {
    pub fn from_parts(
        position: Position,
        orientation: Orientation,
    ) -> Self {
        let [x, y, z] = position;
        let [qx, qy, qz, qw] = orientation;
        Self {
            x,
            y,
            z,
            qx,
            qy,
            qz,
            qw,
        }
    }

    pub fn position(&self) -> Position {
        [self.x, self.y, self.z]
    }

    pub fn orientation(&self) -> Orientation {
        [self.qx, self.qy, self.qz, self.qw]
    }

    /// Yaw about the vertical axis in radians (Y-up, as streamed by Motive).
    pub fn heading(&self) -> f32 {
        let siny = 2.0 * (self.qw * self.qy + self.qx * self.qz);
        let cosy = 1.0 - 2.0 * (self.qx * self.qx + self.qy * self.qy);
        libm::atan2f(siny, cosy)
    }
}
