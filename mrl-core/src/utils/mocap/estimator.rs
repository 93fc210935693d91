//! Latest-pose store fed by the mocap callback thread.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use super::{Orientation, Pose, Position};

/// Samples between debug log lines unless configured otherwise.
pub const DEFAULT_PRINT_INTERVAL: u32 = 100;

struct EstimatorState {
    pose: Pose,
    samples: u32,
    until_print: u32,
    printed: u32,
}

/// Keeps the most recent pose of one rigid body behind a lock.
///
/// Writers are the pose callback thread; readers get an independent copy.
pub struct PoseEstimator {
    target_id: i32,
    print_interval: Option<u32>,
    state: Mutex<CriticalSectionRawMutex, RefCell<EstimatorState>>,
}

impl PoseEstimator {
    pub fn new(target_id: i32) -> Self {
        tracing::info!(target_id, "initializing pose estimator");
        Self {
            target_id,
            print_interval: None,
            state: Mutex::new(RefCell::new(EstimatorState {
                pose: Pose::default(),
                samples: 0,
                until_print: 0,
                printed: 0,
            })),
        }
    }

    /// Log the pose on the first sample and every `interval` samples after.
    pub fn with_debug_print(
        mut self,
        interval: Option<u32>,
    ) -> Self {
        self.print_interval = Some(interval.unwrap_or(DEFAULT_PRINT_INTERVAL).max(1));
        self
    }

    /// Record a callback. Returns `false` if it was for another body.
    pub fn on_pose(
        &self,
        id: i32,
        position: Position,
        orientation: Orientation,
    ) -> bool {
        if id != self.target_id {
            return false;
        }
        let pose = Pose::from_parts(position, orientation);
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            state.pose = pose;
            state.samples = state.samples.wrapping_add(1);

            if let Some(interval) = self.print_interval {
                if state.until_print == 0 {
                    tracing::debug!(id, ?pose, "mocap sample");
                    state.printed = state.printed.wrapping_add(1);
                    state.until_print = interval;
                }
                state.until_print -= 1;
            }
        });
        true
    }

    /// Copy of the latest pose (identity before the first sample).
    pub fn pose(&self) -> Pose {
        self.state.lock(|state| state.borrow().pose)
    }

    /// Samples accepted so far.
    pub fn samples(&self) -> u32 {
        self.state.lock(|state| state.borrow().samples)
    }

    pub fn target_id(&self) -> i32 {
        self.target_id
    }
}
