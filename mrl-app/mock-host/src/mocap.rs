//! Simulated mocap stream.
//!
//! Plays a sinusoidal along-track trajectory for the target rigid body plus a
//! stationary distractor body, on a dedicated delivery thread.

use std::{
    f32::consts::TAU,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use mrl_core::utils::mocap::{Orientation, PoseHandler, PoseSource};
use tracing::{info, warn};

const IDENTITY: Orientation = [0.0, 0.0, 0.0, 1.0];

#[derive(Debug)]
pub enum MocapError {
    NoListener,
    AlreadyRunning,
    Spawn(std::io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct Trajectory {
    pub center: f32,
    pub amplitude: f32,
    pub period: Duration,
}

impl Trajectory {
    fn x_at(
        &self,
        t: Duration,
    ) -> f32 {
        let phase = TAU * t.as_secs_f32() / self.period.as_secs_f32().max(f32::EPSILON);
        self.center + self.amplitude * phase.sin()
    }
}

pub struct SimulatedMocap {
    target_id: i32,
    distractor_id: i32,
    rate_hz: u32,
    trajectory: Trajectory,
    listener: Option<PoseHandler>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SimulatedMocap {
    pub fn new(
        target_id: i32,
        distractor_id: i32,
        rate_hz: u32,
        trajectory: Trajectory,
    ) -> Self {
        Self {
            target_id,
            distractor_id,
            rate_hz: rate_hz.max(1),
            trajectory,
            listener: None,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }
}

impl PoseSource for SimulatedMocap {
    type Error = MocapError;

    fn set_rigid_body_listener(
        &mut self,
        handler: PoseHandler,
    ) {
        self.listener = Some(handler);
    }

    fn run(&mut self) -> Result<(), Self::Error> {
        if self.thread.is_some() {
            return Err(MocapError::AlreadyRunning);
        }
        let mut listener = self.listener.take().ok_or(MocapError::NoListener)?;
        let (target_id, distractor_id, trajectory) =
            (self.target_id, self.distractor_id, self.trajectory);
        let frame = Duration::from_secs_f64(1.0 / f64::from(self.rate_hz));
        let running = self.running.clone();
        running.store(true, Ordering::Release);

        let handle = thread::Builder::new()
            .name("mocap-stream".into())
            .spawn(move || {
                let start = Instant::now();
                while running.load(Ordering::Acquire) {
                    let x = trajectory.x_at(start.elapsed());
                    listener(target_id, [x, 0.0, 0.05], IDENTITY);
                    listener(distractor_id, [0.0, 0.0, 0.0], IDENTITY);
                    thread::sleep(frame);
                }
            })
            .map_err(MocapError::Spawn)?;
        self.thread = Some(handle);
        info!(target_id, rate_hz = self.rate_hz, "mocap stream started");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("mocap stream thread panicked");
            }
        }
    }
}

impl Drop for SimulatedMocap {
    fn drop(&mut self) {
        self.shutdown();
    }
}
