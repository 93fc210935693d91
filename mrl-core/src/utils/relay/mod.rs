//! Pose-triggered BLE command relay.
//!
//! A mocap callback thread decides which drive command the robot should be
//! running and hands distinct transitions to the cooperative context that
//! owns the BLE session:
//!
//! ```text
//! pose callback ──► CommandPolicy ──► RelayState ──► CommandDispatcher
//!                                                        │ try_send
//!                                                        ▼
//!                                   TransportWorker ◄── CommandQueue
//!                                        │ write_command
//!                                        ▼
//!                                   CommandTransport (BLE)
//! ```
//!
//! - `policy`: fixed-threshold position → command mapping
//! - `state`: last-dispatched-command gate
//! - `dispatcher`: non-blocking cross-thread handoff and link status
//! - `worker`: transport owner draining the queue
//! - `pose_relay`: the listener wiring the above together

pub mod dispatcher;
pub mod policy;
pub mod pose_relay;
pub mod state;
pub mod worker;

use alloc::sync::Arc;
use core::fmt;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};

pub use dispatcher::{CommandDispatcher, DispatchError, LinkStatus};
pub use policy::CommandPolicy;
pub use pose_relay::PoseRelay;
pub use state::RelayState;
pub use worker::{CommandTransport, TransportWorker, WorkerError};

/// Mocap rigid-body id of the Pololu robot on the deployed rig.
pub const DEFAULT_TARGET_ID: i32 = 15;
/// Above this along-track position the robot drives forward.
pub const DEFAULT_HIGH_THRESHOLD: f32 = -0.9;
/// Below this along-track position the robot drives backward.
pub const DEFAULT_LOW_THRESHOLD: f32 = -1.1;

/// FIFO handoff between the pose callback thread and the transport owner.
pub type CommandQueue<const N: usize> = Channel<CriticalSectionRawMutex, Command, N>;

/// Semantic drive command understood by the robot firmware.
///
/// Each command travels as a single ASCII byte; the receiving firmware is
/// fixed, so the tokens must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Backward,
    Stop,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Forward, Command::Backward, Command::Stop];

    /// Wire token for this command.
    pub const fn token(self) -> u8 {
        match self {
            Command::Forward => b'F',
            Command::Backward => b'B',
            Command::Stop => b'S',
        }
    }

    /// Parse a wire token. Returns `None` for anything the firmware ignores.
    pub const fn from_token(token: u8) -> Option<Self> {
        match token {
            b'F' => Some(Command::Forward),
            b'B' => Some(Command::Backward),
            b'S' => Some(Command::Stop),
            _ => None,
        }
    }

    /// Payload written to the BLE characteristic.
    pub const fn payload(self) -> [u8; 1] {
        [self.token()]
    }
}

impl fmt::Display for Command {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.token() as char)
    }
}

/// Configuration errors for the relay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelayError {
    /// `low` must be strictly below `high` and both must be finite.
    InvalidThresholds { high: f32, low: f32 },
}

impl fmt::Display for RelayError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            RelayError::InvalidThresholds { high, low } => {
                write!(f, "invalid thresholds: low ({low}) must be below high ({high})")
            }
        }
    }
}

/// Along-track bounds of the stop dead-band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    high: f32,
    low: f32,
}

impl Thresholds {
    pub fn new(
        high: f32,
        low: f32,
    ) -> Result<Self, RelayError> {
        if !high.is_finite() || !low.is_finite() || low >= high {
            return Err(RelayError::InvalidThresholds { high, low });
        }
        Ok(Self { high, low })
    }

    pub const fn high(&self) -> f32 {
        self.high
    }

    pub const fn low(&self) -> f32 {
        self.low
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_THRESHOLD,
            low: DEFAULT_LOW_THRESHOLD,
        }
    }
}

/// Relay configuration: which rigid body to follow and where to switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelayConfig {
    pub target_id: i32,
    pub thresholds: Thresholds,
}

impl RelayConfig {
    pub fn new(
        target_id: i32,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            target_id,
            thresholds,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_ID, Thresholds::default())
    }
}

/// Build a connected relay pair around a fresh command queue of depth `N`.
///
/// The returned [`PoseRelay`] belongs on the pose callback thread; the
/// [`TransportWorker`] belongs on the cooperative context that owns
/// `transport`. Nothing is dispatched until the worker has connected.
pub fn split<T, const N: usize>(
    config: RelayConfig,
    transport: T,
) -> (PoseRelay<N>, TransportWorker<T, N>)
where
    T: CommandTransport,
{
    let queue: Arc<CommandQueue<N>> = Arc::new(Channel::new());
    let link = LinkStatus::new();
    let dispatcher = CommandDispatcher::new(queue.clone(), link.clone());
    (
        PoseRelay::new(config, dispatcher),
        TransportWorker::new(transport, queue, link),
    )
}
