//! Pose listener that turns a mocap stream into drive commands.

use alloc::boxed::Box;

use super::{
    Command, CommandDispatcher, CommandPolicy, DispatchError, RelayConfig, RelayState,
};
use crate::utils::mocap::{Orientation, PoseHandler, Position};

/// Filters the pose stream to one rigid body and dispatches each distinct
/// command exactly once.
///
/// Runs entirely on the pose callback thread. A command dropped while the
/// link is down is still remembered and not re-sent until the decision
/// changes. A command refused by a full queue is forgotten again, so the
/// next callback retries it.
pub struct PoseRelay<const N: usize> {
    target_id: i32,
    policy: CommandPolicy,
    state: RelayState,
    dispatcher: CommandDispatcher<N>,
}

impl<const N: usize> PoseRelay<N> {
    pub fn new(
        config: RelayConfig,
        dispatcher: CommandDispatcher<N>,
    ) -> Self {
        Self {
            target_id: config.target_id,
            policy: CommandPolicy::new(config.thresholds),
            state: RelayState::new(),
            dispatcher,
        }
    }

    /// Handle one rigid-body callback.
    ///
    /// Returns the command handed to the dispatcher, or `None` when the
    /// callback was for another body, the desired command is unchanged, or
    /// the queue had no room for it.
    pub fn on_pose(
        &mut self,
        id: i32,
        position: Position,
        _orientation: Orientation,
    ) -> Option<Command> {
        if id != self.target_id {
            return None;
        }
        let desired = self.policy.decide(&position);
        let previous = self.state.last_command();
        if !self.state.should_dispatch(desired) {
            return None;
        }
        tracing::info!(?position, %desired, "desired command changed");
        match self.dispatcher.try_send(desired) {
            Ok(()) => tracing::info!(command = %desired, "sent command"),
            Err(DispatchError::NotConnected(command)) => {
                tracing::warn!(%command, "BLE not connected, dropping command")
            }
            Err(DispatchError::QueueFull(command)) => {
                tracing::error!(%command, "command queue full, will retry on next pose");
                self.state.restore(previous);
                return None;
            }
        }
        Some(desired)
    }

    /// Box this relay as a rigid-body listener for a [`PoseSource`].
    ///
    /// [`PoseSource`]: crate::utils::mocap::PoseSource
    pub fn into_listener(mut self) -> PoseHandler
    where
        Self: Send + 'static,
    {
        Box::new(move |id, position, orientation| {
            self.on_pose(id, position, orientation);
        })
    }

    pub fn target_id(&self) -> i32 {
        self.target_id
    }

    pub fn last_command(&self) -> Option<Command> {
        self.state.last_command()
    }

    pub fn dispatcher(&self) -> &CommandDispatcher<N> {
        &self.dispatcher
    }
}
