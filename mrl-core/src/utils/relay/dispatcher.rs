//! Cross-thread command handoff.
//!
//! The dispatcher runs on the pose callback thread, which does not own the
//! BLE session. It only checks link status and pushes onto the command
//! queue; the transport worker performs the write on its own context.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::channel::TrySendError;

use super::{Command, CommandQueue};

/// Connection flag shared between the transport owner and the dispatcher.
///
/// Written by the transport worker, read from the pose callback thread.
#[derive(Debug, Clone, Default)]
pub struct LinkStatus(Arc<AtomicBool>);

impl LinkStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(
        &self,
        connected: bool,
    ) {
        self.0.store(connected, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Reasons a command was dropped at the dispatch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// No BLE session yet (or it was lost); the command is not queued.
    NotConnected(Command),
    /// The transport worker is too far behind to accept another write.
    QueueFull(Command),
}

/// Fire-and-forget sender for drive commands.
pub struct CommandDispatcher<const N: usize> {
    queue: Arc<CommandQueue<N>>,
    link: LinkStatus,
}

impl<const N: usize> CommandDispatcher<N> {
    pub fn new(
        queue: Arc<CommandQueue<N>>,
        link: LinkStatus,
    ) -> Self {
        Self { queue, link }
    }

    /// Schedule one write of `command` without blocking.
    ///
    /// Failures are logged and swallowed; nothing is retried or queued for
    /// later.
    pub fn send(
        &self,
        command: Command,
    ) {
        match self.try_send(command) {
            Ok(()) => tracing::info!(%command, "sent command"),
            Err(DispatchError::NotConnected(command)) => {
                tracing::warn!(%command, "BLE not connected, dropping command")
            }
            Err(DispatchError::QueueFull(command)) => {
                tracing::error!(%command, "failed to schedule write: command queue full")
            }
        }
    }

    /// Like [`send`](Self::send) but reports why a command was dropped.
    pub fn try_send(
        &self,
        command: Command,
    ) -> Result<(), DispatchError> {
        if !self.link.is_connected() {
            return Err(DispatchError::NotConnected(command));
        }
        self.queue.try_send(command).map_err(|error| match error {
            TrySendError::Full(command) => DispatchError::QueueFull(command),
        })
    }

    pub fn link(&self) -> &LinkStatus {
        &self.link
    }
}
