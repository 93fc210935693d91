//! Transport owner on the cooperative context.

use alloc::sync::Arc;
use core::fmt::Debug;

use super::{Command, CommandQueue, LinkStatus};

/// BLE characteristic the HM-10 bridge exposes for serial passthrough.
pub const COMMAND_CHARACTERISTIC: &str = "FFE1";
/// Service containing [`COMMAND_CHARACTERISTIC`].
pub const COMMAND_SERVICE: &str = "FFE0";

/// Byte sink for drive commands, e.g. a write-without-response
/// characteristic on a connected BLE peripheral.
#[allow(async_fn_in_trait)]
pub trait CommandTransport {
    type Error: Debug;

    fn is_connected(&self) -> bool;

    async fn connect(&mut self) -> Result<(), Self::Error>;

    async fn write_command(
        &mut self,
        payload: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Errors surfaced by the transport worker.
#[derive(Debug)]
pub enum WorkerError<E: Debug> {
    Transport(E),
    /// `connect` returned Ok but the transport still reports disconnected.
    NotConnected,
}

/// Drains the command queue, one transport write per command, in order.
pub struct TransportWorker<T, const N: usize> {
    transport: T,
    queue: Arc<CommandQueue<N>>,
    link: LinkStatus,
    written: usize,
}

impl<T, const N: usize> TransportWorker<T, N>
where
    T: CommandTransport,
{
    pub fn new(
        transport: T,
        queue: Arc<CommandQueue<N>>,
        link: LinkStatus,
    ) -> Self {
        Self {
            transport,
            queue,
            link,
            written: 0,
        }
    }

    /// Establish the session and publish the link status to dispatchers.
    pub async fn connect(&mut self) -> Result<(), WorkerError<T::Error>> {
        self.transport
            .connect()
            .await
            .map_err(WorkerError::Transport)?;
        if !self.transport.is_connected() {
            return Err(WorkerError::NotConnected);
        }
        self.link.set_connected(true);
        tracing::info!("BLE connected");
        Ok(())
    }

    /// Wait for the next command and write it.
    pub async fn process_next(&mut self) -> Result<Command, WorkerError<T::Error>> {
        let command = self.queue.receive().await;
        self.write(command).await?;
        Ok(command)
    }

    /// Write every command already queued. Returns how many were taken.
    pub async fn drain(&mut self) -> usize {
        let mut taken = 0;
        while let Ok(command) = self.queue.try_receive() {
            taken += 1;
            if let Err(error) = self.write(command).await {
                tracing::error!(%command, ?error, "BLE write failed");
            }
        }
        taken
    }

    /// Serve the queue forever; write failures are logged, never fatal.
    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(error) = self.process_next().await {
                tracing::error!(?error, "BLE write failed");
            }
        }
    }

    async fn write(
        &mut self,
        command: Command,
    ) -> Result<(), WorkerError<T::Error>> {
        match self.transport.write_command(&command.payload()).await {
            Ok(()) => {
                self.written += 1;
                tracing::debug!(%command, written = self.written, "command written");
                Ok(())
            }
            Err(error) => {
                self.link.set_connected(self.transport.is_connected());
                Err(WorkerError::Transport(error))
            }
        }
    }

    /// Number of successful writes so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Commands waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn link(&self) -> &LinkStatus {
        &self.link
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
