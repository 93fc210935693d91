//! Last-dispatched-command gate.

use super::Command;

/// Remembers the last command handed to the dispatcher.
///
/// Owned by the pose callback path; callbacks are sequential, so a plain
/// `&mut` compare-and-update is atomic with respect to the decision that
/// produced the command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelayState {
    last: Option<Command>,
}

impl RelayState {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Returns `true` and records `command` iff it differs from the last one.
    pub fn should_dispatch(
        &mut self,
        command: Command,
    ) -> bool {
        if self.last == Some(command) {
            return false;
        }
        self.last = Some(command);
        true
    }

    /// Put back a previously remembered command, e.g. when the write it
    /// stood for could not be queued.
    pub fn restore(
        &mut self,
        last: Option<Command>,
    ) {
        self.last = last;
    }

    pub const fn last_command(&self) -> Option<Command> {
        self.last
    }
}
