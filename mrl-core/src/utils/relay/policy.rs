//! Position → command mapping.

use super::{Command, Thresholds};
use crate::utils::mocap::Position;

/// Ordered two-threshold policy over the along-track (x) axis.
///
/// Positions strictly above `high` map to `Forward`, strictly below `low` to
/// `Backward`, and everything in between (bounds included) to `Stop`. The
/// dead-band maps to `Stop` regardless of approach direction. A NaN
/// coordinate compares false against both bounds and therefore stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandPolicy {
    thresholds: Thresholds,
}

impl CommandPolicy {
    pub const fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn decide(
        &self,
        position: &Position,
    ) -> Command {
        let x = position[0];
        if x > self.thresholds.high() {
            Command::Forward
        } else if x < self.thresholds.low() {
            Command::Backward
        } else {
            Command::Stop
        }
    }

    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}
