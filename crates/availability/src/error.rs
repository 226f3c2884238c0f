use thiserror::Error;

use crate::engine::SlotStatus;
use crate::time::SlotTime;

/// Errors raised by the availability engine.
///
/// `InvalidInput` is a caller bug and is returned straight away from the
/// parsers. The other two variants only come out of the strict entry points
/// (`Selection::try_toggle`, `BookingScope::to_request`); the forgiving API
/// turns them into no-ops or empty results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no court selected")]
    NoCourtSelected,

    #[error("slot {slot} cannot be selected ({status})")]
    IllegalToggle { slot: SlotTime, status: SlotStatus },
}

impl AvailabilityError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
