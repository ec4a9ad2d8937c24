//! Pure step functions of the two lifecycle polling loops.
//!
//! Given the last observed status, each function decides what the loop does
//! next. Wait lengths depend only on the reported status, never on elapsed
//! time or attempt count.

use std::time::Duration;

use crate::domain::error::JiffyError;
use crate::domain::jiffybox::{BoxId, BoxStatus};

/// Delay before the first poll, letting a create or stop request register.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);
pub const CREATING_DELAY: Duration = Duration::from_secs(10);
pub const UPDATING_DELAY: Duration = Duration::from_secs(5);
pub const STOPPING_DELAY: Duration = Duration::from_secs(5);
/// Wait used while an already-issued start or delete has not shown up yet.
pub const PENDING_DELAY: Duration = Duration::from_secs(5);

/// Default polling deadline.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Upper bounds for one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total wall-clock budget, measured from the start of the loop.
    pub timeout: Duration,
    /// Optional cap on the number of status reads.
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            max_polls: None,
        }
    }
}

/// Next action of the create/start loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningStep {
    Wait(Duration),
    Start,
    Done,
}

/// Decide the next action while driving a box to `READY` + running.
///
/// `start_issued` is true once this loop has sent its start transition; a box
/// still reported stopped after that is waited on rather than started again.
///
/// # Errors
///
/// Returns `JiffyError::UnknownStatus` for every status the loop does not handle.
pub fn running_step(
    id: BoxId,
    status: &BoxStatus,
    running: bool,
    start_issued: bool,
) -> Result<RunningStep, JiffyError> {
    match (status, running) {
        (BoxStatus::Creating, _) => Ok(RunningStep::Wait(CREATING_DELAY)),
        (BoxStatus::Ready, true) => Ok(RunningStep::Done),
        (BoxStatus::Ready, false) if start_issued => Ok(RunningStep::Wait(PENDING_DELAY)),
        (BoxStatus::Ready, false) => Ok(RunningStep::Start),
        (BoxStatus::Updating, _) => Ok(RunningStep::Wait(UPDATING_DELAY)),
        (other, _) => Err(unknown(id, other)),
    }
}

/// Next action of the stop/delete loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    Wait(Duration),
    Delete,
    Done,
}

/// Decide the next action while driving a box down to deletion.
///
/// A box still `READY` and running has not picked up the stop request yet and
/// is waited on. `DELETED` ends the loop like `DELETING`: the box is gone.
///
/// # Errors
///
/// Returns `JiffyError::UnknownStatus` for every status the loop does not handle.
pub fn teardown_step(
    id: BoxId,
    status: &BoxStatus,
    running: bool,
    delete_issued: bool,
) -> Result<TeardownStep, JiffyError> {
    match (status, running) {
        (BoxStatus::Ready, false) if delete_issued => Ok(TeardownStep::Wait(PENDING_DELAY)),
        (BoxStatus::Ready, false) => Ok(TeardownStep::Delete),
        (BoxStatus::Ready, true) => Ok(TeardownStep::Wait(PENDING_DELAY)),
        (BoxStatus::Updating, _) => Ok(TeardownStep::Wait(UPDATING_DELAY)),
        (BoxStatus::Stopping, _) => Ok(TeardownStep::Wait(STOPPING_DELAY)),
        (BoxStatus::Deleting | BoxStatus::Deleted, _) => Ok(TeardownStep::Done),
        (other, _) => Err(unknown(id, other)),
    }
}

fn unknown(id: BoxId, status: &BoxStatus) -> JiffyError {
    JiffyError::UnknownStatus {
        id,
        status: status.to_string(),
    }
}
