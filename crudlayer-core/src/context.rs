//! Bounded-deadline scopes for store calls.
//!
//! Every call into a store handle runs inside an [`OpContext`]. A context either carries an
//! absolute deadline or none at all; [`OpContext::run`] enforces the deadline by dropping the
//! pending future once it elapses, which releases the timer and the in-flight call together.

use std::{future::Future, time::Duration};
use tokio::time::{Instant, timeout_at};

use crate::error::{CrudError, CrudResult};

/// Deadline applied when connecting, pinging and listing collections.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed deadline applied to every delete, independent of the caller's context.
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(3);

/// Caller context handed to every store operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpContext {
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context without a deadline.
    pub fn background() -> Self {
        Self { deadline: None }
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// A context expiring at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, saturating at zero. `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Runs `fut` to completion or until the deadline elapses.
    ///
    /// # Errors
    ///
    /// [`CrudError::DeadlineExceeded`] if the deadline passes first, otherwise whatever `fut`
    /// resolves to.
    pub async fn run<F, T>(&self, fut: F) -> CrudResult<T>
    where
        F: Future<Output = CrudResult<T>>,
    {
        match self.deadline {
            Some(deadline) => timeout_at(deadline, fut)
                .await
                .map_err(|_| CrudError::DeadlineExceeded)?,
            None => fut.await,
        }
    }
}
