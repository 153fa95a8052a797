//! Single-flight token refresh
//!
//! Requests that fail with 401 at the same time must not each spend the
//! refresh token. [`RefreshFlight`] keeps at most one refresh future alive;
//! every caller that arrives while it runs awaits the same shared outcome.

use super::error::RefreshError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Mutex, PoisonError};

/// Result of one refresh: the new access token, or why there is none
pub type RefreshOutcome = Result<String, RefreshError>;

type InFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Coordinator for the one refresh that may be running at a time
#[derive(Default)]
pub struct RefreshFlight {
    current: Mutex<Option<InFlight>>,
}

impl RefreshFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the running refresh, or start one with `start` if none is running.
    ///
    /// The slot is emptied by whichever caller first observes completion, so
    /// the next expiry starts a fresh refresh instead of reusing a stale one.
    pub async fn run<F>(&self, start: F) -> RefreshOutcome
    where
        F: FnOnce() -> BoxFuture<'static, RefreshOutcome>,
    {
        let flight = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            match current.as_ref() {
                Some(flight) => {
                    debug!("Joining in-flight token refresh");
                    flight.clone()
                }
                None => {
                    let flight = start().shared();
                    *current = Some(flight.clone());
                    flight
                }
            }
        };

        let outcome = flight.clone().await;

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|running| running.ptr_eq(&flight)) {
            *current = None;
        }

        outcome
    }

    /// Whether a refresh is currently in flight
    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
