//! Identity providers.
//!
//! The contract lives in `turnstile-core` ([`IdentityProvider`]); this
//! module provides [`SharedIdentity`], a process-wide identity cell for
//! applications whose backend session is established asynchronously. It
//! stands in for an ambient "current user" global: the cell is injected
//! into the navigator and guards only ever observe readings from it.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

pub use turnstile_core::{IdentityProvider, IdentitySnapshot, IdentityState, IdentityUnavailable};

type Reading = Result<IdentityState, IdentityUnavailable>;

struct Cell {
    reading: Mutex<Reading>,
    waiters: Mutex<Vec<async_channel::Sender<()>>>,
}

/// A cheaply clonable identity cell shared across the application.
///
/// The cell starts either settled ([`anonymous`](Self::anonymous),
/// [`with_snapshot`](Self::with_snapshot)) or initializing
/// ([`uninitialized`](Self::uninitialized)). Publishing a snapshot through
/// [`install`](Self::install) or [`sign_out`](Self::sign_out) settles the
/// cell and wakes every [`ready`](IdentityProvider::ready) waiter. All
/// clones observe the same state.
#[derive(Clone)]
pub struct SharedIdentity {
    cell: Arc<Cell>,
}

impl std::fmt::Debug for SharedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedIdentity").finish_non_exhaustive()
    }
}

impl SharedIdentity {
    fn with_reading(reading: Reading) -> Self {
        Self {
            cell: Arc::new(Cell {
                reading: Mutex::new(reading),
                waiters: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A cell whose backend has not reported an identity yet.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self::with_reading(Ok(IdentityState::Pending))
    }

    /// A settled cell holding an unauthenticated visitor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::with_reading(Ok(IdentityState::Ready(IdentitySnapshot::anonymous())))
    }

    /// A settled cell holding the given snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: IdentitySnapshot) -> Self {
        Self::with_reading(Ok(IdentityState::Ready(snapshot)))
    }

    /// Publish a new snapshot and wake readiness waiters.
    pub fn install(&self, snapshot: IdentitySnapshot) {
        debug!(subject = snapshot.subject(), "identity installed");
        self.store(Ok(IdentityState::Ready(snapshot)));
    }

    /// Drop the current actor back to an unauthenticated visitor.
    pub fn sign_out(&self) {
        debug!("identity signed out");
        self.store(Ok(IdentityState::Ready(IdentitySnapshot::anonymous())));
    }

    /// Record that the identity backend cannot be reached.
    ///
    /// Subsequent reads observe the failure until a snapshot is installed;
    /// guards consuming it resolve fail-closed.
    pub fn mark_unavailable(&self, reason: impl Into<String>) {
        self.store(Err(IdentityUnavailable::new(reason)));
    }

    fn store(&self, reading: Reading) {
        *self
            .cell
            .reading
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = reading;
        let waiters = std::mem::take(
            &mut *self
                .cell
                .waiters
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for waiter in waiters {
            let _ = waiter.try_send(());
        }
    }

    #[cfg(test)]
    pub(crate) fn has_waiters(&self) -> bool {
        !self
            .cell
            .waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl IdentityProvider for SharedIdentity {
    async fn current_identity(&self) -> Reading {
        self.cell
            .reading
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn ready(&self) -> Reading {
        loop {
            // Register the waiter while holding the reading lock, so a
            // publish between the pending check and registration cannot be
            // missed.
            let waiter = {
                let reading = self
                    .cell
                    .reading
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                match &*reading {
                    Ok(IdentityState::Pending) => {
                        let (sender, receiver) = async_channel::bounded(1);
                        self.cell
                            .waiters
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(sender);
                        receiver
                    }
                    settled => return settled.clone(),
                }
            };
            let _ = waiter.recv().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentityProvider, IdentitySnapshot, IdentityState, SharedIdentity};

    #[tokio::test]
    async fn settled_cells_answer_immediately() {
        let identity = SharedIdentity::anonymous();
        let state = identity.current_identity().await.unwrap();
        assert_eq!(state.snapshot().unwrap(), &IdentitySnapshot::anonymous());
        assert_eq!(identity.ready().await.unwrap(), state);
    }

    #[tokio::test]
    async fn install_wakes_readiness_waiters() {
        let identity = SharedIdentity::uninitialized();
        let waiting = identity.clone();
        let waiter = tokio::spawn(async move { waiting.ready().await });

        while !identity.has_waiters() {
            tokio::task::yield_now().await;
        }
        identity.install(IdentitySnapshot::authenticated("u1"));

        let state = waiter.await.unwrap().unwrap();
        assert_eq!(state.snapshot().unwrap().subject(), Some("u1"));
    }

    #[tokio::test]
    async fn sign_out_returns_to_anonymous() {
        let identity = SharedIdentity::with_snapshot(IdentitySnapshot::authenticated("u1"));
        identity.sign_out();
        let state = identity.current_identity().await.unwrap();
        assert_eq!(state.snapshot().unwrap(), &IdentitySnapshot::anonymous());
    }

    #[tokio::test]
    async fn unavailable_cells_surface_the_failure() {
        let identity = SharedIdentity::uninitialized();
        identity.mark_unavailable("backend offline");
        let error = identity.current_identity().await.unwrap_err();
        assert_eq!(error.reason(), "backend offline");
    }

    #[tokio::test]
    async fn pending_cells_report_pending() {
        let identity = SharedIdentity::uninitialized();
        assert!(identity.current_identity().await.unwrap().is_pending());
    }
}
