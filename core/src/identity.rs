//! Identity contracts consumed by route guards.

use core::future::Future;

/// A point-in-time reading of who the current actor is.
///
/// Snapshots are taken once at guard-evaluation entry and never refreshed
/// mid-decision. The guard only observes them; the provider that produced a
/// snapshot remains its sole owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySnapshot {
    authenticated: bool,
    subject: Option<String>,
}

impl IdentitySnapshot {
    /// A snapshot of an authenticated actor with the given subject id.
    #[must_use]
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            subject: Some(subject.into()),
        }
    }

    /// A snapshot of an unauthenticated visitor.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            authenticated: false,
            subject: None,
        }
    }

    /// Whether the actor is authenticated.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The subject id, if the actor has one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// What an identity provider can answer at a given moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// The provider has a settled snapshot.
    Ready(IdentitySnapshot),
    /// The provider has not finished establishing identity yet.
    Pending,
}

impl IdentityState {
    /// Whether the provider is still initializing.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The settled snapshot, if there is one.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&IdentitySnapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot),
            Self::Pending => None,
        }
    }
}

/// The identity provider could not be read.
///
/// The navigation pipeline absorbs this error fail-closed; it is never
/// surfaced to callers as a failed navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identity provider unavailable: {reason}")]
pub struct IdentityUnavailable {
    reason: String,
}

impl IdentityUnavailable {
    /// Record a failed provider read.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Read-only source of identity readings.
///
/// Guards depend on this contract only; how identity is established
/// (password, token, federated) is the provider's concern. A provider that
/// is always settled only needs [`current_identity`](Self::current_identity);
/// providers with an asynchronous initialization phase should also override
/// [`ready`](Self::ready) so the pipeline can wait out the
/// [`Pending`](IdentityState::Pending) window.
pub trait IdentityProvider: Send + Sync {
    /// Take one consistent identity reading.
    fn current_identity(
        &self,
    ) -> impl Future<Output = Result<IdentityState, IdentityUnavailable>> + Send;

    /// Resolve once the provider has left its initializing state.
    ///
    /// The default implementation returns the current reading unchanged,
    /// which is correct for providers that are never pending.
    fn ready(&self) -> impl Future<Output = Result<IdentityState, IdentityUnavailable>> + Send {
        self.current_identity()
    }
}
