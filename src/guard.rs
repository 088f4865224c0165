//! Route access guards.
//!
//! A guard decides whether a navigation targeting a protected route may
//! proceed, from a single identity reading taken at evaluation entry. The
//! policy fails closed: a provider read that errors resolves to the guard's
//! fallback route, never to the protected view.

use serde::Deserialize;
use turnstile_core::{Decision, DeferReason, IdentityState, IdentityUnavailable};

/// Access policy attached to a protected route.
///
/// A route carries at most one guard. The guard holds the per-route
/// fallback path every restrictive outcome redirects to, typically the
/// application's unauthenticated landing route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuardSpec {
    fallback: String,
}

impl GuardSpec {
    /// Guard a route, sending unauthenticated visitors to `fallback`.
    #[must_use]
    pub fn redirect_to(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    /// The route every restrictive outcome redirects to.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Decide a navigation from one identity reading.
    ///
    /// The guard is a pure function of the reading: no side effects, and
    /// evaluating the same reading twice yields the same decision. A
    /// [`Pending`](IdentityState::Pending) provider defers the decision;
    /// the caller owns waiting for readiness and re-evaluating.
    #[must_use]
    pub fn decide(&self, reading: &Result<IdentityState, IdentityUnavailable>) -> Decision {
        match reading {
            Ok(IdentityState::Ready(snapshot)) if snapshot.is_authenticated() => Decision::Allow,
            Ok(IdentityState::Ready(_)) | Err(_) => Decision::Redirect(self.fallback.clone()),
            Ok(IdentityState::Pending) => Decision::Defer(DeferReason::IdentityPending),
        }
    }
}
