//! The navigation pipeline.
//!
//! A [`Navigator`] evaluates each [`NavigationRequest`] against its route
//! table: unguarded routes pass through untouched, guarded routes are
//! decided from a single identity reading taken at entry. A provider that
//! is still initializing defers the decision; the navigator waits for
//! readiness and re-evaluates exactly once. If a newer request starts
//! before an in-flight one resolves, the stale result is discarded as
//! [`NavigationError::Superseded`] and never applied.

use std::{
    fmt::{Debug, Formatter},
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, warn};
use turnstile_core::{Decision, IdentityProvider, IdentityState, IdentityUnavailable};

use crate::routing::{MatchedRoute, RouteTable};

/// One attempt to move from `origin` to `target`.
///
/// Requests are ephemeral: each is consumed by exactly one evaluation and
/// discarded once the decision is acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    target: String,
    origin: String,
}

impl NavigationRequest {
    /// A navigation from `origin` to `target`.
    #[must_use]
    pub fn new(target: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            origin: origin.into(),
        }
    }

    /// The path being navigated to.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The path the navigation started from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// The binary result of a fully resolved navigation.
///
/// Unlike [`Decision`], an outcome is never deferred: the pipeline has
/// already waited out the provider and applied the fail-closed policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The navigation proceeds to its target view.
    Allow,
    /// The navigation is sent to the contained path instead.
    Redirect(String),
}

impl Outcome {
    /// Whether the navigation was allowed through.
    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect path, if the navigation was turned away.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(path) => Some(path),
            Self::Allow => None,
        }
    }
}

/// Errors surfaced by the pipeline.
///
/// An unavailable identity provider is not among them: that failure is
/// absorbed fail-closed into a redirect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum NavigationError {
    /// A newer navigation started before this one resolved; the stale
    /// result was discarded.
    #[error("navigation superseded by a newer request")]
    Superseded,
    /// No route matches the requested target.
    #[error("no route matches `{path}`")]
    RouteNotFound {
        /// The target path that failed to resolve.
        path: String,
    },
}

/// Applies resolved outcomes on the view layer's behalf.
///
/// The navigator never reaches the destination view directly; it hands the
/// outcome to a controller, which owns the actual transition.
pub trait NavigationController {
    /// Let the navigation proceed to its target view.
    fn allow(&mut self, request: &NavigationRequest);

    /// Send the navigation to `path` instead.
    fn redirect_to(&mut self, request: &NavigationRequest, path: &str);
}

/// Evaluates navigation requests against a route table.
///
/// Generic over its identity provider, so tests can inject scripted
/// providers and applications can wire in whatever establishes their
/// session. The navigator shares no mutable state with guards; its only
/// internal state is the supersession sequence.
pub struct Navigator<P> {
    table: RouteTable,
    provider: P,
    seq: AtomicU64,
}

impl<P> Debug for Navigator<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<P: IdentityProvider> Navigator<P> {
    /// A navigator over `table`, reading identity from `provider`.
    #[must_use]
    pub const fn new(table: RouteTable, provider: P) -> Self {
        Self {
            table,
            provider,
            seq: AtomicU64::new(0),
        }
    }

    /// The route table this navigator serves.
    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Evaluate a request once, without waiting out a pending provider.
    ///
    /// Unguarded routes are allowed without consulting identity. Guarded
    /// routes are decided from one reading; a provider that is still
    /// initializing yields [`Decision::Defer`], which [`navigate`](Self::navigate)
    /// knows how to resolve.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::RouteNotFound`] if the target matches no
    /// route.
    pub async fn evaluate(&self, request: &NavigationRequest) -> Result<Decision, NavigationError> {
        let route = self.resolve(request)?;
        let Some(guard) = route.guard() else {
            return Ok(Decision::Allow);
        };
        let reading = self.read_identity(request).await;
        Ok(guard.decide(&reading))
    }

    /// Resolve a request to its final outcome.
    ///
    /// The full pipeline: route resolution, one identity reading, and for
    /// a provider that is still initializing, a readiness wait followed by
    /// exactly one re-evaluation. A provider that is pending or failing
    /// after the wait resolves fail-closed to the guard's fallback.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Superseded`] if a newer request started
    /// before this one resolved, and [`NavigationError::RouteNotFound`]
    /// if the target matches no route.
    pub async fn navigate(&self, request: &NavigationRequest) -> Result<Outcome, NavigationError> {
        let ticket = self.begin(request);
        let route = self.resolve(request)?;
        let Some(guard) = route.guard() else {
            self.finish(ticket)?;
            debug!(path = request.target(), view = route.view(), "navigation allowed");
            return Ok(Outcome::Allow);
        };

        let mut reading = self.read_identity(request).await;
        if matches!(reading, Ok(IdentityState::Pending)) {
            debug!(path = request.target(), "identity pending, deferring navigation");
            reading = self.provider.ready().await;
            if let Err(error) = &reading {
                warn!(
                    path = request.target(),
                    error = %error,
                    "identity provider unavailable, failing closed"
                );
            }
        }
        self.finish(ticket)?;

        let outcome = match guard.decide(&reading) {
            Decision::Allow => Outcome::Allow,
            Decision::Redirect(path) => Outcome::Redirect(path),
            Decision::Defer(_) => {
                // The provider would not settle; err toward the
                // unauthenticated route.
                warn!(
                    path = request.target(),
                    "identity still pending after readiness wait, failing closed"
                );
                Outcome::Redirect(guard.fallback().to_owned())
            }
        };
        match &outcome {
            Outcome::Allow => {
                debug!(path = request.target(), view = route.view(), "navigation allowed");
            }
            Outcome::Redirect(path) => {
                debug!(path = request.target(), redirect = path.as_str(), "navigation redirected");
            }
        }
        Ok(outcome)
    }

    /// Resolve a request and apply the outcome through `controller`.
    ///
    /// Superseded evaluations are never applied: the error propagates
    /// before the controller is touched.
    ///
    /// # Errors
    ///
    /// Propagates every [`navigate`](Self::navigate) error.
    pub async fn dispatch<C: NavigationController>(
        &self,
        request: &NavigationRequest,
        controller: &mut C,
    ) -> Result<(), NavigationError> {
        match self.navigate(request).await? {
            Outcome::Allow => controller.allow(request),
            Outcome::Redirect(path) => controller.redirect_to(request, &path),
        }
        Ok(())
    }

    fn resolve(&self, request: &NavigationRequest) -> Result<MatchedRoute<'_>, NavigationError> {
        self.table.resolve(request.target()).ok_or_else(|| {
            debug!(path = request.target(), "no route matched");
            NavigationError::RouteNotFound {
                path: request.target().to_owned(),
            }
        })
    }

    async fn read_identity(
        &self,
        request: &NavigationRequest,
    ) -> Result<IdentityState, IdentityUnavailable> {
        let reading = self.provider.current_identity().await;
        if let Err(error) = &reading {
            warn!(
                path = request.target(),
                error = %error,
                "identity provider unavailable, failing closed"
            );
        }
        reading
    }

    fn begin(&self, request: &NavigationRequest) -> u64 {
        let ticket = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            path = request.target(),
            origin = request.origin(),
            ticket,
            "navigation requested"
        );
        ticket
    }

    fn finish(&self, ticket: u64) -> Result<(), NavigationError> {
        if self.seq.load(Ordering::Acquire) == ticket {
            Ok(())
        } else {
            debug!(ticket, "navigation superseded, discarding result");
            Err(NavigationError::Superseded)
        }
    }
}
