//! The tagged decision produced by evaluating one navigation request.

/// Why an evaluation could not be decided yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeferReason {
    /// The identity provider has not finished initializing.
    IdentityPending,
}

/// The outcome of evaluating a navigation request against a route's guard.
///
/// Exactly one `Decision` is produced per request. The guard never performs
/// the navigation itself; the caller applies the decision through its
/// navigation controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The navigation may proceed to its target view.
    Allow,
    /// The navigation must be sent to the contained path instead.
    Redirect(String),
    /// The decision must wait for the identity provider and be retried.
    Defer(DeferReason),
}

impl Decision {
    /// Whether this decision lets the navigation proceed.
    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect path, if the navigation was turned away.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(path) => Some(path),
            _ => None,
        }
    }
}
