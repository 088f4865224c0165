#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

//! An access-control navigation core.
//!
//! Turnstile wires three pieces together: an immutable [`RouteTable`] built
//! at startup, a per-route access [`guard`](crate::guard), and a
//! [`Navigator`] that resolves each navigation attempt to a tagged decision
//! by consulting an injected [`IdentityProvider`]. Uncertainty always
//! resolves toward the unauthenticated route: a failed or unsettled
//! identity read redirects, it never exposes a protected view.
//!
//! ```
//! use turnstile::{
//!     identity::SharedIdentity, IdentitySnapshot, NavigationRequest, Navigator, RouteTable,
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let table = RouteTable::builder()
//!     .route("/", "auth-view")
//!     .guarded("/chat", "chat-view", "/")
//!     .build()?;
//!
//! let identity = SharedIdentity::anonymous();
//! let navigator = Navigator::new(table, identity.clone());
//!
//! // Unauthenticated visitors are turned back to the landing route.
//! let outcome = navigator.navigate(&NavigationRequest::new("/chat", "/")).await?;
//! assert_eq!(outcome.redirect_target(), Some("/"));
//!
//! identity.install(IdentitySnapshot::authenticated("u1"));
//! let outcome = navigator.navigate(&NavigationRequest::new("/chat", "/")).await?;
//! assert!(outcome.is_allow());
//! # Ok(())
//! # }
//! ```

pub mod guard;

pub mod identity;

pub mod navigator;

pub mod routing;

#[doc(inline)]
pub use turnstile_core::{
    Decision, DeferReason, IdentityProvider, IdentitySnapshot, IdentityState, IdentityUnavailable,
};

pub use guard::GuardSpec;
pub use navigator::{
    NavigationController, NavigationError, NavigationRequest, Navigator, Outcome,
};
pub use routing::{RouteDefinition, RouteTable};
