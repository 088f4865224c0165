//! Route definitions and the immutable route table.
//!
//! A [`RouteTable`] is an ordered set of [`RouteDefinition`]s loaded once at
//! process start and immutable thereafter. Paths are unique within a table
//! and each route carries at most one [`GuardSpec`](crate::GuardSpec).
//!
//! Tables are assembled through the builder:
//! ```
//! use turnstile::RouteTable;
//!
//! # fn main() -> Result<(), turnstile::routing::RouteTableBuildError> {
//! let table = RouteTable::builder()
//!     .route("/", "auth-view")
//!     .guarded("/chat", "chat-view", "/")
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! Patterns may capture named segments, extracted via [`Params`]:
//! ```
//! use turnstile::RouteTable;
//!
//! # fn main() -> Result<(), turnstile::routing::RouteTableBuildError> {
//! let table = RouteTable::builder()
//!     .route("/user/{name}", "profile-view")
//!     .build()?;
//! let matched = table.resolve("/user/zen").unwrap();
//! assert_eq!(matched.params().get("name").unwrap(), "zen");
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

use crate::guard::GuardSpec;

mod param;
pub use param::{MissingParam, Params};

mod table;
#[cfg(feature = "json")]
pub use table::RouteConfigError;
pub use table::{MatchedRoute, RouteTable, RouteTableBuildError, RouteTableBuilder};

/// A single navigable route.
///
/// `view` is an opaque identifier for whatever the application renders at
/// the route; the table never dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteDefinition {
    pub(crate) path: String,
    pub(crate) view: String,
    #[serde(default)]
    pub(crate) guard: Option<GuardSpec>,
}

impl RouteDefinition {
    /// An unguarded route: navigation to it is always allowed.
    #[must_use]
    pub fn new(path: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: view.into(),
            guard: None,
        }
    }

    /// Attach an access guard to the route.
    #[must_use]
    pub fn with_guard(mut self, guard: GuardSpec) -> Self {
        self.guard = Some(guard);
        self
    }

    /// The route's path pattern.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The opaque view identifier.
    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    /// The route's guard, if it has one.
    #[must_use]
    pub const fn guard(&self) -> Option<&GuardSpec> {
        self.guard.as_ref()
    }
}
