use std::{
    collections::HashSet,
    fmt::{Debug, Formatter},
    sync::Arc,
};

use tracing::debug;

use super::{param::Params, RouteDefinition};
use crate::guard::GuardSpec;

/// What the matcher stores per registered pattern.
struct RouteEntry {
    pattern: String,
    view: String,
    guard: Option<GuardSpec>,
}

/// An immutable table of route definitions.
///
/// Built once at startup, never mutated afterwards. `RouteTable` shares its
/// matcher through an `Arc`, so clones are cheap and can safely be handed
/// to multiple navigators or threads.
#[derive(Clone)]
pub struct RouteTable {
    inner: Arc<matchit::Router<RouteEntry>>,
    routes: usize,
}

impl Debug for RouteTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

/// Error building a route table.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouteTableBuildError {
    /// Two definitions share a path.
    #[error("duplicate route path `{path}`")]
    DuplicatePath {
        /// The path registered more than once.
        path: String,
    },
    /// The path pattern was rejected by the matcher.
    #[error("invalid route pattern: {0}")]
    InvalidPattern(#[from] matchit::InsertError),
}

/// Error loading a route table from a configuration document.
#[cfg(feature = "json")]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouteConfigError {
    /// The document is not valid JSON for a list of route definitions.
    #[error("malformed route configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The definitions do not form a valid table.
    #[error(transparent)]
    Build(#[from] RouteTableBuildError),
}

/// Borrowed view of the table entry a navigation target resolved to.
#[derive(Debug, Clone)]
pub struct MatchedRoute<'table> {
    view: &'table str,
    pattern: &'table str,
    guard: Option<&'table GuardSpec>,
    params: Params,
}

impl MatchedRoute<'_> {
    /// The opaque view identifier registered for the route.
    #[must_use]
    pub const fn view(&self) -> &str {
        self.view
    }

    /// The pattern the target path matched.
    #[must_use]
    pub const fn pattern(&self) -> &str {
        self.pattern
    }

    /// The route's access guard, if it has one.
    #[must_use]
    pub const fn guard(&self) -> Option<&GuardSpec> {
        self.guard
    }

    /// Parameters captured from the pattern's named segments.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }
}

impl RouteTable {
    /// Start assembling a table.
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Build a table from pre-constructed definitions.
    ///
    /// # Errors
    ///
    /// Fails if two definitions share a path or a pattern is rejected by
    /// the matcher.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = RouteDefinition>,
    ) -> Result<Self, RouteTableBuildError> {
        let mut seen = HashSet::new();
        let mut router = matchit::Router::new();
        let mut routes = 0;
        for definition in definitions {
            if !seen.insert(definition.path.clone()) {
                return Err(RouteTableBuildError::DuplicatePath {
                    path: definition.path,
                });
            }
            let entry = RouteEntry {
                pattern: definition.path.clone(),
                view: definition.view,
                guard: definition.guard,
            };
            router.insert(definition.path, entry)?;
            routes += 1;
        }
        debug!(routes, "route table built");
        Ok(Self {
            inner: Arc::new(router),
            routes,
        })
    }

    /// Load a table from a JSON document holding a list of definitions.
    ///
    /// ```
    /// use turnstile::RouteTable;
    ///
    /// # fn main() -> Result<(), turnstile::routing::RouteConfigError> {
    /// let table = RouteTable::from_json(
    ///     r#"[
    ///         { "path": "/", "view": "auth-view" },
    ///         { "path": "/chat", "view": "chat-view", "guard": { "fallback": "/" } }
    ///     ]"#,
    /// )?;
    /// assert_eq!(table.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the document is malformed or the definitions do not form a
    /// valid table.
    #[cfg(feature = "json")]
    pub fn from_json(document: &str) -> Result<Self, RouteConfigError> {
        let definitions: Vec<RouteDefinition> = serde_json::from_str(document)?;
        Ok(Self::from_definitions(definitions)?)
    }

    /// Resolve a concrete target path to its route, if one matches.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<MatchedRoute<'_>> {
        let matched = self.inner.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        Some(MatchedRoute {
            view: &matched.value.view,
            pattern: &matched.value.pattern,
            guard: matched.value.guard.as_ref(),
            params,
        })
    }

    /// Number of registered routes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.routes
    }

    /// Whether the table holds no routes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.routes == 0
    }
}

/// Assembles a [`RouteTable`] from individual routes.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    definitions: Vec<RouteDefinition>,
}

impl RouteTableBuilder {
    /// Register an unguarded route.
    #[must_use]
    pub fn route(mut self, path: impl Into<String>, view: impl Into<String>) -> Self {
        self.definitions.push(RouteDefinition::new(path, view));
        self
    }

    /// Register a guarded route with the given fallback path.
    #[must_use]
    pub fn guarded(
        mut self,
        path: impl Into<String>,
        view: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.definitions
            .push(RouteDefinition::new(path, view).with_guard(GuardSpec::redirect_to(fallback)));
        self
    }

    /// Register a pre-constructed definition.
    #[must_use]
    pub fn definition(mut self, definition: RouteDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Build the table.
    ///
    /// # Errors
    ///
    /// Fails if two routes share a path or a pattern is rejected by the
    /// matcher.
    pub fn build(self) -> Result<RouteTable, RouteTableBuildError> {
        RouteTable::from_definitions(self.definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteTable, RouteTableBuildError};
    use crate::routing::RouteDefinition;

    fn table() -> RouteTable {
        RouteTable::builder()
            .route("/", "auth-view")
            .guarded("/chat", "chat-view", "/")
            .build()
            .unwrap()
    }

    #[test]
    fn resolves_registered_paths() {
        let table = table();
        let matched = table.resolve("/chat").unwrap();
        assert_eq!(matched.view(), "chat-view");
        assert_eq!(matched.pattern(), "/chat");
        assert!(matched.guard().is_some());

        let matched = table.resolve("/").unwrap();
        assert_eq!(matched.view(), "auth-view");
        assert!(matched.guard().is_none());
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        assert!(table().resolve("/missing").is_none());
    }

    #[test]
    fn captures_named_segments() {
        let table = RouteTable::builder()
            .route("/user/{name}", "profile-view")
            .build()
            .unwrap();
        let matched = table.resolve("/user/zen").unwrap();
        assert_eq!(matched.params().get("name").unwrap(), "zen");
    }

    #[test]
    fn rejects_duplicate_paths() {
        let error = RouteTable::builder()
            .route("/chat", "chat-view")
            .route("/chat", "other-view")
            .build()
            .unwrap_err();
        assert!(matches!(
            error,
            RouteTableBuildError::DuplicatePath { path } if path == "/chat"
        ));
    }

    #[test]
    fn definitions_round_trip_through_accessors() {
        let definition = RouteDefinition::new("/chat", "chat-view")
            .with_guard(crate::GuardSpec::redirect_to("/"));
        assert_eq!(definition.path(), "/chat");
        assert_eq!(definition.view(), "chat-view");
        assert_eq!(definition.guard().unwrap().fallback(), "/");
    }

    #[cfg(feature = "json")]
    #[test]
    fn loads_definitions_from_json() {
        let table = RouteTable::from_json(
            r#"[
                { "path": "/", "view": "auth-view" },
                { "path": "/chat", "view": "chat-view", "guard": { "fallback": "/" } }
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let matched = table.resolve("/chat").unwrap();
        assert_eq!(matched.guard().unwrap().fallback(), "/");
    }

    #[cfg(feature = "json")]
    #[test]
    fn malformed_json_is_rejected() {
        assert!(RouteTable::from_json("not json").is_err());
    }
}
