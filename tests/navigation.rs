//! End-to-end navigation scenarios through the public API.

use turnstile::{
    identity::SharedIdentity, IdentitySnapshot, NavigationController, NavigationError,
    NavigationRequest, Navigator, Outcome, RouteTable,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn chat_app_table() -> RouteTable {
    RouteTable::builder()
        .route("/", "auth-view")
        .guarded("/chat", "chat-view", "/")
        .build()
        .unwrap()
}

#[derive(Default)]
struct WindowHistory {
    location: Option<String>,
}

impl NavigationController for WindowHistory {
    fn allow(&mut self, request: &NavigationRequest) {
        self.location = Some(request.target().to_owned());
    }

    fn redirect_to(&mut self, _request: &NavigationRequest, path: &str) {
        self.location = Some(path.to_owned());
    }
}

#[tokio::test]
async fn chat_is_gated_behind_authentication() {
    init_tracing();
    let identity = SharedIdentity::anonymous();
    let navigator = Navigator::new(chat_app_table(), identity.clone());

    // Unauthenticated: /chat bounces back to the landing route.
    let outcome = navigator
        .navigate(&NavigationRequest::new("/chat", "/"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Redirect("/".to_owned()));

    // After sign-in the same navigation goes through.
    identity.install(IdentitySnapshot::authenticated("u1"));
    let outcome = navigator
        .navigate(&NavigationRequest::new("/chat", "/"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Allow);

    // The landing route stays reachable regardless of identity.
    identity.sign_out();
    let outcome = navigator
        .navigate(&NavigationRequest::new("/", "/chat"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Allow);
}

#[tokio::test]
async fn outcomes_drive_the_controller() {
    init_tracing();
    let navigator = Navigator::new(chat_app_table(), SharedIdentity::anonymous());
    let mut history = WindowHistory::default();

    navigator
        .dispatch(&NavigationRequest::new("/chat", "/"), &mut history)
        .await
        .unwrap();
    assert_eq!(history.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn startup_navigation_waits_for_the_identity_backend() {
    init_tracing();
    let identity = SharedIdentity::uninitialized();
    let navigator = std::sync::Arc::new(Navigator::new(chat_app_table(), identity.clone()));

    // A deep link to /chat arrives before the identity backend has
    // reported; the navigation parks until the session is established.
    let pending = navigator.clone();
    let navigation = tokio::spawn(async move {
        pending
            .navigate(&NavigationRequest::new("/chat", "/"))
            .await
    });

    tokio::task::yield_now().await;
    identity.install(IdentitySnapshot::authenticated("u1"));

    assert_eq!(navigation.await.unwrap(), Ok(Outcome::Allow));
}

#[tokio::test]
async fn unknown_routes_are_reported() {
    init_tracing();
    let navigator = Navigator::new(chat_app_table(), SharedIdentity::anonymous());
    let error = navigator
        .navigate(&NavigationRequest::new("/settings", "/"))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        NavigationError::RouteNotFound {
            path: "/settings".to_owned()
        }
    );
}

#[cfg(feature = "json")]
#[tokio::test]
async fn tables_load_from_configuration() {
    init_tracing();
    let table = RouteTable::from_json(
        r#"[
            { "path": "/", "view": "auth-view" },
            { "path": "/chat", "view": "chat-view", "guard": { "fallback": "/" } }
        ]"#,
    )
    .unwrap();
    let navigator = Navigator::new(table, SharedIdentity::anonymous());

    let outcome = navigator
        .navigate(&NavigationRequest::new("/chat", "/"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Redirect("/".to_owned()));
}
