//! Router-level tests for the auth crate
//!
//! Every request goes through the real `Router` (validator layers included)
//! against the in-memory store.

#[cfg(test)]
mod support {
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::application::config::AuthConfig;
    use crate::domain::repository::GatewayRepository;
    use crate::infra::memory::MemoryAuthRepository;
    use crate::presentation::router::gateway_router;

    pub struct Reply {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Value,
    }

    impl Reply {
        pub fn message(&self) -> &str {
            self.body["message"].as_str().unwrap_or_default()
        }

        /// `name=value` part of the Set-Cookie header
        pub fn cookie(&self) -> String {
            self.headers
                .get(header::SET_COOKIE)
                .expect("Set-Cookie header")
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string()
        }
    }

    /// In-memory sink for formatted log lines
    #[derive(Clone, Default)]
    pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        pub fn output(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    pub fn app() -> Router {
        app_with(MemoryAuthRepository::new())
    }

    pub fn app_with<R: GatewayRepository>(repo: R) -> Router {
        gateway_router(repo, test_config())
    }

    pub fn test_config() -> AuthConfig {
        AuthConfig {
            session_secret: [7u8; 32],
            ..AuthConfig::development()
        }
    }

    pub async fn send(app: &Router, req: Request<Body>) -> Reply {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        Reply {
            status,
            headers,
            body,
        }
    }

    pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        post_raw(uri, &body.to_string())
    }

    pub fn post_json_with_cookie(uri: &str, body: Value, cookie: &str) -> Request<Body> {
        let mut req = post_json(uri, body);
        req.headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        req
    }

    pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn credentials(username: &str, password: &str) -> Value {
        serde_json::json!({ "username": username, "password": password })
    }

    pub async fn register(app: &Router, username: &str, password: &str) -> Reply {
        send(
            app,
            post_json("/api/auth/register", credentials(username, password)),
        )
        .await
    }

    pub async fn login(app: &Router, username: &str, password: &str) -> Reply {
        send(
            app,
            post_json("/api/auth/login", credentials(username, password)),
        )
        .await
    }
}

#[cfg(test)]
mod register_tests {
    use super::support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_register_returns_created_user_without_hash() {
        let app = app();
        let reply = register(&app, "sue", "pass").await;

        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body, serde_json::json!({ "id": 1, "username": "sue" }));
    }

    #[tokio::test]
    async fn test_register_assigns_distinct_ids() {
        let app = app();
        let a = register(&app, "ann", "pass1").await;
        let b = register(&app, "bob", "pass2").await;
        assert_ne!(a.body["id"], b.body["id"]);
    }

    #[tokio::test]
    async fn test_register_taken_username_regardless_of_password() {
        let app = app();
        register(&app, "sue", "pass").await;

        let reply = register(&app, "sue", "another-pass").await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.message(), "Username taken");

        // Username check runs before the length check
        let reply = register(&app, "sue", "ab").await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.message(), "Username taken");
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let app = app();
        let reply = register(&app, "sue", "abc").await;

        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.message(), "Password must be longer than 3 chars");

        // Nothing was stored, so the name is still free
        let reply = register(&app, "sue", "abcd").await;
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_register_short_password_is_counted_as_submitted() {
        let app = app();

        // U+3300 is a single character even though NFKC expands it
        let reply = register(&app, "sue", "\u{3300}").await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.message(), "Password must be longer than 3 chars");

        let reply = register(&app, "sue", "パスワー").await;
        assert_eq!(reply.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_wrong_method_on_credential_routes() {
        let app = app();

        for uri in ["/api/auth/register", "/api/auth/login"] {
            let reply = send(&app, get(uri, None)).await;
            assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_register_usernames_are_case_sensitive() {
        let app = app();
        assert_eq!(register(&app, "sue", "pass").await.status, StatusCode::CREATED);
        assert_eq!(register(&app, "Sue", "pass").await.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        let app = app();

        for body in [
            "not json",
            "{}",
            r#"{"username":"sue"}"#,
            r#"{"password":"pass"}"#,
            r#"{"username":"   ","password":"pass"}"#,
            r#"{"username":1,"password":"pass"}"#,
        ] {
            let reply = send(&app, post_raw("/api/auth/register", body)).await;
            assert_eq!(reply.status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(reply.message(), "username and password are required");
        }
    }
}

#[cfg(test)]
mod login_tests {
    use super::support::*;
    use axum::http::{StatusCode, header};

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let app = app();
        register(&app, "sue", "pass").await;

        let reply = login(&app, "sue", "pass").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.message(), "Welcome sue!");

        let set_cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("chocolatechip="));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let app = app();
        register(&app, "sue", "pass").await;

        let wrong = login(&app, "sue", "wrong").await;
        let unknown = login(&app, "nobody", "pass").await;

        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.body, unknown.body);
        assert_eq!(wrong.message(), "Invalid credentials");
        assert!(wrong.headers.get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_login_warns_once() {
        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = app();
        let reply = login(&app, "nobody", "pass").await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

        let output = logs.output();
        assert_eq!(output.matches("WARN").count(), 1, "logs: {output}");
        assert!(output.contains("Invalid login attempt"));
    }

    #[tokio::test]
    async fn test_login_short_password() {
        let app = app();
        register(&app, "sue", "pass").await;

        let reply = login(&app, "sue", "abc").await;
        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.message(), "Password must be longer than 3 chars");
    }

    #[tokio::test]
    async fn test_login_malformed_body() {
        let app = app();
        let reply = send(&app, post_raw("/api/auth/login", "{")).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_rotates_existing_session() {
        let app = app();
        register(&app, "sue", "pass").await;

        let first = login(&app, "sue", "pass").await.cookie();
        let second = send(
            &app,
            post_json_with_cookie("/api/auth/login", credentials("sue", "pass"), &first),
        )
        .await
        .cookie();
        assert_ne!(first, second);

        let old = send(&app, get("/api/auth/session", Some(&first))).await;
        assert_eq!(old.body["authenticated"], false);

        let new = send(&app, get("/api/auth/session", Some(&second))).await;
        assert_eq!(new.body["authenticated"], true);
    }
}

#[cfg(test)]
mod session_tests {
    use super::support::*;
    use axum::http::{StatusCode, header};
    use chrono::Duration;

    use crate::application::session_token;
    use crate::domain::entity::auth_session::AuthSession;
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::username::Username;
    use crate::infra::memory::MemoryAuthRepository;

    #[tokio::test]
    async fn test_logout_without_session() {
        let app = app();
        let reply = send(&app, get("/api/auth/logout", None)).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.message(), "No session");
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let app = app();
        register(&app, "sue", "pass").await;
        let cookie = login(&app, "sue", "pass").await.cookie();

        let reply = send(&app, get("/api/auth/logout", Some(&cookie))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.message(), "logged out");

        let cleared = reply.headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));

        // The session is gone
        let again = send(&app, get("/api/auth/logout", Some(&cookie))).await;
        assert_eq!(again.message(), "No session");
    }

    #[tokio::test]
    async fn test_session_status() {
        let app = app();

        let anonymous = send(&app, get("/api/auth/session", None)).await;
        assert_eq!(anonymous.status, StatusCode::OK);
        assert_eq!(anonymous.body, serde_json::json!({ "authenticated": false }));

        register(&app, "sue", "pass").await;
        let cookie = login(&app, "sue", "pass").await.cookie();

        let reply = send(&app, get("/api/auth/session", Some(&cookie))).await;
        assert_eq!(reply.body["authenticated"], true);
        assert_eq!(reply.body["id"], 1);
        assert_eq!(reply.body["username"], "sue");
        assert!(reply.body["expiresAtMs"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_no_session() {
        let app = app();
        register(&app, "sue", "pass").await;
        let cookie = login(&app, "sue", "pass").await.cookie();

        // Flip the last signature character
        let mut tampered = cookie.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let status = send(&app, get("/api/auth/session", Some(&tampered))).await;
        assert_eq!(status.body["authenticated"], false);

        let users = send(&app, get("/api/users", Some(&tampered))).await;
        assert_eq!(users.status, StatusCode::UNAUTHORIZED);

        let logout = send(&app, get("/api/auth/logout", Some(&tampered))).await;
        assert_eq!(logout.message(), "No session");

        // The real session survived
        let logout = send(&app, get("/api/auth/logout", Some(&cookie))).await;
        assert_eq!(logout.message(), "logged out");
    }

    #[tokio::test]
    async fn test_expired_session_is_no_session() {
        let repo = MemoryAuthRepository::new();
        let app = app_with(repo.clone());
        register(&app, "sue", "pass").await;

        let user = repo
            .find_by_username(&Username::new("sue").unwrap())
            .await
            .unwrap()
            .unwrap();
        let expired = AuthSession::new(&user, Duration::seconds(-5));
        repo.create(&expired).await.unwrap();

        let token = session_token::issue(&test_config().session_secret, expired.session_id);
        let cookie = format!("chocolatechip={token}");

        let status = send(&app, get("/api/auth/session", Some(&cookie))).await;
        assert_eq!(status.body["authenticated"], false);

        // Removed on sight
        assert!(repo.find(expired.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_users_requires_session() {
        let app = app();
        register(&app, "ann", "pass").await;
        register(&app, "bob", "pass").await;

        let denied = send(&app, get("/api/users", None)).await;
        assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
        assert_eq!(denied.message(), "You shall not pass!");

        let cookie = login(&app, "ann", "pass").await.cookie();
        let reply = send(&app, get("/api/users", Some(&cookie))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            serde_json::json!([
                { "id": 1, "username": "ann" },
                { "id": 2, "username": "bob" }
            ])
        );
    }
}

#[cfg(test)]
mod store_failure_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    use crate::domain::entity::{
        auth_session::AuthSession,
        user::{NewUser, User},
    };
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::{
        user_password::{RawPassword, UserPassword},
        username::Username,
    };
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::MemoryAuthRepository;

    /// Memory store whose writes to users and session deletes fail
    #[derive(Clone, Default)]
    struct FailingRepository {
        inner: MemoryAuthRepository,
    }

    impl UserRepository for FailingRepository {
        async fn add(&self, _user: &NewUser) -> AuthResult<User> {
            Err(AuthError::Internal("disk full".to_string()))
        }

        async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
            self.inner.find_by_username(username).await
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            self.inner.list().await
        }
    }

    impl SessionRepository for FailingRepository {
        async fn create(&self, session: &AuthSession) -> AuthResult<()> {
            self.inner.create(session).await
        }

        async fn find(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
            self.inner.find(session_id).await
        }

        async fn destroy(&self, _session_id: Uuid) -> AuthResult<bool> {
            Err(AuthError::Internal("session store offline".to_string()))
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            self.inner.cleanup_expired().await
        }
    }

    #[tokio::test]
    async fn test_register_store_failure_is_500_with_raw_text() {
        let app = app_with(FailingRepository::default());
        let reply = register(&app, "sue", "pass").await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.message(), "disk full");
    }

    #[tokio::test]
    async fn test_logout_destroy_failure() {
        let repo = FailingRepository::default();
        let raw = RawPassword::new("pass".to_string()).unwrap();
        repo.inner
            .add(&NewUser::new(
                Username::new("sue").unwrap(),
                UserPassword::hash(&raw, None).await.unwrap(),
            ))
            .await
            .unwrap();

        let app = app_with(repo);
        let cookie = login(&app, "sue", "pass").await.cookie();

        let reply = send(&app, get("/api/auth/logout", Some(&cookie))).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.message(), "Can't log out");
    }
}
