use std::sync::Arc;
use std::time::Duration;

use auth::AuthorizationGate;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin;
use super::handlers::change_password::change_password;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::logout::logout_all;
use super::handlers::profile;
use super::handlers::refresh::refresh_token;
use super::handlers::register::register;
use super::handlers::sessions::list_sessions;
use super::handlers::sessions::revoke_session;
use super::handlers::verify::verify_token;
use super::handlers::verify::whoami;
use super::middleware::optional_auth;
use super::middleware::require_admin;
use super::middleware::require_auth;
use crate::domain::account::ports::UserServicePort;
use crate::domain::auth::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub gate: Arc<AuthorizationGate>,
}

/// Build the HTTP API.
///
/// # Arguments
/// * `auth_service` - Credential and session flows
/// * `user_service` - Profile, account and role administration
/// * `gate` - Bearer token authorization used by the middleware
/// * `request_timeout` - Requests running longer are answered with 408
pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    user_service: Arc<dyn UserServicePort>,
    gate: Arc<AuthorizationGate>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        auth_service,
        user_service,
        gate,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh_token))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/verify", get(verify_token));

    let optional_routes = Router::new()
        .route("/api/v1/auth/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected_routes = Router::new()
        .route("/api/v1/auth/change-password", post(change_password))
        .route("/api/v1/auth/logout-all", post(logout_all))
        .route("/api/v1/auth/sessions", get(list_sessions))
        .route("/api/v1/auth/sessions/:session_id", delete(revoke_session))
        .route(
            "/api/v1/users/profile",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_profile),
        )
        .route("/api/v1/users/:user_id", get(profile::get_user))
        .route("/api/v1/users/:user_id/roles", get(profile::get_user_roles))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .route("/api/v1/admin/users", get(admin::list_users))
        .route(
            "/api/v1/admin/users/:user_id/activate",
            post(admin::activate_user),
        )
        .route(
            "/api/v1/admin/users/:user_id/deactivate",
            post(admin::deactivate_user),
        )
        .route("/api/v1/admin/users/roles/assign", post(admin::assign_role))
        .route("/api/v1/admin/users/roles/remove", delete(admin::remove_role))
        .route(
            "/api/v1/admin/roles",
            get(admin::list_roles).post(admin::create_role),
        )
        .route(
            "/api/v1/admin/roles/:role_id",
            put(admin::update_role).delete(admin::delete_role),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(optional_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use auth::TokenAuthority;
    use axum::body::Body;
    use axum::http::header::AUTHORIZATION;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::Request;
    use axum::http::StatusCode;
    use chrono::Duration as TokenTtl;
    use mockall::mock;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::domain::account::models::RoleAssignmentCommand;
    use crate::domain::account::models::UpdateProfileCommand;
    use crate::domain::account::models::UpdateRoleCommand;
    use crate::domain::auth::errors::AuthError;
    use crate::domain::auth::models::AccessTokenResult;
    use crate::domain::auth::models::AuthResult;
    use crate::domain::auth::models::ChangePasswordCommand;
    use crate::domain::auth::models::LoginCommand;
    use crate::domain::auth::models::RegisterCommand;
    use crate::domain::auth::models::TokenInfo;
    use crate::domain::role::models::CreateRoleCommand;
    use crate::domain::role::models::RoleId;
    use crate::domain::role::models::RoleInfo;
    use crate::domain::session::models::Session;
    use crate::domain::session::models::SessionId;
    use crate::domain::user::models::Pagination;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserPage;
    use crate::domain::user::models::UserProfile;

    mock! {
        pub TestAuthService {}
        #[async_trait]
        impl AuthServicePort for TestAuthService {
            async fn register(&self, command: RegisterCommand) -> Result<AuthResult, AuthError>;
            async fn login(&self, command: LoginCommand) -> Result<AuthResult, AuthError>;
            async fn refresh_token(&self, refresh_token: &str) -> Result<AccessTokenResult, AuthError>;
            async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;
            async fn logout_all(&self, user_id: &UserId) -> Result<u64, AuthError>;
            async fn verify_token(&self, token: &str) -> Result<TokenInfo, AuthError>;
            async fn change_password(&self, command: ChangePasswordCommand) -> Result<(), AuthError>;
            async fn active_sessions(&self, user_id: &UserId) -> Result<Vec<Session>, AuthError>;
            async fn revoke_session(&self, user_id: &UserId, session_id: &SessionId) -> Result<(), AuthError>;
            async fn purge_expired_sessions(&self) -> Result<u64, AuthError>;
        }
    }

    mock! {
        pub TestUserService {}
        #[async_trait]
        impl UserServicePort for TestUserService {
            async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, AuthError>;
            async fn update_profile(&self, user_id: &UserId, command: UpdateProfileCommand) -> Result<UserProfile, AuthError>;
            async fn delete_account(&self, user_id: &UserId) -> Result<(), AuthError>;
            async fn list_users(&self, pagination: Pagination) -> Result<UserPage, AuthError>;
            async fn activate_user(&self, user_id: &UserId) -> Result<UserProfile, AuthError>;
            async fn deactivate_user(&self, user_id: &UserId) -> Result<UserProfile, AuthError>;
            async fn assign_role(&self, command: RoleAssignmentCommand) -> Result<(), AuthError>;
            async fn remove_role(&self, command: RoleAssignmentCommand) -> Result<(), AuthError>;
            async fn get_user_roles(&self, user_id: &UserId) -> Result<Vec<RoleInfo>, AuthError>;
            async fn create_role(&self, command: CreateRoleCommand) -> Result<RoleInfo, AuthError>;
            async fn list_roles(&self) -> Result<Vec<RoleInfo>, AuthError>;
            async fn update_role(&self, role_id: &RoleId, command: UpdateRoleCommand) -> Result<RoleInfo, AuthError>;
            async fn delete_role(&self, role_id: &RoleId) -> Result<(), AuthError>;
        }
    }

    fn authority() -> Arc<TokenAuthority> {
        Arc::new(TokenAuthority::new(
            b"router_access_secret_at_least_32_bytes",
            b"router_refresh_secret_at_least_32_byte",
            "auth-service",
            "auth-clients",
        ))
    }

    fn router(auth_service: MockTestAuthService, user_service: MockTestUserService) -> Router {
        let authority = authority();
        create_router(
            Arc::new(auth_service),
            Arc::new(user_service),
            Arc::new(AuthorizationGate::new(authority)),
            Duration::from_secs(5),
        )
    }

    fn bearer(roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        let token = authority()
            .issue_access(
                Uuid::new_v4(),
                "a@x.com",
                "alice",
                &roles,
                TokenTtl::minutes(5),
            )
            .unwrap();
        format!("Bearer {}", token)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let router = router(MockTestAuthService::new(), MockTestUserService::new());

        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_register_conflict_body() {
        let mut auth_service = MockTestAuthService::new();
        auth_service
            .expect_register()
            .times(1)
            .returning(|_| Err(AuthError::EmailExists));

        let request = Request::post("/api/v1/auth/register")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email":"a@x.com","username":"alice","password":"Aa1!aaaa"}"#,
            ))
            .unwrap();
        let (status, body) = send(router(auth_service, MockTestUserService::new()), request).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status_code"], 409);
        assert_eq!(body["data"]["code"], "EMAIL_EXISTS");
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password_before_service() {
        let request = Request::post("/api/v1/auth/register")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email":"a@x.com","username":"alice","password":"weak"}"#,
            ))
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["code"], "WEAK_PASSWORD");
    }

    #[tokio::test]
    async fn test_admin_route_gating() {
        let request = Request::get("/api/v1/admin/roles")
            .header(AUTHORIZATION, bearer(&["user"]))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["data"]["code"], "INSUFFICIENT_PERMISSIONS");

        let request = Request::get("/api/v1/admin/roles")
            .header(AUTHORIZATION, "Basic abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["data"]["code"], "INVALID_TOKEN_FORMAT");
    }

    #[tokio::test]
    async fn test_internal_error_is_opaque() {
        let mut user_service = MockTestUserService::new();
        user_service
            .expect_list_roles()
            .times(1)
            .returning(|| Err(AuthError::Database("connection refused".to_string())));

        let request = Request::get("/api/v1/admin/roles")
            .header(AUTHORIZATION, bearer(&["admin"]))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(MockTestAuthService::new(), user_service), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["data"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_whoami_anonymous() {
        let request = Request::get("/api/v1/auth/whoami")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["authenticated"], false);
    }

    #[tokio::test]
    async fn test_logout_requires_refresh_token() {
        let request = Request::post("/api/v1/auth/logout")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{}"#))
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let request = Request::post("/api/v1/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email": "a@x.com""#))
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status_code"], 400);
        assert_eq!(body["data"]["code"], "VALIDATION_ERROR");

        let request = Request::post("/api/v1/auth/register")
            .body(Body::from(
                r#"{"email":"a@x.com","username":"alice","password":"Aa1!aaaa"}"#,
            ))
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_rejects_overlong_email_before_service() {
        let label = "d".repeat(60);
        let email = format!("{}@{label}.{label}.{label}.{label}.com", "a".repeat(64));
        let payload = serde_json::json!({
            "email": email,
            "username": "alice",
            "password": "Aa1!aaaa",
        });

        let request = Request::post("/api/v1/auth/register")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, body) = send(
            router(MockTestAuthService::new(), MockTestUserService::new()),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["code"], "VALIDATION_ERROR");
    }
}
