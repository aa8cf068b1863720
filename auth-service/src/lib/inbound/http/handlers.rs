use std::net::IpAddr;

use auth::GateError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::session::models::ClientContext;
use crate::domain::user::models::UserId;

pub mod admin;
pub mod change_password;
pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod sessions;
pub mod verify;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error response carrying an HTTP status and a stable error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponseBody::new_error(self.status, self.code, self.message)),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::Validation(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailExists | AuthError::UsernameExists | AuthError::RoleExists => {
                StatusCode::CONFLICT
            }
            AuthError::InvalidCredentials | AuthError::TokenInvalid | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::UserInactive | AuthError::UserNotVerified | AuthError::Forbidden => {
                StatusCode::FORBIDDEN
            }
            AuthError::UserNotFound | AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if err.is_internal() {
            tracing::error!(code = err.code(), "Request failed: {}", err);
        }

        Self::new(status, err.code(), err.public_message())
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        let status = match err {
            GateError::InsufficientPermissions => StatusCode::FORBIDDEN,
            GateError::MissingToken | GateError::InvalidTokenFormat | GateError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
        };

        Self::new(status, err.code(), err.to_string())
    }
}

/// `Json` extractor whose rejections use the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), "Request body rejected: {}", rejection.body_text());
        Self::validation(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, code: &str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                code: code.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: String,
    pub message: String,
}

/// Client address and user agent as reported by the request headers.
///
/// `X-Forwarded-For` (first hop) wins over `X-Real-IP`.
pub fn client_context(headers: &HeaderMap) -> ClientContext {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    let forwarded = header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());
    let ip_address = forwarded.or_else(|| header("x-real-ip"));

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());

    ClientContext::new(ip_address, user_agent)
}

/// Parse a user id taken from a URL path.
pub fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::from_string(raw).map_err(|e| ApiError::from(AuthError::from(e)))
}
