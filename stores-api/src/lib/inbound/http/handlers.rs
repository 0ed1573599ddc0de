use auth::PasswordError;
use auth::TokenError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::item::errors::ItemError;
use crate::store::errors::StoreError;
use crate::tag::errors::TagError;
use crate::user::errors::UserError;

pub mod items;
pub mod stores;
pub mod tags;
pub mod users;

const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Wrong username or password.
    Unauthorized(String),
    AdminRequired(String),
    Token(TokenError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, &'static str) {
        match self {
            ApiError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
                "internal_error",
            ),
            ApiError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                "validation_error",
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "bad_request"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), "not_found"),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), "conflict"),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, msg.clone(), "invalid_credentials")
            }
            ApiError::AdminRequired(msg) => {
                (StatusCode::UNAUTHORIZED, msg.clone(), "admin_required")
            }
            ApiError::Token(TokenError::Issue(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
                "internal_error",
            ),
            ApiError::Token(err) => (StatusCode::UNAUTHORIZED, err.to_string(), err.code()),
        }
    }
}

/// Body rejections keep the error envelope. Malformed JSON is a 400;
/// missing fields, wrong types and a missing content type are 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => ApiError::BadRequest(rejection.body_text()),
            _ => ApiError::UnprocessableEntity(rejection.body_text()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
            }
            ApiError::Token(TokenError::Issue(detail)) => {
                tracing::error!(error = %detail, "Token issuance failed");
            }
            _ => {}
        }

        let (status, message, error) = self.parts();

        (status, Json(ApiErrorBody::new(status, message, error))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByUsername(_) => {
                ApiError::NotFound(err.to_string())
            }
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("A user with that username or email already exists.".to_string())
            }
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::Password(PasswordError::Empty) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::InvalidUserId(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ItemError::NameAlreadyExists(_) | ItemError::UnknownStore(_) => {
                ApiError::Conflict(err.to_string())
            }
            ItemError::InvalidItemName(_) | ItemError::InvalidPrice(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            ItemError::AdminRequired => ApiError::AdminRequired(err.to_string()),
            ItemError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::NameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            StoreError::InvalidStoreName(_) => ApiError::UnprocessableEntity(err.to_string()),
            StoreError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<TagError> for ApiError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::NotFound(_)
            | TagError::StoreNotFound(_)
            | TagError::ItemNotFound(_)
            | TagError::NotLinked { .. } => ApiError::NotFound(err.to_string()),
            TagError::NameAlreadyExists { .. } | TagError::StillLinked(_) => {
                ApiError::Conflict(err.to_string())
            }
            TagError::StoreMismatch { .. } => ApiError::BadRequest(err.to_string()),
            TagError::InvalidTagName(_) => ApiError::UnprocessableEntity(err.to_string()),
            TagError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

/// Parse a numeric path segment. Ids are positive integers.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("Invalid id: {}", raw))),
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    status_code: u16,
    message: String,
    error: &'static str,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, message: String, error: &'static str) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message,
            error,
        }
    }
}

/// Plain acknowledgement payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
