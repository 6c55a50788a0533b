use std::io;

use axum::{http::StatusCode, response::IntoResponse};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Conflict(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Custom(&'static str),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("media storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub const fn not_found() -> Self {
        Error::ApiError(ApiError::NotFound)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Error::ApiError(ApiError::BadRequest(msg.into()))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Reqwest(e) => {
                tracing::warn!(%e, "upstream request failed");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Storage(e) => {
                tracing::error!(%e, "media storage error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Jwt(e) => {
                tracing::debug!(%e, "token rejected");
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            Error::ApiError(api_error) => match api_error {
                ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
                ApiError::BadRequest(s) => (StatusCode::BAD_REQUEST, s).into_response(),
                ApiError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
                }
                ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
                ApiError::Conflict(s) => (StatusCode::CONFLICT, s).into_response(),
            },
            Error::Custom(s) => (StatusCode::BAD_REQUEST, s.to_string()).into_response(),
            Error::Yaml(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Error::Toml(e) => (StatusCode::BAD_REQUEST, e.message().to_string()).into_response(),
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
        }
    }
}
