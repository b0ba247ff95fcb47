use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity id does not exist. Never retried.
    #[error("{0} {1} not found")]
    NotFound(&'static str, u64),

    /// Structurally invalid request; fails fast, no partial state.
    #[error("{0}")]
    StructuralInvalid(String),

    /// A status change the transition table does not allow.
    #[error("illegal {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored document failed to decode (punch list, exception-id set).
    #[error("corrupt stored document: {0}")]
    Corrupt(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::StructuralInvalid(msg.into())
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(..) => StatusCode::NOT_FOUND,
            Error::StructuralInvalid(_) => StatusCode::BAD_REQUEST,
            Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            Error::Database(_) | Error::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Database(e) => {
                tracing::error!(error = %e, "database error");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal Server Error"
                }))
            }
            Error::Corrupt(detail) => {
                tracing::error!(%detail, "corrupt stored document");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal Server Error"
                }))
            }
            other => HttpResponse::build(other.status_code()).json(serde_json::json!({
                "message": other.to_string()
            })),
        }
    }
}
