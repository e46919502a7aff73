use axum::http::StatusCode;
use std::io;

/// Persistence failures. The store logs these and degrades; they never reach callers.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {record}: {source}")]
    Read {
        record: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {record}: {source}")]
    Write {
        record: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {record}: {source}")]
    Encode {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected import payload. The live store is untouched when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("import payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("import payload is invalid: {0}")]
    Validation(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<crate::date_key::InvalidDateKey> for AppError {
    fn from(err: crate::date_key::InvalidDateKey) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
