//! Error taxonomy
//!
//! `ServeError` covers failures that end a request and always renders to a
//! well-formed plaintext response. `StartupError` covers everything that can
//! go wrong before the first request is served.

use std::path::PathBuf;

use hyper::StatusCode;
use thiserror::Error;

use crate::http::{response, Response};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Error 404, file not found.")]
    NotFound,

    #[error("FORBIDDEN: {0}")]
    Forbidden(String),

    #[error("INTERNAL ERROR: {0}")]
    Internal(String),
}

impl ServeError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response {
        response::build_plain_response(self.status(), self.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("root {path} is not usable: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("root {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
