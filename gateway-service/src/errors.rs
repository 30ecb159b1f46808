//! Request-level failures and their public JSON rendering.
//!
//! Every variant maps to a fixed client message; underlying causes are logged and
//! never leaked in the response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const USERS_FETCH_FAILED: &str =
    "Une erreur s'est produite lors de la récupération des utilisateurs.";
pub const USER_POSTS_FETCH_FAILED: &str =
    "Une erreur s'est produite lors de la récupération des données.";
pub const POSTS_FETCH_FAILED: &str = "Une erreur s'est produite lors de la récupération des posts.";
pub const POSTS_WRITE_FAILED: &str = "Une erreur s'est produite lors de l'écriture du fichier.";
pub const POSTS_READ_FAILED: &str = "Une erreur s'est produite lors de la lecture du fichier.";
pub const POSTS_PARSE_FAILED: &str = "Erreur de parsing du fichier JSON.";
pub const POST_NOT_FOUND: &str = "Post non trouvé.";
pub const FILE_TYPE_NOT_ALLOWED: &str = "Error: File type not allowed!";
pub const NO_FILE_UPLOADED: &str = "No file uploaded";
pub const UNEXPECTED_FIELD: &str = "Unexpected field";
pub const INVALID_FILE_NAME: &str = "Invalid file name";
pub const UPLOAD_STORE_FAILED: &str = "Internal server error";

/// Which upstream call a handler was making; selects the public message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Users,
    UserWithPosts,
    Posts,
}

impl FetchTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchTarget::Users => "users",
            FetchTarget::UserWithPosts => "user_posts",
            FetchTarget::Posts => "posts",
        }
    }

    fn public_message(self) -> &'static str {
        match self {
            FetchTarget::Users => USERS_FETCH_FAILED,
            FetchTarget::UserWithPosts => USER_POSTS_FETCH_FAILED,
            FetchTarget::Posts => POSTS_FETCH_FAILED,
        }
    }
}

impl std::fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream {0} request failed: {1}")]
    Upstream(FetchTarget, #[source] reqwest::Error),

    #[error("failed to read posts file: {0}")]
    FileRead(#[source] std::io::Error),

    #[error("failed to write posts file: {0}")]
    FileWrite(#[source] std::io::Error),

    #[error("posts file is not valid: {0}")]
    JsonParse(String),

    #[error("upload rejected by file type filter")]
    UploadRejected,

    #[error("unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("invalid upload file name '{0}'")]
    InvalidFileName(String),

    #[error("no file uploaded")]
    MissingUploadField,

    #[error("malformed multipart body: {0}")]
    MalformedUpload(String),

    #[error("failed to store upload: {0}")]
    UploadWrite(#[source] std::io::Error),

    #[error("post {0:?} not found")]
    PostNotFound(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(..)
            | GatewayError::FileRead(_)
            | GatewayError::FileWrite(_)
            | GatewayError::JsonParse(_)
            | GatewayError::UploadWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UploadRejected
            | GatewayError::UnexpectedField(_)
            | GatewayError::InvalidFileName(_)
            | GatewayError::MissingUploadField
            | GatewayError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            GatewayError::PostNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Upstream(target, _) => target.public_message().to_string(),
            GatewayError::FileRead(_) => POSTS_READ_FAILED.to_string(),
            GatewayError::FileWrite(_) => POSTS_WRITE_FAILED.to_string(),
            GatewayError::JsonParse(_) => POSTS_PARSE_FAILED.to_string(),
            GatewayError::UploadRejected => FILE_TYPE_NOT_ALLOWED.to_string(),
            GatewayError::UnexpectedField(_) => UNEXPECTED_FIELD.to_string(),
            GatewayError::InvalidFileName(_) => INVALID_FILE_NAME.to_string(),
            GatewayError::MissingUploadField => NO_FILE_UPLOADED.to_string(),
            GatewayError::MalformedUpload(msg) => msg.clone(),
            GatewayError::UploadWrite(_) => UPLOAD_STORE_FAILED.to_string(),
            GatewayError::PostNotFound(_) => POST_NOT_FOUND.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}
