//! Flash messages and the mapping from directory errors to HTTP responses.

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::FormRejection;
use fyyur_db::sea_orm::DbErr;
use fyyur_db::DirectoryError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Danger,
}

/// User-facing outcome of a form submission.
#[derive(Debug, Serialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Error kind tag, only on failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl Flash {
    fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            id: None,
            redirect: None,
            error: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Info, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Danger, message)
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect = Some(path.into());
        self
    }
}

/// A directory error plus the handler's description of what failed.
#[derive(Debug)]
pub struct ApiError {
    error: DirectoryError,
    context: Option<String>,
}

impl ApiError {
    pub fn with_context(error: DirectoryError, context: impl Into<String>) -> Self {
        Self {
            error,
            context: Some(context.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DirectoryError::ConstraintViolation(_) => StatusCode::CONFLICT,
            DirectoryError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            DirectoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text shown to the user. Validation details are safe to echo;
    /// database internals are not.
    pub fn message(&self) -> String {
        let context = self.context.as_deref().unwrap_or("An error occurred.");
        match &self.error {
            DirectoryError::NotFound(what) if self.context.is_none() => {
                format!("Not found: {what}")
            }
            DirectoryError::NotFound(_) => format!("{context} It does not exist."),
            DirectoryError::Validation(detail) => format!("{context} {detail}"),
            DirectoryError::ConstraintViolation(_) => {
                format!("{context} It conflicts with existing data.")
            }
            DirectoryError::Connectivity(_) => {
                format!("{context} The database is unavailable, please try again later.")
            }
            DirectoryError::Database(_) => context.to_string(),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(error: DirectoryError) -> Self {
        Self {
            error,
            context: None,
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        DirectoryError::from(err).into()
    }
}

/// An id segment that does not parse cannot name a record.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        DirectoryError::NotFound(rejection.body_text()).into()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        DirectoryError::Validation(rejection.to_string()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.error {
            DirectoryError::Database(e) => tracing::error!(error = %e, "database error"),
            DirectoryError::Connectivity(e) => tracing::error!(error = %e, "database unreachable"),
            DirectoryError::ConstraintViolation(e) => {
                tracing::warn!(error = %e, "constraint violation")
            }
            DirectoryError::NotFound(_) | DirectoryError::Validation(_) => {
                tracing::debug!(error = %self.error, "request rejected")
            }
        }

        let mut flash = Flash::danger(self.message());
        flash.error = Some(self.error.kind());
        (self.status(), Json(flash)).into_response()
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<Flash>) {
    let mut flash = Flash::danger("Page not found");
    flash.error = Some("not_found");
    (StatusCode::NOT_FOUND, Json(flash))
}
