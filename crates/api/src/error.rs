//! API error type and its HTTP rendering.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use obrix_core::quotation::QuotationError;
use obrix_db::RepositoryError;
use obrix_shared::AppError;
use obrix_shared::types::{Envelope, ErrorEnvelope};

/// Handler result: a status code and an enveloped payload.
pub type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

/// 200 OK with an enveloped payload.
#[allow(clippy::unnecessary_wraps)]
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(Envelope::ok(data))))
}

/// 201 Created with an enveloped payload.
#[allow(clippy::unnecessary_wraps)]
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(Envelope::created(data))))
}

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// The wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<QuotationError> for ApiError {
    fn from(err: QuotationError) -> Self {
        let app = match &err {
            QuotationError::NotFound(_)
            | QuotationError::ItemNotFound(_)
            | QuotationError::DetailNotFound(_)
            | QuotationError::InputNotFound(_) => AppError::NotFound(err.to_string()),
            QuotationError::NotConfigured { .. } => AppError::BusinessRule(err.to_string()),
            QuotationError::InvalidPerformance(_)
            | QuotationError::NegativeValue { .. }
            | QuotationError::AmountOutOfRange { .. } => AppError::Validation(err.to_string()),
            QuotationError::Repository(msg) => AppError::Database(msg.clone()),
        };
        Self(app)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Quotation(e) => e.into(),
            RepositoryError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (status, Json(ErrorEnvelope::from(&self.0))).into_response()
    }
}
