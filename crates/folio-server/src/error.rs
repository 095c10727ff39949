use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_core::FolioError;
use serde::Serialize;

use crate::service::CatalogError;

#[derive(Debug)]
pub enum AppError {
    /// Parametros o body invalidos
    BadRequest(String),

    /// Libro no encontrado
    NotFound(String),

    /// Store caido o fuera de deadline
    Unavailable(String),

    /// Error interno
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FolioError> for AppError {
    fn from(err: FolioError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(err.to_string())
        } else if err.is_unavailable() {
            AppError::Unavailable(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Unavailable(msg)
            | AppError::Internal(msg) => msg,
        };

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), %message, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            message,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::BookId;
    use folio_store::StoreError;

    #[test]
    fn catalog_errors_map_to_statuses() {
        let not_found: AppError = CatalogError::book_not_found(BookId::new(9)).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let timeout: AppError = CatalogError::from(StoreError::Timeout { millis: 5 }).into();
        assert_eq!(timeout.status(), StatusCode::SERVICE_UNAVAILABLE);

        let down: AppError = CatalogError::from(StoreError::unavailable("down")).into();
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);

        let internal: AppError = CatalogError::from(StoreError::Internal("boom".into())).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: AppError = FolioError::validation("title", "Book title must be set").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_uses_reason_phrase() {
        let response = AppError::NotFound("Book with id 3 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
