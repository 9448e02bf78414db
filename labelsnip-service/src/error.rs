use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Cropping failed")]
    Crop(#[from] CropError),

    #[error("File too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors from the crop pipeline
#[derive(Error, Debug)]
pub enum CropError {
    #[error("Failed to load PDFium library")]
    PdfiumLoad {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to load PDF document")]
    PdfLoad {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("PDF has no pages")]
    EmptyDocument,

    #[error("Failed to render page")]
    PageRender {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No label content detected on page")]
    NoContentDetected,

    #[error("Failed to encode output image")]
    Encode(#[source] image::ImageError),

    #[error("IO error")]
    Io(#[source] std::io::Error),
}

/// API error response (matches Axum's built-in JsonRejection format)
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Crop(CropError::NoContentDetected)
            | ServiceError::Crop(CropError::EmptyDocument) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Crop(CropError::PdfLoad { .. }) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Crop(CropError::PdfiumLoad { .. }) => "pdfium_unavailable",
            ServiceError::Crop(CropError::PdfLoad { .. }) => "pdf_load_error",
            ServiceError::Crop(CropError::EmptyDocument) => "empty_document",
            ServiceError::Crop(CropError::PageRender { .. }) => "page_render_error",
            ServiceError::Crop(CropError::NoContentDetected) => "no_content_detected",
            ServiceError::Crop(CropError::Encode(_)) => "encode_error",
            ServiceError::Crop(CropError::Io(_)) => "io_error",
            ServiceError::FileTooLarge { .. } => "file_too_large",
            ServiceError::InvalidRequest { .. } => "invalid_request",
            ServiceError::Internal { .. } => "internal_error",
        }
    }

    /// Full message including the source chain, for API responses
    fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();

        let response = ErrorResponse {
            message: self.full_message(),
            code: Some(code),
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_content_maps_to_unprocessable() {
        let err = ServiceError::Crop(CropError::NoContentDetected);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "no_content_detected");
    }

    #[test]
    fn test_oversized_upload_maps_to_payload_too_large() {
        let err = ServiceError::FileTooLarge {
            size: 100,
            max: 10,
        };
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_full_message_includes_source_chain() {
        let err = ServiceError::Crop(CropError::Io(std::io::Error::other("disk gone")));
        let message = ServiceError::full_message(&err);
        assert!(message.contains("IO error"));
        assert!(message.contains("disk gone"));
    }
}
