//! Label crop endpoint.
//!
//! Accepts a multipart PDF upload and replies with the cropped JPEG.

use axum::{
    extract::{Multipart, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::info;

use crate::error::ServiceError;

use super::AppState;

/// Upload a label PDF and receive the cropped JPEG
pub async fn crop_label_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ServiceError> {
    let mut file_data: Option<(Vec<u8>, String)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        if name.as_str() == "file" {
            let filename = field.file_name().unwrap_or("label.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ServiceError::InvalidRequest {
                    message: e.to_string(),
                })?;
            file_data = Some((data.to_vec(), filename));
        }
    }

    let (data, filename) = file_data.ok_or_else(|| ServiceError::InvalidRequest {
        message: "Missing 'file' field in multipart upload".to_string(),
    })?;

    info!(filename = %filename, bytes = data.len(), "Crop request received");

    // Cropping is CPU-bound (render + contour pass), keep it off the runtime
    let service = state.service.clone();
    let label = tokio::task::spawn_blocking(move || service.crop_pdf(&data))
        .await
        .map_err(|e| ServiceError::Internal {
            message: format!("Crop task panicked: {e}"),
        })??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::IMAGE_JPEG.to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cropped.jpg\"".to_string(),
            ),
            (
                HeaderName::from_static("x-crop-heuristic"),
                label.heuristic.as_str().to_string(),
            ),
        ],
        label.jpeg,
    )
        .into_response())
}
