//! Service coordinator: upload staging and crop orchestration.

use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::config::StaticConfig;
use crate::crop::{self, CroppedLabel};
use crate::error::{CropError, ServiceError, ServiceResult};

/// Main service coordinator
pub struct LabelCropService {
    pub config: Arc<StaticConfig>,
}

impl LabelCropService {
    pub fn new(config: Arc<StaticConfig>) -> Self {
        Self { config }
    }

    /// Crop the label in the uploaded PDF bytes to a JPEG.
    ///
    /// The bytes are staged in a single temporary file for the duration of
    /// the request; pdfium reads from that path and the file is removed on
    /// drop. Blocking: callers on the async runtime should wrap this in
    /// `spawn_blocking`.
    pub fn crop_pdf(&self, pdf_bytes: &[u8]) -> ServiceResult<CroppedLabel> {
        let max_size = self.config.limits.max_upload_bytes;
        if pdf_bytes.len() as u64 > max_size {
            return Err(ServiceError::FileTooLarge {
                size: pdf_bytes.len() as u64,
                max: max_size,
            });
        }

        if !pdf_bytes.starts_with(b"%PDF") {
            return Err(ServiceError::InvalidRequest {
                message: "Uploaded file is not a PDF".to_string(),
            });
        }

        let mut staging = tempfile::Builder::new()
            .prefix("labelsnip_")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| ServiceError::Crop(CropError::Io(e)))?;
        staging
            .write_all(pdf_bytes)
            .map_err(|e| ServiceError::Crop(CropError::Io(e)))?;
        staging
            .flush()
            .map_err(|e| ServiceError::Crop(CropError::Io(e)))?;

        debug!(
            bytes = pdf_bytes.len(),
            path = %staging.path().display(),
            "Staged upload for cropping"
        );

        let pdfium = crop::create_pdfium()?;
        let label = crop::crop_label(&pdfium, staging.path())?;

        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;

    fn service_with_limit(max_upload_bytes: u64) -> LabelCropService {
        let mut config = StaticConfig::default();
        config.limits.max_upload_bytes = max_upload_bytes;
        LabelCropService::new(Arc::new(config))
    }

    #[test]
    fn test_oversized_upload_rejected_before_staging() {
        let service = service_with_limit(4);
        let result = service.crop_pdf(b"%PDF-1.4 too big");
        assert!(matches!(
            result,
            Err(ServiceError::FileTooLarge { size: 16, max: 4 })
        ));
    }

    #[test]
    fn test_non_pdf_bytes_rejected() {
        let service = service_with_limit(1024);
        let result = service.crop_pdf(b"GIF89a not a pdf");
        assert!(matches!(
            result,
            Err(ServiceError::InvalidRequest { .. })
        ));
    }
}
