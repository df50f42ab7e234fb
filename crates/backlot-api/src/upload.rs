//! Common utilities for file upload handlers

use axum::extract::Multipart;
use backlot_core::AppError;

/// Extract file data and filename from a multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
/// The image format is sniffed from the bytes later, so the declared content
/// type is ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<(Vec<u8>, String), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data.to_vec());
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    if file_data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    let original_filename = filename.unwrap_or_else(|| "unknown".to_string());

    Ok((file_data, original_filename))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_file_size_accepts_at_limit() {
        assert!(validate_file_size(10 * 1024 * 1024, 10 * 1024 * 1024).is_ok());
    }

    #[test]
    fn validate_file_size_rejects_over_limit() {
        let err = validate_file_size(10 * 1024 * 1024 + 1, 10 * 1024 * 1024)
            .expect_err("oversized upload should be rejected");
        match err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("10 MB")),
            other => panic!("Expected PayloadTooLarge, got {:?}", other),
        }
    }
}
