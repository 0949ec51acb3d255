// src/web/handlers/cv_handlers/upload.rs
//! CV upload: validate, extract, analyse, persist

use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::Instrument;

use crate::core::text_extractor::extract_text;
use crate::core::FsOps;
use crate::error::CoachError;
use crate::types::Profile;
use crate::web::types::{ApiError, AppState, CvUploadForm};
use crate::{app_log, app_span};

/// Largest accepted CV.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub async fn upload_cv_handler(
    mut upload: Form<CvUploadForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    let Some(file) = upload.file.as_mut() else {
        app_log!(warn, "Empty or missing file received");
        return Err(ApiError::new(
            Status::BadRequest,
            "File is empty",
            "EMPTY_FILE",
            &["Attach a PDF in the 'file' form field"],
        ));
    };

    let file_name = raw_file_name(file).unwrap_or_else(|| "uploaded_cv.pdf".to_string());
    let file_size = file.len();
    let span = app_span!("cv_upload", file_name = %file_name, size = file_size);

    async move {
        app_log!(
            info,
            "Received CV upload request. File: {}, Size: {} bytes",
            file_name,
            file_size
        );

        if file_size == 0 {
            app_log!(warn, "Empty file received");
            return Err(ApiError::new(
                Status::BadRequest,
                "File is empty",
                "EMPTY_FILE",
                &["Attach a PDF in the 'file' form field"],
            ));
        }

        if !is_pdf(file, &file_name) {
            app_log!(warn, "Invalid file type: {:?}", file.content_type());
            return Err(ApiError::new(
                Status::BadRequest,
                "Only PDF files are supported",
                "INVALID_FORMAT",
                &["Upload a PDF file (.pdf)"],
            ));
        }

        if file_size > MAX_UPLOAD_BYTES {
            app_log!(warn, "File too large: {} bytes", file_size);
            return Err(ApiError::new(
                Status::PayloadTooLarge,
                "File size exceeds 5MB limit",
                "FILE_TOO_LARGE",
                &["Compress your CV file", "Use a smaller file size (max 5MB)"],
            ));
        }

        let bytes = read_upload(file).await?;

        let profile = process_cv(state, bytes).await.map_err(|e| {
            app_log!(error, "CV processing failed: {}", e);
            ApiError::from_coach(Status::InternalServerError, &e)
        })?;

        Ok(Json(profile))
    }
    .instrument(span)
    .await
}

/// Extract, analyse and persist; no partial result is ever returned.
async fn process_cv(state: &AppState, bytes: Vec<u8>) -> Result<Profile, CoachError> {
    let cv_text = extract_text(bytes).await?;
    let profile = state.analysis.analyze(&cv_text).await?;
    state.store.save(&profile).await?;
    Ok(profile)
}

fn raw_file_name(file: &TempFile<'_>) -> Option<String> {
    file.raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
}

/// PDF by declared content type or by `.pdf` extension.
fn is_pdf(file: &TempFile<'_>, file_name: &str) -> bool {
    file.content_type().map_or(false, |ct| ct.is_pdf())
        || file_name.to_lowercase().ends_with(".pdf")
}

async fn read_upload(file: &mut TempFile<'_>) -> Result<Vec<u8>, ApiError> {
    let temp_path = std::env::temp_dir().join(format!("cv_upload_{}", uuid::Uuid::new_v4()));

    if let Err(e) = file.persist_to(&temp_path).await {
        app_log!(error, "Failed to save uploaded file: {}", e);
        return Err(ApiError::new(
            Status::InternalServerError,
            "Failed to process uploaded file",
            "FILE_SAVE_ERROR",
            &["Try uploading the file again"],
        ));
    }

    let bytes = tokio::fs::read(&temp_path).await;
    FsOps::remove_temp_file(&temp_path).await;

    bytes.map_err(|e| {
        app_log!(error, "Failed to read uploaded file: {}", e);
        ApiError::new(
            Status::InternalServerError,
            "Failed to process uploaded file",
            "FILE_READ_ERROR",
            &["Try uploading the file again"],
        )
    })
}
