// src/web/types.rs
//! Request forms, shared state and the JSON error envelope

use std::sync::Arc;

use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::Request;

use crate::core::ProfileStore;
use crate::error::CoachError;
use crate::services::{CvAnalysisService, JobSearchService};

/// Everything a request needs; each request works on its own Profile value.
pub struct AppState {
    pub analysis: CvAnalysisService,
    pub jobs: JobSearchService,
    pub store: Arc<dyn ProfileStore>,
}

#[derive(FromForm)]
pub struct CvUploadForm<'f> {
    /// `None` when the field is missing or empty.
    pub file: Option<TempFile<'f>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// Error body with the HTTP status it must be sent with.
pub struct ApiError {
    pub status: Status,
    pub body: StandardErrorResponse,
}

impl ApiError {
    pub fn new(status: Status, error: &str, error_code: &str, suggestions: &[&str]) -> Self {
        Self {
            status,
            body: StandardErrorResponse::new(
                error.to_string(),
                error_code.to_string(),
                suggestions.iter().map(|s| s.to_string()).collect(),
            ),
        }
    }

    pub fn from_coach(status: Status, error: &CoachError) -> Self {
        Self {
            status,
            body: StandardErrorResponse::new(
                error.to_string(),
                error.error_code().to_string(),
                error.suggestions(),
            ),
        }
    }

    pub fn no_profile() -> Self {
        Self::new(
            Status::NotFound,
            "No CV data found. Please upload a CV first.",
            "CV_DATA_NOT_FOUND",
            &["Upload a PDF CV with POST /api/cv/upload"],
        )
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status, Json(self.body)).respond_to(request)
    }
}
