// src/web/handlers/job_handlers.rs
//! Job suggestions for the most recent profile

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::app_log;
use crate::types::{JobOffer, SearchMode};
use crate::web::types::{ApiError, AppState};

pub async fn search_jobs_handler(
    state: &State<AppState>,
    mode: SearchMode,
) -> Result<Json<Vec<JobOffer>>, ApiError> {
    app_log!(info, "Searching for {} jobs", mode.label());

    let profile = match state.store.latest().await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            app_log!(warn, "No CV data available for job search");
            return Err(ApiError::no_profile());
        }
        Err(e) => {
            app_log!(error, "Failed to load CV data for job search: {}", e);
            return Err(ApiError::from_coach(Status::InternalServerError, &e));
        }
    };

    match state.jobs.search(&profile, mode).await {
        Ok(offers) => Ok(Json(offers)),
        Err(e) => {
            app_log!(error, "Error finding {} jobs: {}", mode.label(), e);
            Err(ApiError::from_coach(Status::InternalServerError, &e))
        }
    }
}
