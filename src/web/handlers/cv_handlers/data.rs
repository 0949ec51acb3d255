// src/web/handlers/cv_handlers/data.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::app_log;
use crate::types::Profile;
use crate::web::types::{ApiError, AppState};

pub async fn get_cv_data_handler(state: &State<AppState>) -> Result<Json<Profile>, ApiError> {
    app_log!(info, "Fetching latest CV data");

    match state.store.latest().await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => {
            app_log!(warn, "No CV data found in {}", state.store.location());
            Err(ApiError::no_profile())
        }
        Err(e) => {
            app_log!(error, "Failed to load CV data: {}", e);
            Err(ApiError::from_coach(Status::InternalServerError, &e))
        }
    }
}
