// src/web/mod.rs
//! REST surface under /api/cv

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use std::sync::Arc;

use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};

use crate::app_log;
use crate::core::{open_profile_store, AppConfig, CompletionClient, OpenAiClient};
use crate::services::{CvAnalysisService, JobSearchService};
use crate::types::{JobOffer, Profile, SearchMode};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/upload", data = "<upload>")]
pub async fn upload_cv(
    upload: Form<CvUploadForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    handlers::upload_cv_handler(upload, state).await
}

#[get("/data")]
pub async fn get_cv_data(state: &State<AppState>) -> Result<Json<Profile>, ApiError> {
    handlers::get_cv_data_handler(state).await
}

#[get("/jobs/matching")]
pub async fn matching_jobs(state: &State<AppState>) -> Result<Json<Vec<JobOffer>>, ApiError> {
    handlers::search_jobs_handler(state, SearchMode::Matching).await
}

#[get("/jobs/alternative")]
pub async fn alternative_jobs(state: &State<AppState>) -> Result<Json<Vec<JobOffer>>, ApiError> {
    handlers::search_jobs_handler(state, SearchMode::Alternative).await
}

#[get("/health")]
pub async fn health() -> &'static str {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Send the CV as multipart/form-data in the 'file' field".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the endpoint path".to_string()],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "File size exceeds 5MB limit".to_string(),
        "FILE_TOO_LARGE".to_string(),
        vec!["Use a smaller file size (max 5MB)".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Malformed upload".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec!["Send the CV as multipart/form-data in the 'file' field".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application around already-built services.
pub fn build_rocket(state: AppState, port: u16) -> Rocket<Build> {
    // Above the 5MB business limit so oversize uploads reach the handler and get a 413.
    let limits = Limits::default()
        .limit("file", 16.mebibytes())
        .limit("data-form", 16.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, payload_too_large, unprocessable, internal_error],
        )
        .mount(
            "/api/cv",
            routes![
                upload_cv,
                get_cv_data,
                matching_jobs,
                alternative_jobs,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let client: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(&config.openai)?);
    let store = open_profile_store(&config).await?;

    let state = AppState {
        analysis: CvAnalysisService::new(client.clone()),
        jobs: JobSearchService::new(client),
        store,
    };

    app_log!(info, "Starting CV Career Coach API server");
    app_log!(info, "Server: http://0.0.0.0:{}", config.port);
    app_log!(info, "Profile storage: {}", state.store.location());

    build_rocket(state, config.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::text_extractor::fixtures::text_pdf;
    use crate::core::{CsvProfileStore, ProfileStore};
    use crate::services::testing::StubCompletionClient;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;

    const BOUNDARY: &str = "cvcoach-test-boundary";

    struct Harness {
        client: Client,
        store: Arc<CsvProfileStore>,
        _dir: tempfile::TempDir,
    }

    async fn harness(stub: StubCompletionClient) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CsvProfileStore::new(dir.path().join("data/cv_data.csv")));
        let stub: Arc<dyn CompletionClient> = Arc::new(stub);

        let state = AppState {
            analysis: CvAnalysisService::new(stub.clone()),
            jobs: JobSearchService::new(stub),
            store: store.clone(),
        };

        let client = Client::tracked(build_rocket(state, 0)).await.unwrap();
        Harness {
            client,
            store,
            _dir: dir,
        }
    }

    fn multipart(file_name: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_type() -> ContentType {
        ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY))
    }

    fn stored_profile() -> Profile {
        Profile {
            current_location: Some("Berlin, Germany".to_string()),
            hard_skills: vec!["Java".to_string(), "Kotlin".to_string()],
            total_years_experience: 5,
            ..Profile::default()
        }
    }

    #[rocket::async_test]
    async fn test_health() {
        let h = harness(StubCompletionClient::replying(&[])).await;
        let response = h.client.get("/api/cv/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.into_string().await.unwrap(),
            "CV Career Coach API is running"
        );
    }

    #[rocket::async_test]
    async fn test_data_not_found_before_upload() {
        let h = harness(StubCompletionClient::replying(&[])).await;
        let response = h.client.get("/api/cv/data").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "CV_DATA_NOT_FOUND");
        assert_eq!(body["success"], false);
    }

    #[rocket::async_test]
    async fn test_jobs_without_profile_is_not_found() {
        let h = harness(StubCompletionClient::replying(&["[]"])).await;
        for path in ["/api/cv/jobs/matching", "/api/cv/jobs/alternative"] {
            let response = h.client.get(path).dispatch().await;
            assert_eq!(response.status(), Status::NotFound, "{}", path);
        }
    }

    #[rocket::async_test]
    async fn test_data_returns_latest_profile() {
        let h = harness(StubCompletionClient::replying(&[])).await;
        h.store.save(&stored_profile()).await.unwrap();

        let response = h.client.get("/api/cv/data").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let profile: Profile = response.into_json().await.unwrap();
        assert_eq!(profile, stored_profile());
    }

    #[rocket::async_test]
    async fn test_matching_jobs_returned() {
        let h = harness(StubCompletionClient::replying(&[
            "```json\n[{\"title\":\"A\"},{\"title\":\"B\"},{\"title\":\"C\"}]\n```",
        ]))
        .await;
        h.store.save(&stored_profile()).await.unwrap();

        let response = h.client.get("/api/cv/jobs/matching").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let offers: Vec<JobOffer> = response.into_json().await.unwrap();
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[2].title, "C");
    }

    #[rocket::async_test]
    async fn test_alternative_jobs_failure_is_500() {
        let h = harness(StubCompletionClient::failing("HTTP 401 Unauthorized")).await;
        h.store.save(&stored_profile()).await.unwrap();

        let response = h.client.get("/api/cv/jobs/alternative").dispatch().await;
        assert_eq!(response.status(), Status::InternalServerError);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "AI_AUTHENTICATION_ERROR");
    }

    #[rocket::async_test]
    async fn test_upload_rejects_non_pdf() {
        let h = harness(StubCompletionClient::replying(&[])).await;
        let response = h
            .client
            .post("/api/cv/upload")
            .header(multipart_type())
            .body(multipart("cv.txt", "text/plain", b"plain text cv"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "INVALID_FORMAT");
    }

    #[rocket::async_test]
    async fn test_upload_rejects_empty_file() {
        let h = harness(StubCompletionClient::replying(&[])).await;
        let response = h
            .client
            .post("/api/cv/upload")
            .header(multipart_type())
            .body(multipart("cv.pdf", "application/pdf", b""))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn test_upload_rejects_oversized_pdf() {
        let h = harness(StubCompletionClient::replying(&[])).await;
        let content = vec![b'a'; (5 * 1024 * 1024) + 1];
        let response = h
            .client
            .post("/api/cv/upload")
            .header(multipart_type())
            .body(multipart("cv.pdf", "application/pdf", &content))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::PayloadTooLarge);
    }

    #[rocket::async_test]
    async fn test_upload_pdf_returns_profile_and_saves_it() {
        let h = harness(StubCompletionClient::replying(&[
            "```json\n{\"current_location\":\"Berlin, Germany\",\"hard_skills\":[\"Java\",\"Kotlin\"],\"total_years_experience\":5}\n```",
        ]))
        .await;
        let pdf = text_pdf(&["Jane Doe", "5 years as a Backend Developer in Berlin"]);

        let response = h
            .client
            .post("/api/cv/upload")
            .header(multipart_type())
            .body(multipart("jane_doe.pdf", "application/pdf", &pdf))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let uploaded: Profile = response.into_json().await.unwrap();
        assert_eq!(uploaded, stored_profile());

        let response = h.client.get("/api/cv/data").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let fetched: Profile = response.into_json().await.unwrap();
        assert_eq!(fetched, uploaded);
        assert_eq!(h.store.latest().await.unwrap(), Some(uploaded));
    }

    #[rocket::async_test]
    async fn test_upload_unreadable_pdf_is_500_and_not_saved() {
        let h = harness(StubCompletionClient::replying(&["{}"])).await;
        let response = h
            .client
            .post("/api/cv/upload")
            .header(multipart_type())
            .body(multipart("cv.pdf", "application/octet-stream", b"not really a pdf"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::InternalServerError);
        let body: serde_json::Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "EXTRACTION_ERROR");
        assert!(h.store.latest().await.unwrap().is_none());
    }
}
