// src/web/handlers/system_handlers.rs
use crate::app_log;

pub const HEALTH_MESSAGE: &str = "CV Career Coach API is running";

pub async fn health_handler() -> &'static str {
    app_log!(debug, "Health check");
    HEALTH_MESSAGE
}
