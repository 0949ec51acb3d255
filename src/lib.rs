// src/lib.rs
//! CV Career Coach: PDF resume in, structured profile and job suggestions out.

pub mod console;
pub mod core;
pub mod error;
pub mod services;
pub mod types;
pub mod web;

pub use error::{CoachError, CompletionFailure, Result};
pub use services::{CvAnalysisService, JobSearchService};
pub use types::{JobOffer, Profile, SearchMode};
pub use web::start_web_server;

/// Log through `tracing` at the given level: `app_log!(info, "...", args)`.
///
/// Same call syntax as graflog's `app_log!`, so call sites read the same.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Open an info-level span with structured fields, graflog `app_span!` style.
#[macro_export]
macro_rules! app_span {
    ($name:expr) => {
        ::tracing::info_span!($name)
    };
    ($name:expr, $($fields:tt)+) => {
        ::tracing::info_span!($name, $($fields)+)
    };
}
