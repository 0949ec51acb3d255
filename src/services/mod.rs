// src/services/mod.rs
//! Pipeline services used by both the REST API and the console menu

pub mod cv_analysis;
pub mod job_search;

pub use cv_analysis::CvAnalysisService;
pub use job_search::JobSearchService;
