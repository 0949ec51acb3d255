// src/web/handlers/cv_handlers/mod.rs
//! CV upload and retrieval handlers

pub mod data;
pub mod upload;

pub use data::get_cv_data_handler;
pub use upload::upload_cv_handler;
