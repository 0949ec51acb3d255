// src/core/mod.rs
//! Pipeline building blocks: extraction, prompting, completion, parsing, storage

pub mod completion_client;
pub mod config_manager;
pub mod csv_store;
pub mod database;
pub mod fs_ops;
pub mod normalizer;
pub mod profile_store;
pub mod prompt_builder;
pub mod text_extractor;

pub use completion_client::{CompletionClient, OpenAiClient};
pub use config_manager::{AppConfig, ConfigManager, StorageBackend};
pub use csv_store::CsvProfileStore;
pub use database::{Database, ProfileRepository};
pub use fs_ops::FsOps;
pub use profile_store::{open_profile_store, ProfileStore};
pub use prompt_builder::PromptTemplate;
