// src/core/csv_store.rs
//! Flat-file profile store: one header row and one data row, rewritten on every save.

use std::path::PathBuf;

use crate::app_log;
use crate::core::profile_store::ProfileStore;
use crate::core::FsOps;
use crate::error::{CoachError, Result};
use crate::types::Profile;

pub const CSV_HEADER: [&str; 7] = [
    "Location",
    "Hard Skills",
    "Soft Skills",
    "Education",
    "Total Experience (Years)",
    "Job Branch",
    "Branch Experience (Years)",
];

/// Separator used for list fields inside a single cell.
///
/// A `;` or `\` inside a skill is backslash-escaped, so every token reads
/// back exactly, surrounding whitespace included.
pub const SKILL_SEPARATOR: &str = "; ";

pub const NO_DATA_MESSAGE: &str = "No CV data found. Please analyze your CV first (Option 1).";

pub struct CsvProfileStore {
    path: PathBuf,
}

impl CsvProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Raw file content, or a fixed message when nothing was saved yet.
    pub async fn read_content(&self) -> Result<String> {
        let content = FsOps::read_file_if_exists(&self.path)
            .await
            .map_err(|e| CoachError::persistence("Failed to read CV data", format!("{:#}", e)))?;
        Ok(content.unwrap_or_else(|| NO_DATA_MESSAGE.to_string()))
    }

    pub fn to_row(profile: &Profile) -> [String; 7] {
        [
            profile.current_location.clone().unwrap_or_default(),
            join_skills(&profile.hard_skills),
            join_skills(&profile.soft_skills),
            profile.education.clone(),
            profile.total_years_experience.to_string(),
            profile.current_branch.clone(),
            profile.years_in_branch.to_string(),
        ]
    }

    pub fn from_row(record: &csv::StringRecord) -> Result<Profile> {
        if record.len() != CSV_HEADER.len() {
            return Err(CoachError::Persistence(format!(
                "Expected {} columns in CV data row, found {}",
                CSV_HEADER.len(),
                record.len()
            )));
        }

        let cell = |index: usize| record.get(index).unwrap_or_default();
        let years = |index: usize| -> Result<u32> {
            let raw = cell(index).trim();
            if raw.is_empty() {
                return Ok(0);
            }
            raw.parse::<u32>().map_err(|e| {
                CoachError::persistence(&format!("Invalid {} value '{}'", CSV_HEADER[index], raw), e)
            })
        };

        let location = cell(0);
        Ok(Profile {
            current_location: (!location.is_empty()).then(|| location.to_string()),
            hard_skills: split_skills(cell(1)),
            soft_skills: split_skills(cell(2)),
            education: cell(3).to_string(),
            total_years_experience: years(4)?,
            current_branch: cell(5).to_string(),
            years_in_branch: years(6)?,
        })
    }

    /// Header plus one data row, CSV-encoded.
    pub fn render(profile: &Profile) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(CSV_HEADER)
            .and_then(|_| writer.write_record(Self::to_row(profile)))
            .map_err(|e| CoachError::persistence("Failed to encode CV data", e))?;
        writer
            .into_inner()
            .map_err(|e| CoachError::persistence("Failed to encode CV data", e))
    }

    /// Decode file content; `None` when it holds only a header.
    pub fn parse(content: &str) -> Result<Option<Profile>> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        match reader.records().next() {
            Some(record) => {
                let record =
                    record.map_err(|e| CoachError::persistence("Failed to parse CV data", e))?;
                Self::from_row(&record).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn join_skills(skills: &[String]) -> String {
    skills
        .iter()
        .map(|skill| skill.replace('\\', "\\\\").replace(';', "\\;"))
        .collect::<Vec<_>>()
        .join(SKILL_SEPARATOR)
}

/// Inverse of `join_skills`. An empty cell is an empty list.
fn split_skills(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }

    let mut skills = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ';' => {
                skills.push(std::mem::take(&mut current));
                // Hand-edited files may use a bare `;`.
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
            }
            _ => current.push(c),
        }
    }
    skills.push(current);
    skills
}

#[rocket::async_trait]
impl ProfileStore for CsvProfileStore {
    async fn save(&self, profile: &Profile) -> Result<()> {
        let content = Self::render(profile)?;
        FsOps::write_file_safe(&self.path, &content)
            .await
            .map_err(|e| CoachError::persistence("Failed to save CV data", format!("{:#}", e)))?;
        app_log!(info, "CV data saved to {}", self.path.display());
        Ok(())
    }

    async fn latest(&self) -> Result<Option<Profile>> {
        let content = FsOps::read_file_if_exists(&self.path)
            .await
            .map_err(|e| CoachError::persistence("Failed to read CV data", format!("{:#}", e)))?;
        match content {
            Some(content) => Self::parse(&content),
            None => Ok(None),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
