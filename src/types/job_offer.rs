// src/types/job_offer.rs
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// One suggested position. Never persisted; every field is optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOffer {
    #[serde(default, alias = "position", deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,

    #[serde(default, alias = "requirements", deserialize_with = "null_as_default")]
    pub required_skills: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_level: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, alias = "matchReason", deserialize_with = "null_as_default")]
    pub match_reason: String,
}

impl std::fmt::Display for JobOffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Title:            {}", self.title)?;
        writeln!(f, "Company:          {}", self.company)?;
        if !self.location.is_empty() {
            writeln!(f, "Location:         {}", self.location)?;
        }
        writeln!(f, "Required skills:  {}", self.required_skills)?;
        if !self.experience_level.is_empty() {
            writeln!(f, "Experience level: {}", self.experience_level)?;
        }
        if !self.description.is_empty() {
            writeln!(f, "Description:      {}", self.description)?;
        }
        write!(f, "Why it fits:      {}", self.match_reason)
    }
}

/// Which kind of job suggestions to ask the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Positions closely matching the current field and location.
    Matching,
    /// Realistic moves into a different field or location.
    Alternative,
}

impl SearchMode {
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Matching => "matching",
            SearchMode::Alternative => "alternative",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_position_keys() {
        let offer: JobOffer = serde_json::from_str(
            r#"{
                "position": "Senior Java Developer",
                "company": "Tech Solutions GmbH",
                "requirements": "5+ years Java",
                "matchReason": "Strong Java background"
            }"#,
        )
        .unwrap();
        assert_eq!(offer.title, "Senior Java Developer");
        assert_eq!(offer.required_skills, "5+ years Java");
        assert_eq!(offer.match_reason, "Strong Java background");
        assert_eq!(offer.location, "");
        assert_eq!(offer.experience_level, "");
    }

    #[test]
    fn test_display_skips_empty_optional_fields() {
        let offer = JobOffer {
            title: "Data Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        };
        let rendered = offer.to_string();
        assert!(rendered.contains("Data Engineer"));
        assert!(!rendered.contains("Location:"));
        assert!(!rendered.contains("Description:"));
    }
}
