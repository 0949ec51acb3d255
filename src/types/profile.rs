// src/types/profile.rs
//! Resume-derived profile snapshot

use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;

/// Placeholder rendered in prompts when the location is unknown.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Structured attributes extracted from one CV.
///
/// Absent numeric fields decode as 0 and absent lists as empty, so a sparse
/// model answer still yields a complete value. Years also arrive as `"5"` or
/// `5.0`; negative or fractional years are a decode error, not a clamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, alias = "location")]
    pub current_location: Option<String>,

    #[serde(default, alias = "hardSkills", deserialize_with = "skill_list")]
    pub hard_skills: Vec<String>,

    #[serde(default, alias = "softSkills", deserialize_with = "skill_list")]
    pub soft_skills: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub education: String,

    #[serde(
        default,
        alias = "totalExperienceYears",
        deserialize_with = "lenient_years"
    )]
    pub total_years_experience: u32,

    #[serde(default, alias = "jobBranch", deserialize_with = "null_as_default")]
    pub current_branch: String,

    #[serde(
        default,
        alias = "branchExperienceYears",
        deserialize_with = "lenient_years"
    )]
    pub years_in_branch: u32,
}

impl Profile {
    /// Location for display and prompts, with a placeholder when unknown.
    pub fn location_or_placeholder(&self) -> &str {
        match self.current_location.as_deref() {
            Some(location) if !location.trim().is_empty() => location,
            _ => NOT_SPECIFIED,
        }
    }

    pub fn hard_skills_joined(&self, separator: &str) -> String {
        self.hard_skills.join(separator)
    }

    pub fn soft_skills_joined(&self, separator: &str) -> String {
        self.soft_skills.join(separator)
    }

    /// Split a delimited skill string back into tokens.
    pub fn split_skills(raw: &str, separator: char) -> Vec<String> {
        raw.split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Location:          {}", self.location_or_placeholder())?;
        writeln!(f, "Job branch:        {}", self.current_branch)?;
        writeln!(f, "Total experience:  {} years", self.total_years_experience)?;
        writeln!(f, "Branch experience: {} years", self.years_in_branch)?;
        writeln!(f, "Education:         {}", self.education)?;
        writeln!(f, "Hard skills:       {}", self.hard_skills_joined(", "))?;
        write!(f, "Soft skills:       {}", self.soft_skills_joined(", "))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsRepr {
    List(Vec<String>),
    Text(String),
}

/// Accept either a JSON array of skills or one `;`/`,` separated string.
fn skill_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SkillsRepr>::deserialize(deserializer)? {
        Some(SkillsRepr::List(items)) => items,
        Some(SkillsRepr::Text(raw)) => {
            let separator = if raw.contains(';') { ';' } else { ',' };
            Profile::split_skills(&raw, separator)
        }
        None => Vec::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearsRepr {
    Whole(u32),
    Number(f64),
    Text(String),
}

/// Whole, non-negative years from an integer, an integral float or a numeric string.
fn lenient_years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<YearsRepr>::deserialize(deserializer)? {
        None => return Ok(0),
        Some(YearsRepr::Whole(years)) => return Ok(years),
        Some(YearsRepr::Number(years)) => years,
        Some(YearsRepr::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(0);
            }
            raw.parse::<f64>().map_err(|_| {
                <D::Error as serde::de::Error>::custom(format!("invalid years value '{}'", raw))
            })?
        }
    };

    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(<D::Error as serde::de::Error>::custom(format!(
            "years must be a whole non-negative number, got {}",
            value
        )));
    }
    Ok(value as u32)
}
