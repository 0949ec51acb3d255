// src/services/cv_analysis.rs
//! CV text to structured profile

use std::collections::HashMap;
use std::sync::Arc;

use crate::app_log;
use crate::core::normalizer::normalize_profile;
use crate::core::{CompletionClient, PromptTemplate};
use crate::error::Result;
use crate::types::Profile;

const ANALYSIS_PROMPT: &str = r#"Analyze the following CV and extract information in JSON format.

Required fields:
- current_location: string (city and country)
- hard_skills: array of strings (technical skills)
- soft_skills: array of strings (soft skills)
- education: string (highest degree and field)
- total_years_experience: integer (total years of work experience)
- current_branch: string (main professional field/industry)
- years_in_branch: integer (years in the main field)

CV Content:
{cv_content}

Respond ONLY with valid JSON, no additional text or markdown formatting."#;

#[derive(Clone)]
pub struct CvAnalysisService {
    client: Arc<dyn CompletionClient>,
    template: PromptTemplate,
}

impl CvAnalysisService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            template: PromptTemplate::new(ANALYSIS_PROMPT),
        }
    }

    pub fn build_prompt(&self, cv_text: &str) -> Result<String> {
        let values = HashMap::from([("cv_content", cv_text.to_string())]);
        self.template.render(&values)
    }

    /// One model call, no retries: any failure goes straight back to the caller.
    pub async fn analyze(&self, cv_text: &str) -> Result<Profile> {
        app_log!(info, "Starting CV analysis ({} characters)", cv_text.len());

        let prompt = self.build_prompt(cv_text)?;
        let response = self.client.complete(&prompt).await.map_err(|e| {
            app_log!(error, "Failed to analyze CV with AI: {}", e);
            e
        })?;

        let profile = normalize_profile(&response)?;
        app_log!(
            info,
            "Successfully parsed CV data: location={}, branch={}",
            profile.location_or_placeholder(),
            profile.current_branch
        );
        Ok(profile)
    }
}
