// src/services/job_search.rs
//! Profile to job suggestions

use std::collections::HashMap;
use std::sync::Arc;

use crate::app_log;
use crate::core::normalizer::normalize_job_offers;
use crate::core::{CompletionClient, PromptTemplate};
use crate::error::Result;
use crate::types::{JobOffer, Profile, SearchMode};

/// Separator for list fields rendered into job-search prompts.
pub const PROMPT_LIST_SEPARATOR: &str = ", ";

const PROFILE_BLOCK: &str = r#"CV Profile:
- Location: {location}
- Job Branch: {job_branch}
- Hard Skills: {hard_skills}
- Soft Skills: {soft_skills}
- Education: {education}
- Total Experience: {total_experience} years
- Branch Experience: {branch_experience} years"#;

const RESPONSE_FORMAT: &str = r#"Respond with a JSON array of 3 job positions. Each position must have:
- title: string (job title)
- company: string (company name, can be generic like "Tech Company")
- location: string (city or "Remote")
- required_skills: string (required skills and experience)
- experience_level: string (Junior, Mid, Senior or Lead)
- description: string (one or two sentences about the role)
- match_reason: string (why this job fits the profile)

Respond ONLY with valid JSON array, no additional text or markdown formatting.
Example format:
[
  {
    "title": "Senior Java Developer",
    "company": "Tech Solutions GmbH",
    "location": "Berlin, Germany",
    "required_skills": "5+ years Java, Spring Boot, MySQL",
    "experience_level": "Senior",
    "description": "Build and run payment services.",
    "match_reason": "Perfect match for your Java and Spring expertise"
  }
]"#;

const MATCHING_INSTRUCTIONS: &str = r#"Based on the following CV profile, suggest 3 job positions that match this person's skills and experience.

Requirements:
1. Jobs should match the current location and field
2. Jobs should align with experience level
3. Jobs should utilize existing skills"#;

const ALTERNATIVE_INSTRUCTIONS: &str = r#"Based on the following CV profile, suggest 3 ALTERNATIVE career paths in DIFFERENT fields or locations.

Requirements:
1. Suggest jobs in DIFFERENT industries or roles
2. Consider transferable skills
3. May be in different locations (remote or other cities)
4. Should still be realistic career transitions"#;

#[derive(Clone)]
pub struct JobSearchService {
    client: Arc<dyn CompletionClient>,
    matching: PromptTemplate,
    alternative: PromptTemplate,
}

impl JobSearchService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        let compose = |instructions: &str| {
            PromptTemplate::new(&format!(
                "{}\n\n{}\n\n{}",
                instructions, PROFILE_BLOCK, RESPONSE_FORMAT
            ))
        };

        Self {
            client,
            matching: compose(MATCHING_INSTRUCTIONS),
            alternative: compose(ALTERNATIVE_INSTRUCTIONS),
        }
    }

    /// Placeholder values for a profile; absent fields get fixed fallbacks.
    pub fn prompt_values(profile: &Profile) -> HashMap<&'static str, String> {
        HashMap::from([
            ("location", profile.location_or_placeholder().to_string()),
            ("job_branch", text_or_placeholder(&profile.current_branch)),
            ("hard_skills", list_or_placeholder(&profile.hard_skills)),
            ("soft_skills", list_or_placeholder(&profile.soft_skills)),
            ("education", text_or_placeholder(&profile.education)),
            ("total_experience", profile.total_years_experience.to_string()),
            ("branch_experience", profile.years_in_branch.to_string()),
        ])
    }

    pub fn build_prompt(&self, profile: &Profile, mode: SearchMode) -> Result<String> {
        let template = match mode {
            SearchMode::Matching => &self.matching,
            SearchMode::Alternative => &self.alternative,
        };
        template.render(&Self::prompt_values(profile))
    }

    /// The returned list is whatever the model produced; three are requested, not enforced.
    pub async fn search(&self, profile: &Profile, mode: SearchMode) -> Result<Vec<JobOffer>> {
        app_log!(
            info,
            "Searching for {} jobs for: {} in {}",
            mode.label(),
            profile.current_branch,
            profile.location_or_placeholder()
        );

        let prompt = self.build_prompt(profile, mode)?;
        let response = self.client.complete(&prompt).await?;
        let offers = normalize_job_offers(&response)?;

        app_log!(info, "Found {} {} job positions", offers.len(), mode.label());
        Ok(offers)
    }
}

fn text_or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        crate::types::profile::NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

fn list_or_placeholder(items: &[String]) -> String {
    if items.is_empty() {
        crate::types::profile::NOT_SPECIFIED.to_string()
    } else {
        items.join(PROMPT_LIST_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoachError;
    use crate::services::testing::StubCompletionClient;

    fn profile() -> Profile {
        Profile {
            current_location: Some("Berlin, Germany".to_string()),
            hard_skills: vec!["Java".to_string(), "Kotlin".to_string()],
            soft_skills: vec![],
            education: "BSc Informatics".to_string(),
            total_years_experience: 5,
            current_branch: "Backend Development".to_string(),
            years_in_branch: 5,
        }
    }

    #[test]
    fn test_prompt_contains_profile_fields() {
        let service = JobSearchService::new(Arc::new(StubCompletionClient::replying(&[])));
        let prompt = service.build_prompt(&profile(), SearchMode::Matching).unwrap();

        assert!(prompt.contains("- Location: Berlin, Germany"));
        assert!(prompt.contains("- Hard Skills: Java, Kotlin"));
        assert!(prompt.contains("- Soft Skills: Not specified"));
        assert!(prompt.contains("- Total Experience: 5 years"));
        assert!(prompt.contains("match the current location and field"));
        assert!(prompt.contains("\"title\": \"Senior Java Developer\""));
    }

    #[test]
    fn test_alternative_prompt_differs() {
        let service = JobSearchService::new(Arc::new(StubCompletionClient::replying(&[])));
        let prompt = service
            .build_prompt(&Profile::default(), SearchMode::Alternative)
            .unwrap();

        assert!(prompt.contains("ALTERNATIVE career paths"));
        assert!(prompt.contains("- Location: Not specified"));
        assert!(prompt.contains("- Branch Experience: 0 years"));
    }

    #[tokio::test]
    async fn test_search_returns_all_offers() {
        let stub = Arc::new(StubCompletionClient::replying(&[
            "```json\n[{\"title\":\"Backend Engineer\",\"company\":\"Acme\"},{\"position\":\"Kotlin Developer\",\"matchReason\":\"Kotlin\"}]\n```",
        ]));
        let service = JobSearchService::new(stub);

        let offers = service.search(&profile(), SearchMode::Matching).await.unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].company, "Acme");
        assert_eq!(offers[1].title, "Kotlin Developer");
        assert_eq!(offers[1].match_reason, "Kotlin");
    }

    #[tokio::test]
    async fn test_object_instead_of_list_is_parse_error() {
        let stub = Arc::new(StubCompletionClient::replying(&["{\"title\": \"Only one\"}"]));
        let service = JobSearchService::new(stub);

        let err = service
            .search(&profile(), SearchMode::Alternative)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::ResponseParse { .. }));
    }
}
