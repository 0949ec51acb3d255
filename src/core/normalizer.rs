// src/core/normalizer.rs
//! Turns free-text model output into typed values.
//!
//! Models often wrap JSON in a markdown code block even when told not to.
//! The opening fence (with or without a language tag) and the closing fence
//! are stripped independently, then the remainder is decoded strictly.
//! Content sharing a line with the opening fence is kept.

use serde::de::DeserializeOwned;

use crate::app_log;
use crate::error::{CoachError, Result};
use crate::types::{JobOffer, Profile};

const FENCE: &str = "```";

/// Remove an optional markdown code fence around `raw`.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(after_fence) = text.strip_prefix(FENCE) {
        // Only the language tag goes; a body starting on the fence line stays.
        text = after_fence
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
            .trim_start();
    }

    let text = text.trim_end();
    let text = text.strip_suffix(FENCE).unwrap_or(text);
    text.trim()
}

/// Strip fences and decode into any deserializable shape.
pub fn normalize<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);
    app_log!(debug, "Cleaned AI response: {}", cleaned);

    serde_json::from_str(cleaned).map_err(|source| {
        app_log!(error, "Failed to parse AI response as JSON: {}", source);
        CoachError::ResponseParse {
            cleaned: cleaned.to_string(),
            source,
        }
    })
}

pub fn normalize_profile(raw: &str) -> Result<Profile> {
    normalize(raw)
}

/// The list length is whatever the model returned; it is not checked.
pub fn normalize_job_offers(raw: &str) -> Result<Vec<JobOffer>> {
    normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{"current_location":"Berlin, Germany","hard_skills":["Java","Kotlin"],"total_years_experience":5}"#;

    #[test]
    fn test_strip_fences_with_language_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_unclosed_opening() {
        let input = "```json\n[1, 2, 3]";
        assert_eq!(strip_code_fences(input), "[1, 2, 3]");
    }

    #[test]
    fn test_strip_fences_only_closing() {
        let input = "[1, 2]\n```";
        assert_eq!(strip_code_fences(input), "[1, 2]");
    }

    #[test]
    fn test_strip_fences_single_line() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```[1]```"), "[1]");
    }

    #[test]
    fn test_body_on_fence_line_is_kept() {
        let input = "```[{\"title\":\"A\"},\n{\"title\":\"B\"}]\n```";
        assert_eq!(strip_code_fences(input), "[{\"title\":\"A\"},\n{\"title\":\"B\"}]");

        let offers = normalize_job_offers(input).unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].title, "A");
        assert_eq!(offers[1].title, "B");

        let tagged = normalize_job_offers("```json [{\"title\":\"A\"}]\n```").unwrap();
        assert_eq!(tagged.len(), 1);
    }

    #[test]
    fn test_fenced_and_plain_decode_identically() {
        let plain = normalize_profile(PROFILE_JSON).unwrap();
        let tagged = normalize_profile(&format!("```json\n{}\n```", PROFILE_JSON)).unwrap();
        let untagged = normalize_profile(&format!("```\n{}\n```", PROFILE_JSON)).unwrap();
        let direct: Profile = serde_json::from_str(PROFILE_JSON).unwrap();

        assert_eq!(plain, direct);
        assert_eq!(tagged, direct);
        assert_eq!(untagged, direct);
    }

    #[test]
    fn test_profile_defaults_when_years_missing() {
        let profile = normalize_profile(r#"{"current_branch": "Finance"}"#).unwrap();
        assert_eq!(profile.total_years_experience, 0);
        assert_eq!(profile.years_in_branch, 0);
        assert_eq!(profile.current_branch, "Finance");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let profile = normalize_profile(r#"{"education": "BSc", "favourite_colour": "blue"}"#)
            .unwrap();
        assert_eq!(profile.education, "BSc");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = normalize_profile("```json\n{\"current_location\": \"Ber").unwrap_err();
        match err {
            CoachError::ResponseParse { cleaned, .. } => {
                assert_eq!(cleaned, "{\"current_location\": \"Ber");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_object_where_list_expected_is_parse_error() {
        let err = normalize_job_offers(r#"{"title": "Engineer"}"#).unwrap_err();
        assert!(matches!(err, CoachError::ResponseParse { .. }));
    }

    #[test]
    fn test_job_offer_count_not_enforced() {
        let one = normalize_job_offers(r#"[{"title": "A"}]"#).unwrap();
        assert_eq!(one.len(), 1);

        let five = normalize_job_offers(
            "```json\n[{\"title\":\"A\"},{\"title\":\"B\"},{\"title\":\"C\"},{\"title\":\"D\"},{\"title\":\"E\"}]\n```",
        )
        .unwrap();
        assert_eq!(five.len(), 5);
        assert_eq!(five[4].title, "E");
    }
}
