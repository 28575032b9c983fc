use serde::Deserialize;

use crate::error::AdvisorError;

/// The parsed model response. Every section is optional: the schema asks for
/// all of them, but the payload is model-generated text and nothing here is
/// trusted. Absent section means the renderer omits that block entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchReport {
    pub profile: Option<ProfileAnalysis>,
    pub ranked_courses: Option<Vec<CourseEntry>>,
    pub chevening_trio: Option<Vec<TrioEntry>>,
    pub personal_statement_bullets: Option<StatementBullets>,
    pub alternatives: Option<Vec<AlternativeEntry>>,
    pub notes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileAnalysis {
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseEntry {
    pub rank: Option<i64>,
    pub university: Option<String>,
    pub programme: Option<String>,
    pub city: Option<String>,
    pub url: Option<String>,
    pub start_cycle: Option<String>,
    pub duration_months: Option<i64>,
    /// Free text: either a figure in GBP or the "Verify on university site"
    /// sentinel.
    pub fee_gbp: Option<String>,
    pub rationale: Vec<String>,
    pub eligibility_check: Option<EligibilityCheck>,
    pub score_explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityCheck {
    pub is_eligible: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrioEntry {
    pub university: Option<String>,
    pub programme: Option<String>,
    pub why_this_trio: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatementBullets {
    pub leadership: Vec<String>,
    pub networking: Vec<String>,
    pub career_plan: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlternativeEntry {
    pub university: Option<String>,
    pub programme: Option<String>,
    pub url: Option<String>,
    pub why_consider: Option<String>,
}

impl MatchReport {
    /// True when no section would render anything.
    pub fn is_empty(&self) -> bool {
        self.profile.is_none()
            && self.ranked_courses.as_ref().map_or(true, |c| c.is_empty())
            && self.chevening_trio.as_ref().map_or(true, |t| t.is_empty())
            && self.personal_statement_bullets.is_none()
            && self.alternatives.as_ref().map_or(true, |a| a.is_empty())
            && self.notes.as_ref().map_or(true, |n| n.is_empty())
    }
}

/// Parses the raw response text. The service was asked for schema-conformant
/// JSON, but fences and whitespace still show up, so those are stripped
/// first. No structural re-validation beyond the parse itself: a sparse but
/// parseable report renders best-effort downstream.
pub fn parse_report(raw: &str) -> Result<MatchReport, AdvisorError> {
    let clean = strip_json_fences(raw);
    serde_json::from_str(clean).map_err(|e| AdvisorError::Parse(e.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` fences the model may wrap around
/// its output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or_else(|| stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or_else(|| stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_report() {
        let raw = r#"{
            "profile": { "strengths": ["5 years in public health"], "gaps": ["no UK study"] },
            "rankedCourses": [{
                "rank": 1,
                "university": "University of Leeds",
                "programme": "MSc Public Health",
                "city": "Leeds",
                "url": "https://courses.leeds.ac.uk/x",
                "startCycle": "September 2027",
                "durationMonths": 12,
                "feeGbp": "26,500",
                "rationale": ["Strong epidemiology track"],
                "eligibilityCheck": { "isEligible": true, "reason": "Full-time 12-month taught MSc" },
                "scoreExplanation": "High CV fit (40%) from clinical experience."
            }],
            "cheveningTrio": [
                { "university": "Leeds", "programme": "MSc Public Health", "whyThisTrio": "anchor choice" }
            ],
            "personalStatementBullets": {
                "leadership": ["Led a vaccination drive"],
                "networking": ["WHO fellowship cohort"],
                "careerPlan": ["Return to the ministry of health"]
            },
            "alternatives": [
                { "university": "Sheffield", "programme": "MPH", "url": "https://x", "whyConsider": "lower fee" }
            ],
            "notes": ["Fees quoted for 2026 entry"]
        }"#;

        let report = parse_report(raw).unwrap();
        assert!(!report.is_empty());
        let courses = report.ranked_courses.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].rank, Some(1));
        assert_eq!(courses[0].duration_months, Some(12));
        assert!(courses[0].eligibility_check.as_ref().unwrap().is_eligible);
        assert_eq!(report.chevening_trio.unwrap().len(), 1);
        assert_eq!(report.notes.unwrap().len(), 1);
    }

    #[test]
    fn parses_with_fences_and_whitespace() {
        let raw = "\n```json\n{ \"notes\": [\"n1\"] }\n```\n";
        let report = parse_report(raw).unwrap();
        assert_eq!(report.notes.unwrap(), vec!["n1".to_string()]);
    }

    #[test]
    fn missing_sections_stay_absent() {
        let report = parse_report(r#"{ "notes": [] }"#).unwrap();
        assert!(report.profile.is_none());
        assert!(report.ranked_courses.is_none());
        assert!(report.personal_statement_bullets.is_none());
        assert!(report.is_empty());
    }

    #[test]
    fn sparse_entries_parse_best_effort() {
        // Schema says rank/university/programme are required, but the parser
        // does not re-validate what the service sent.
        let report = parse_report(r#"{ "rankedCourses": [ { "city": "York" } ] }"#).unwrap();
        let courses = report.ranked_courses.unwrap();
        assert_eq!(courses[0].city.as_deref(), Some("York"));
        assert!(courses[0].university.is_none());
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = parse_report("I'm sorry, I can't produce JSON").unwrap_err();
        assert!(matches!(err, AdvisorError::Parse(_)));

        let err = parse_report("").unwrap_err();
        assert!(matches!(err, AdvisorError::Parse(_)));
    }
}
