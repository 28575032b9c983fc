use serde_json::{json, Value};

/// The four free-text preference fields from the form. Immutable for the
/// duration of one request.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub target_fields: String,
    pub preferred_locations: String,
    pub start_year: String,
    pub impact_statement: String,
}

/// Fixed role, rules, scoring weights and output requirements. Only the user
/// message varies per call; the model does all discovery, filtering and
/// ranking against these rules.
pub const ADVISOR_INSTRUCTION: &str = "\
You are a UK postgraduate course advisor specialising in the Chevening \
Scholarship. You receive an applicant's CV file and their preferences, and \
you recommend eligible UK master's courses.

ELIGIBILITY RULES (apply strictly):
- Courses must be full-time taught master's degrees at a UK university.
- Courses must start in the autumn of the applicant's stated start year.
- Courses must be completable within 9 to 12 months.
- Chevening caps MBA tuition funding at GBP 22,000; MBA programmes above \
that fee are still allowed but must be flagged in the rationale.
- Distance-learning, part-time and research-only degrees are not eligible.

SCORING (weighting for the ranking):
- 40% fit between the CV's experience/education and the programme content.
- 25% alignment with the applicant's stated target fields and career plan.
- 15% match with the preferred locations.
- 10% university standing in the relevant subject.
- 10% strength of the home-country impact story the programme enables.

OUTPUT REQUIREMENTS:
- Respond with JSON only, conforming exactly to the provided schema.
- Rank exactly the ten strongest courses, best first.
- Pick a Chevening trio of three courses the applicant should list on the \
application form, at three different universities whenever the ranking \
allows it.
- Quote annual international tuition fees in GBP. If you are not confident \
of the current fee, use the exact string \"Verify on university site\".
- Include an eligibility check for every ranked course, and a short score \
explanation referencing the weights above.
- Ground personal statement bullets in concrete CV evidence, never invent \
experience.";

/// Builds the per-submission user message around the four preference fields.
/// The CV itself travels as a separate inline-data part.
pub fn compose_user_message(fields: &SubmissionFields) -> String {
    format!(
        "My CV is attached. Please recommend Chevening-eligible UK master's \
courses for me.\n\n\
Target fields of study: {}\n\
Preferred locations in the UK: {}\n\
Intended start year: {}\n\
The impact I want to have back home: {}",
        fields.target_fields.trim(),
        fields.preferred_locations.trim(),
        fields.start_year.trim(),
        fields.impact_statement.trim(),
    )
}

/// The declarative response shape handed to Gemini as `responseSchema`.
/// Constraining the output here is what lets the parser stay dumb: the
/// service, not this crate, carries the burden of producing well-formed
/// JSON. Process-wide constant shape.
pub fn response_schema() -> Value {
    fn string_array() -> Value {
        json!({ "type": "ARRAY", "items": { "type": "STRING" } })
    }

    json!({
        "type": "OBJECT",
        "properties": {
            "profile": {
                "type": "OBJECT",
                "properties": {
                    "strengths": string_array(),
                    "gaps": string_array()
                }
            },
            "rankedCourses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "rank": { "type": "INTEGER" },
                        "university": { "type": "STRING" },
                        "programme": { "type": "STRING" },
                        "city": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "startCycle": { "type": "STRING" },
                        "durationMonths": { "type": "INTEGER" },
                        "feeGbp": { "type": "STRING" },
                        "rationale": string_array(),
                        "eligibilityCheck": {
                            "type": "OBJECT",
                            "properties": {
                                "isEligible": { "type": "BOOLEAN" },
                                "reason": { "type": "STRING" }
                            }
                        },
                        "scoreExplanation": { "type": "STRING" }
                    },
                    "required": ["rank", "university", "programme"]
                }
            },
            "cheveningTrio": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "university": { "type": "STRING" },
                        "programme": { "type": "STRING" },
                        "whyThisTrio": { "type": "STRING" }
                    }
                }
            },
            "personalStatementBullets": {
                "type": "OBJECT",
                "properties": {
                    "leadership": string_array(),
                    "networking": string_array(),
                    "careerPlan": string_array()
                }
            },
            "alternatives": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "university": { "type": "STRING" },
                        "programme": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "whyConsider": { "type": "STRING" }
                    }
                }
            },
            "notes": string_array()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_embeds_all_four_fields() {
        let fields = SubmissionFields {
            target_fields: " data science ".to_string(),
            preferred_locations: "London, Edinburgh".to_string(),
            start_year: "2027".to_string(),
            impact_statement: "open-data policy at home".to_string(),
        };
        let message = compose_user_message(&fields);
        assert!(message.contains("data science"));
        assert!(message.contains("London, Edinburgh"));
        assert!(message.contains("2027"));
        assert!(message.contains("open-data policy at home"));
        // Whitespace around field values is not shipped.
        assert!(!message.contains(" data science "));
    }

    #[test]
    fn schema_declares_all_six_sections() {
        let schema = response_schema();
        let props = schema["properties"].as_object().unwrap();
        for section in [
            "profile",
            "rankedCourses",
            "cheveningTrio",
            "personalStatementBullets",
            "alternatives",
            "notes",
        ] {
            assert!(props.contains_key(section), "missing {}", section);
        }
        assert_eq!(
            schema["properties"]["rankedCourses"]["items"]["properties"]["eligibilityCheck"]
                ["properties"]["isEligible"]["type"],
            "BOOLEAN"
        );
    }
}
