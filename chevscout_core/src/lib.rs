pub use attachment::{mime_for_path, CvAttachment, DOCX_MIME, PDF_MIME};
pub use config::Config;
pub use deadline::{application_deadline, Countdown};
pub use error::AdvisorError;
pub use llm::GeminiClient;
pub use prompt::{compose_user_message, response_schema, SubmissionFields, ADVISOR_INSTRUCTION};
pub use redaction::redact_sensitive_text;
pub use report::{
    parse_report, AlternativeEntry, CourseEntry, EligibilityCheck, MatchReport, ProfileAnalysis,
    StatementBullets, TrioEntry,
};

pub mod attachment;
pub mod config;
pub mod deadline;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod redaction;
pub mod report;
