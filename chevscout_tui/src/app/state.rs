use chevscout_core::{
    application_deadline, mime_for_path, Countdown, GeminiClient, MatchReport, SubmissionFields,
};
use ratatui::layout::Rect;
use tokio::sync::oneshot;

use crate::app::editor::char_count;
use crate::app::session_log::SessionLogger;
use crate::theme::Theme;

/// Mutually exclusive view states. `PendingSubmit` exists so the event loop
/// spawns the background request exactly once before settling into
/// `Loading`. The form stays interactive in `Input`, `Results` and `Error`.
#[derive(Clone, PartialEq, Debug)]
pub enum AppState {
    Input,
    PendingSubmit,
    Loading,
    Results,
    Error(String),
}

/// The five form fields, in tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    CvPath,
    TargetFields,
    PreferredLocations,
    StartYear,
    ImpactStatement,
}

pub const FORM_FIELDS: [FormField; 5] = [
    FormField::CvPath,
    FormField::TargetFields,
    FormField::PreferredLocations,
    FormField::StartYear,
    FormField::ImpactStatement,
];

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::CvPath => "CV file (.pdf/.docx)",
            FormField::TargetFields => "Target fields",
            FormField::PreferredLocations => "Preferred locations",
            FormField::StartYear => "Start year",
            FormField::ImpactStatement => "Impact back home",
        }
    }

    pub fn index(self) -> usize {
        FORM_FIELDS.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FieldBuffer {
    pub text: String,
    pub cursor: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusArea {
    Form,
    FooterButtons,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FooterAction {
    Submit,
    ClearForm,
    ToggleAbout,
    ToggleScoreDetails,
    BackToInput,
    Quit,
}

#[derive(Clone, Debug)]
pub struct FooterButton {
    pub rect: Rect,
    pub action: FooterAction,
}

/// Status messages rotated in the output panel while a request is in
/// flight.
pub const LOADING_MESSAGES: &[&str] = &[
    "Reading your CV...",
    "Scanning UK master's programmes...",
    "Applying Chevening eligibility rules...",
    "Scoring and ranking courses...",
    "Drafting personal statement pointers...",
    "Almost there...",
];

/// Ticks between loading-message rotations (one tick per poll interval).
const LOADING_ROTATE_TICKS: u64 = 40;

pub struct App {
    pub state: AppState,
    pub fields: [FieldBuffer; 5],
    pub active_field: FormField,
    pub client: GeminiClient,
    pub report: Option<MatchReport>,
    pub show_score_details: bool,
    pub show_about: bool,
    pub theme: Theme,
    pub model_name: String,
    pub tick_count: u64,
    pub loading_started_tick: u64,
    pub countdown_text: String,
    pub focus: FocusArea,
    pub footer_buttons: Vec<FooterButton>,
    pub footer_focus: usize,
    pub output_scroll: u16,
    pub output_max_scroll: u16,
    pub form_rects: [Option<Rect>; 5],
    pub submit_result_rx: Option<oneshot::Receiver<Result<MatchReport, chevscout_core::AdvisorError>>>,
    pub dirty: bool,
    pub session_logger: SessionLogger,
}

impl App {
    pub fn new(client: GeminiClient, theme: Theme) -> Self {
        let model_name = client.model().to_string();
        let session_logger = SessionLogger::new();
        session_logger.event("START", "chevscout session opened");
        Self {
            state: AppState::Input,
            fields: Default::default(),
            active_field: FormField::CvPath,
            client,
            report: None,
            show_score_details: false,
            show_about: false,
            theme,
            model_name,
            tick_count: 0,
            loading_started_tick: 0,
            countdown_text: Countdown::now(application_deadline()).display(),
            focus: FocusArea::Form,
            footer_buttons: Vec::new(),
            footer_focus: 0,
            output_scroll: 0,
            output_max_scroll: 0,
            form_rects: [None; 5],
            submit_result_rx: None,
            dirty: true,
            session_logger,
        }
    }

    pub fn field(&self, field: FormField) -> &FieldBuffer {
        &self.fields[field.index()]
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut FieldBuffer {
        &mut self.fields[field.index()]
    }

    pub fn active_buffer_mut(&mut self) -> &mut FieldBuffer {
        self.field_mut(self.active_field)
    }

    pub fn cv_path(&self) -> &str {
        self.field(FormField::CvPath).text.trim()
    }

    pub fn submission_fields(&self) -> SubmissionFields {
        SubmissionFields {
            target_fields: self.field(FormField::TargetFields).text.clone(),
            preferred_locations: self.field(FormField::PreferredLocations).text.clone(),
            start_year: self.field(FormField::StartYear).text.clone(),
            impact_statement: self.field(FormField::ImpactStatement).text.clone(),
        }
    }

    /// The gate in front of `Loading`. Nothing network-shaped happens when
    /// this fails.
    pub fn validate_submission(&self) -> Result<(), String> {
        validate_cv_path(self.cv_path())
    }

    /// True while a request is in flight; the submit control is refused in
    /// these states.
    pub fn is_processing(&self) -> bool {
        matches!(self.state, AppState::PendingSubmit | AppState::Loading)
    }

    pub fn form_editable(&self) -> bool {
        matches!(
            self.state,
            AppState::Input | AppState::Results | AppState::Error(_)
        )
    }

    pub fn begin_submission(&mut self) {
        // Entering Loading clears whatever a prior run left behind, so a
        // failure never shows stale results.
        self.report = None;
        self.show_score_details = false;
        self.output_scroll = 0;
        self.loading_started_tick = self.tick_count;
        self.state = AppState::PendingSubmit;
        // The button row is empty while a request is in flight, so focus
        // stays on the form and is usable again the moment it settles.
        self.focus = FocusArea::Form;
        self.footer_focus = 0;
        self.dirty = true;
    }

    pub fn fail(&mut self, message: String) {
        self.session_logger.event("ERROR", &message);
        self.report = None;
        self.submit_result_rx = None;
        self.state = AppState::Error(message);
        self.focus = FocusArea::Form;
        self.dirty = true;
    }

    pub fn next_field(&mut self) {
        let next = (self.active_field.index() + 1) % FORM_FIELDS.len();
        self.active_field = FORM_FIELDS[next];
        self.dirty = true;
    }

    pub fn prev_field(&mut self) {
        let current = self.active_field.index();
        let prev = (current + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
        self.active_field = FORM_FIELDS[prev];
        self.dirty = true;
    }

    pub fn clear_form(&mut self) {
        for buffer in &mut self.fields {
            buffer.text.clear();
            buffer.cursor = 0;
        }
        self.active_field = FormField::CvPath;
        self.focus = FocusArea::Form;
        self.dirty = true;
    }

    pub fn back_to_input(&mut self) {
        self.state = AppState::Input;
        self.focus = FocusArea::Form;
        let cursor = char_count(&self.field(self.active_field).text);
        self.active_buffer_mut().cursor = cursor;
        self.output_scroll = 0;
        self.dirty = true;
    }

    /// Rotating status line for the Loading view, derived from the tick
    /// counter so no extra timer handle exists.
    pub fn loading_message(&self) -> &'static str {
        let elapsed = self.tick_count.saturating_sub(self.loading_started_tick);
        let idx = (elapsed / LOADING_ROTATE_TICKS) as usize % LOADING_MESSAGES.len();
        LOADING_MESSAGES[idx]
    }

    /// Recomputed every loop iteration; redraws only when the visible text
    /// changes. Runs for the whole process lifetime regardless of form
    /// state, and freezes once the deadline passes.
    pub fn refresh_countdown(&mut self) {
        let text = Countdown::now(application_deadline()).display();
        if text != self.countdown_text {
            self.countdown_text = text;
            self.dirty = true;
        }
    }

    pub fn log_block(&self, label: &str, body: &str) {
        self.session_logger.block(label, body);
    }
}

pub fn validate_cv_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Please upload your CV file".to_string());
    }
    if mime_for_path(path).is_none() {
        return Err("Invalid file type".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let client = GeminiClient::new("test-key".to_string(), "gemini-2.5-flash".to_string())
            .expect("offline client construction");
        App::new(client, Theme::dark())
    }

    #[test]
    fn failure_clears_results_and_reenables_the_form() {
        let mut app = test_app();
        app.report = Some(MatchReport::default());
        app.state = AppState::Loading;

        app.fail("boom".to_string());

        assert_eq!(app.state, AppState::Error("boom".to_string()));
        assert!(app.report.is_none());
        assert!(app.submit_result_rx.is_none());
        assert!(!app.is_processing());
        assert!(app.form_editable());
    }

    #[test]
    fn submission_start_clears_stale_state_and_keeps_focus_on_the_form() {
        let mut app = test_app();
        app.report = Some(MatchReport::default());
        app.show_score_details = true;
        app.output_scroll = 7;
        app.focus = FocusArea::FooterButtons;

        app.begin_submission();

        assert_eq!(app.state, AppState::PendingSubmit);
        assert!(app.is_processing());
        assert!(!app.form_editable());
        assert!(app.report.is_none());
        assert!(!app.show_score_details);
        assert_eq!(app.output_scroll, 0);
        assert_eq!(app.focus, FocusArea::Form);
    }

    #[test]
    fn empty_path_asks_for_a_cv() {
        assert_eq!(
            validate_cv_path(""),
            Err("Please upload your CV file".to_string())
        );
    }

    #[test]
    fn disallowed_extension_is_an_invalid_file_type() {
        assert_eq!(validate_cv_path("cv.txt"), Err("Invalid file type".to_string()));
        assert_eq!(validate_cv_path("cv.doc"), Err("Invalid file type".to_string()));
        assert_eq!(validate_cv_path("cv"), Err("Invalid file type".to_string()));
    }

    #[test]
    fn pdf_and_docx_pass_the_gate() {
        assert_eq!(validate_cv_path("cv.pdf"), Ok(()));
        assert_eq!(validate_cv_path("/tmp/My CV.DOCX"), Ok(()));
    }

    #[test]
    fn field_order_cycles_through_all_five() {
        let mut seen = Vec::new();
        let mut field = FormField::CvPath;
        for _ in 0..FORM_FIELDS.len() {
            seen.push(field);
            let next = (field.index() + 1) % FORM_FIELDS.len();
            field = FORM_FIELDS[next];
        }
        assert_eq!(seen, FORM_FIELDS.to_vec());
        assert_eq!(field, FormField::CvPath);
    }

    #[test]
    fn loading_messages_rotate_in_a_fixed_cycle() {
        let mut app = test_app();
        app.begin_submission();
        assert_eq!(app.loading_message(), LOADING_MESSAGES[0]);

        app.tick_count += LOADING_ROTATE_TICKS - 1;
        assert_eq!(app.loading_message(), LOADING_MESSAGES[0]);
        app.tick_count += 1;
        assert_eq!(app.loading_message(), LOADING_MESSAGES[1]);

        // A full cycle wraps back to the first message.
        app.tick_count = app.loading_started_tick + LOADING_ROTATE_TICKS * LOADING_MESSAGES.len() as u64;
        assert_eq!(app.loading_message(), LOADING_MESSAGES[0]);
    }
}
