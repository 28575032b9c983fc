use anyhow::Result;

use crate::app::state::{App, AppState, FocusArea, FooterAction};

/// Dispatches a footer button (keyboard or mouse). Returns true when the
/// app should exit.
pub fn perform_footer_action(app: &mut App, action: FooterAction) -> Result<bool> {
    match action {
        FooterAction::Quit => return Ok(true),
        FooterAction::ToggleAbout => {
            app.show_about = !app.show_about;
            app.dirty = true;
        }
        FooterAction::ClearForm => {
            if app.form_editable() {
                app.clear_form();
            }
        }
        FooterAction::Submit => {
            if app.is_processing() || !app.form_editable() {
                return Ok(false);
            }
            match app.validate_submission() {
                Ok(()) => {
                    app.session_logger.event("SUBMIT", "form accepted, request starting");
                    app.log_block(
                        "SUBMIT_FIELDS",
                        &format!(
                            "cv={}\ntarget_fields={}\nlocations={}\nstart_year={}\nimpact={}",
                            app.cv_path(),
                            app.submission_fields().target_fields.trim(),
                            app.submission_fields().preferred_locations.trim(),
                            app.submission_fields().start_year.trim(),
                            app.submission_fields().impact_statement.trim(),
                        ),
                    );
                    app.begin_submission();
                }
                Err(message) => {
                    // Rejected before any file read or network call.
                    app.fail(message);
                }
            }
        }
        FooterAction::ToggleScoreDetails => {
            if app.state == AppState::Results {
                app.show_score_details = !app.show_score_details;
                app.dirty = true;
            }
        }
        FooterAction::BackToInput => {
            if !app.is_processing() {
                app.back_to_input();
            }
        }
    }

    app.focus = match action {
        FooterAction::BackToInput | FooterAction::ClearForm => FocusArea::Form,
        _ => app.focus,
    };

    Ok(false)
}
