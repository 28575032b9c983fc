use anyhow::Result;
use chevscout_core::{parse_report, AdvisorError, CvAttachment, MatchReport};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::app::actions::perform_footer_action;
use crate::app::editor::{
    char_count, delete_char_at_cursor, delete_char_before_cursor, insert_char_at_cursor,
    point_in_rect, set_cursor_from_click,
};
use crate::app::state::{App, AppState, FocusArea, FooterAction, FORM_FIELDS};
use crate::ui::main_view::{ui, FIELD_PREFIX_WIDTH};

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick_count += 1;
        app.refresh_countdown();
        advance_submission(app);

        if app.dirty || app.is_processing() {
            terminal.draw(|f| ui(f, app))?;
            app.dirty = false;
        }

        let poll_ms = if app.is_processing() { 50 } else { 200 };
        if event::poll(Duration::from_millis(poll_ms))? {
            app.dirty = true;
            if handle_runtime_event(app, event::read()?)? {
                return Ok(());
            }
        }
    }
}

/// Non-blocking request lifecycle: `PendingSubmit` spawns the background
/// task exactly once, `Loading` polls its oneshot receiver each tick.
fn advance_submission(app: &mut App) {
    match app.state {
        AppState::PendingSubmit => {
            app.state = AppState::Loading;

            let client = app.client.clone();
            let path = app.cv_path().to_string();
            let message = chevscout_core::compose_user_message(&app.submission_fields());

            let (tx, rx) = oneshot::channel();
            tokio::spawn(async move {
                let result: Result<MatchReport, AdvisorError> = async {
                    let attachment = CvAttachment::load(&path).await?;
                    let raw = client.submit(&attachment, &message).await?;
                    parse_report(&raw)
                }
                .await;
                let _ = tx.send(result);
            });
            app.submit_result_rx = Some(rx);
        }
        AppState::Loading => {
            if let Some(rx) = &mut app.submit_result_rx {
                if let Ok(result) = rx.try_recv() {
                    app.submit_result_rx = None;
                    match result {
                        Ok(report) => {
                            app.log_block("REPORT_RECEIVED", &report_summary(&report));
                            app.report = Some(report);
                            app.output_scroll = 0;
                            app.state = AppState::Results;
                            app.focus = FocusArea::Form;
                            app.dirty = true;
                        }
                        Err(e) => {
                            app.fail(e.to_string());
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

fn report_summary(report: &MatchReport) -> String {
    format!(
        "profile={} courses={} trio={} bullets={} alternatives={} notes={}",
        report.profile.is_some(),
        report.ranked_courses.as_ref().map_or(0, |c| c.len()),
        report.chevening_trio.as_ref().map_or(0, |t| t.len()),
        report.personal_statement_bullets.is_some(),
        report.alternatives.as_ref().map_or(0, |a| a.len()),
        report.notes.as_ref().map_or(0, |n| n.len()),
    )
}

fn handle_runtime_event(app: &mut App, event: Event) -> Result<bool> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_press(app, key),
        Event::Paste(text) => {
            handle_paste(app, &text);
            Ok(false)
        }
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        _ => Ok(false),
    }
}

fn handle_key_press(app: &mut App, key: KeyEvent) -> Result<bool> {
    // The about modal swallows input until dismissed.
    if app.show_about {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('a')) {
            app.show_about = false;
        }
        return Ok(false);
    }

    // Global shortcuts.
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return perform_footer_action(app, FooterAction::ToggleAbout);
        }
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return perform_footer_action(app, FooterAction::ToggleScoreDetails);
        }
        _ => {}
    }

    // In-flight requests cannot be cancelled; keys are ignored until the
    // request settles.
    if app.is_processing() {
        return Ok(false);
    }

    // Output scrolling works whenever the form is not the edit target.
    if app.focus == FocusArea::FooterButtons {
        match key.code {
            KeyCode::PageUp => {
                app.output_scroll = app.output_scroll.saturating_sub(10);
                return Ok(false);
            }
            KeyCode::PageDown => {
                app.output_scroll = app.output_scroll.saturating_add(10);
                return Ok(false);
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusArea::Form => FocusArea::FooterButtons,
                FocusArea::FooterButtons => FocusArea::Form,
            };
            return Ok(false);
        }
        KeyCode::Left if app.focus == FocusArea::FooterButtons => {
            if !app.footer_buttons.is_empty() {
                if app.footer_focus == 0 {
                    app.footer_focus = app.footer_buttons.len() - 1;
                } else {
                    app.footer_focus -= 1;
                }
            }
            return Ok(false);
        }
        KeyCode::Right if app.focus == FocusArea::FooterButtons => {
            if !app.footer_buttons.is_empty() {
                app.footer_focus = (app.footer_focus + 1) % app.footer_buttons.len();
            }
            return Ok(false);
        }
        KeyCode::Enter | KeyCode::Char(' ') if app.focus == FocusArea::FooterButtons => {
            if let Some(action) = app.footer_buttons.get(app.footer_focus).map(|b| b.action) {
                return perform_footer_action(app, action);
            }
            return Ok(false);
        }
        _ => {}
    }

    if app.focus == FocusArea::Form && app.form_editable() {
        match key.code {
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return perform_footer_action(app, FooterAction::Submit);
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return perform_footer_action(app, FooterAction::Submit);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let buffer = app.active_buffer_mut();
                buffer.text.clear();
                buffer.cursor = 0;
            }
            KeyCode::Enter | KeyCode::Down => app.next_field(),
            KeyCode::Up | KeyCode::BackTab => app.prev_field(),
            KeyCode::Left => {
                let buffer = app.active_buffer_mut();
                if buffer.cursor > 0 {
                    buffer.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let buffer = app.active_buffer_mut();
                if buffer.cursor < char_count(&buffer.text) {
                    buffer.cursor += 1;
                }
            }
            KeyCode::Home => app.active_buffer_mut().cursor = 0,
            KeyCode::End => {
                let buffer = app.active_buffer_mut();
                buffer.cursor = char_count(&buffer.text);
            }
            KeyCode::Char(c) => {
                let buffer = app.active_buffer_mut();
                insert_char_at_cursor(&mut buffer.text, &mut buffer.cursor, c);
            }
            KeyCode::Backspace => {
                let buffer = app.active_buffer_mut();
                delete_char_before_cursor(&mut buffer.text, &mut buffer.cursor);
            }
            KeyCode::Delete => {
                let buffer = app.active_buffer_mut();
                delete_char_at_cursor(&mut buffer.text, &mut buffer.cursor);
            }
            KeyCode::PageUp => app.output_scroll = app.output_scroll.saturating_sub(10),
            KeyCode::PageDown => app.output_scroll = app.output_scroll.saturating_add(10),
            KeyCode::Esc => match app.state {
                AppState::Input => return Ok(true),
                _ => app.back_to_input(),
            },
            _ => {}
        }
    }

    Ok(false)
}

fn handle_paste(app: &mut App, text: &str) {
    if app.show_about || app.focus != FocusArea::Form || !app.form_editable() {
        return;
    }
    let buffer = app.active_buffer_mut();
    for ch in text.chars() {
        // Fields are single-line; pasted newlines become spaces.
        let ch = if ch == '\n' || ch == '\r' { ' ' } else { ch };
        insert_char_at_cursor(&mut buffer.text, &mut buffer.cursor, ch);
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> Result<bool> {
    if app.show_about {
        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            app.show_about = false;
        }
        return Ok(false);
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.output_scroll = app.output_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown => {
            app.output_scroll = app.output_scroll.saturating_add(3);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let mut clicked_action: Option<(usize, FooterAction)> = None;
            for (idx, btn) in app.footer_buttons.iter().enumerate() {
                if point_in_rect(btn.rect, mouse.column, mouse.row) {
                    clicked_action = Some((idx, btn.action));
                    break;
                }
            }
            if let Some((idx, action)) = clicked_action {
                app.focus = FocusArea::FooterButtons;
                app.footer_focus = idx;
                return perform_footer_action(app, action);
            }

            if app.form_editable() && !app.is_processing() {
                for (idx, rect) in app.form_rects.into_iter().enumerate() {
                    let Some(rect) = rect else { continue };
                    if point_in_rect(rect, mouse.column, mouse.row) {
                        app.focus = FocusArea::Form;
                        app.active_field = FORM_FIELDS[idx];
                        let buffer = app.active_buffer_mut();
                        let text = buffer.text.clone();
                        set_cursor_from_click(
                            &text,
                            &mut buffer.cursor,
                            rect,
                            mouse.column,
                            FIELD_PREFIX_WIDTH,
                        );
                        break;
                    }
                }
            }
        }
        _ => {}
    }

    Ok(false)
}
