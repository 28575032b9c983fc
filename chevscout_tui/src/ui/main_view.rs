use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::editor::char_count;
use crate::app::state::{App, AppState, FocusArea, FooterAction, FooterButton, FORM_FIELDS};
use crate::ui::report_view::build_report_sections;

/// Label column width in front of every form field, including the prompt.
pub const FIELD_PREFIX_WIDTH: u16 = 24;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                       // header + countdown
            Constraint::Length(FORM_FIELDS.len() as u16 + 2), // form
            Constraint::Length(1),                       // buttons
            Constraint::Min(1),                          // output
            Constraint::Length(2),                       // footer
        ])
        .split(area);

    render_header(f, app, main_layout[0]);
    render_form(f, app, main_layout[1]);
    render_button_row(f, app, main_layout[2]);
    render_output(f, app, main_layout[3]);
    render_footer(f, app, main_layout[4]);

    if app.show_about {
        render_about_modal(f, app, area);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let deadline_passed = app.countdown_text.contains("passed");
    let countdown_style = if deadline_passed {
        app.theme.countdown_passed_style
    } else {
        app.theme.countdown_style
    };

    let header_text = Line::from(vec![
        Span::styled(" CHEVSCOUT ", app.theme.header_title_style),
        Span::styled("// CV to Chevening course match ", app.theme.header_subtitle_style),
        Span::styled(format!(" {} ", app.countdown_text), countdown_style),
    ]);

    let header = Paragraph::new(header_text).style(app.theme.base_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style)
            .title(" APPLICATION WINDOW "),
    );
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &mut App, area: Rect) {
    let editable = app.form_editable();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style)
        .title(Span::styled(" YOUR DETAILS ", app.theme.header_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    app.form_rects = [None; 5];

    for (idx, field) in FORM_FIELDS.into_iter().enumerate() {
        let buffer = app.field(field);
        let active = editable && app.focus == FocusArea::Form && app.active_field == field;
        let label_style = if active {
            app.theme.field_active_style
        } else {
            app.theme.field_label_style
        };
        let marker = if active { ">" } else { " " };
        let label = format!("{} {:<width$}", marker, field.label(), width = (FIELD_PREFIX_WIDTH - 2) as usize);

        let mut spans = vec![Span::styled(label, label_style)];
        let cursor_visible = active && (app.tick_count / 8) % 2 == 0;
        spans.extend(field_text_spans(app, buffer.cursor, &buffer.text, cursor_visible));
        lines.push(Line::from(spans));

        if (idx as u16) < inner.height {
            app.form_rects[idx] = Some(Rect {
                x: inner.x,
                y: inner.y + idx as u16,
                width: inner.width,
                height: 1,
            });
        }
    }

    let form = Paragraph::new(lines).style(app.theme.base_style);
    f.render_widget(form, inner);
}

fn field_text_spans(
    app: &App,
    cursor: usize,
    text: &str,
    cursor_visible: bool,
) -> Vec<Span<'static>> {
    if !cursor_visible {
        return vec![Span::styled(text.to_string(), app.theme.field_text_style)];
    }

    let before: String = text.chars().take(cursor).collect();
    let at: String = text.chars().skip(cursor).take(1).collect();
    let after: String = text.chars().skip(cursor + 1).collect();
    let cursor_char = if at.is_empty() { " ".to_string() } else { at };

    vec![
        Span::styled(before, app.theme.field_text_style),
        Span::styled(cursor_char, app.theme.field_cursor_style),
        Span::styled(after, app.theme.field_text_style),
    ]
}

fn render_button_row(f: &mut Frame, app: &mut App, area: Rect) {
    app.footer_buttons.clear();

    let actions: Vec<(FooterAction, &str)> = match &app.state {
        _ if app.is_processing() => Vec::new(),
        AppState::Results => vec![
            (FooterAction::Submit, "[SUBMIT]"),
            (
                FooterAction::ToggleScoreDetails,
                if app.show_score_details {
                    "[HIDE SCORES]"
                } else {
                    "[SCORES]"
                },
            ),
            (FooterAction::ClearForm, "[CLEAR]"),
            (FooterAction::ToggleAbout, "[ABOUT]"),
            (FooterAction::Quit, "[QUIT]"),
        ],
        AppState::Error(_) => vec![
            (FooterAction::Submit, "[SUBMIT]"),
            (FooterAction::BackToInput, "[BACK]"),
            (FooterAction::ToggleAbout, "[ABOUT]"),
            (FooterAction::Quit, "[QUIT]"),
        ],
        _ => vec![
            (FooterAction::Submit, "[SUBMIT]"),
            (FooterAction::ClearForm, "[CLEAR]"),
            (FooterAction::ToggleAbout, "[ABOUT]"),
            (FooterAction::Quit, "[QUIT]"),
        ],
    };

    if actions.is_empty() {
        let working = Paragraph::new(Line::from(Span::styled(
            " request in flight, submit disabled ",
            app.theme.header_subtitle_style,
        )))
        .style(app.theme.base_style);
        f.render_widget(working, area);
        return;
    }

    if app.footer_focus >= actions.len() {
        app.footer_focus = 0;
    }

    let mut spans = Vec::new();
    let mut x = area.x;
    for (idx, (action, label)) in actions.iter().enumerate() {
        let focused = app.focus == FocusArea::FooterButtons && app.footer_focus == idx;
        let style = if focused {
            app.theme.footer_selected_style
        } else {
            app.theme.footer_key_style
        };
        let width = char_count(label) as u16;
        app.footer_buttons.push(FooterButton {
            rect: Rect {
                x,
                y: area.y,
                width,
                height: 1,
            },
            action: *action,
        });
        spans.push(Span::styled((*label).to_string(), style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }

    let row = Paragraph::new(Line::from(spans)).style(app.theme.base_style);
    f.render_widget(row, area);
}

fn render_output(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match &app.state {
        AppState::Input => " GETTING STARTED ",
        AppState::PendingSubmit | AppState::Loading => " WORKING ",
        AppState::Results => " COURSE MATCH REPORT ",
        AppState::Error(_) => " ERROR ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style)
        .title(Span::styled(title, app.theme.header_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = build_output_lines(app);
    let line_count = lines.len() as u16;
    let max_scroll = line_count.saturating_sub(inner.height);
    let clamped = app.output_scroll.min(max_scroll);
    app.output_max_scroll = max_scroll;
    app.output_scroll = clamped;

    let output = Paragraph::new(lines)
        .style(app.theme.base_style)
        .wrap(Wrap { trim: false })
        .scroll((clamped, 0));
    f.render_widget(output, inner);
}

fn build_output_lines(app: &App) -> Vec<Line<'static>> {
    match &app.state {
        AppState::Input => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Fill in the form, point the CV field at a .pdf or .docx file,".to_string(),
                    app.theme.entry_detail_style,
                )),
                Line::from(Span::styled(
                    "then press Ctrl+D (or the SUBMIT button) to get your report.".to_string(),
                    app.theme.entry_detail_style,
                )),
            ];
            if let Some(path) = app.session_logger.display_path() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Session log: {}", path),
                    app.theme.header_subtitle_style,
                )));
            }
            lines
        }
        AppState::PendingSubmit | AppState::Loading => {
            let frame = SPINNER_FRAMES[(app.tick_count / 4) as usize % SPINNER_FRAMES.len()];
            vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("  {} ", frame), app.theme.processing_spinner_style),
                    Span::styled(
                        app.loading_message().to_string(),
                        app.theme.processing_text_style,
                    ),
                ]),
            ]
        }
        AppState::Results => {
            let Some(report) = &app.report else {
                return vec![Line::from(Span::styled(
                    "The model returned an empty report.".to_string(),
                    app.theme.error_style,
                ))];
            };

            let sections = build_report_sections(report, &app.theme, app.show_score_details);
            if sections.is_empty() {
                return vec![Line::from(Span::styled(
                    "The model returned an empty report. Try refining your fields.".to_string(),
                    app.theme.advisory_style,
                ))];
            }

            let mut lines = Vec::new();
            for section in sections {
                lines.push(Line::from(Span::styled(
                    format!("== {} ==", section.title),
                    app.theme.section_title_style,
                )));
                lines.extend(section.lines);
                lines.push(Line::from(""));
            }
            lines.pop();
            lines
        }
        AppState::Error(message) => vec![
            Line::from(Span::styled(message.clone(), app.theme.error_style)),
            Line::from(""),
            Line::from(Span::styled(
                "Fix the form above and submit again.".to_string(),
                app.theme.entry_detail_style,
            )),
        ],
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let state_name = match &app.state {
        AppState::Input => "INPUT",
        AppState::PendingSubmit | AppState::Loading => "LOADING",
        AppState::Results => "RESULTS",
        AppState::Error(_) => "ERROR",
    };

    let footer_block = Block::default()
        .borders(Borders::TOP)
        .border_style(app.theme.border_style);
    let footer_inner = footer_block.inner(area);
    f.render_widget(footer_block, area);

    let line1 = Line::from(vec![
        Span::styled(" MODE: ", app.theme.footer_text_style),
        Span::styled(state_name.to_string(), app.theme.footer_highlight_style),
        Span::styled("  MODEL: ", app.theme.footer_text_style),
        Span::styled(app.model_name.clone(), app.theme.footer_highlight_style),
    ]);
    let line2 = Line::from(Span::styled(
        " Tab focus | Ctrl+D submit | Ctrl+E scores | Ctrl+A about | Ctrl+C quit",
        app.theme.footer_text_style,
    ));

    let footer = Paragraph::new(vec![line1, line2]).style(app.theme.base_style);
    f.render_widget(footer, footer_inner);
}

fn render_about_modal(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(10).min(70).max(30);
    let height = 12.min(area.height.saturating_sub(2)).max(6);
    let modal = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, modal);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " What this tool does".to_string(),
            app.theme.header_title_style,
        )),
        Line::from(Span::styled(
            " Your CV and the four fields are sent to Google Gemini with a".to_string(),
            app.theme.entry_detail_style,
        )),
        Line::from(Span::styled(
            " fixed advisor instruction; course discovery, eligibility checks".to_string(),
            app.theme.entry_detail_style,
        )),
        Line::from(Span::styled(
            " and ranking all happen on the model side.".to_string(),
            app.theme.entry_detail_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Nothing is stored remotely by this app; one session log file".to_string(),
            app.theme.entry_detail_style,
        )),
        Line::from(Span::styled(
            " is written locally with credentials redacted.".to_string(),
            app.theme.entry_detail_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Esc / Enter / a to close".to_string(),
            app.theme.header_subtitle_style,
        )),
    ];

    let body = Paragraph::new(lines)
        .style(app.theme.base_style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style)
                .title(Span::styled(" ABOUT ", app.theme.header_title_style)),
        );
    f.render_widget(body, modal);
}
