use anyhow::Result;
use chevscout_core::{AdvisorError, Config, GeminiClient};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{stdout, Stdout};

mod app;
mod theme;
mod ui;

use app::runtime::run_app;
use app::state::App;
use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().await?;
    let theme = Theme::from_config(&config.theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Mouse support enables clickable footer buttons and click-to-edit fields.
    let mouse_capture_enabled = execute!(stdout, EnableMouseCapture).is_ok();
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = match config.credential() {
        Ok(api_key) => match GeminiClient::new(api_key, config.model.clone()) {
            Ok(client) => {
                let mut app = App::new(client, theme);
                run_app(&mut terminal, &mut app).await
            }
            Err(e) => show_startup_error(&mut terminal, &theme, &e).await,
        },
        // No key means nothing downstream can work; show a static screen
        // instead of the form and exit on the next key press.
        Err(e) => show_startup_error(&mut terminal, &theme, &e).await,
    };

    // Restore terminal
    disable_raw_mode()?;
    if mouse_capture_enabled {
        let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

async fn show_startup_error(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<Stdout>>,
    theme: &Theme,
    error: &AdvisorError,
) -> Result<()> {
    let message = error.to_string();

    loop {
        terminal.draw(|f| {
            let area = f.area();
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(area);

            let header = Paragraph::new(Line::from(Span::styled(
                " CHEVSCOUT ",
                theme.header_title_style,
            )))
            .style(theme.base_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style)
                    .title(" SETUP REQUIRED "),
            );
            f.render_widget(header, layout[0]);

            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(message.clone(), theme.error_style)),
                Line::from(""),
                Line::from(Span::styled(
                    "Set the GEMINI_API_KEY environment variable, or put".to_string(),
                    theme.entry_detail_style,
                )),
                Line::from(Span::styled(
                    "api_key = \"...\" in the chevscout config file, then restart.".to_string(),
                    theme.entry_detail_style,
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key to exit.".to_string(),
                    theme.header_subtitle_style,
                )),
            ];
            let body = Paragraph::new(lines)
                .style(theme.base_style)
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme.border_style),
                );
            f.render_widget(body, layout[1]);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
