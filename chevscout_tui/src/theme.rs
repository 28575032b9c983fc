use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Base
    pub base_style: Style,
    // Borders
    pub border_style: Style,
    // Header
    pub header_title_style: Style,
    pub header_subtitle_style: Style,
    pub countdown_style: Style,
    pub countdown_passed_style: Style,
    // Form
    pub field_label_style: Style,
    pub field_text_style: Style,
    pub field_cursor_style: Style,
    pub field_active_style: Style,
    // Loading
    pub processing_spinner_style: Style,
    pub processing_text_style: Style,
    // Report
    pub section_title_style: Style,
    pub entry_title_style: Style,
    pub entry_detail_style: Style,
    pub badge_eligible_style: Style,
    pub badge_ineligible_style: Style,
    pub advisory_style: Style,
    pub verify_fee_style: Style,
    pub disclosure_style: Style,
    // Footer
    pub footer_text_style: Style,
    pub footer_highlight_style: Style,
    pub footer_key_style: Style,
    pub footer_selected_style: Style,
    // Alerts/Errors
    pub error_style: Style,
    pub success_style: Style,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => {
                // "auto" and anything unknown: follow the system theme,
                // defaulting to dark when detection fails.
                match dark_light::detect() {
                    dark_light::Mode::Light => Self::light(),
                    dark_light::Mode::Dark | dark_light::Mode::Default => Self::dark(),
                }
            }
        }
    }

    pub fn dark() -> Self {
        let teal = Color::Rgb(64, 200, 180);
        let teal_dim = Color::Rgb(40, 120, 110);
        let bg = Color::Rgb(12, 16, 16);
        let red_alert = Color::Rgb(255, 80, 80);
        let green_ok = Color::Rgb(110, 220, 110);
        let amber = Color::Rgb(255, 176, 0);

        Self {
            base_style: Style::default().fg(teal).bg(bg),
            border_style: Style::default().fg(teal_dim),

            header_title_style: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            header_subtitle_style: Style::default().fg(teal_dim),
            countdown_style: Style::default().fg(amber),
            countdown_passed_style: Style::default().fg(red_alert).add_modifier(Modifier::BOLD),

            field_label_style: Style::default().fg(teal_dim),
            field_text_style: Style::default().fg(Color::White),
            field_cursor_style: Style::default()
                .bg(teal)
                .fg(bg)
                .add_modifier(Modifier::RAPID_BLINK),
            field_active_style: Style::default().fg(teal).add_modifier(Modifier::BOLD),

            processing_spinner_style: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            processing_text_style: Style::default().fg(teal),

            section_title_style: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            entry_title_style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            entry_detail_style: Style::default().fg(teal_dim),
            badge_eligible_style: Style::default().fg(green_ok).add_modifier(Modifier::BOLD),
            badge_ineligible_style: Style::default().fg(red_alert).add_modifier(Modifier::BOLD),
            advisory_style: Style::default().fg(amber),
            verify_fee_style: Style::default().fg(amber).add_modifier(Modifier::ITALIC),
            disclosure_style: Style::default().fg(teal_dim).add_modifier(Modifier::ITALIC),

            footer_text_style: Style::default().fg(teal_dim),
            footer_highlight_style: Style::default().fg(teal),
            footer_key_style: Style::default().fg(bg).bg(teal),
            footer_selected_style: Style::default()
                .fg(bg)
                .bg(Color::Rgb(190, 190, 190))
                .add_modifier(Modifier::BOLD),

            error_style: Style::default().fg(red_alert),
            success_style: Style::default().fg(bg).bg(teal),
        }
    }

    pub fn light() -> Self {
        let text_main = Color::Black;
        let text_dim = Color::DarkGray;
        let accent = Color::Rgb(0, 110, 100);
        let red_alert = Color::Red;
        let green_ok = Color::Rgb(0, 140, 0);
        let amber = Color::Rgb(180, 120, 0);

        Self {
            base_style: Style::default().fg(text_main),
            border_style: Style::default().fg(accent),

            header_title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            header_subtitle_style: Style::default().fg(text_dim),
            countdown_style: Style::default().fg(amber),
            countdown_passed_style: Style::default().fg(red_alert).add_modifier(Modifier::BOLD),

            field_label_style: Style::default().fg(text_dim),
            field_text_style: Style::default().fg(text_main),
            field_cursor_style: Style::default()
                .bg(accent)
                .fg(Color::White)
                .add_modifier(Modifier::RAPID_BLINK),
            field_active_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),

            processing_spinner_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            processing_text_style: Style::default().fg(accent),

            section_title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            entry_title_style: Style::default().fg(text_main).add_modifier(Modifier::BOLD),
            entry_detail_style: Style::default().fg(text_dim),
            badge_eligible_style: Style::default().fg(green_ok).add_modifier(Modifier::BOLD),
            badge_ineligible_style: Style::default().fg(red_alert).add_modifier(Modifier::BOLD),
            advisory_style: Style::default().fg(amber),
            verify_fee_style: Style::default().fg(amber).add_modifier(Modifier::ITALIC),
            disclosure_style: Style::default().fg(text_dim).add_modifier(Modifier::ITALIC),

            footer_text_style: Style::default().fg(text_dim),
            footer_highlight_style: Style::default().fg(accent),
            footer_key_style: Style::default().fg(Color::White).bg(accent),
            footer_selected_style: Style::default()
                .fg(Color::White)
                .bg(text_dim)
                .add_modifier(Modifier::BOLD),

            error_style: Style::default().fg(red_alert),
            success_style: Style::default().fg(Color::White).bg(accent),
        }
    }
}
