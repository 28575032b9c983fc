use ratatui::layout::Rect;

/// Char-indexed editing helpers for the single-line form fields. Cursors
/// count characters, not bytes.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

fn byte_index(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    if let Some((idx, _)) = text.char_indices().nth(char_idx) {
        return idx;
    }
    text.len()
}

pub fn insert_char_at_cursor(text: &mut String, cursor: &mut usize, ch: char) {
    let idx = byte_index(text, *cursor);
    text.insert(idx, ch);
    *cursor += 1;
}

pub fn delete_char_before_cursor(text: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let start = byte_index(text, *cursor - 1);
    let end = byte_index(text, *cursor);
    if start < end {
        text.replace_range(start..end, "");
        *cursor -= 1;
    }
}

pub fn delete_char_at_cursor(text: &mut String, cursor: &mut usize) {
    if *cursor >= char_count(text) {
        return;
    }
    let start = byte_index(text, *cursor);
    let end = byte_index(text, *cursor + 1);
    if start < end {
        text.replace_range(start..end, "");
    }
}

pub fn point_in_rect(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Places the cursor at the clicked column, accounting for the label prefix
/// the form view draws before the text.
pub fn set_cursor_from_click(text: &str, cursor: &mut usize, area: Rect, col: u16, prefix: u16) {
    if area.width == 0 {
        return;
    }
    let col_in_area = col.saturating_sub(area.x) as usize;
    let col_in_text = col_in_area.saturating_sub(prefix as usize);
    *cursor = col_in_text.min(char_count(text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_respect_multibyte_chars() {
        let mut text = String::from("résumé");
        let mut cursor = char_count(&text);
        insert_char_at_cursor(&mut text, &mut cursor, '!');
        assert_eq!(text, "résumé!");
        assert_eq!(cursor, 7);

        delete_char_before_cursor(&mut text, &mut cursor);
        delete_char_before_cursor(&mut text, &mut cursor);
        assert_eq!(text, "résum");
        assert_eq!(cursor, 5);

        cursor = 1;
        delete_char_at_cursor(&mut text, &mut cursor);
        assert_eq!(text, "rsum");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut text = String::from("cv.pdf");
        let mut cursor = 0;
        delete_char_before_cursor(&mut text, &mut cursor);
        assert_eq!(text, "cv.pdf");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn click_maps_to_clamped_cursor_position() {
        let area = Rect::new(10, 5, 40, 1);
        let mut cursor = 0;
        set_cursor_from_click("abc", &mut cursor, area, 12, 0);
        assert_eq!(cursor, 2);
        set_cursor_from_click("abc", &mut cursor, area, 49, 0);
        assert_eq!(cursor, 3);
        // Clicks inside the label prefix land at position zero.
        set_cursor_from_click("abc", &mut cursor, area, 11, 4);
        assert_eq!(cursor, 0);
    }
}
