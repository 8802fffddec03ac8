//! Rendering for the edit field.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::state::EditField;

/// Status indicator shown after a failed commit.
const ERROR_GLYPH: &str = "✗";
/// Status indicator shown otherwise.
const SUCCESS_GLYPH: &str = "✓";
/// Busy indicator shown while a commit is outstanding.
const BUSY_GLYPH: &str = "⟳";

/// Render the field into `area`: the display line, or the edit form while
/// the field is open.
pub fn render(frame: &mut Frame, area: Rect, field: &EditField, focused: bool) {
    if field.is_editing() {
        render_editor(frame, area, field);
    } else {
        render_display(frame, area, field, focused);
    }
}

/// Number of rows the edit form occupies: one per option plus the
/// submit/cancel footer.
pub fn editor_height(field: &EditField) -> u16 {
    field.options_len().saturating_add(1) as u16
}

/// Render the display line: committed label, status indicator, edit hint.
pub fn render_display(frame: &mut Frame, area: Rect, field: &EditField, focused: bool) {
    let label = field.display_label();

    let text_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    // Exactly one of the success/error indicators is visible
    let status = if field.save_failed() {
        Span::styled(ERROR_GLYPH, Style::default().fg(Color::Red))
    } else {
        Span::styled(SUCCESS_GLYPH, Style::default().fg(Color::Green))
    };

    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);

    // Truncate the label, leaving room for the indicator and hint
    let reserved = 12usize;
    let label_width = (area.width as usize).saturating_sub(reserved).max(1);
    let truncated = if label.chars().count() > label_width {
        let cut: String = label.chars().take(label_width.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        label
    };

    let mut spans = vec![Span::styled(truncated, text_style), Span::raw(" "), status];
    if field.is_saving() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(BUSY_GLYPH, hint_style));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled("✎ e", hint_style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the edit form: one row per option, then the footer with the
/// submit/cancel hints and the busy indicator.
pub fn render_editor(frame: &mut Frame, area: Rect, field: &EditField) {
    let cursor = field.cursor();
    let committed = field.committed_value();

    let mut y = area.y;
    let max_y = area.y.saturating_add(area.height);

    for (i, option) in field.options().iter().enumerate() {
        if y >= max_y {
            return;
        }

        let is_cursor = i == cursor;
        let is_committed = option.value == committed;

        let marker = if is_committed { "● " } else { "  " };
        let row_style = if is_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let row = Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        };
        let content = format!("{marker}{}", option.label);
        let line = Line::from(Span::styled(
            format!("{:width$}", content, width = area.width as usize),
            row_style,
        ));
        frame.render_widget(Paragraph::new(line), row);
        y += 1;
    }

    if y >= max_y {
        return;
    }

    // Footer: submit hint is dimmed while there is nothing to save; the
    // busy indicator is always present and lights up while a commit is
    // outstanding.
    let dim = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    let save_style = if field.can_save() {
        Style::default().fg(Color::Green)
    } else {
        dim
    };
    let busy_style = if field.is_saving() {
        Style::default().fg(Color::Yellow)
    } else {
        dim
    };

    let footer = Line::from(vec![
        Span::styled("⏎ save", save_style),
        Span::raw("  "),
        Span::styled("esc cancel", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(BUSY_GLYPH, busy_style),
    ]);
    let footer_area = Rect {
        x: area.x,
        y,
        width: area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(footer), footer_area);
}
