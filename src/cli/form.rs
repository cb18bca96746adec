//! Editable form fields shared by the login, signup, and wizard surfaces.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use zeroize::Zeroize;

use crate::tui::SELECTED_STYLE;

pub const LABEL_WIDTH: u16 = 22;

/// Convert a char-index cursor position to a byte offset in the string.
pub fn byte_pos(s: &str, cursor: usize) -> usize {
    s.char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Build a display string with a block cursor inserted at `cursor_pos`.
pub fn insert_cursor(value: &str, cursor_pos: usize, masked: bool) -> String {
    let mut display = if masked {
        "\u{25cf}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let pos = byte_pos(&display, cursor_pos);
    display.insert(pos, '\u{2588}');
    display
}

/// A single-line text input with cursor editing.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub cursor: usize,
    pub masked: bool,
    pub max_len: Option<usize>,
    pub numeric: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            cursor: 0,
            masked: false,
            max_len: None,
            numeric: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn numeric(label: &'static str) -> Self {
        Self {
            numeric: true,
            ..Self::new(label)
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn parsed_u32(&self) -> Option<u32> {
        self.value.trim().parse().ok()
    }

    /// Zero the backing storage; used for password fields.
    pub fn wipe(&mut self) {
        self.value.zeroize();
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns true when the key was consumed by this field.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => {
                if self.numeric && !c.is_ascii_digit() {
                    return true;
                }
                if self
                    .max_len
                    .is_some_and(|max| self.char_count() >= max)
                {
                    return true;
                }
                let pos = byte_pos(&self.value, self.cursor);
                self.value.insert(pos, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let pos = byte_pos(&self.value, self.cursor);
                    self.value.remove(pos);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    let pos = byte_pos(&self.value, self.cursor);
                    self.value.remove(pos);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                true
            }
            _ => false,
        }
    }
}

/// Cycle through a fixed option list with Left/Right; starts unset.
#[derive(Debug, Clone)]
pub struct Selector {
    pub label: &'static str,
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl Selector {
    pub fn new(label: &'static str, options: &[&str]) -> Self {
        Self {
            label,
            options: options.iter().map(|s| s.to_string()).collect(),
            selected: None,
        }
    }

    pub fn value(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_value(&mut self, value: &str) {
        self.selected = self.options.iter().position(|o| o == value);
    }

    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let len = self.options.len();
        match code {
            KeyCode::Left => {
                self.selected = Some(match self.selected {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                });
                true
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(i) => (i + 1) % len,
                });
                true
            }
            _ => false,
        }
    }
}

/// A boolean flag flipped with Space or Enter.
#[derive(Debug, Clone)]
pub struct Toggle {
    pub label: &'static str,
    pub on: bool,
}

impl Toggle {
    pub fn new(label: &'static str) -> Self {
        Self { label, on: false }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.on = !self.on;
                true
            }
            _ => false,
        }
    }
}

fn label_span(label: &str, active: bool) -> Span<'_> {
    let style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Span::styled(
        format!("{:<width$}", label, width = LABEL_WIDTH as usize),
        style,
    )
}

fn input_style(active: bool) -> Style {
    if active {
        SELECTED_STYLE
    } else {
        Style::default().fg(ratatui::style::Color::DarkGray)
    }
}

/// Render a label + input row.
pub fn draw_field(frame: &mut Frame, area: Rect, field: &TextField, active: bool) {
    let [label_area, input_area] =
        Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Fill(1)]).areas(area);

    frame.render_widget(Paragraph::new(label_span(field.label, active)), label_area);

    let display = if active {
        insert_cursor(&field.value, field.cursor, field.masked)
    } else if field.masked {
        "\u{25cf}".repeat(field.char_count())
    } else {
        field.value.clone()
    };
    let padded = format!("{:<width$}", display, width = input_area.width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(padded, input_style(active))),
        input_area,
    );
}

/// Render a label + `< option >` row.
pub fn draw_selector(frame: &mut Frame, area: Rect, selector: &Selector, active: bool) {
    let [label_area, input_area] =
        Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Fill(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(label_span(selector.label, active)),
        label_area,
    );

    let value = if selector.selected.is_none() {
        "(choose)".to_string()
    } else {
        selector.value().to_string()
    };
    let display = format!("\u{2039} {value} \u{203a}");
    let padded = format!("{:<width$}", display, width = input_area.width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(padded, input_style(active))),
        input_area,
    );
}

/// Render a `[x] label` row.
pub fn draw_toggle(frame: &mut Frame, area: Rect, toggle: &Toggle, active: bool) {
    let mark = if toggle.on { "[x]" } else { "[ ]" };
    let text = format!("{mark} {}", toggle.label);
    let style = if active {
        SELECTED_STYLE
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
}

/// Render a centered `[ label ]` button row.
pub fn draw_button(frame: &mut Frame, area: Rect, label: &str, active: bool, enabled: bool) {
    let style = if active {
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if enabled {
        Style::default()
    } else {
        Style::default().fg(ratatui::style::Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("[ {label} ]"), style))
            .alignment(ratatui::layout::Alignment::Center),
        area,
    );
}
