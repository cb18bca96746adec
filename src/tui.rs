use std::time::{Duration, Instant};

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Rgb(255, 94, 125))
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(50, 34, 44))
    .add_modifier(Modifier::BOLD);

pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);
pub const SUCCESS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const INFO_STYLE: Style = Style::new().fg(Color::Rgb(120, 180, 255));

/// Tick cadence for every interactive screen.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Banners disappear on their own after five seconds.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// Braille spinner shown on a button while a simulated call is pending.
pub const SPINNER_FRAMES: &[char] = &['\u{280b}', '\u{2819}', '\u{2838}', '\u{2834}', '\u{2826}', '\u{2807}'];

pub fn spinner_frame(phase: f64) -> char {
    let idx = (phase * 10.0) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
    Info,
}

/// Transient inline alert line, the terminal analog of the original's alert
/// box. Non-fatal: every banner leaves the screen usable.
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    shown_at: Instant,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, BannerKind::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, BannerKind::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, BannerKind::Info)
    }

    fn new(message: impl Into<String>, kind: BannerKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= BANNER_TTL
    }

    pub fn line(&self) -> Line<'_> {
        let (icon, style) = match self.kind {
            BannerKind::Error => ("\u{2716} ", ERROR_STYLE),
            BannerKind::Success => ("\u{2714} ", SUCCESS_STYLE),
            BannerKind::Info => ("\u{2139} ", INFO_STYLE),
        };
        Line::from(vec![
            Span::styled(icon, style),
            Span::styled(self.message.as_str(), style),
        ])
    }
}

/// Drop a banner once its time is up. Called from screen ticks.
pub fn expire_banner(banner: &mut Option<Banner>) {
    if banner.as_ref().is_some_and(Banner::is_expired) {
        *banner = None;
    }
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}
