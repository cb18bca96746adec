//! Welcome screen: logo intro, then the entry menu with social-login stubs.

use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::{self, Delayed, Provider, REDIRECT_DELAY};
use crate::effects::{self, Particle, LOGO};
use crate::error::Result;
use crate::models::Session;
use crate::session::SessionStore;
use crate::tui::{self, Banner, FOOTER_STYLE, HEADER_STYLE, TICK_INTERVAL};

/// Intro animation timing (milliseconds)
const INTRO_PARTICLES_MS: f64 = 500.0;
const INTRO_REVEAL_MS: f64 = 500.0;
const INTRO_UI_DELAY_MS: f64 = 200.0;
const INTRO_TOTAL_MS: f64 = INTRO_PARTICLES_MS + INTRO_REVEAL_MS + INTRO_UI_DELAY_MS;

const MENU_ITEMS: &[&str] = &[
    "Log in",
    "Create account",
    "Continue with Google",
    "Continue with Facebook",
    "Continue with Apple",
    "Quit",
];

pub enum Outcome {
    Login,
    Signup,
    Authenticated(Session),
    Quit,
}

enum Pending {
    Social(Provider, Delayed<Session>),
    Redirect(Delayed<()>, Session),
}

struct Welcome {
    selection: usize,
    banner: Option<Banner>,
    pending: Option<Pending>,
    phase: f64,
    particles: Vec<Particle>,
    width: u16,
    height: u16,
    start: Instant,
    reveal_order: Vec<(usize, usize)>,
    intro_done: bool,
}

impl Welcome {
    fn new() -> Self {
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        Self {
            selection: 0,
            banner: None,
            pending: None,
            phase: 0.0,
            particles: effects::pre_seed_particles(width, height),
            width,
            height,
            start: Instant::now(),
            reveal_order: effects::logo_reveal_order(),
            intro_done: false,
        }
    }

    fn start_social(&mut self, provider: Provider) {
        self.banner = Some(Banner::info(format!(
            "Connecting to {}...",
            provider.name()
        )));
        self.pending = Some(Pending::Social(provider, api::social_login(provider)));
    }

    /// Advance animation and poll any pending simulated call. A pending call
    /// cannot be aborted; it runs to its deadline.
    fn tick(&mut self, store: &mut SessionStore) -> Result<Option<Outcome>> {
        self.phase += 1.0 / 70.0;
        effects::tick_particles(&mut self.particles, self.width, self.height);
        tui::expire_banner(&mut self.banner);

        match self.pending.take() {
            None => Ok(None),
            Some(Pending::Social(provider, mut call)) => match call.poll() {
                None => {
                    self.pending = Some(Pending::Social(provider, call));
                    Ok(None)
                }
                Some(Ok(session)) => {
                    store.save(&session, false)?;
                    self.banner = Some(Banner::success(format!(
                        "{} login successful! Redirecting...",
                        provider.name()
                    )));
                    self.pending = Some(Pending::Redirect(
                        Delayed::new(Ok(()), REDIRECT_DELAY),
                        session,
                    ));
                    Ok(None)
                }
                Some(Err(_)) => {
                    self.banner = Some(Banner::error(format!(
                        "Failed to log in with {}. Please try again.",
                        provider.label()
                    )));
                    Ok(None)
                }
            },
            Some(Pending::Redirect(mut timer, session)) => match timer.poll() {
                None => {
                    self.pending = Some(Pending::Redirect(timer, session));
                    Ok(None)
                }
                Some(_) => Ok(Some(Outcome::Authenticated(session))),
            },
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<Outcome> {
        if self.pending.is_some() {
            return None;
        }
        match code {
            KeyCode::Up => {
                self.selection = self.selection.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.selection = (self.selection + 1).min(MENU_ITEMS.len() - 1);
                None
            }
            KeyCode::Enter => match self.selection {
                0 => Some(Outcome::Login),
                1 => Some(Outcome::Signup),
                2 => {
                    self.start_social(Provider::Google);
                    None
                }
                3 => {
                    self.start_social(Provider::Facebook);
                    None
                }
                4 => {
                    self.start_social(Provider::Apple);
                    None
                }
                _ => Some(Outcome::Quit),
            },
            KeyCode::Esc | KeyCode::Char('q') => Some(Outcome::Quit),
            _ => None,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.width = area.width;
        self.height = area.height;

        effects::render_particles(&self.particles, frame, area);

        if !self.intro_done {
            let elapsed = self.start.elapsed().as_secs_f64() * 1000.0;
            if elapsed >= INTRO_TOTAL_MS {
                self.intro_done = true;
            }
        }

        let logo_height = LOGO.len() as u16;
        let menu_height = MENU_ITEMS.len() as u16;
        let [_top_pad, logo_area, _gap1, tagline_area, _gap2, menu_area, _gap3, banner_area, hints_area, _bottom_pad] =
            Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(logo_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(menu_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);

        if !self.intro_done {
            let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
            if elapsed_ms < INTRO_PARTICLES_MS {
                return;
            }
            let logo_elapsed = elapsed_ms - INTRO_PARTICLES_MS;
            if logo_elapsed < INTRO_REVEAL_MS {
                let progress = logo_elapsed / INTRO_REVEAL_MS;
                let chars_visible = (progress * self.reveal_order.len() as f64) as usize;
                effects::render_logo_reveal(
                    self.phase,
                    frame,
                    logo_area,
                    &self.reveal_order,
                    chars_visible,
                );
            } else {
                effects::render_logo(self.phase, frame, logo_area);
            }
            return;
        }

        effects::render_logo(self.phase, frame, logo_area);

        frame.render_widget(
            Paragraph::new(Span::styled("Where real connections begin.", HEADER_STYLE))
                .alignment(ratatui::layout::Alignment::Center),
            tagline_area,
        );

        let menu_width = 50u16.min(area.width.saturating_sub(4));
        let menu_x = area.x + (area.width.saturating_sub(menu_width)) / 2;
        let centered_menu = Rect::new(menu_x, menu_area.y, menu_width, menu_area.height);

        let menu_lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let marker = if i == self.selection { ">" } else { " " };
                let style = if i == self.selection {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!(" {marker} {label}"), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(menu_lines), centered_menu);

        if let Some(banner) = &self.banner {
            frame.render_widget(
                Paragraph::new(banner.line()).alignment(ratatui::layout::Alignment::Center),
                banner_area,
            );
        }

        frame.render_widget(
            Paragraph::new(" Up/Down=navigate  Enter=select  q=quit")
                .style(FOOTER_STYLE)
                .alignment(ratatui::layout::Alignment::Center),
            hints_area,
        );
    }
}

/// Run the welcome screen until the user picks an entry or quits.
pub fn run(store: &mut SessionStore) -> Result<Outcome> {
    let mut screen = Welcome::new();
    let mut terminal = ratatui::init();

    let result: Result<Outcome> = loop {
        if let Err(e) = terminal.draw(|frame| screen.draw(frame)) {
            break Err(e.into());
        }

        if event::poll(TICK_INTERVAL)? {
            match event::read() {
                Err(e) => break Err(e.into()),
                Ok(Event::Key(key)) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break Ok(Outcome::Quit);
                    }
                    if !screen.intro_done {
                        screen.intro_done = true;
                        continue;
                    }
                    if let Some(outcome) = screen.handle_key(key.code) {
                        break Ok(outcome);
                    }
                }
                _ => {}
            }
        }

        match screen.tick(store) {
            Err(e) => break Err(e),
            Ok(Some(outcome)) => break Ok(outcome),
            Ok(None) => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_welcome() -> Welcome {
        Welcome {
            selection: 0,
            banner: None,
            pending: None,
            phase: 0.0,
            particles: vec![],
            width: 80,
            height: 24,
            start: Instant::now(),
            reveal_order: vec![],
            intro_done: true,
        }
    }

    fn test_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_root(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn navigation_clamps_to_menu() {
        let mut screen = make_welcome();
        screen.handle_key(KeyCode::Up);
        assert_eq!(screen.selection, 0);
        for _ in 0..10 {
            screen.handle_key(KeyCode::Down);
        }
        assert_eq!(screen.selection, MENU_ITEMS.len() - 1);
    }

    #[test]
    fn enter_on_first_items_returns_outcome() {
        let mut screen = make_welcome();
        assert!(matches!(screen.handle_key(KeyCode::Enter), Some(Outcome::Login)));
        screen.selection = 1;
        assert!(matches!(screen.handle_key(KeyCode::Enter), Some(Outcome::Signup)));
        screen.selection = MENU_ITEMS.len() - 1;
        assert!(matches!(screen.handle_key(KeyCode::Enter), Some(Outcome::Quit)));
    }

    #[test]
    fn social_entry_starts_pending_call() {
        let mut screen = make_welcome();
        screen.selection = 2;
        assert!(screen.handle_key(KeyCode::Enter).is_none());
        assert!(matches!(
            screen.pending,
            Some(Pending::Social(Provider::Google, _))
        ));
        let banner = screen.banner.as_ref().unwrap();
        assert!(banner.message.contains("google"));
    }

    #[test]
    fn keys_are_ignored_while_pending() {
        let mut screen = make_welcome();
        screen.selection = 3;
        screen.handle_key(KeyCode::Enter);
        assert!(screen.handle_key(KeyCode::Enter).is_none());
        assert_eq!(screen.selection, 3);
    }

    #[test]
    fn resolved_social_login_saves_session_and_redirects() {
        let (_dir, mut store) = test_store();
        let mut screen = make_welcome();
        screen.pending = Some(Pending::Social(
            Provider::Google,
            Delayed::ready(Ok(Session {
                id: "1".to_string(),
                email: "user@google.com".to_string(),
                name: "Google User".to_string(),
                has_profile: false,
                token: "demo-1".to_string(),
            })),
        ));

        assert!(screen.tick(&mut store).unwrap().is_none());
        assert!(matches!(screen.pending, Some(Pending::Redirect(_, _))));
        assert_eq!(store.current().unwrap().email, "user@google.com");

        // Force the redirect timer for the test.
        screen.pending = Some(Pending::Redirect(
            Delayed::ready(Ok(())),
            store.current().unwrap(),
        ));
        let outcome = screen.tick(&mut store).unwrap();
        assert!(matches!(outcome, Some(Outcome::Authenticated(_))));
    }

    #[test]
    fn failed_social_login_shows_retryable_banner() {
        let (_dir, mut store) = test_store();
        let mut screen = make_welcome();
        screen.pending = Some(Pending::Social(
            Provider::Apple,
            Delayed::ready(Err(std::io::Error::other("connection reset").into())),
        ));
        assert!(screen.tick(&mut store).unwrap().is_none());
        assert!(screen.pending.is_none());
        let banner = screen.banner.as_ref().unwrap();
        assert!(banner.message.contains("Apple"));
        // The menu is usable again.
        assert!(matches!(screen.handle_key(KeyCode::Enter), Some(Outcome::Login)));
    }
}
