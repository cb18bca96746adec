//! Signup screen: account form with password confirmation plus the
//! social-login stubs.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::api::{self, Delayed, Provider, REDIRECT_DELAY};
use crate::effects::{self, LOGO};
use crate::error::Result;
use crate::models::Session;
use crate::session::SessionStore;
use crate::tui::{self, spinner_frame, Banner, FOOTER_STYLE, HEADER_STYLE, TICK_INTERVAL};
use crate::validate;

use super::form::{self, TextField};

const FIELD_NAME: usize = 0;
const FIELD_EMAIL: usize = 1;
const FIELD_PASSWORD: usize = 2;
const FIELD_CONFIRM: usize = 3;
const BTN_SIGNUP: usize = 4;
const BTN_GOOGLE: usize = 5;
const BTN_FACEBOOK: usize = 6;
const BTN_APPLE: usize = 7;
const LINK_LOGIN: usize = 8;
const FOCUS_MAX: usize = LINK_LOGIN;

pub enum Outcome {
    Authenticated(Session),
    SwitchToLogin,
    Back,
    Quit,
}

enum Pending {
    Signup(Delayed<Session>),
    Social(Provider, Delayed<Session>),
    Redirect(Delayed<()>, Session),
}

struct Signup {
    full_name: TextField,
    email: TextField,
    password: TextField,
    confirm: TextField,
    focus: usize,
    banner: Option<Banner>,
    pending: Option<Pending>,
    phase: f64,
}

impl Signup {
    fn new() -> Self {
        Self {
            full_name: TextField::new("Full name:"),
            email: TextField::new("Email:"),
            password: TextField::masked("Password:"),
            confirm: TextField::masked("Confirm password:"),
            focus: FIELD_NAME,
            banner: None,
            pending: None,
            phase: 0.0,
        }
    }

    fn submit(&mut self) {
        let name = self.full_name.value.trim().to_string();
        let email = self.email.value.trim().to_string();
        let password = self.password.value.clone();
        let confirm = self.confirm.value.clone();

        if name.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
            self.banner = Some(Banner::error("Please fill in all fields"));
            return;
        }
        if name.chars().count() < 2 {
            self.banner = Some(Banner::error("Please enter your full name"));
            return;
        }
        if !validate::is_valid_email(&email) {
            self.banner = Some(Banner::error("Please enter a valid email address"));
            return;
        }
        if !validate::is_valid_password(&password) {
            self.banner = Some(Banner::error(format!(
                "Password must be at least {} characters",
                validate::MIN_PASSWORD_LEN
            )));
            return;
        }
        if password != confirm {
            self.banner = Some(Banner::error("Passwords do not match"));
            return;
        }

        self.banner = None;
        self.pending = Some(Pending::Signup(api::signup(&name, &email, &password)));
    }

    fn start_social(&mut self, provider: Provider) {
        self.banner = Some(Banner::info(format!(
            "Connecting to {}...",
            provider.name()
        )));
        self.pending = Some(Pending::Social(provider, api::social_login(provider)));
    }

    fn tick(&mut self, store: &mut SessionStore) -> Result<Option<Outcome>> {
        self.phase += 1.0 / 70.0;
        tui::expire_banner(&mut self.banner);

        match self.pending.take() {
            None => Ok(None),
            Some(Pending::Signup(mut call)) => match call.poll() {
                None => {
                    self.pending = Some(Pending::Signup(call));
                    Ok(None)
                }
                Some(Ok(session)) => {
                    store.save(&session, false)?;
                    self.banner = Some(Banner::success(
                        "Account created successfully! Redirecting...",
                    ));
                    self.pending = Some(Pending::Redirect(
                        Delayed::new(Ok(()), REDIRECT_DELAY),
                        session,
                    ));
                    Ok(None)
                }
                Some(Err(_)) => {
                    self.banner = Some(Banner::error("Network error. Please try again."));
                    Ok(None)
                }
            },
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
                        "Failed to sign up with {}. Please try again.",
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

    fn move_focus_up(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn move_focus_down(&mut self) {
        self.focus = (self.focus + 1).min(FOCUS_MAX);
    }

    fn active_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            FIELD_NAME => Some(&mut self.full_name),
            FIELD_EMAIL => Some(&mut self.email),
            FIELD_PASSWORD => Some(&mut self.password),
            FIELD_CONFIRM => Some(&mut self.confirm),
            _ => None,
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<Outcome> {
        if self.pending.is_some() {
            return None;
        }
        if code == KeyCode::Esc {
            return Some(Outcome::Back);
        }
        if code == KeyCode::F(2) {
            let masked = !self.password.masked;
            self.password.masked = masked;
            self.confirm.masked = masked;
            return None;
        }
        match code {
            KeyCode::Tab => {
                if self.focus == FOCUS_MAX {
                    self.focus = 0;
                } else {
                    self.move_focus_down();
                }
                return None;
            }
            KeyCode::BackTab => {
                self.move_focus_up();
                return None;
            }
            _ => {}
        }

        if self.active_field().is_some() {
            match code {
                KeyCode::Enter | KeyCode::Down => self.move_focus_down(),
                KeyCode::Up => self.move_focus_up(),
                other => {
                    if let Some(field) = self.active_field() {
                        field.handle_key(other);
                    }
                }
            }
            return None;
        }

        match self.focus {
            BTN_SIGNUP => match code {
                KeyCode::Enter => self.submit(),
                KeyCode::Down => self.move_focus_down(),
                KeyCode::Up => self.move_focus_up(),
                _ => {}
            },
            BTN_GOOGLE | BTN_FACEBOOK | BTN_APPLE => match code {
                KeyCode::Enter => {
                    let provider = match self.focus {
                        BTN_GOOGLE => Provider::Google,
                        BTN_FACEBOOK => Provider::Facebook,
                        _ => Provider::Apple,
                    };
                    self.start_social(provider);
                }
                KeyCode::Down => self.move_focus_down(),
                KeyCode::Up => self.move_focus_up(),
                _ => {}
            },
            _ => match code {
                KeyCode::Enter => return Some(Outcome::SwitchToLogin),
                KeyCode::Up => self.move_focus_up(),
                _ => {}
            },
        }
        None
    }

    fn signup_label(&self) -> String {
        match &self.pending {
            Some(Pending::Signup(_)) => {
                format!("{} Creating account...", spinner_frame(self.phase))
            }
            _ => "Create Account".to_string(),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let logo_height = LOGO.len() as u16;
        let [_top_pad, logo_area, _gap1, title_area, _gap2, form_area, _gap3, buttons_area, _gap4, banner_area, hints_area, _bottom_pad] =
            Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(logo_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);

        effects::render_logo(self.phase, frame, logo_area);

        frame.render_widget(
            Paragraph::new(Span::styled("Create your account", HEADER_STYLE))
                .alignment(ratatui::layout::Alignment::Center),
            title_area,
        );

        let form_width = 56u16.min(area.width.saturating_sub(4));
        let form_x = area.x + (area.width.saturating_sub(form_width)) / 2;
        let centered_form = Rect::new(form_x, form_area.y, form_width, form_area.height);

        let [name_row, email_row, password_row, confirm_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(centered_form);

        form::draw_field(frame, name_row, &self.full_name, self.focus == FIELD_NAME);
        form::draw_field(frame, email_row, &self.email, self.focus == FIELD_EMAIL);
        form::draw_field(frame, password_row, &self.password, self.focus == FIELD_PASSWORD);
        form::draw_field(frame, confirm_row, &self.confirm, self.focus == FIELD_CONFIRM);

        let [signup_row, google_row, facebook_row, apple_row, login_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(buttons_area);

        form::draw_button(frame, signup_row, &self.signup_label(), self.focus == BTN_SIGNUP, true);
        form::draw_button(frame, google_row, "Continue with Google", self.focus == BTN_GOOGLE, true);
        form::draw_button(frame, facebook_row, "Continue with Facebook", self.focus == BTN_FACEBOOK, true);
        form::draw_button(frame, apple_row, "Continue with Apple", self.focus == BTN_APPLE, true);
        form::draw_button(frame, login_row, "Already have an account? Log in", self.focus == LINK_LOGIN, true);

        if let Some(banner) = &self.banner {
            frame.render_widget(
                Paragraph::new(banner.line()).alignment(ratatui::layout::Alignment::Center),
                banner_area,
            );
        }

        frame.render_widget(
            Paragraph::new(" Tab/Up/Down=navigate  Enter=activate  F2=show password  Esc=back")
                .style(FOOTER_STYLE)
                .alignment(ratatui::layout::Alignment::Center),
            hints_area,
        );
    }
}

impl Drop for Signup {
    fn drop(&mut self) {
        self.password.wipe();
        self.confirm.wipe();
    }
}

/// Run the signup screen until an account is created, the user switches page,
/// or quits.
pub fn run(store: &mut SessionStore) -> Result<Outcome> {
    let mut screen = Signup::new();
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

    fn test_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_root(dir.path().to_path_buf());
        (dir, store)
    }

    fn type_into(screen: &mut Signup, focus: usize, text: &str) {
        screen.focus = focus;
        for c in text.chars() {
            screen.handle_key(KeyCode::Char(c));
        }
    }

    fn fill_valid(screen: &mut Signup) {
        type_into(screen, FIELD_NAME, "Jane Doe");
        type_into(screen, FIELD_EMAIL, "jane@example.com");
        type_into(screen, FIELD_PASSWORD, "secret1");
        type_into(screen, FIELD_CONFIRM, "secret1");
    }

    #[test]
    fn empty_form_shows_fill_in_banner() {
        let mut screen = Signup::new();
        screen.focus = BTN_SIGNUP;
        screen.handle_key(KeyCode::Enter);
        assert_eq!(
            screen.banner.as_ref().unwrap().message,
            "Please fill in all fields"
        );
    }

    #[test]
    fn single_char_name_rejected() {
        let mut screen = Signup::new();
        fill_valid(&mut screen);
        screen.full_name.set_value("J");
        screen.focus = BTN_SIGNUP;
        screen.handle_key(KeyCode::Enter);
        assert!(screen
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("full name"));
    }

    #[test]
    fn mismatched_passwords_rejected() {
        let mut screen = Signup::new();
        fill_valid(&mut screen);
        screen.confirm.set_value("different1");
        screen.focus = BTN_SIGNUP;
        screen.handle_key(KeyCode::Enter);
        assert_eq!(
            screen.banner.as_ref().unwrap().message,
            "Passwords do not match"
        );
        assert!(screen.pending.is_none());
    }

    #[test]
    fn valid_form_starts_pending_signup() {
        let mut screen = Signup::new();
        fill_valid(&mut screen);
        screen.focus = BTN_SIGNUP;
        screen.handle_key(KeyCode::Enter);
        assert!(matches!(screen.pending, Some(Pending::Signup(_))));
        assert!(screen.banner.is_none());
    }

    #[test]
    fn signup_success_saves_session_with_given_name() {
        let (_dir, mut store) = test_store();
        let mut screen = Signup::new();
        screen.pending = Some(Pending::Signup(Delayed::ready(Ok(Session {
            id: "1".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane Doe".to_string(),
            has_profile: false,
            token: "demo-1".to_string(),
        }))));
        screen.tick(&mut store).unwrap();
        assert_eq!(store.current().unwrap().name, "Jane Doe");
        assert!(matches!(screen.pending, Some(Pending::Redirect(_, _))));
        assert!(screen
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("Account created"));
    }

    #[test]
    fn f2_toggles_both_password_fields() {
        let mut screen = Signup::new();
        screen.handle_key(KeyCode::F(2));
        assert!(!screen.password.masked);
        assert!(!screen.confirm.masked);
    }

    #[test]
    fn login_link_switches_page() {
        let mut screen = Signup::new();
        screen.focus = LINK_LOGIN;
        assert!(matches!(
            screen.handle_key(KeyCode::Enter),
            Some(Outcome::SwitchToLogin)
        ));
    }
}
