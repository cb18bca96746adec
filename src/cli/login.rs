//! Login screen: email/password form, remember-me, forgot-password, and the
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

use super::form::{self, TextField, Toggle};

const FIELD_EMAIL: usize = 0;
const FIELD_PASSWORD: usize = 1;
const FIELD_REMEMBER: usize = 2;
const BTN_LOGIN: usize = 3;
const BTN_FORGOT: usize = 4;
const BTN_GOOGLE: usize = 5;
const BTN_FACEBOOK: usize = 6;
const BTN_APPLE: usize = 7;
const LINK_SIGNUP: usize = 8;
const FOCUS_MAX: usize = LINK_SIGNUP;

pub enum Outcome {
    Authenticated(Session),
    SwitchToSignup,
    Back,
    Quit,
}

enum Pending {
    Login(Delayed<Session>, bool),
    Forgot(Delayed<()>),
    Social(Provider, Delayed<Session>),
    Redirect(Delayed<()>, Session),
}

struct Login {
    email: TextField,
    password: TextField,
    remember: Toggle,
    focus: usize,
    banner: Option<Banner>,
    pending: Option<Pending>,
    phase: f64,
}

impl Login {
    fn new() -> Self {
        Self {
            email: TextField::new("Email:"),
            password: TextField::masked("Password:"),
            remember: Toggle::new("Remember me"),
            focus: FIELD_EMAIL,
            banner: None,
            pending: None,
            phase: 0.0,
        }
    }

    fn submit(&mut self) {
        let email = self.email.value.trim().to_string();
        let password = self.password.value.clone();

        if email.is_empty() || password.is_empty() {
            self.banner = Some(Banner::error("Please fill in all fields"));
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

        self.banner = None;
        self.pending = Some(Pending::Login(
            api::login(&email, &password),
            self.remember.on,
        ));
    }

    fn forgot(&mut self) {
        let email = self.email.value.trim().to_string();
        if email.is_empty() || !validate::is_valid_email(&email) {
            self.banner = Some(Banner::error("Please enter a valid email address"));
            return;
        }
        self.pending = Some(Pending::Forgot(api::forgot_password(&email)));
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
            Some(Pending::Login(mut call, remember)) => match call.poll() {
                None => {
                    self.pending = Some(Pending::Login(call, remember));
                    Ok(None)
                }
                Some(Ok(session)) => {
                    store.save(&session, remember)?;
                    self.banner = Some(Banner::success("Login successful! Redirecting..."));
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
            Some(Pending::Forgot(mut call)) => match call.poll() {
                None => {
                    self.pending = Some(Pending::Forgot(call));
                    Ok(None)
                }
                Some(Ok(())) => {
                    self.banner =
                        Some(Banner::success("Password reset link sent to your email!"));
                    Ok(None)
                }
                Some(Err(_)) => {
                    self.banner =
                        Some(Banner::error("Failed to send reset link. Please try again."));
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

    fn move_focus_up(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn move_focus_down(&mut self) {
        self.focus = (self.focus + 1).min(FOCUS_MAX);
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<Outcome> {
        if self.pending.is_some() {
            return None;
        }
        if code == KeyCode::Esc {
            return Some(Outcome::Back);
        }
        // Show/hide password, the eye-icon analog.
        if code == KeyCode::F(2) {
            self.password.masked = !self.password.masked;
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

        match self.focus {
            FIELD_EMAIL | FIELD_PASSWORD => match code {
                KeyCode::Enter | KeyCode::Down => self.move_focus_down(),
                KeyCode::Up => self.move_focus_up(),
                other => {
                    let field = if self.focus == FIELD_EMAIL {
                        &mut self.email
                    } else {
                        &mut self.password
                    };
                    field.handle_key(other);
                }
            },
            FIELD_REMEMBER => match code {
                KeyCode::Char(' ') => {
                    self.remember.handle_key(code);
                }
                KeyCode::Enter | KeyCode::Down => self.move_focus_down(),
                KeyCode::Up => self.move_focus_up(),
                _ => {}
            },
            BTN_LOGIN => match code {
                KeyCode::Enter => self.submit(),
                KeyCode::Down => self.move_focus_down(),
                KeyCode::Up => self.move_focus_up(),
                _ => {}
            },
            BTN_FORGOT => match code {
                KeyCode::Enter => self.forgot(),
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
                KeyCode::Enter => return Some(Outcome::SwitchToSignup),
                KeyCode::Up => self.move_focus_up(),
                KeyCode::Down => {}
                _ => {}
            },
        }
        None
    }

    fn login_label(&self) -> String {
        match &self.pending {
            Some(Pending::Login(_, _)) => format!("{} Logging in...", spinner_frame(self.phase)),
            _ => "Log In".to_string(),
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
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);

        effects::render_logo(self.phase, frame, logo_area);

        frame.render_widget(
            Paragraph::new(Span::styled("Welcome back", HEADER_STYLE))
                .alignment(ratatui::layout::Alignment::Center),
            title_area,
        );

        let form_width = 56u16.min(area.width.saturating_sub(4));
        let form_x = area.x + (area.width.saturating_sub(form_width)) / 2;
        let centered_form = Rect::new(form_x, form_area.y, form_width, form_area.height);

        let [email_row, password_row, remember_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(centered_form);

        form::draw_field(frame, email_row, &self.email, self.focus == FIELD_EMAIL);
        form::draw_field(frame, password_row, &self.password, self.focus == FIELD_PASSWORD);
        form::draw_toggle(frame, remember_row, &self.remember, self.focus == FIELD_REMEMBER);

        let [login_row, forgot_row, google_row, facebook_row, apple_row, signup_row] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(buttons_area);

        form::draw_button(frame, login_row, &self.login_label(), self.focus == BTN_LOGIN, true);
        form::draw_button(frame, forgot_row, "Forgot password?", self.focus == BTN_FORGOT, true);
        form::draw_button(frame, google_row, "Continue with Google", self.focus == BTN_GOOGLE, true);
        form::draw_button(frame, facebook_row, "Continue with Facebook", self.focus == BTN_FACEBOOK, true);
        form::draw_button(frame, apple_row, "Continue with Apple", self.focus == BTN_APPLE, true);
        form::draw_button(frame, signup_row, "Don't have an account? Sign up", self.focus == LINK_SIGNUP, true);

        if let Some(banner) = &self.banner {
            frame.render_widget(
                Paragraph::new(banner.line()).alignment(ratatui::layout::Alignment::Center),
                banner_area,
            );
        }

        frame.render_widget(
            Paragraph::new(" Tab/Up/Down=navigate  Enter=activate  Space=toggle  F2=show password  Esc=back")
                .style(FOOTER_STYLE)
                .alignment(ratatui::layout::Alignment::Center),
            hints_area,
        );
    }
}

impl Drop for Login {
    fn drop(&mut self) {
        self.password.wipe();
    }
}

/// Run the login screen until the user authenticates, switches page, or quits.
pub fn run(store: &mut SessionStore) -> Result<Outcome> {
    let mut screen = Login::new();
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

    fn make_login() -> Login {
        Login::new()
    }

    fn test_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_root(dir.path().to_path_buf());
        (dir, store)
    }

    fn type_into(screen: &mut Login, focus: usize, text: &str) {
        screen.focus = focus;
        for c in text.chars() {
            screen.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn empty_fields_show_fill_in_banner() {
        let mut screen = make_login();
        screen.focus = BTN_LOGIN;
        screen.handle_key(KeyCode::Enter);
        assert!(screen.pending.is_none());
        assert_eq!(
            screen.banner.as_ref().unwrap().message,
            "Please fill in all fields"
        );
    }

    #[test]
    fn invalid_email_blocks_submit() {
        let mut screen = make_login();
        type_into(&mut screen, FIELD_EMAIL, "a@b");
        type_into(&mut screen, FIELD_PASSWORD, "secret1");
        screen.focus = BTN_LOGIN;
        screen.handle_key(KeyCode::Enter);
        assert!(screen.pending.is_none());
        assert!(screen
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("valid email"));
    }

    #[test]
    fn short_password_blocks_submit() {
        let mut screen = make_login();
        type_into(&mut screen, FIELD_EMAIL, "a@b.com");
        type_into(&mut screen, FIELD_PASSWORD, "12345");
        screen.focus = BTN_LOGIN;
        screen.handle_key(KeyCode::Enter);
        assert!(screen.pending.is_none());
        assert!(screen.banner.as_ref().unwrap().message.contains("6"));
    }

    #[test]
    fn valid_submit_starts_pending_login() {
        let mut screen = make_login();
        type_into(&mut screen, FIELD_EMAIL, "a@b.com");
        type_into(&mut screen, FIELD_PASSWORD, "secret1");
        screen.focus = BTN_LOGIN;
        screen.handle_key(KeyCode::Enter);
        assert!(matches!(screen.pending, Some(Pending::Login(_, false))));
    }

    #[test]
    fn remember_me_selects_durable_scope() {
        let (_dir, mut store) = test_store();
        let mut screen = make_login();
        screen.remember.on = true;
        screen.pending = Some(Pending::Login(
            Delayed::ready(Ok(Session {
                id: "1".to_string(),
                email: "a@b.com".to_string(),
                name: "John Doe".to_string(),
                has_profile: false,
                token: "demo-1".to_string(),
            })),
            true,
        ));
        screen.tick(&mut store).unwrap();
        assert_eq!(
            store.scope_of_current(),
            Some(crate::session::Scope::Durable)
        );
    }

    #[test]
    fn login_without_remember_stays_process_scoped() {
        let (_dir, mut store) = test_store();
        let mut screen = make_login();
        screen.pending = Some(Pending::Login(
            Delayed::ready(Ok(Session {
                id: "1".to_string(),
                email: "a@b.com".to_string(),
                name: "John Doe".to_string(),
                has_profile: false,
                token: "demo-1".to_string(),
            })),
            false,
        ));
        screen.tick(&mut store).unwrap();
        assert_eq!(
            store.scope_of_current(),
            Some(crate::session::Scope::Process)
        );
    }

    #[test]
    fn forgot_requires_valid_email() {
        let mut screen = make_login();
        screen.focus = BTN_FORGOT;
        screen.handle_key(KeyCode::Enter);
        assert!(screen.pending.is_none());
        assert!(screen
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("valid email"));

        type_into(&mut screen, FIELD_EMAIL, "a@b.com");
        screen.focus = BTN_FORGOT;
        screen.handle_key(KeyCode::Enter);
        assert!(matches!(screen.pending, Some(Pending::Forgot(_))));
    }

    #[test]
    fn forgot_success_shows_reset_banner() {
        let (_dir, mut store) = test_store();
        let mut screen = make_login();
        screen.pending = Some(Pending::Forgot(Delayed::ready(Ok(()))));
        screen.tick(&mut store).unwrap();
        assert!(screen
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("reset link sent"));
        assert!(store.current().is_none());
    }

    #[test]
    fn f2_toggles_password_visibility() {
        let mut screen = make_login();
        assert!(screen.password.masked);
        screen.handle_key(KeyCode::F(2));
        assert!(!screen.password.masked);
        screen.handle_key(KeyCode::F(2));
        assert!(screen.password.masked);
    }

    #[test]
    fn signup_link_switches_page() {
        let mut screen = make_login();
        screen.focus = LINK_SIGNUP;
        assert!(matches!(
            screen.handle_key(KeyCode::Enter),
            Some(Outcome::SwitchToSignup)
        ));
    }

    #[test]
    fn esc_goes_back() {
        let mut screen = make_login();
        assert!(matches!(screen.handle_key(KeyCode::Esc), Some(Outcome::Back)));
    }

    #[test]
    fn keys_ignored_while_login_pending() {
        let mut screen = make_login();
        type_into(&mut screen, FIELD_EMAIL, "a@b.com");
        type_into(&mut screen, FIELD_PASSWORD, "secret1");
        screen.focus = BTN_LOGIN;
        screen.handle_key(KeyCode::Enter);
        assert!(screen.pending.is_some());
        assert!(screen.handle_key(KeyCode::Esc).is_none());
    }
}
