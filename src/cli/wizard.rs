//! The profile wizard surface. Business rules live in `crate::wizard`; this
//! module renders the active step and feeds input events into the state.

use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::{self, Delayed, REDIRECT_DELAY};
use crate::error::Result;
use crate::interests::CATALOG;
use crate::media::{MediaFile, SlotId, GALLERY_SLOTS, PROFILE_PHOTO_SLOTS};
use crate::models::Session;
use crate::session::SessionStore;
use crate::tui::{self, spinner_frame, Banner, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE, TICK_INTERVAL};
use crate::wizard::{Step, StepStatus, WizardState, STEP_COUNT};

use super::form::{self, Selector, TextField, Toggle};

const GRID_COLS: usize = 4;
const CONTENT_WIDTH: u16 = 64;

/// Bio length ceiling enforced at input time.
const BIO_MAX_LEN: usize = 500;

const GENDER_OPTIONS: &[&str] = &["Woman", "Man", "Non-binary", "Other"];
const INTERESTED_IN_OPTIONS: &[&str] = &["Women", "Men", "Everyone"];
const EXERCISE_OPTIONS: &[&str] = &["Never", "Sometimes", "Often", "Every day"];
const DRINKING_OPTIONS: &[&str] = &["Never", "Socially", "Regularly"];
const SMOKING_OPTIONS: &[&str] = &["Never", "Socially", "Regularly"];
const KIDS_OPTIONS: &[&str] = &["No kids", "Have kids", "Want kids someday"];

pub enum Outcome {
    Completed(Session),
    Quit,
}

enum Pending {
    Save(Delayed<()>),
    Location(Delayed<(String, String)>),
    Redirect(Delayed<()>, Session),
}

/// Inline path prompt for filling a media slot.
struct SlotInput {
    slot: SlotId,
    field: TextField,
}

struct WizardUi {
    state: WizardState,
    session: Session,
    focus: usize,
    grid_cursor: usize,
    slot_input: Option<SlotInput>,
    banner: Option<Banner>,
    pending: Option<Pending>,
    phase: f64,

    // Step 1 — photos & identity
    display_name: TextField,
    first_name: TextField,
    last_name: TextField,
    date_of_birth: TextField,
    gender: Selector,

    // Step 2 — contact
    email: TextField,
    phone: TextField,

    // Step 3 — about
    bio: TextField,
    country: TextField,
    city: TextField,
    job_title: TextField,
    company: TextField,
    education: TextField,

    // Step 4 — preferences & lifestyle
    interested_in: Selector,
    age_min: TextField,
    age_max: TextField,
    max_distance: TextField,
    height: TextField,
    exercise: Selector,
    drinking: Selector,
    smoking: Selector,
    kids: Selector,
    languages: TextField,

    // Step 6 — verification
    verify_email: Toggle,
    verify_photo: Toggle,
}

impl WizardUi {
    fn new(session: Session, mut state: WizardState) -> Self {
        if state.draft.email.trim().is_empty() {
            state.draft.email = session.email.clone();
        }
        let mut ui = Self {
            state,
            session,
            focus: 0,
            grid_cursor: 0,
            slot_input: None,
            banner: None,
            pending: None,
            phase: 0.0,
            display_name: TextField::new("Display name:"),
            first_name: TextField::new("First name:"),
            last_name: TextField::new("Last name:"),
            date_of_birth: TextField::new("Date of birth:"),
            gender: Selector::new("Gender:", GENDER_OPTIONS),
            email: TextField::new("Email:"),
            phone: TextField::new("Phone (optional):"),
            bio: TextField::new("Bio:").with_max_len(BIO_MAX_LEN),
            country: TextField::new("Country:"),
            city: TextField::new("City:"),
            job_title: TextField::new("Job title:"),
            company: TextField::new("Company:"),
            education: TextField::new("Education:"),
            interested_in: Selector::new("Interested in:", INTERESTED_IN_OPTIONS),
            age_min: TextField::numeric("Age from:"),
            age_max: TextField::numeric("Age to:"),
            max_distance: TextField::numeric("Max distance (km):"),
            height: TextField::numeric("Height (cm):"),
            exercise: Selector::new("Exercise:", EXERCISE_OPTIONS),
            drinking: Selector::new("Drinking:", DRINKING_OPTIONS),
            smoking: Selector::new("Smoking:", SMOKING_OPTIONS),
            kids: Selector::new("Kids:", KIDS_OPTIONS),
            languages: TextField::new("Languages:"),
            verify_email: Toggle::new("Request email verification"),
            verify_photo: Toggle::new("Request photo verification"),
        };
        ui.load_fields();
        ui
    }

    /// Fill the editing surface from the draft (resume, demo prefill).
    fn load_fields(&mut self) {
        let draft = self.state.draft.clone();
        self.display_name.set_value(&draft.display_name);
        self.first_name.set_value(&draft.first_name);
        self.last_name.set_value(&draft.last_name);
        self.date_of_birth.set_value(&draft.date_of_birth);
        self.gender.set_value(&draft.gender);
        self.email.set_value(&draft.email);
        self.phone.set_value(&draft.phone);
        self.bio.set_value(&draft.bio);
        self.country.set_value(&draft.country);
        self.city.set_value(&draft.city);
        self.job_title.set_value(&draft.job_title);
        self.company.set_value(&draft.company);
        self.education.set_value(&draft.education);
        self.interested_in.set_value(&draft.interested_in);
        if let Some(v) = draft.age_min {
            self.age_min.set_value(&v.to_string());
        }
        if let Some(v) = draft.age_max {
            self.age_max.set_value(&v.to_string());
        }
        if let Some(v) = draft.max_distance_km {
            self.max_distance.set_value(&v.to_string());
        }
        if let Some(v) = draft.height_cm {
            self.height.set_value(&v.to_string());
        }
        self.exercise.set_value(&draft.exercise);
        self.drinking.set_value(&draft.drinking);
        self.smoking.set_value(&draft.smoking);
        self.kids.set_value(&draft.kids);
        self.languages.set_value(&draft.languages);
        self.verify_email.on = draft.verification.email_requested;
        self.verify_photo.on = draft.verification.photo_requested;
    }

    /// Write the editing surface back into the draft. Called after every
    /// handled input event so validators always see current values.
    fn sync_draft(&mut self) {
        let draft = &mut self.state.draft;
        draft.display_name = self.display_name.value.clone();
        draft.first_name = self.first_name.value.clone();
        draft.last_name = self.last_name.value.clone();
        draft.date_of_birth = self.date_of_birth.value.clone();
        draft.gender = self.gender.value().to_string();
        draft.email = self.email.value.clone();
        draft.phone = self.phone.value.clone();
        draft.bio = self.bio.value.clone();
        draft.country = self.country.value.clone();
        draft.city = self.city.value.clone();
        draft.job_title = self.job_title.value.clone();
        draft.company = self.company.value.clone();
        draft.education = self.education.value.clone();
        draft.interested_in = self.interested_in.value().to_string();
        draft.age_min = self.age_min.parsed_u32();
        draft.age_max = self.age_max.parsed_u32();
        draft.max_distance_km = self.max_distance.parsed_u32();
        draft.height_cm = self.height.parsed_u32();
        draft.exercise = self.exercise.value().to_string();
        draft.drinking = self.drinking.value().to_string();
        draft.smoking = self.smoking.value().to_string();
        draft.kids = self.kids.value().to_string();
        draft.languages = self.languages.value.clone();
        draft.verification.email_requested = self.verify_email.on;
        draft.verification.photo_requested = self.verify_photo.on;
    }

    /// Focusable rows on the current step, in order.
    fn focus_count(&self) -> usize {
        match self.state.current() {
            Step::Identity => PROFILE_PHOTO_SLOTS + 5 + 1,
            Step::Contact => 2 + 2,
            Step::About => 7 + 1 + 2,
            Step::Preferences => 10 + 2,
            Step::Media => GALLERY_SLOTS + 1 + 2,
            Step::Verify => 2 + 2,
        }
    }

    fn move_focus_up(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn move_focus_down(&mut self) {
        self.focus = (self.focus + 1).min(self.focus_count() - 1);
    }

    fn slot_at_focus(&self) -> Option<SlotId> {
        match self.state.current() {
            Step::Identity if self.focus < PROFILE_PHOTO_SLOTS => Some(SlotId::Photo(self.focus)),
            Step::Media if self.focus < GALLERY_SLOTS => Some(SlotId::Gallery(self.focus)),
            Step::Media if self.focus == GALLERY_SLOTS => Some(SlotId::Video),
            _ => None,
        }
    }

    fn start_slot_input(&mut self, slot: SlotId) {
        let label = match slot {
            SlotId::Video => "Path to video file:",
            _ => "Path to image file:",
        };
        self.slot_input = Some(SlotInput {
            slot,
            field: TextField::new(label),
        });
    }

    fn confirm_slot_input(&mut self) {
        let Some(input) = self.slot_input.take() else {
            return;
        };
        let path = input.field.value.trim().to_string();
        if path.is_empty() {
            return;
        }
        // Rejections leave the slot exactly as it was.
        match MediaFile::open(Path::new(&path))
            .and_then(|file| self.state.draft.media.attach(input.slot, file))
        {
            Ok(()) => self.banner = None,
            Err(e) => self.banner = Some(Banner::error(e.to_string())),
        }
    }

    fn next_step(&mut self) {
        match self.state.advance() {
            Ok(()) => {
                self.focus = 0;
                self.banner = None;
            }
            Err(reason) => self.banner = Some(Banner::error(reason)),
        }
    }

    fn back_step(&mut self) {
        self.state.retreat();
        self.focus = 0;
    }

    fn submit(&mut self) {
        if let Err(reason) = self.state.advance() {
            self.banner = Some(Banner::error(reason));
            return;
        }
        self.pending = Some(Pending::Save(api::save_profile(&self.state.draft)));
    }

    fn detect_location(&mut self) {
        self.banner = Some(Banner::info("Detecting your location..."));
        self.pending = Some(Pending::Location(api::detect_location()));
    }

    fn tick(&mut self, store: &mut SessionStore) -> Result<Option<Outcome>> {
        self.phase += 1.0 / 70.0;
        tui::expire_banner(&mut self.banner);

        match self.pending.take() {
            None => Ok(None),
            Some(Pending::Save(mut call)) => match call.poll() {
                None => {
                    self.pending = Some(Pending::Save(call));
                    Ok(None)
                }
                Some(Ok(())) => {
                    let mut session = self.session.clone();
                    session.has_profile = true;
                    store.update(&session)?;
                    self.session = session.clone();
                    self.banner = Some(Banner::success("Profile completed successfully!"));
                    self.pending = Some(Pending::Redirect(
                        Delayed::new(Ok(()), REDIRECT_DELAY),
                        session,
                    ));
                    Ok(None)
                }
                Some(Err(_)) => {
                    self.banner =
                        Some(Banner::error("Failed to save profile. Please try again."));
                    Ok(None)
                }
            },
            Some(Pending::Location(mut call)) => match call.poll() {
                None => {
                    self.pending = Some(Pending::Location(call));
                    Ok(None)
                }
                Some(Ok((city, country))) => {
                    self.city.set_value(&city);
                    self.country.set_value(&country);
                    self.sync_draft();
                    self.banner = Some(Banner::success(format!("Location set to {city}, {country}")));
                    Ok(None)
                }
                Some(Err(_)) => {
                    self.banner = Some(Banner::error(
                        "Could not detect location. Please enter manually.",
                    ));
                    Ok(None)
                }
            },
            Some(Pending::Redirect(mut timer, session)) => match timer.poll() {
                None => {
                    self.pending = Some(Pending::Redirect(timer, session));
                    Ok(None)
                }
                Some(_) => Ok(Some(Outcome::Completed(session))),
            },
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> Option<Outcome> {
        if self.pending.is_some() {
            return None;
        }

        if self.slot_input.is_some() {
            match code {
                KeyCode::Enter => self.confirm_slot_input(),
                KeyCode::Esc => self.slot_input = None,
                other => {
                    if let Some(input) = &mut self.slot_input {
                        input.field.handle_key(other);
                    }
                }
            }
            return None;
        }

        if code == KeyCode::Esc {
            if self.state.current() == Step::Identity {
                return Some(Outcome::Quit);
            }
            self.back_step();
            return None;
        }
        match code {
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % self.focus_count();
                return None;
            }
            KeyCode::BackTab => {
                self.move_focus_up();
                return None;
            }
            _ => {}
        }

        let outcome = match self.state.current() {
            Step::Identity => self.handle_identity_key(code),
            Step::Contact => self.handle_contact_key(code),
            Step::About => self.handle_about_key(code),
            Step::Preferences => self.handle_preferences_key(code),
            Step::Media => self.handle_media_key(code),
            Step::Verify => self.handle_verify_key(code),
        };
        self.sync_draft();
        outcome
    }

    fn handle_slot_key(&mut self, slot: SlotId, code: KeyCode) {
        match code {
            KeyCode::Enter => self.start_slot_input(slot),
            KeyCode::Char('x') | KeyCode::Delete => {
                self.state.draft.media.remove(slot);
            }
            KeyCode::Down | KeyCode::Right => self.move_focus_down(),
            KeyCode::Up | KeyCode::Left => self.move_focus_up(),
            _ => {}
        }
    }

    fn handle_text_row(field: &mut TextField, code: KeyCode) -> FieldNav {
        match code {
            KeyCode::Enter | KeyCode::Down => FieldNav::Next,
            KeyCode::Up => FieldNav::Prev,
            other => {
                field.handle_key(other);
                FieldNav::Stay
            }
        }
    }

    fn handle_selector_row(selector: &mut Selector, code: KeyCode) -> FieldNav {
        match code {
            KeyCode::Enter | KeyCode::Down => FieldNav::Next,
            KeyCode::Up => FieldNav::Prev,
            other => {
                selector.handle_key(other);
                FieldNav::Stay
            }
        }
    }

    fn apply_nav(&mut self, nav: FieldNav) {
        match nav {
            FieldNav::Next => self.move_focus_down(),
            FieldNav::Prev => self.move_focus_up(),
            FieldNav::Stay => {}
        }
    }

    fn handle_identity_key(&mut self, code: KeyCode) -> Option<Outcome> {
        if let Some(slot) = self.slot_at_focus() {
            self.handle_slot_key(slot, code);
            return None;
        }
        let nav = match self.focus - PROFILE_PHOTO_SLOTS {
            0 => Self::handle_text_row(&mut self.display_name, code),
            1 => Self::handle_text_row(&mut self.first_name, code),
            2 => Self::handle_text_row(&mut self.last_name, code),
            3 => Self::handle_text_row(&mut self.date_of_birth, code),
            4 => Self::handle_selector_row(&mut self.gender, code),
            _ => {
                // [Next]
                match code {
                    KeyCode::Enter => {
                        self.sync_draft();
                        self.next_step();
                    }
                    KeyCode::Up => self.move_focus_up(),
                    _ => {}
                }
                FieldNav::Stay
            }
        };
        self.apply_nav(nav);
        None
    }

    fn handle_contact_key(&mut self, code: KeyCode) -> Option<Outcome> {
        let nav = match self.focus {
            0 => Self::handle_text_row(&mut self.email, code),
            1 => Self::handle_text_row(&mut self.phone, code),
            2 => {
                if code == KeyCode::Enter {
                    self.back_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                } else if code == KeyCode::Down {
                    self.move_focus_down();
                }
                FieldNav::Stay
            }
            _ => {
                if code == KeyCode::Enter {
                    self.sync_draft();
                    self.next_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                }
                FieldNav::Stay
            }
        };
        self.apply_nav(nav);
        None
    }

    fn handle_about_key(&mut self, code: KeyCode) -> Option<Outcome> {
        const GRID: usize = 7;
        const BACK: usize = 8;
        let nav = match self.focus {
            0 => Self::handle_text_row(&mut self.bio, code),
            1 => Self::handle_text_row(&mut self.country, code),
            2 => Self::handle_text_row(&mut self.city, code),
            3 => {
                // [Use my location]
                match code {
                    KeyCode::Enter => self.detect_location(),
                    KeyCode::Up => self.move_focus_up(),
                    KeyCode::Down => self.move_focus_down(),
                    _ => {}
                }
                FieldNav::Stay
            }
            4 => Self::handle_text_row(&mut self.job_title, code),
            5 => Self::handle_text_row(&mut self.company, code),
            6 => Self::handle_text_row(&mut self.education, code),
            GRID => {
                self.handle_grid_key(code);
                FieldNav::Stay
            }
            BACK => {
                if code == KeyCode::Enter {
                    self.back_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                } else if code == KeyCode::Down {
                    self.move_focus_down();
                }
                FieldNav::Stay
            }
            _ => {
                if code == KeyCode::Enter {
                    self.sync_draft();
                    self.next_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                }
                FieldNav::Stay
            }
        };
        self.apply_nav(nav);
        None
    }

    fn handle_grid_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.grid_cursor = self.grid_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.grid_cursor = (self.grid_cursor + 1).min(CATALOG.len() - 1);
            }
            KeyCode::Up => {
                if self.grid_cursor >= GRID_COLS {
                    self.grid_cursor -= GRID_COLS;
                } else {
                    self.move_focus_up();
                }
            }
            KeyCode::Down => {
                if self.grid_cursor + GRID_COLS < CATALOG.len() {
                    self.grid_cursor += GRID_COLS;
                } else {
                    self.move_focus_down();
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.state.draft.interests.toggle(CATALOG[self.grid_cursor]);
            }
            _ => {}
        }
    }

    fn handle_preferences_key(&mut self, code: KeyCode) -> Option<Outcome> {
        const BACK: usize = 10;
        let nav = match self.focus {
            0 => Self::handle_selector_row(&mut self.interested_in, code),
            1 => Self::handle_text_row(&mut self.age_min, code),
            2 => Self::handle_text_row(&mut self.age_max, code),
            3 => Self::handle_text_row(&mut self.max_distance, code),
            4 => Self::handle_text_row(&mut self.height, code),
            5 => Self::handle_selector_row(&mut self.exercise, code),
            6 => Self::handle_selector_row(&mut self.drinking, code),
            7 => Self::handle_selector_row(&mut self.smoking, code),
            8 => Self::handle_selector_row(&mut self.kids, code),
            9 => Self::handle_text_row(&mut self.languages, code),
            BACK => {
                if code == KeyCode::Enter {
                    self.back_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                } else if code == KeyCode::Down {
                    self.move_focus_down();
                }
                FieldNav::Stay
            }
            _ => {
                if code == KeyCode::Enter {
                    self.sync_draft();
                    self.next_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                }
                FieldNav::Stay
            }
        };
        self.apply_nav(nav);
        None
    }

    fn handle_media_key(&mut self, code: KeyCode) -> Option<Outcome> {
        if let Some(slot) = self.slot_at_focus() {
            self.handle_slot_key(slot, code);
            return None;
        }
        let back = GALLERY_SLOTS + 1;
        if self.focus == back {
            if code == KeyCode::Enter {
                self.back_step();
            } else if code == KeyCode::Up {
                self.move_focus_up();
            } else if code == KeyCode::Down {
                self.move_focus_down();
            }
        } else if code == KeyCode::Enter {
            self.next_step();
        } else if code == KeyCode::Up {
            self.move_focus_up();
        }
        None
    }

    fn handle_verify_key(&mut self, code: KeyCode) -> Option<Outcome> {
        match self.focus {
            0 | 1 => {
                let toggle = if self.focus == 0 {
                    &mut self.verify_email
                } else {
                    &mut self.verify_photo
                };
                match code {
                    KeyCode::Char(' ') => {
                        toggle.handle_key(code);
                    }
                    KeyCode::Enter | KeyCode::Down => self.move_focus_down(),
                    KeyCode::Up => self.move_focus_up(),
                    _ => {}
                }
            }
            2 => {
                if code == KeyCode::Enter {
                    self.back_step();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                } else if code == KeyCode::Down {
                    self.move_focus_down();
                }
            }
            _ => {
                if code == KeyCode::Enter {
                    self.sync_draft();
                    self.submit();
                } else if code == KeyCode::Up {
                    self.move_focus_up();
                }
            }
        }
        None
    }

    // --- rendering ------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep_area, progress_area, indicator_area, _gap, content_area, input_area, banner_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        let step = self.state.current();
        frame.render_widget(
            Paragraph::new(format!(
                " Matchly \u{2014} Step {} of {STEP_COUNT}: {}",
                step.index(),
                step.title()
            ))
            .style(HEADER_STYLE),
            header_area,
        );
        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(
            Paragraph::new(sep_line.as_str()).style(Style::default().fg(Color::DarkGray)),
            sep_area,
        );

        self.draw_progress(frame, progress_area);
        self.draw_indicator(frame, indicator_area);

        let content_width = CONTENT_WIDTH.min(area.width.saturating_sub(4));
        let content_x = area.x + (area.width.saturating_sub(content_width)) / 2;
        let content = Rect::new(content_x, content_area.y, content_width, content_area.height);

        match step {
            Step::Identity => self.draw_identity(frame, content),
            Step::Contact => self.draw_contact(frame, content),
            Step::About => self.draw_about(frame, content),
            Step::Preferences => self.draw_preferences(frame, content),
            Step::Media => self.draw_media(frame, content),
            Step::Verify => self.draw_verify(frame, content),
        }

        if let Some(input) = &self.slot_input {
            form::draw_field(frame, input_area, &input.field, true);
        } else if let Some(banner) = &self.banner {
            frame.render_widget(
                Paragraph::new(banner.line()).alignment(ratatui::layout::Alignment::Center),
                banner_area,
            );
        }

        let hints = if self.slot_input.is_some() {
            " Enter=confirm  Esc=cancel"
        } else {
            " Tab/Up/Down=navigate  Enter=activate  Space=toggle  x=remove media  Esc=back"
        };
        frame.render_widget(
            Paragraph::new(hints)
                .style(FOOTER_STYLE)
                .alignment(ratatui::layout::Alignment::Center),
            hints_area,
        );
    }

    /// Progress toward submission as a filled bar, `n/6` of the width.
    fn draw_progress(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(2) as usize;
        let filled = (self.state.progress() * width as f64).round() as usize;
        let bar: String = std::iter::repeat('\u{2588}')
            .take(filled)
            .chain(std::iter::repeat('\u{2591}').take(width.saturating_sub(filled)))
            .collect();
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {bar}"),
                Style::default().fg(Color::Rgb(255, 94, 125)),
            )),
            area,
        );
    }

    fn draw_indicator(&self, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for step in Step::ALL {
            let (symbol, style) = match self.state.status_of(step) {
                StepStatus::Completed => (
                    "\u{25cf}",
                    Style::default().fg(Color::Rgb(255, 94, 125)),
                ),
                StepStatus::Active => (
                    "\u{25c9}",
                    Style::default()
                        .fg(Color::Rgb(255, 94, 125))
                        .add_modifier(Modifier::BOLD),
                ),
                StepStatus::Pending => ("\u{25cb}", Style::default().fg(Color::DarkGray)),
            };
            spans.push(Span::styled(format!("{symbol} "), style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Center),
            area,
        );
    }

    fn slot_line(&self, slot: SlotId, label: &str, active: bool) -> Line<'_> {
        let content = match self.state.draft.media.preview(slot) {
            Some(preview) => format!(" {label} {preview}"),
            None => format!(" {label} + Add"),
        };
        let style = if active {
            SELECTED_STYLE
        } else if self.state.draft.media.get(slot).is_some() {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(Span::styled(content, style))
    }

    fn draw_identity(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        let labels = ["Primary photo:", "Photo 2:", "Photo 3:"];
        for (i, label) in labels.iter().enumerate() {
            let line = self.slot_line(SlotId::Photo(i), label, self.focus == i);
            frame.render_widget(Paragraph::new(line), rows[i]);
        }

        form::draw_field(frame, rows[4], &self.display_name, self.focus == 3);
        form::draw_field(frame, rows[5], &self.first_name, self.focus == 4);
        form::draw_field(frame, rows[6], &self.last_name, self.focus == 5);
        form::draw_field(frame, rows[7], &self.date_of_birth, self.focus == 6);
        form::draw_selector(frame, rows[8], &self.gender, self.focus == 7);
        form::draw_button(
            frame,
            rows[9],
            "Next",
            self.focus == 8,
            self.state.can_advance(),
        );
    }

    fn draw_contact(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        form::draw_field(frame, rows[0], &self.email, self.focus == 0);
        form::draw_field(frame, rows[1], &self.phone, self.focus == 1);
        form::draw_button(frame, rows[2], "Back", self.focus == 2, true);
        form::draw_button(frame, rows[3], "Next", self.focus == 3, self.state.can_advance());
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let grid_rows = CATALOG.len().div_ceil(GRID_COLS) as u16;
        let rows = Layout::vertical([
            Constraint::Length(1),           // bio
            Constraint::Length(1),           // bio counter
            Constraint::Length(1),           // country
            Constraint::Length(1),           // city
            Constraint::Length(1),           // detect
            Constraint::Length(1),           // job
            Constraint::Length(1),           // company
            Constraint::Length(1),           // education
            Constraint::Length(grid_rows),   // interests
            Constraint::Length(1),           // remaining label
            Constraint::Length(1),           // back
            Constraint::Length(1),           // next
            Constraint::Fill(1),
        ])
        .split(area);

        form::draw_field(frame, rows[0], &self.bio, self.focus == 0);
        frame.render_widget(
            Paragraph::new(format!("{}/{BIO_MAX_LEN}", self.bio.char_count()))
                .style(FOOTER_STYLE)
                .alignment(ratatui::layout::Alignment::Right),
            rows[1],
        );
        form::draw_field(frame, rows[2], &self.country, self.focus == 1);
        form::draw_field(frame, rows[3], &self.city, self.focus == 2);
        form::draw_button(frame, rows[4], "Use my location", self.focus == 3, true);
        form::draw_field(frame, rows[5], &self.job_title, self.focus == 4);
        form::draw_field(frame, rows[6], &self.company, self.focus == 5);
        form::draw_field(frame, rows[7], &self.education, self.focus == 6);

        self.draw_interest_grid(frame, rows[8], self.focus == 7);
        let remaining = self
            .state
            .draft
            .interests
            .remaining_label()
            .unwrap_or_else(|| format!("{} interests selected", self.state.draft.interests.count()));
        frame.render_widget(
            Paragraph::new(remaining)
                .style(FOOTER_STYLE)
                .alignment(ratatui::layout::Alignment::Center),
            rows[9],
        );

        form::draw_button(frame, rows[10], "Back", self.focus == 8, true);
        form::draw_button(frame, rows[11], "Next", self.focus == 9, self.state.can_advance());
    }

    fn draw_interest_grid(&self, frame: &mut Frame, area: Rect, grid_active: bool) {
        let lines: Vec<Line> = CATALOG
            .chunks(GRID_COLS)
            .enumerate()
            .map(|(row, chunk)| {
                let spans: Vec<Span> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, tag)| {
                        let idx = row * GRID_COLS + col;
                        let selected = self.state.draft.interests.is_selected(tag);
                        let mark = if selected { "\u{2713} " } else { "" };
                        let mut style = if selected {
                            Style::default()
                                .fg(Color::Rgb(255, 94, 125))
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        if grid_active && idx == self.grid_cursor {
                            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                        }
                        Span::styled(format!(" [{mark}{tag}]"), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_preferences(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Length(1); 12].to_vec()).split(area);

        form::draw_selector(frame, rows[0], &self.interested_in, self.focus == 0);
        form::draw_field(frame, rows[1], &self.age_min, self.focus == 1);
        form::draw_field(frame, rows[2], &self.age_max, self.focus == 2);
        form::draw_field(frame, rows[3], &self.max_distance, self.focus == 3);
        form::draw_field(frame, rows[4], &self.height, self.focus == 4);
        form::draw_selector(frame, rows[5], &self.exercise, self.focus == 5);
        form::draw_selector(frame, rows[6], &self.drinking, self.focus == 6);
        form::draw_selector(frame, rows[7], &self.smoking, self.focus == 7);
        form::draw_selector(frame, rows[8], &self.kids, self.focus == 8);
        form::draw_field(frame, rows[9], &self.languages, self.focus == 9);
        form::draw_button(frame, rows[10], "Back", self.focus == 10, true);
        form::draw_button(frame, rows[11], "Next", self.focus == 11, self.state.can_advance());
    }

    fn draw_media(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Length(1); 10].to_vec()).split(area);

        for i in 0..GALLERY_SLOTS {
            let label = format!("Gallery {}:", i + 1);
            let line = self.slot_line(SlotId::Gallery(i), &label, self.focus == i);
            frame.render_widget(Paragraph::new(line), rows[i]);
        }
        let video_line = self.slot_line(SlotId::Video, "Video:", self.focus == GALLERY_SLOTS);
        frame.render_widget(Paragraph::new(video_line), rows[GALLERY_SLOTS]);

        form::draw_button(frame, rows[7], "Back", self.focus == GALLERY_SLOTS + 1, true);
        form::draw_button(frame, rows[8], "Next", self.focus == GALLERY_SLOTS + 2, true);
    }

    fn draw_verify(&self, frame: &mut Frame, area: Rect) {
        let draft = &self.state.draft;
        let (bio, bio_lines) = tui::wrap_text(&draft.bio, area.width.saturating_sub(4) as usize);
        let interests: Vec<&str> = draft.interests.selected().collect();

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{}, {} \u{2014} {}, {}", draft.display_name, draft.date_of_birth, draft.city, draft.country),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for bio_line in bio.lines() {
            lines.push(Line::from(bio_line.to_string()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Interests: {}", interests.join(", "))));
        lines.push(Line::from(format!(
            "Photos: {}   Gallery: {}   Video: {}",
            draft.media.photo_count(),
            draft.media.gallery_count(),
            if draft.media.has_video() { "yes" } else { "no" }
        )));
        lines.push(Line::from(""));

        let summary_height = (bio_lines + 6).min(area.height.saturating_sub(4));
        let rows = Layout::vertical([
            Constraint::Length(summary_height),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        frame.render_widget(Paragraph::new(lines), rows[0]);
        form::draw_toggle(frame, rows[1], &self.verify_email, self.focus == 0);
        form::draw_toggle(frame, rows[2], &self.verify_photo, self.focus == 1);
        form::draw_button(frame, rows[3], "Back", self.focus == 2, true);
        let submit_label = match &self.pending {
            Some(Pending::Save(_)) => format!("{} Saving Profile...", spinner_frame(self.phase)),
            _ => "Complete Profile".to_string(),
        };
        form::draw_button(frame, rows[4], &submit_label, self.focus == 3, true);
    }
}

pub fn run(store: &mut SessionStore, session: Session) -> Result<Outcome> {
    run_with_state(store, session, WizardState::new(Default::default()))
}

/// Run the wizard with a pre-built state (resume or demo prefill).
pub fn run_with_state(
    store: &mut SessionStore,
    session: Session,
    state: WizardState,
) -> Result<Outcome> {
    let mut screen = WizardUi::new(session, state);
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

enum FieldNav {
    Next,
    Prev,
    Stay,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use crate::models::ProfileDraft;

    fn session() -> Session {
        Session {
            id: "1".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            has_profile: false,
            token: "demo-1".to_string(),
        }
    }

    fn test_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_root(dir.path().to_path_buf());
        (dir, store)
    }

    fn photo(name: &str) -> MediaFile {
        MediaFile::from_parts(name, MediaKind::Image, 1024 * 1024)
    }

    fn complete_state() -> WizardState {
        let mut draft = ProfileDraft {
            display_name: "Janey".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: "1990-06-15".to_string(),
            gender: "Woman".to_string(),
            email: "jane@example.com".to_string(),
            bio: "Coffee lover, mountain hiker, amateur photographer.".to_string(),
            country: "USA".to_string(),
            city: "New York".to_string(),
            age_min: Some(25),
            age_max: Some(35),
            ..ProfileDraft::default()
        };
        draft.media.attach(SlotId::Photo(0), photo("a.jpg")).unwrap();
        draft.media.attach(SlotId::Photo(1), photo("b.jpg")).unwrap();
        for tag in ["Travel", "Music", "Hiking", "Coffee", "Photography"] {
            draft.interests.toggle(tag);
        }
        WizardState::new(draft)
    }

    fn make_ui() -> WizardUi {
        WizardUi::new(session(), WizardState::new(ProfileDraft::default()))
    }

    #[test]
    fn email_is_prefilled_from_session() {
        let ui = make_ui();
        assert_eq!(ui.state.draft.email, "jane@example.com");
        assert_eq!(ui.email.value, "jane@example.com");
    }

    #[test]
    fn typing_into_a_field_updates_the_draft() {
        let mut ui = make_ui();
        ui.focus = PROFILE_PHOTO_SLOTS; // display name row
        for c in "Janey".chars() {
            ui.handle_key(KeyCode::Char(c));
        }
        assert_eq!(ui.state.draft.display_name, "Janey");
    }

    #[test]
    fn next_on_incomplete_step_shows_reason_banner() {
        let mut ui = make_ui();
        ui.focus = ui.focus_count() - 1; // [Next]
        ui.handle_key(KeyCode::Enter);
        assert_eq!(ui.state.current(), Step::Identity);
        assert!(ui
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("primary photo"));
    }

    #[test]
    fn next_advances_when_step_is_valid() {
        let mut ui = WizardUi::new(session(), complete_state());
        ui.focus = ui.focus_count() - 1;
        ui.handle_key(KeyCode::Enter);
        assert_eq!(ui.state.current(), Step::Contact);
        assert!(ui.state.is_completed(Step::Identity));
        assert_eq!(ui.focus, 0);
    }

    #[test]
    fn esc_goes_back_without_revoking_completion() {
        let mut ui = WizardUi::new(session(), complete_state());
        ui.focus = ui.focus_count() - 1;
        ui.handle_key(KeyCode::Enter);
        ui.handle_key(KeyCode::Esc);
        assert_eq!(ui.state.current(), Step::Identity);
        assert!(ui.state.is_completed(Step::Identity));
    }

    #[test]
    fn esc_on_first_step_quits() {
        let mut ui = make_ui();
        assert!(matches!(ui.handle_key(KeyCode::Esc), Some(Outcome::Quit)));
    }

    #[test]
    fn slot_input_attaches_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.jpg");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let mut ui = make_ui();
        ui.focus = 0;
        ui.handle_key(KeyCode::Enter);
        assert!(ui.slot_input.is_some());
        for c in path.to_string_lossy().chars() {
            ui.handle_key(KeyCode::Char(c));
        }
        ui.handle_key(KeyCode::Enter);
        assert!(ui.slot_input.is_none());
        assert!(ui.state.draft.media.has_primary());
    }

    #[test]
    fn oversize_file_is_rejected_and_slot_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        let f = std::fs::File::create(&path).unwrap();
        f.set_len(6 * 1024 * 1024).unwrap();

        let mut ui = make_ui();
        ui.focus = 0;
        ui.handle_key(KeyCode::Enter);
        for c in path.to_string_lossy().chars() {
            ui.handle_key(KeyCode::Char(c));
        }
        ui.handle_key(KeyCode::Enter);
        assert!(!ui.state.draft.media.has_primary());
        assert!(ui
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("less than 5.0 MB"));
    }

    #[test]
    fn x_removes_a_filled_slot() {
        let mut ui = WizardUi::new(session(), complete_state());
        ui.focus = 1;
        ui.handle_key(KeyCode::Char('x'));
        assert_eq!(ui.state.draft.media.photo_count(), 1);
    }

    #[test]
    fn grid_space_toggles_interest_under_cursor() {
        let mut ui = make_ui();
        ui.state.go_to(Step::About);
        ui.focus = 7;
        ui.grid_cursor = 0;
        ui.handle_key(KeyCode::Char(' '));
        assert!(ui.state.draft.interests.is_selected(CATALOG[0]));
        ui.handle_key(KeyCode::Char(' '));
        assert!(!ui.state.draft.interests.is_selected(CATALOG[0]));
    }

    #[test]
    fn grid_navigation_moves_by_row_and_column() {
        let mut ui = make_ui();
        ui.state.go_to(Step::About);
        ui.focus = 7;
        ui.handle_key(KeyCode::Right);
        assert_eq!(ui.grid_cursor, 1);
        ui.handle_key(KeyCode::Down);
        assert_eq!(ui.grid_cursor, 1 + GRID_COLS);
        ui.handle_key(KeyCode::Up);
        assert_eq!(ui.grid_cursor, 1);
        // Up from the top row leaves the grid.
        ui.handle_key(KeyCode::Up);
        assert_eq!(ui.focus, 6);
    }

    #[test]
    fn submit_walks_save_then_redirect() {
        let (_dir, mut store) = test_store();
        let mut ui = WizardUi::new(session(), complete_state());
        ui.state.go_to(Step::Verify);
        ui.focus = 3;
        ui.handle_key(KeyCode::Enter);
        assert!(matches!(ui.pending, Some(Pending::Save(_))));

        ui.pending = Some(Pending::Save(Delayed::ready(Ok(()))));
        assert!(ui.tick(&mut store).unwrap().is_none());
        assert!(store.current().unwrap().has_profile);
        assert!(ui
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("Profile completed"));

        ui.pending = Some(Pending::Redirect(Delayed::ready(Ok(())), ui.session.clone()));
        let outcome = ui.tick(&mut store).unwrap();
        match outcome {
            Some(Outcome::Completed(s)) => assert!(s.has_profile),
            _ => panic!("expected completion"),
        }
    }

    #[test]
    fn failed_save_leaves_wizard_usable() {
        let (_dir, mut store) = test_store();
        let mut ui = WizardUi::new(session(), complete_state());
        ui.state.go_to(Step::Verify);
        ui.pending = Some(Pending::Save(Delayed::ready(Err(std::io::Error::other(
            "connection reset",
        )
        .into()))));
        assert!(ui.tick(&mut store).unwrap().is_none());
        assert!(ui.pending.is_none());
        assert!(ui
            .banner
            .as_ref()
            .unwrap()
            .message
            .contains("Failed to save profile"));
        assert!(store.current().is_none());
    }

    #[test]
    fn location_detection_fills_city_and_country() {
        let (_dir, mut store) = test_store();
        let mut ui = make_ui();
        ui.state.go_to(Step::About);
        ui.pending = Some(Pending::Location(Delayed::ready(Ok((
            "New York".to_string(),
            "USA".to_string(),
        )))));
        ui.tick(&mut store).unwrap();
        assert_eq!(ui.state.draft.city, "New York");
        assert_eq!(ui.state.draft.country, "USA");
    }

    #[test]
    fn verify_toggles_update_verification_flags() {
        let mut ui = WizardUi::new(session(), complete_state());
        ui.state.go_to(Step::Verify);
        ui.focus = 0;
        ui.handle_key(KeyCode::Char(' '));
        assert!(ui.state.draft.verification.email_requested);
        ui.focus = 1;
        ui.handle_key(KeyCode::Char(' '));
        assert!(ui.state.draft.verification.photo_requested);
    }

    #[test]
    fn keys_ignored_while_saving() {
        let mut ui = WizardUi::new(session(), complete_state());
        ui.state.go_to(Step::Verify);
        ui.pending = Some(Pending::Save(Delayed::new(
            Ok(()),
            std::time::Duration::from_secs(3600),
        )));
        assert!(ui.handle_key(KeyCode::Esc).is_none());
        assert_eq!(ui.state.current(), Step::Verify);
    }

    #[test]
    fn focus_counts_match_rendered_rows() {
        let mut ui = make_ui();
        for step in Step::ALL {
            ui.state.go_to(step);
            assert!(ui.focus_count() >= 4, "step {step:?} too few rows");
        }
    }
}
