use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;
use ratatui::Frame;

/// Rose gradient: hot pink -> coral -> blush -> lavender -> magenta -> hot pink
pub const GRADIENT: &[(f64, f64, f64)] = &[
    (255.0, 94.0, 125.0),  // #ff5e7d hot pink
    (255.0, 140.0, 105.0), // #ff8c69 coral
    (255.0, 179.0, 186.0), // #ffb3ba blush
    (219.0, 112.0, 147.0), // #db7093 rose
    (196.0, 113.0, 237.0), // #c471ed lavender
    (255.0, 64.0, 129.0),  // #ff4081 magenta
    (255.0, 94.0, 125.0),  // wrap back to hot pink
];

pub const MAX_PARTICLES: usize = 20;
pub const PARTICLE_CHARS: &[char] = &['\u{2665}', '\u{2661}', '\u{00b7}', '\u{2022}'];

pub const LOGO: &[&str] = &[
    r"                 _       _     _       ",
    r" _ __ ___   __ _| |_ ___| |__ | |_   _ ",
    r"| '_ ` _ \ / _` | __/ __| '_ \| | | | |",
    r"| | | | | | (_| | || (__| | | | | |_| |",
    r"|_| |_| |_|\__,_|\__\___|_| |_|_|\__, |",
    r"                                 |___/ ",
];

/// Interpolate along the gradient for a position in 0.0..1.0
pub fn gradient_color(t: f64) -> Color {
    let t = t.rem_euclid(1.0);
    let segments = (GRADIENT.len() - 1) as f64;
    let scaled = t * segments;
    let idx = (scaled as usize).min(GRADIENT.len() - 2);
    let frac = scaled - idx as f64;

    let (r1, g1, b1) = GRADIENT[idx];
    let (r2, g2, b2) = GRADIENT[idx + 1];

    let r = (r1 + (r2 - r1) * frac) as u8;
    let g = (g1 + (g2 - g1) * frac) as u8;
    let b = (b1 + (b2 - b1) * frac) as u8;

    Color::Rgb(r, g, b)
}

fn dimmed(color: Color, brightness: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f64 * brightness) as u8,
            (g as f64 * brightness) as u8,
            (b as f64 * brightness) as u8,
        ),
        other => other,
    }
}

pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub drift: f64,
    pub brightness: f64,
    pub char_idx: usize,
    pub color_idx: usize,
}

impl Particle {
    /// Spawn a new particle below the visible area so it floats upward.
    pub fn new(width: u16, height: u16) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x: rng.gen_range(0.0..width.max(1) as f64),
            y: height as f64 + rng.gen_range(0.0..5.0),
            speed: rng.gen_range(0.15..0.45),
            drift: rng.gen_range(-0.1..0.1),
            brightness: 0.0,
            char_idx: rng.gen_range(0..PARTICLE_CHARS.len()),
            color_idx: rng.gen_range(0..GRADIENT.len() - 1),
        }
    }

    /// Spawn a particle at a random position already within the viewport.
    pub fn seeded(width: u16, height: u16) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            x: rng.gen_range(0.0..width.max(1) as f64),
            y: rng.gen_range(0.0..height.max(1) as f64),
            speed: rng.gen_range(0.15..0.45),
            drift: rng.gen_range(-0.1..0.1),
            brightness: rng.gen_range(0.2..0.6),
            char_idx: rng.gen_range(0..PARTICLE_CHARS.len()),
            color_idx: rng.gen_range(0..GRADIENT.len() - 1),
        }
    }

    pub fn tick(&mut self) {
        self.y -= self.speed;
        self.x += self.drift;
        if self.y > 0.0 {
            self.brightness = (self.brightness + 0.08).min(0.6);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.y < -1.0
    }
}

/// Pre-seed a full set of particles spread across the viewport.
pub fn pre_seed_particles(width: u16, height: u16) -> Vec<Particle> {
    (0..MAX_PARTICLES)
        .map(|_| Particle::seeded(width, height))
        .collect()
}

/// Standard per-tick particle update: advance existing, cull dead, maybe spawn.
pub fn tick_particles(particles: &mut Vec<Particle>, width: u16, height: u16) {
    for p in particles.iter_mut() {
        p.tick();
    }
    particles.retain(|p| !p.is_dead());
    let mut rng = rand::thread_rng();
    if particles.len() < MAX_PARTICLES && rng.gen_range(0..3) == 0 {
        particles.push(Particle::new(width, height));
    }
}

pub fn render_particles(particles: &[Particle], frame: &mut Frame, area: Rect) {
    let buf = frame.buffer_mut();
    for p in particles {
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let x = area.x + p.x as u16;
        let y = area.y + p.y as u16;
        if x >= area.right() || y >= area.bottom() {
            continue;
        }
        if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
            let t = p.color_idx as f64 / (GRADIENT.len() - 1) as f64;
            cell.set_char(PARTICLE_CHARS[p.char_idx])
                .set_fg(dimmed(gradient_color(t), p.brightness));
        }
    }
}

fn logo_origin(area: Rect) -> (u16, u16) {
    let logo_width = LOGO.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    let x = area.x + area.width.saturating_sub(logo_width) / 2;
    (x, area.y)
}

/// Render the logo with the gradient scrolling across it.
pub fn render_logo(phase: f64, frame: &mut Frame, area: Rect) {
    let (x0, y0) = logo_origin(area);
    let logo_width = LOGO.iter().map(|l| l.chars().count()).max().unwrap_or(1) as f64;
    let buf = frame.buffer_mut();
    for (row, line) in LOGO.iter().enumerate() {
        let y = y0 + row as u16;
        if y >= area.bottom() {
            break;
        }
        for (col, ch) in line.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let x = x0 + col as u16;
            if x >= area.right() {
                break;
            }
            if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
                let t = col as f64 / logo_width - phase * 0.25;
                cell.set_char(ch).set_fg(gradient_color(t));
            }
        }
    }
}

/// Positions of the logo's visible characters in the order they reveal.
pub fn logo_reveal_order() -> Vec<(usize, usize)> {
    let mut order: Vec<(usize, usize)> = LOGO
        .iter()
        .enumerate()
        .flat_map(|(row, line)| {
            line.chars()
                .enumerate()
                .filter(|(_, ch)| *ch != ' ')
                .map(move |(col, _)| (row, col))
        })
        .collect();
    order.shuffle(&mut rand::thread_rng());
    order
}

/// Render only the first `visible` characters of the reveal order.
pub fn render_logo_reveal(
    phase: f64,
    frame: &mut Frame,
    area: Rect,
    order: &[(usize, usize)],
    visible: usize,
) {
    let (x0, y0) = logo_origin(area);
    let logo_width = LOGO.iter().map(|l| l.chars().count()).max().unwrap_or(1) as f64;
    let buf = frame.buffer_mut();
    for &(row, col) in order.iter().take(visible) {
        let ch = LOGO[row].chars().nth(col).unwrap_or(' ');
        let x = x0 + col as u16;
        let y = y0 + row as u16;
        if x >= area.right() || y >= area.bottom() {
            continue;
        }
        if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
            let t = col as f64 / logo_width - phase * 0.25;
            cell.set_char(ch).set_fg(gradient_color(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_color_at_zero() {
        let color = gradient_color(0.0);
        assert_eq!(color, Color::Rgb(255, 94, 125));
    }

    #[test]
    fn gradient_color_at_one_wraps() {
        let color = gradient_color(1.0);
        assert_eq!(color, Color::Rgb(255, 94, 125));
    }

    #[test]
    fn gradient_color_midpoint_returns_rgb() {
        assert!(matches!(gradient_color(0.5), Color::Rgb(_, _, _)));
    }

    #[test]
    fn dimmed_scales_channels() {
        assert_eq!(dimmed(Color::Rgb(200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
    }

    #[test]
    fn particle_new_starts_below_screen() {
        let p = Particle::new(80, 24);
        assert!(p.y >= 24.0);
        assert_eq!(p.brightness, 0.0);
    }

    #[test]
    fn particle_tick_moves_up() {
        let mut p = Particle::new(80, 24);
        let y_before = p.y;
        p.tick();
        assert!(p.y < y_before);
    }

    #[test]
    fn particle_dies_above_screen() {
        let mut p = Particle::new(80, 24);
        p.y = -1.5;
        assert!(p.is_dead());
    }

    #[test]
    fn pre_seed_creates_max_particles() {
        assert_eq!(pre_seed_particles(80, 24).len(), MAX_PARTICLES);
    }

    #[test]
    fn tick_particles_culls_dead() {
        let mut particles = vec![Particle::new(80, 24)];
        particles[0].y = -2.0;
        tick_particles(&mut particles, 80, 24);
        for p in &particles {
            assert!(!p.is_dead());
        }
    }

    #[test]
    fn reveal_order_covers_every_visible_char() {
        let visible: usize = LOGO
            .iter()
            .map(|l| l.chars().filter(|c| *c != ' ').count())
            .sum();
        assert_eq!(logo_reveal_order().len(), visible);
    }
}
