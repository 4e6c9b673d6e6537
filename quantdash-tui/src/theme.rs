//! Neon-on-charcoal theme tokens for the QuantDash TUI.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, headers, info messages)
//! - **Positive**: Neon green (gains, completed tasks)
//! - **Negative**: Hot pink (losses, failed tasks, drawdowns)
//! - **Warning**: Neon orange (advisories, running tasks)
//! - **Neutral**: Cool purple (pending tasks, secondary info)
//! - **Muted**: Steel blue (labels, disabled text)

use ratatui::style::{Color, Modifier, Style};

use quantdash_core::TaskStatus;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub const fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }

    /// Gains green, losses pink. Zero counts as a gain.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn sharpe_color(&self, sharpe: f64) -> Color {
        match sharpe {
            s if s >= 2.0 => self.positive,
            s if s >= 1.0 => self.accent,
            s if s >= 0.5 => self.neutral,
            s if s >= 0.0 => self.muted,
            _ => self.negative,
        }
    }

    /// Win rate is a percentage (0–100) as reported by the backend.
    pub fn win_rate_color(&self, win_rate: f64) -> Color {
        match win_rate {
            w if w >= 70.0 => self.positive,
            w if w >= 50.0 => self.accent,
            w if w >= 40.0 => self.neutral,
            _ => self.warning,
        }
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Completed => self.positive,
            TaskStatus::Running => self.warning,
            TaskStatus::Pending => self.neutral,
            TaskStatus::Failed => self.negative,
        }
    }
}

const THEME: Theme = Theme::parrot_neon();

// ── Style shorthands used by the panels ──────────────────────────────

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn neutral() -> Style {
    Style::default().fg(THEME.neutral)
}

pub fn positive() -> Style {
    Style::default().fg(THEME.positive)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn pnl(value: f64) -> Style {
    Style::default().fg(THEME.pnl_color(value))
}

pub fn sharpe(value: f64) -> Style {
    Style::default().fg(THEME.sharpe_color(value))
}

pub fn win_rate(value: f64) -> Style {
    Style::default().fg(THEME.win_rate_color(value))
}

pub fn status(status: TaskStatus) -> Style {
    Style::default().fg(THEME.status_color(status))
}

/// Cursor row highlight.
pub fn cursor() -> Style {
    accent().add_modifier(Modifier::REVERSED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Full-width advisory banner.
pub fn banner() -> Style {
    Style::default()
        .fg(THEME.background)
        .bg(THEME.warning)
        .add_modifier(Modifier::BOLD)
}
