//! Coloured console output

use std::sync::LazyLock;

use billing::InstallationStatus;
use owo_colors::{colors::css, OwoColorize};
use supports_color::Stream;

static COLOR: LazyLock<bool> = LazyLock::new(|| supports_color::on(Stream::Stdout).is_some());

/// How a piece of console text is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Completed changes.
    Success,
    /// Things that need the operator's attention.
    Warning,
    /// Labels and secondary detail.
    Muted,
}

impl Tone {
    /// The tone used for a customer's installation status.
    #[must_use]
    pub const fn of_status(status: InstallationStatus) -> Self {
        match status {
            InstallationStatus::Installed => Self::Success,
            InstallationStatus::Pending => Self::Warning,
            InstallationStatus::Cancelled => Self::Muted,
        }
    }
}

fn paint(text: &str, tone: Tone, enabled: bool) -> String {
    if !enabled {
        return text.to_owned();
    }
    match tone {
        Tone::Success => text.fg::<css::Green>().to_string(),
        Tone::Warning => text.fg::<css::Orange>().to_string(),
        Tone::Muted => text.dimmed().to_string(),
    }
}

/// Renders text in a [`Tone`] when stdout supports colour.
pub trait Colorize {
    /// Renders in the given tone.
    fn tone(&self, tone: Tone) -> String;

    /// Renders as a completed change.
    fn success(&self) -> String {
        self.tone(Tone::Success)
    }

    /// Renders as a warning.
    fn warning(&self) -> String {
        self.tone(Tone::Warning)
    }

    /// Renders as secondary detail.
    fn dim(&self) -> String {
        self.tone(Tone::Muted)
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn tone(&self, tone: Tone) -> String {
        paint(self.as_ref(), tone, *COLOR)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Tone::Success)]
    #[test_case(Tone::Warning)]
    #[test_case(Tone::Muted)]
    fn plain_when_colour_is_off(tone: Tone) {
        assert_eq!(paint("F-001 paid", tone, false), "F-001 paid");
    }

    #[test_case(Tone::Success)]
    #[test_case(Tone::Warning)]
    #[test_case(Tone::Muted)]
    fn escaped_when_colour_is_on(tone: Tone) {
        let painted = paint("F-001 paid", tone, true);
        assert!(painted.contains("F-001 paid"));
        assert!(painted.starts_with('\u{1b}'));
    }

    #[test_case(InstallationStatus::Installed, Tone::Success)]
    #[test_case(InstallationStatus::Pending, Tone::Warning)]
    #[test_case(InstallationStatus::Cancelled, Tone::Muted)]
    fn status_tones(status: InstallationStatus, tone: Tone) {
        assert_eq!(Tone::of_status(status), tone);
    }
}
