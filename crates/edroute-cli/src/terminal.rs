//! Terminal styling and color utilities.
//!
//! ANSI escape codes plus the `NO_COLOR` / `TERM=dumb` detection used to decide
//! whether to emit them.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bold reverse cyan for the route kind badge.
    pub const TAG_KIND: &str = "\x1b[1;7;36m";
    /// Bright bold white for the next stop.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for labels and secondary text.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for jump counts.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for fuel and tritium notices.
    pub const ORANGE: &str = "\x1b[38;5;208m";
    /// Red for errors.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color is
/// disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_kind: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_kind: colors::TAG_KIND,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_kind: "",
            white_bold: "",
            gray: "",
            green: "",
            orange: "",
            red: "",
        }
    }

    /// `colored()` if the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI colors should be written, based on `NO_COLOR` and `TERM`.
#[must_use]
pub fn supports_color() -> bool {
    color_allowed(
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("TERM").ok().as_deref(),
    )
}

/// Any `NO_COLOR` value turns color off, as does a dumb terminal.
fn color_allowed(no_color: bool, term: Option<&str>) -> bool {
    !no_color && !term.is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
}
