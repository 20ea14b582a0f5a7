// SPDX-License-Identifier: PMPL-1.0-or-later
//! Text decoration for failure messages.
//!
//! Decoration is cosmetic only. Whether an assertion passes never depends on
//! the palette in use.

use colored::{Color, Colorize};

/// How report text is decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// Text returned unchanged
    Plain,
    /// ANSI colours via `colored`, honouring its global override
    #[default]
    Ansi,
}

impl Palette {
    fn paint(self, text: &str, color: Color) -> String {
        match self {
            Palette::Plain => text.to_string(),
            Palette::Ansi => text.color(color).to_string(),
        }
    }

    pub fn grey(self, text: &str) -> String {
        self.paint(text, Color::BrightBlack)
    }

    pub fn white(self, text: &str) -> String {
        self.paint(text, Color::White)
    }

    pub fn yellow(self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn blue(self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn red(self, text: &str) -> String {
        self.paint(text, Color::Red)
    }
}
