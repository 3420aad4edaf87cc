//! Terminal rendering for markdown output.
//!
//! Rich mode renders through termimad so plan tables and emphasis display
//! properly; plain mode prints the markdown source unchanged.

use std::fmt::Display;

use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Renders any displayable value as markdown.
    pub fn render(&self, content: &impl Display) {
        let markdown = content.to_string();
        if self.rich_enabled {
            self.skin.print_text(&markdown);
        } else {
            print!("{markdown}");
        }
    }

    /// Prints text verbatim, e.g. export output meant to be piped.
    pub fn raw(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        println!("{text}");
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
