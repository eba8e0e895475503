//! Light and dark palettes. Every component takes a `Palette` prop instead of
//! hard-coding colors.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub focus_border: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub warning: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        fg: Color::Black,
        bg: Color::White,
        accent: Color::Blue,
        muted: Color::Gray,
        border: Color::Gray,
        focus_border: Color::Blue,
        selected_fg: Color::White,
        selected_bg: Color::Blue,
        warning: Color::Red,
    };

    pub const DARK: Palette = Palette {
        fg: Color::Gray,
        bg: Color::Black,
        accent: Color::Cyan,
        muted: Color::DarkGray,
        border: Color::DarkGray,
        focus_border: Color::Cyan,
        selected_fg: Color::Black,
        selected_bg: Color::Cyan,
        warning: Color::Yellow,
    };

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::DARK } else { Self::LIGHT }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.focus_border } else { self.border })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_mode() {
        assert_eq!(Palette::for_mode(true), Palette::DARK);
        assert_eq!(Palette::for_mode(false), Palette::LIGHT);
        assert_ne!(Palette::DARK.bg, Palette::LIGHT.bg);
    }

    #[test]
    fn test_focus_border_differs() {
        let p = Palette::LIGHT;
        assert_ne!(p.border(true), p.border(false));
    }
}
