//! Color palettes and the derived widget styles

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub styles: ThemeStyles,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub bg_primary: Color,
    pub bg_secondary: Color,

    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub border: Color,
    pub selection: Color,
}

#[derive(Debug, Clone)]
pub struct ThemeStyles {
    pub header: Style,
    pub info_bar: Style,
    pub footer: Style,
    pub panel_title: Style,
    pub panel_border: Style,
    pub row: Style,
    pub row_focused: Style,
    pub field_value: Style,
    pub status_running: Style,
    pub status_stopped: Style,
    pub status_warning: Style,
    pub cpu_bar: Style,
    pub mem_bar: Style,
    pub bar_empty: Style,
    pub keybind: Style,
    pub keybind_key: Style,
    pub detail_key: Style,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            _ => Self::tokyo_night(),
        }
    }

    /// Tokyo Night theme (default)
    pub fn tokyo_night() -> Self {
        let colors = ThemeColors {
            bg_primary: Color::Rgb(26, 27, 38),
            bg_secondary: Color::Rgb(36, 40, 59),

            fg_primary: Color::Rgb(192, 202, 245),
            fg_secondary: Color::Rgb(169, 177, 214),
            fg_muted: Color::Rgb(86, 95, 137),

            accent_primary: Color::Rgb(122, 162, 247),
            accent_secondary: Color::Rgb(187, 154, 247),

            success: Color::Rgb(158, 206, 106),
            warning: Color::Rgb(224, 175, 104),
            error: Color::Rgb(247, 118, 142),

            border: Color::Rgb(41, 46, 66),
            selection: Color::Rgb(52, 59, 88),
        };

        Self::from_colors("Tokyo Night", colors)
    }

    pub fn dracula() -> Self {
        let colors = ThemeColors {
            bg_primary: Color::Rgb(40, 42, 54),
            bg_secondary: Color::Rgb(68, 71, 90),

            fg_primary: Color::Rgb(248, 248, 242),
            fg_secondary: Color::Rgb(189, 147, 249),
            fg_muted: Color::Rgb(98, 114, 164),

            accent_primary: Color::Rgb(139, 233, 253),
            accent_secondary: Color::Rgb(255, 121, 198),

            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
            error: Color::Rgb(255, 85, 85),

            border: Color::Rgb(68, 71, 90),
            selection: Color::Rgb(68, 71, 90),
        };

        Self::from_colors("Dracula", colors)
    }

    pub fn nord() -> Self {
        let colors = ThemeColors {
            bg_primary: Color::Rgb(46, 52, 64),
            bg_secondary: Color::Rgb(59, 66, 82),

            fg_primary: Color::Rgb(236, 239, 244),
            fg_secondary: Color::Rgb(229, 233, 240),
            fg_muted: Color::Rgb(216, 222, 233),

            accent_primary: Color::Rgb(136, 192, 208),
            accent_secondary: Color::Rgb(129, 161, 193),

            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),

            border: Color::Rgb(67, 76, 94),
            selection: Color::Rgb(76, 86, 106),
        };

        Self::from_colors("Nord", colors)
    }

    fn from_colors(name: &str, colors: ThemeColors) -> Self {
        let styles = ThemeStyles {
            header: Style::default()
                .bg(colors.bg_secondary)
                .fg(colors.fg_primary)
                .add_modifier(Modifier::BOLD),
            info_bar: Style::default()
                .bg(colors.bg_secondary)
                .fg(colors.accent_primary),
            footer: Style::default().bg(colors.bg_primary).fg(colors.fg_muted),
            panel_title: Style::default()
                .fg(colors.accent_primary)
                .add_modifier(Modifier::BOLD),
            panel_border: Style::default().fg(colors.border),
            row: Style::default().fg(colors.fg_primary),
            row_focused: Style::default()
                .fg(colors.fg_primary)
                .bg(colors.selection)
                .add_modifier(Modifier::BOLD),
            field_value: Style::default().fg(colors.fg_secondary),
            status_running: Style::default().fg(colors.success),
            status_stopped: Style::default().fg(colors.error),
            status_warning: Style::default().fg(colors.warning),
            cpu_bar: Style::default().fg(colors.accent_primary),
            mem_bar: Style::default().fg(colors.accent_secondary),
            bar_empty: Style::default().fg(colors.border),
            keybind: Style::default().fg(colors.fg_muted),
            keybind_key: Style::default()
                .fg(colors.accent_secondary)
                .add_modifier(Modifier::BOLD),
            detail_key: Style::default()
                .fg(colors.accent_primary)
                .add_modifier(Modifier::BOLD),
        };

        Self {
            name: name.to_string(),
            colors,
            styles,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(Theme::from_name("Dracula").name, "Dracula");
        assert_eq!(Theme::from_name("nord").name, "Nord");
        assert_eq!(Theme::from_name("solarized").name, "Tokyo Night");
    }
}
