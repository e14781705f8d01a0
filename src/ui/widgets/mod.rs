//! UI Widgets

pub mod container_panel;
pub mod footer;
pub mod header;
pub mod info_bar;
pub mod inspect_panel;
pub mod usage_panel;

pub use container_panel::ContainerPanel;
pub use footer::Footer;
pub use header::Header;
pub use info_bar::InfoBar;
pub use inspect_panel::InspectPanel;
pub use usage_panel::{UsageKind, UsagePanel};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `s` to at most `max_width` terminal columns, marking the cut with `…`
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Right-pad `s` with spaces to `width` terminal columns
pub fn pad(s: &str, width: usize) -> String {
    let fitted = truncate(s, width);
    let fill = width.saturating_sub(fitted.width());
    format!("{}{}", fitted, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("postgres", 12), "postgres");
        assert_eq!(truncate("postgres-primary", 8), "postgre…");
        assert_eq!(truncate("データベース", 5), "デー…");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("web", 6), "web   ");
        assert_eq!(pad("webserver", 6), "webse…");
    }
}
