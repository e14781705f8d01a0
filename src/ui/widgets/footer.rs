//! Footer widget with keybindings

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::renderer::DashboardView;
use crate::ui::theme::Theme;

pub struct Footer<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl<'a> Widget for Footer<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, self.theme.styles.footer);

        let bindings = if self.view.inspect {
            [("↑/↓", "Select"), ("←/→", "Highlight"), ("i", "List"), ("q", "Quit")]
        } else {
            [("↑/↓", "Scroll"), ("←/→", "Field"), ("i", "Inspect"), ("q", "Quit")]
        };

        let mut spans = Vec::new();
        for (i, (key, action)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", self.theme.styles.keybind));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                self.theme.styles.keybind_key,
            ));
            spans.push(Span::styled(
                format!(" {}", action),
                self.theme.styles.keybind,
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));
    }
}
