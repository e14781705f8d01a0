//! Aggregate summary line

use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};

use crate::ui::renderer::DashboardView;
use crate::ui::theme::Theme;

pub struct InfoBar<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
}

impl<'a> InfoBar<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl<'a> Widget for InfoBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, self.theme.styles.info_bar);

        let text = self
            .view
            .summary
            .map(|summary| summary.to_string())
            .unwrap_or_else(|| " Collecting...".to_string());
        let span = Span::styled(text, self.theme.styles.info_bar);
        buf.set_span(area.x, area.y, &span, area.width);
    }
}
