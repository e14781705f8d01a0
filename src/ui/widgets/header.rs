//! Header widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::integrations::docker::ContainerStatus;
use crate::ui::renderer::DashboardView;
use crate::ui::theme::Theme;

pub struct Header<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_style(area, self.theme.styles.header);

        let separator = || Span::styled(" │ ", Style::default().fg(self.theme.colors.fg_muted));

        let running = self
            .view
            .registry
            .iter()
            .filter(|c| c.status == ContainerStatus::Running)
            .count();

        let mut spans = vec![
            Span::styled(
                " 🐳 DOCKDASH ",
                Style::default()
                    .fg(self.theme.colors.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            separator(),
            Span::styled(
                self.view.endpoint.as_str(),
                Style::default().fg(self.theme.colors.fg_primary),
            ),
            separator(),
            Span::styled(
                format!("{}/{} running", running, self.view.registry.len()),
                Style::default().fg(self.theme.colors.success),
            ),
        ];

        if self.view.inspect {
            spans.push(separator());
            spans.push(Span::styled(
                "inspect",
                Style::default().fg(self.theme.colors.accent_secondary),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let time = chrono::Local::now().format("%H:%M").to_string();
        let time_span = Span::styled(&time, Style::default().fg(self.theme.colors.fg_muted));
        let time_x = area.x + area.width.saturating_sub(time.len() as u16 + 1);
        buf.set_span(time_x, area.y, &time_span, time.len() as u16);
    }
}
