//! Full descriptor of the container at the cursor

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::core::state::InfoField;
use crate::ui::renderer::DashboardView;
use crate::ui::theme::Theme;

const KEY_WIDTH: usize = 9;

pub struct InspectPanel<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
}

impl<'a> InspectPanel<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn detail_line(&self, key: &str, value: String, highlight: bool) -> Line<'a> {
        let value_style = if highlight {
            self.theme.styles.row_focused
        } else {
            self.theme.styles.field_value
        };
        Line::from(vec![
            Span::styled(format!("{:<KEY_WIDTH$}", key), self.theme.styles.detail_key),
            Span::styled(value, value_style),
        ])
    }
}

impl<'a> Widget for InspectPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(container) = self.view.registry.get_index(self.view.offset) else {
            let block = Block::default()
                .title(Span::styled(" INSPECT ", self.theme.styles.panel_title))
                .borders(Borders::ALL)
                .border_style(self.theme.styles.panel_border)
                .style(Style::default().bg(self.theme.colors.bg_primary));
            let inner = block.inner(area);
            block.render(area, buf);
            if inner.height == 0 || inner.width == 0 {
                return;
            }
            let span = Span::styled(
                "Nothing to inspect",
                Style::default().fg(self.theme.colors.fg_muted),
            );
            buf.set_span(inner.x + 1, inner.y, &span, inner.width.saturating_sub(2));
            return;
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" INSPECT · {} ", container.name),
                self.theme.styles.panel_title,
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.styles.panel_border)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let mut lines = vec![
            self.detail_line("Id", container.id.clone(), false),
            self.detail_line("Name", container.name.clone(), false),
        ];
        lines.extend(InfoField::ALL.iter().map(|field| {
            self.detail_line(
                field.label(),
                field.value(container),
                *field == self.view.field,
            )
        }));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
