//! Container list with one selectable descriptor column

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::core::state::InfoField;
use crate::integrations::docker::{ContainerInfo, ContainerStatus};
use crate::ui::layout::LayoutManager;
use crate::ui::renderer::DashboardView;
use crate::ui::theme::Theme;
use crate::ui::widgets::{pad, truncate};

const NAME_WIDTH: usize = 20;

pub struct ContainerPanel<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
}

impl<'a> ContainerPanel<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }

    fn render_container_row(
        &self,
        container: &ContainerInfo,
        focused: bool,
        width: u16,
    ) -> Line<'a> {
        let status_style = match container.status {
            ContainerStatus::Running => self.theme.styles.status_running,
            ContainerStatus::Exited => self.theme.styles.status_stopped,
            ContainerStatus::Dead | ContainerStatus::Restarting => {
                self.theme.styles.status_warning
            }
            _ => self.theme.styles.row,
        };

        let base_style = if focused {
            self.theme.styles.row_focused
        } else {
            self.theme.styles.row
        };

        let indicator = if focused { "▸" } else { " " };
        // indicator + icon + gaps + short id
        let fixed = 1 + 3 + 13 + NAME_WIDTH + 1;
        let value_width = (width as usize).saturating_sub(fixed);
        let value = truncate(&self.view.field.value(container), value_width);

        Line::from(vec![
            Span::styled(indicator, base_style),
            Span::styled(format!(" {} ", status_icon(container.status)), status_style),
            Span::styled(format!("{} ", pad(container.short_id(), 12)), base_style),
            Span::styled(format!("{} ", pad(&container.name, NAME_WIDTH)), base_style),
            Span::styled(value, base_style.patch(self.theme.styles.field_value)),
        ])
    }
}

impl<'a> Widget for ContainerPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let field = self.view.field;
        let title = format!(
            " CONTAINERS · {} ({}/{}) ",
            field.label(),
            field.index() + 1,
            InfoField::ALL.len()
        );

        let block = Block::default()
            .title(Span::styled(title, self.theme.styles.panel_title))
            .borders(Borders::ALL)
            .border_style(self.theme.styles.panel_border)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.view.registry.is_empty() {
            let span = Span::styled(
                "No running containers",
                Style::default().fg(self.theme.colors.fg_muted),
            );
            buf.set_span(inner.x + 1, inner.y, &span, inner.width.saturating_sub(2));
            return;
        }

        let rows = self
            .view
            .registry
            .iter()
            .skip(self.view.offset)
            .take(LayoutManager::visible_rows(area));
        for (i, container) in rows.enumerate() {
            // The first visible row is the cursor row
            let line = self.render_container_row(container, i == 0, inner.width);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}

pub fn status_icon(status: ContainerStatus) -> &'static str {
    match status {
        ContainerStatus::Running => "●",
        ContainerStatus::Paused => "◐",
        ContainerStatus::Restarting => "↻",
        ContainerStatus::Exited => "○",
        ContainerStatus::Dead => "✗",
        ContainerStatus::Created => "◌",
        ContainerStatus::Unknown => "?",
    }
}
