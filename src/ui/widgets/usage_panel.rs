//! Per-container CPU and memory bars

use humansize::{format_size, BINARY};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::ui::layout::LayoutManager;
use crate::ui::renderer::DashboardView;
use crate::ui::theme::Theme;
use crate::ui::widgets::pad;

const LABEL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Cpu,
    Memory,
}

pub struct UsagePanel<'a> {
    view: &'a DashboardView,
    theme: &'a Theme,
    kind: UsageKind,
}

impl<'a> UsagePanel<'a> {
    pub fn new(view: &'a DashboardView, theme: &'a Theme, kind: UsageKind) -> Self {
        Self { view, theme, kind }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            UsageKind::Cpu => " CPU % ",
            UsageKind::Memory => " MEM % ",
        }
    }
}

impl<'a> Widget for UsagePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(self.title(), self.theme.styles.panel_title))
            .borders(Borders::ALL)
            .border_style(self.theme.styles.panel_border)
            .style(Style::default().bg(self.theme.colors.bg_primary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let stats = match self.view.stats.as_ref() {
            Some(stats) if !stats.is_empty() => stats,
            other => {
                let msg = if other.is_some() {
                    "No running containers"
                } else {
                    "Waiting for samples..."
                };
                let span = Span::styled(msg, Style::default().fg(self.theme.colors.fg_muted));
                buf.set_span(inner.x + 1, inner.y, &span, inner.width.saturating_sub(2));
                return;
            }
        };

        let (values, bar_style) = match self.kind {
            UsageKind::Cpu => (&stats.cpu, self.theme.styles.cpu_bar),
            UsageKind::Memory => (&stats.memory, self.theme.styles.mem_bar),
        };

        let rows = stats
            .labels
            .iter()
            .zip(values.iter())
            .enumerate()
            .skip(self.view.stats_offset)
            .take(LayoutManager::visible_rows(area));

        for (line_no, (index, (label, value))) in rows.enumerate() {
            let readout = match self.kind {
                UsageKind::Cpu => format!(" {:>5.1}%", value),
                UsageKind::Memory => {
                    let used = stats.memory_bytes.get(index).copied().unwrap_or(0);
                    match stats.memory_limits.get(index).copied().unwrap_or(0) {
                        0 => format!(" {:>5.1}% {:>10}", value, format_size(used, BINARY)),
                        limit => format!(
                            " {:>5.1}% {:>10} / {}",
                            value,
                            format_size(used, BINARY),
                            format_size(limit, BINARY)
                        ),
                    }
                }
            };

            let bar_width = (inner.width as usize)
                .saturating_sub(LABEL_WIDTH + 1 + readout.chars().count());
            let (filled, empty) = bar(*value, bar_width);

            let line = Line::from(vec![
                Span::styled(
                    format!("{} ", pad(label, LABEL_WIDTH)),
                    self.theme.styles.row,
                ),
                Span::styled(filled, bar_style),
                Span::styled(empty, self.theme.styles.bar_empty),
                Span::styled(readout, self.theme.styles.field_value),
            ]);
            buf.set_line(inner.x, inner.y + line_no as u16, &line, inner.width);
        }
    }
}

/// Split `width` cells into filled and empty runs for `percent`.
///
/// Values above 100 (multi-core CPU) draw a full bar.
pub fn bar(percent: f64, width: usize) -> (String, String) {
    let ratio = if percent.is_finite() {
        percent.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    ("█".repeat(filled), "░".repeat(width - filled))
}
