//! Layout management system

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed layout rects for all panels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputedLayout {
    pub header: Rect,
    pub containers: Rect,
    pub cpu_panel: Rect,
    pub mem_panel: Rect,
    pub info_bar: Rect,
    pub footer: Rect,
}

pub struct LayoutManager;

impl LayoutManager {
    /// Split the terminal: header, container list, usage panels side by side,
    /// summary bar, key hints.
    pub fn compute(area: Rect) -> ComputedLayout {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),       // Header
                Constraint::Min(5),          // Containers
                Constraint::Percentage(40),  // Usage
                Constraint::Length(1),       // Info bar
                Constraint::Length(1),       // Footer
            ])
            .split(area);

        let usage_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[2]);

        ComputedLayout {
            header: main_chunks[0],
            containers: main_chunks[1],
            cpu_panel: usage_chunks[0],
            mem_panel: usage_chunks[1],
            info_bar: main_chunks[3],
            footer: main_chunks[4],
        }
    }

    /// Rows of content that fit inside a bordered panel
    pub fn visible_rows(panel: Rect) -> usize {
        panel.height.saturating_sub(2) as usize
    }
}
