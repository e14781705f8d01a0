//! Terminal display surface and the frame renderer behind it

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

use crate::core::state::{ContainerRegistry, InfoField, StatsSnapshot, Summary};
use crate::ui::layout::LayoutManager;
use crate::ui::theme::Theme;
use crate::ui::widgets::*;
use crate::ui::Surface;

/// Everything the last render calls handed over, kept so any region can be
/// repainted on its own
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub registry: ContainerRegistry,
    pub field: InfoField,
    pub offset: usize,
    pub inspect: bool,
    pub stats: Option<StatsSnapshot>,
    pub stats_offset: usize,
    pub summary: Option<Summary>,
    pub endpoint: String,
}

pub struct Renderer;

impl Renderer {
    pub fn render(frame: &mut Frame, view: &DashboardView, theme: &Theme) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(theme.colors.bg_primary)),
            area,
        );

        let layout = LayoutManager::compute(area);

        frame.render_widget(Header::new(view, theme), layout.header);

        if view.inspect {
            frame.render_widget(InspectPanel::new(view, theme), layout.containers);
        } else {
            frame.render_widget(ContainerPanel::new(view, theme), layout.containers);
        }

        frame.render_widget(
            UsagePanel::new(view, theme, UsageKind::Cpu),
            layout.cpu_panel,
        );
        frame.render_widget(
            UsagePanel::new(view, theme, UsageKind::Memory),
            layout.mem_panel,
        );

        frame.render_widget(InfoBar::new(view, theme), layout.info_bar);
        frame.render_widget(Footer::new(view, theme), layout.footer);
    }
}

/// `Surface` backed by a ratatui terminal.
///
/// Every call redraws a full frame from the cached view; ratatui only flushes
/// the cells that changed, so a stats update touches just the usage panels.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
    view: DashboardView,
}

impl TerminalSurface<CrosstermBackend<Stdout>> {
    /// Take over the controlling terminal
    pub fn init(theme: Theme, endpoint: String) -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        match Terminal::new(CrosstermBackend::new(stdout())) {
            Ok(terminal) => Ok(Self::new(terminal, theme, endpoint)),
            Err(e) => {
                let _ = execute!(out, LeaveAlternateScreen, Show);
                let _ = disable_raw_mode();
                Err(e.into())
            }
        }
    }

    /// Give the terminal back in the state we found it
    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>, theme: Theme, endpoint: String) -> Self {
        Self {
            terminal,
            theme,
            view: DashboardView {
                endpoint,
                ..DashboardView::default()
            },
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn draw(&mut self) -> Result<()> {
        let view = &self.view;
        let theme = &self.theme;
        self.terminal
            .draw(|frame| Renderer::render(frame, view, theme))?;
        Ok(())
    }
}

impl<B: Backend> Surface for TerminalSurface<B> {
    fn render_containers(
        &mut self,
        registry: &ContainerRegistry,
        field: InfoField,
        offset: usize,
        inspect: bool,
    ) -> Result<()> {
        self.view.registry = registry.clone();
        self.view.field = field;
        self.view.offset = offset;
        self.view.inspect = inspect;
        self.draw()
    }

    fn render_stats(&mut self, stats: &StatsSnapshot, offset: usize) -> Result<()> {
        self.view.stats = Some(stats.clone());
        self.view.stats_offset = offset;
        self.draw()
    }

    fn render_summary(&mut self, summary: &Summary) -> Result<()> {
        self.view.summary = Some(*summary);
        self.draw()
    }

    fn render(&mut self) -> Result<()> {
        self.draw()
    }

    fn reset_size(&mut self, width: u16, height: u16) -> Result<()> {
        tracing::debug!(width, height, "terminal resized");
        self.terminal.resize(Rect::new(0, 0, width, height))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::docker::{ContainerInfo, ContainerStats, ContainerStatus};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use std::collections::BTreeMap;

    fn surface(width: u16, height: u16) -> TerminalSurface<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        TerminalSurface::new(terminal, Theme::default(), "unix:///var/run/docker.sock".into())
    }

    fn container(id: &str, name: &str, image: &str) -> ContainerInfo {
        ContainerInfo {
            id: id.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            status: ContainerStatus::Running,
            state: "Up 2 minutes".to_string(),
            ports: Vec::new(),
            command: "docker-entrypoint.sh postgres".to_string(),
            mounts: Vec::new(),
            labels: BTreeMap::new(),
            created: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn registry() -> ContainerRegistry {
        let mut registry = ContainerRegistry::new();
        registry.upsert(container("aaaa", "web", "nginx:1.27"));
        registry.upsert(container("bbbb", "db", "postgres:16"));
        registry
    }

    fn screen(surface: &TerminalSurface<TestBackend>) -> String {
        let buffer = surface.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn container_list_starts_at_offset() {
        let mut surface = surface(100, 30);
        surface
            .render_containers(&registry(), InfoField::Image, 1, false)
            .unwrap();

        let text = screen(&surface);
        assert!(text.contains("postgres:16"));
        assert!(!text.contains("nginx:1.27"));
        assert!(text.contains("Image (1/7)"));
    }

    #[test]
    fn inspect_view_shows_every_field() {
        let mut surface = surface(100, 30);
        surface
            .render_containers(&registry(), InfoField::Command, 0, true)
            .unwrap();

        let text = screen(&surface);
        assert!(text.contains("INSPECT · web"));
        for field in InfoField::ALL {
            assert!(text.contains(field.label()), "missing {}", field.label());
        }
        assert!(text.contains("docker-entrypoint.sh postgres"));
    }

    #[test]
    fn stats_and_summary_are_cached_between_calls() {
        let mut surface = surface(100, 30);
        let mut stats = StatsSnapshot::default();
        stats.push(
            "web",
            &ContainerStats {
                cpu_percent: 35.0,
                memory_usage_bytes: 64 * 1024 * 1024,
                memory_limit_bytes: 1024 * 1024 * 1024,
                memory_percent: 6.25,
            },
        );

        surface.render_stats(&stats, 0).unwrap();
        surface
            .render_summary(&Summary {
                containers: 1,
                total_cpu: 35.0,
                total_memory: 6.25,
            })
            .unwrap();

        let text = screen(&surface);
        assert!(text.contains("35.0%"));
        assert!(text.contains("64 MiB"));
        assert!(text.contains("Cons:1  Total CPU:35%  Total Mem:6%"));
        assert_eq!(surface.view().stats.as_ref(), Some(&stats));
    }

    #[test]
    fn reset_size_adopts_new_geometry() {
        let mut surface = surface(100, 30);
        surface.reset_size(60, 20).unwrap();

        assert_eq!(surface.terminal.get_frame().area(), Rect::new(0, 0, 60, 20));
    }

    #[test]
    fn tiny_terminals_render_without_panicking() {
        let mut stats = StatsSnapshot::default();
        stats.push("web", &ContainerStats::default());

        for height in 1..=7 {
            for width in [1, 2, 5, 12, 40] {
                let mut surface = surface(width, height);
                surface
                    .render_containers(&registry(), InfoField::Ports, 0, false)
                    .unwrap();
                surface
                    .render_containers(&registry(), InfoField::Ports, 1, true)
                    .unwrap();
                surface.render_stats(&stats, 0).unwrap();
                surface
                    .render_stats(&StatsSnapshot::default(), 0)
                    .unwrap();
                surface.render_summary(&Summary::default()).unwrap();
            }
        }
    }

    #[test]
    fn shrinking_below_the_layout_keeps_rendering() {
        let mut surface = surface(80, 24);
        surface
            .render_containers(&registry(), InfoField::Image, 0, false)
            .unwrap();

        surface.terminal.backend_mut().resize(80, 4);
        surface.reset_size(80, 4).unwrap();
        surface.render().unwrap();

        assert_eq!(surface.backend().buffer().area, Rect::new(0, 0, 80, 4));
    }
}
