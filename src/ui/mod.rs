//! UI module - Rendering and layout for the TUI

pub mod layout;
pub mod renderer;
pub mod theme;
pub mod widgets;

use anyhow::Result;

use crate::core::state::{ContainerRegistry, InfoField, StatsSnapshot, Summary};

/// Display operations the reconciler drives.
///
/// Calls are synchronous and made one at a time from the loop task.
#[cfg_attr(test, mockall::automock)]
pub trait Surface {
    /// Repaint the container list (or the inspect view) from `offset`
    fn render_containers(
        &mut self,
        registry: &ContainerRegistry,
        field: InfoField,
        offset: usize,
        inspect: bool,
    ) -> Result<()>;

    /// Repaint the usage panels from `offset`
    fn render_stats(&mut self, stats: &StatsSnapshot, offset: usize) -> Result<()>;

    /// Store the summary line and repaint everything
    fn render_summary(&mut self, summary: &Summary) -> Result<()>;

    /// Repaint everything
    fn render(&mut self) -> Result<()>;

    /// Adopt new terminal geometry
    fn reset_size(&mut self, width: u16, height: u16) -> Result<()>;
}
