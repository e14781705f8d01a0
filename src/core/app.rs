//! Event reconciler
//!
//! The loop below is the only writer of the registry, cursor and stats
//! snapshot, and the only caller of the display surface. It takes one signal
//! at a time from whichever queue is ready, applies it completely, renders,
//! and only then looks at the next one.

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::core::cursor::CursorBounds;
use crate::core::events::{
    Command, EventResult, InputEvent, ShutdownListener, Signal, SignalReceivers,
};
use crate::core::state::ViewState;
use crate::error::DashError;
use crate::integrations::docker::LifecycleEvent;
use crate::ui::Surface;

pub struct App<S> {
    surface: S,
    state: ViewState,
    signals: SignalReceivers,
    shutdown: ShutdownListener,
    bounds: CursorBounds,
}

impl<S: Surface> App<S> {
    pub fn new(
        surface: S,
        signals: SignalReceivers,
        shutdown: ShutdownListener,
        bounds: CursorBounds,
    ) -> Self {
        Self {
            surface,
            state: ViewState::new(),
            signals,
            shutdown,
            bounds,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Process signals until quit. A closed queue is fatal.
    pub async fn run(&mut self) -> Result<()> {
        self.surface.render()?;

        loop {
            let signal = self.next_signal().await?;
            if self.handle_signal(signal)? == EventResult::Quit {
                tracing::info!("quit requested");
                break;
            }
        }
        Ok(())
    }

    /// Wait for the next signal on any queue.
    async fn next_signal(&mut self) -> Result<Signal> {
        if self.shutdown.is_triggered() {
            return Ok(Signal::Quit);
        }

        let signals = &mut self.signals;
        let signal = tokio::select! {
            _ = self.shutdown.triggered() => Ok(Signal::Quit),
            event = signals.lifecycle.recv() => {
                event.map(Signal::Lifecycle).ok_or(DashError::SourceClosed("lifecycle"))
            }
            stats = signals.stats.recv() => {
                stats.map(Signal::Stats).ok_or(DashError::SourceClosed("stats"))
            }
            input = signals.input.recv() => {
                input.map(Signal::Input).ok_or(DashError::SourceClosed("input"))
            }
            tick = signals.tick.recv() => {
                tick.map(|()| Signal::Tick).ok_or(DashError::SourceClosed("tick"))
            }
        };
        Ok(signal?)
    }

    /// Apply one signal and render its effect
    fn handle_signal(&mut self, signal: Signal) -> Result<EventResult> {
        match signal {
            Signal::Lifecycle(LifecycleEvent::Appeared(container)) => {
                tracing::debug!(id = %container.short_id(), name = %container.name, "container appeared");
                self.state.registry.upsert(container);
                self.clamp_cursor();
                self.render_containers()?;
            }
            Signal::Lifecycle(LifecycleEvent::Removed(id)) => {
                if self.state.registry.remove(&id).is_none() {
                    tracing::debug!(%id, "removal of untracked container");
                }
                self.clamp_cursor();
                self.render_containers()?;
            }
            Signal::Stats(snapshot) => {
                self.state.replace_stats(snapshot);
                self.clamp_cursor();
                if let Some(stats) = &self.state.stats {
                    self.surface.render_stats(stats, self.state.cursor.offset)?;
                }
            }
            Signal::Input(InputEvent::Key(key)) => return self.handle_key(key),
            Signal::Input(InputEvent::Resize(width, height)) => {
                self.surface.reset_size(width, height)?;
                self.surface.render()?;
            }
            Signal::Tick => {
                let summary = self.state.summary();
                self.surface.render_summary(&summary)?;
            }
            Signal::Quit => return Ok(EventResult::Quit),
        }
        Ok(EventResult::Continue)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult> {
        let Some(command) = Command::from_key(&key) else {
            tracing::trace!(?key, "ignoring unbound key");
            return Ok(EventResult::Continue);
        };

        let cursor = self.state.cursor;
        let len = self.state.registry.len();
        self.state.cursor = match command {
            Command::Quit => return Ok(EventResult::Quit),
            Command::ToggleInspect => cursor.toggle_inspect(),
            Command::Navigate(nav) => cursor.navigate(nav, len, self.bounds),
        };

        self.render_containers()?;
        Ok(EventResult::Continue)
    }

    /// Registry size may have changed; keep the offset inside it
    fn clamp_cursor(&mut self) {
        let len = self.state.registry.len();
        self.state.cursor = self.state.cursor.clamp(len, self.bounds);
    }

    fn render_containers(&mut self) -> Result<()> {
        let cursor = self.state.cursor;
        self.surface.render_containers(
            &self.state.registry,
            cursor.field,
            cursor.offset,
            cursor.inspect,
        )
    }
}
