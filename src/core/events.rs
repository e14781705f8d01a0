//! Signal queues feeding the reconciler, and the producers that fill them

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::cursor::Navigation;
use crate::core::state::StatsSnapshot;
use crate::integrations::docker::LifecycleEvent;

/// Everything the reconciler reacts to, tagged by origin
#[derive(Debug, Clone)]
pub enum Signal {
    Lifecycle(LifecycleEvent),
    Stats(StatsSnapshot),
    Input(InputEvent),
    Tick,
    Quit,
}

/// Raw terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Result of handling a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

/// Producer ends of the four signal queues
#[derive(Debug, Clone)]
pub struct SignalSenders {
    pub lifecycle: mpsc::Sender<LifecycleEvent>,
    pub stats: mpsc::Sender<StatsSnapshot>,
    pub input: mpsc::Sender<InputEvent>,
    pub tick: mpsc::Sender<()>,
}

/// Consumer ends, owned by the reconciler alone
#[derive(Debug)]
pub struct SignalReceivers {
    pub lifecycle: mpsc::Receiver<LifecycleEvent>,
    pub stats: mpsc::Receiver<StatsSnapshot>,
    pub input: mpsc::Receiver<InputEvent>,
    pub tick: mpsc::Receiver<()>,
}

/// Build one bounded FIFO queue per signal category.
///
/// Producers await free capacity rather than dropping signals.
pub fn signal_channels(capacity: usize) -> (SignalSenders, SignalReceivers) {
    let capacity = capacity.max(1);
    let (lifecycle_tx, lifecycle_rx) = mpsc::channel(capacity);
    let (stats_tx, stats_rx) = mpsc::channel(capacity);
    let (input_tx, input_rx) = mpsc::channel(capacity);
    let (tick_tx, tick_rx) = mpsc::channel(1);

    (
        SignalSenders {
            lifecycle: lifecycle_tx,
            stats: stats_tx,
            input: input_tx,
            tick: tick_tx,
        },
        SignalReceivers {
            lifecycle: lifecycle_rx,
            stats: stats_rx,
            input: input_rx,
            tick: tick_rx,
        },
    )
}

/// Single-slot shutdown notification; triggering never blocks
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownListener) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, ShutdownListener { rx })
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is triggered; never resolves if every
    /// `Shutdown` handle was dropped without triggering.
    pub async fn triggered(&mut self) {
        let closed = self.rx.wait_for(|quit| *quit).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

pub struct EventHandler;

impl EventHandler {
    /// Start the terminal input reader and the summary ticker
    pub fn spawn_sources(
        senders: &SignalSenders,
        summary_interval: Duration,
    ) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(Self::terminal_events(senders.input.clone())),
            tokio::spawn(Self::tick_events(senders.tick.clone(), summary_interval)),
        ]
    }

    async fn terminal_events(tx: mpsc::Sender<InputEvent>) {
        use crossterm::event::{Event as CrosstermEvent, EventStream};
        use futures::StreamExt;

        let mut reader = EventStream::new();
        while let Some(event_result) = reader.next().await {
            let input = match event_result {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    InputEvent::Key(key)
                }
                Ok(CrosstermEvent::Resize(w, h)) => InputEvent::Resize(w, h),
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("terminal input failed: {e}");
                    break;
                }
            };
            if tx.send(input).await.is_err() {
                break;
            }
        }
    }

    async fn tick_events(tx: mpsc::Sender<()>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tx.send(()).await.is_err() {
                break;
            }
        }
    }
}

/// What a recognised key asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleInspect,
    Navigate(Navigation),
}

impl Command {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        let matches_any = |bindings: [KeyBinding; 2]| bindings.iter().any(|b| b.matches(key));

        if KeyBindings::quit().matches(key)
            || matches_any([KeyBindings::interrupt(), KeyBindings::eof()])
        {
            Some(Self::Quit)
        } else if KeyBindings::inspect().matches(key) {
            Some(Self::ToggleInspect)
        } else if matches_any([KeyBindings::left(), KeyBindings::vim_left()]) {
            Some(Self::Navigate(Navigation::Left))
        } else if matches_any([KeyBindings::right(), KeyBindings::vim_right()]) {
            Some(Self::Navigate(Navigation::Right))
        } else if matches_any([KeyBindings::up(), KeyBindings::vim_up()]) {
            Some(Self::Navigate(Navigation::Up))
        } else if matches_any([KeyBindings::down(), KeyBindings::vim_down()]) {
            Some(Self::Navigate(Navigation::Down))
        } else {
            None
        }
    }
}

/// Key binding helper
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.key && event.modifiers == self.modifiers
    }
}

/// Standard key bindings
pub struct KeyBindings;

impl KeyBindings {
    pub fn quit() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('q'))
    }

    pub fn interrupt() -> KeyBinding {
        KeyBinding::ctrl(KeyCode::Char('c'))
    }

    pub fn eof() -> KeyBinding {
        KeyBinding::ctrl(KeyCode::Char('d'))
    }

    pub fn inspect() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('i'))
    }

    pub fn left() -> KeyBinding {
        KeyBinding::new(KeyCode::Left)
    }

    pub fn right() -> KeyBinding {
        KeyBinding::new(KeyCode::Right)
    }

    pub fn up() -> KeyBinding {
        KeyBinding::new(KeyCode::Up)
    }

    pub fn down() -> KeyBinding {
        KeyBinding::new(KeyCode::Down)
    }

    pub fn vim_left() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('h'))
    }

    pub fn vim_right() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('l'))
    }

    pub fn vim_up() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('k'))
    }

    pub fn vim_down() -> KeyBinding {
        KeyBinding::new(KeyCode::Char('j'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_recognised_keys() {
        assert_eq!(Command::from_key(&key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            Command::from_key(&key(KeyCode::Char('i'))),
            Some(Command::ToggleInspect)
        );
        assert_eq!(
            Command::from_key(&key(KeyCode::Left)),
            Some(Command::Navigate(Navigation::Left))
        );
        assert_eq!(
            Command::from_key(&key(KeyCode::Char('l'))),
            Some(Command::Navigate(Navigation::Right))
        );
        assert_eq!(
            Command::from_key(&key(KeyCode::Char('k'))),
            Some(Command::Navigate(Navigation::Up))
        );
        assert_eq!(
            Command::from_key(&key(KeyCode::Down)),
            Some(Command::Navigate(Navigation::Down))
        );
    }

    #[test]
    fn ignores_unbound_keys() {
        assert_eq!(Command::from_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(Command::from_key(&key(KeyCode::Enter)), None);
        // Plain `c` is not an interrupt
        assert_eq!(Command::from_key(&key(KeyCode::Char('c'))), None);
    }

    #[tokio::test]
    async fn shutdown_is_single_slot_and_non_blocking() {
        let (shutdown, mut listener) = Shutdown::new();
        assert!(!listener.is_triggered());

        shutdown.trigger();
        shutdown.trigger();
        assert!(listener.is_triggered());
        listener.triggered().await;
    }

    #[tokio::test]
    async fn queues_are_fifo() {
        let (senders, mut receivers) = signal_channels(4);
        senders.input.send(InputEvent::Resize(1, 1)).await.unwrap();
        senders.input.send(InputEvent::Resize(2, 2)).await.unwrap();

        assert_eq!(receivers.input.recv().await, Some(InputEvent::Resize(1, 1)));
        assert_eq!(receivers.input.recv().await, Some(InputEvent::Resize(2, 2)));
    }
}
