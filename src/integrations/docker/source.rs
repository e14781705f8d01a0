//! Container source: turns runtime state into lifecycle and stats signals
//!
//! Two producer tasks run independently of the dashboard loop. The lifecycle
//! watcher announces every running container at startup and then follows the
//! daemon's event stream from just before that listing, so a container
//! started in between is still seen. The sampler emits one stats snapshot per
//! interval.
//! Both push into bounded queues and simply stop once the loop has gone away.

use anyhow::Result;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{ContainerInfo, ContainerRuntime};
use crate::core::state::StatsSnapshot;

/// Registry-affecting signal produced by the source
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Appeared(ContainerInfo),
    Removed(String),
}

/// How a daemon event action affects the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Refresh,
    Remove,
}

impl EventKind {
    fn classify(action: &str) -> Option<Self> {
        // Health and exec actions carry a suffix ("health_status: healthy")
        match action.split(':').next().unwrap_or_default().trim() {
            "start" | "unpause" | "pause" | "rename" | "health_status" => Some(Self::Refresh),
            "die" | "destroy" => Some(Self::Remove),
            _ => None,
        }
    }
}

pub struct ContainerSource<R> {
    runtime: Arc<R>,
    stats_interval: Duration,
    reconnect_delay: Duration,
}

impl<R: ContainerRuntime + 'static> ContainerSource<R> {
    pub fn new(runtime: R, stats_interval: Duration, reconnect_delay: Duration) -> Self {
        Self {
            runtime: Arc::new(runtime),
            stats_interval,
            reconnect_delay,
        }
    }

    /// Bring `known` in line with what is running right now.
    ///
    /// Returns `false` once the receiving side has been dropped.
    async fn sync(
        &self,
        known: &mut HashSet<String>,
        tx: &mpsc::Sender<LifecycleEvent>,
    ) -> Result<bool> {
        let running = self.runtime.running_containers().await?;
        let running_ids: HashSet<String> = running.iter().map(|c| c.id.clone()).collect();

        let vanished: Vec<String> = known.difference(&running_ids).cloned().collect();
        for id in vanished {
            known.remove(&id);
            if tx.send(LifecycleEvent::Removed(id)).await.is_err() {
                return Ok(false);
            }
        }

        for container in running {
            known.insert(container.id.clone());
            if tx.send(LifecycleEvent::Appeared(container)).await.is_err() {
                return Ok(false);
            }
        }

        tracing::info!(containers = known.len(), "container set synchronised");
        Ok(true)
    }

    /// Apply one daemon event. Returns `false` once the receiver is gone.
    async fn apply(
        &self,
        action: &str,
        id: &str,
        known: &mut HashSet<String>,
        tx: &mpsc::Sender<LifecycleEvent>,
    ) -> Result<bool> {
        let event = match EventKind::classify(action) {
            Some(EventKind::Refresh) => match self.runtime.container(id).await? {
                Some(container) => {
                    known.insert(container.id.clone());
                    Some(LifecycleEvent::Appeared(container))
                }
                None if known.remove(id) => Some(LifecycleEvent::Removed(id.to_string())),
                None => None,
            },
            Some(EventKind::Remove) if known.remove(id) => {
                Some(LifecycleEvent::Removed(id.to_string()))
            }
            _ => None,
        };

        let Some(event) = event else {
            return Ok(true);
        };
        tracing::debug!(action, id, "container event");
        Ok(tx.send(event).await.is_ok())
    }

    /// Sample every running container once; rows are ordered by name.
    pub async fn collect_stats(&self) -> Result<StatsSnapshot> {
        let mut containers = self.runtime.running_containers().await?;
        containers.sort_by(|a, b| a.name.cmp(&b.name));

        let samples = futures::future::join_all(
            containers
                .iter()
                .map(|container| self.runtime.sample(&container.id)),
        )
        .await;

        let mut snapshot = StatsSnapshot::default();
        for (container, sample) in containers.iter().zip(samples) {
            match sample {
                Ok(stats) => snapshot.push(&container.name, &stats),
                Err(e) => {
                    tracing::warn!(id = %container.short_id(), "failed to sample container: {e:#}")
                }
            }
        }
        Ok(snapshot)
    }

    /// Periodically push stats snapshots until the receiver is dropped.
    pub fn spawn_sampler(self: &Arc<Self>, tx: mpsc::Sender<StatsSnapshot>) -> JoinHandle<()> {
        let source = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(source.stats_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match source.collect_stats().await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("stats sampling failed: {e:#}"),
                }
            }
        })
    }

    /// Follow daemon events until the receiver is dropped, resynchronising
    /// after every interruption of the event stream.
    pub fn spawn_watcher(self: &Arc<Self>, tx: mpsc::Sender<LifecycleEvent>) -> JoinHandle<()> {
        let source = Arc::clone(self);
        tokio::spawn(async move {
            let mut known = HashSet::new();
            loop {
                // Event timestamps have second granularity
                let since = chrono::Utc::now().timestamp() - 1;
                match source.sync(&mut known, &tx).await {
                    Ok(true) => {}
                    Ok(false) => return,
                    Err(e) => tracing::warn!("failed to list containers: {e:#}"),
                }

                let mut events = source.runtime.events(since);
                while let Some(event) = events.next().await {
                    let (action, id) = match event {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("docker event stream failed: {e:#}");
                            break;
                        }
                    };
                    match source.apply(&action, &id, &mut known, &tx).await {
                        Ok(true) => {}
                        Ok(false) => return,
                        Err(e) => {
                            tracing::warn!(action = %action, id = %id, "failed to apply event: {e:#}")
                        }
                    }
                }

                if tx.is_closed() {
                    return;
                }
                tracing::warn!(
                    delay_secs = source.reconnect_delay.as_secs(),
                    "docker event stream ended, reconnecting"
                );
                tokio::time::sleep(source.reconnect_delay).await;
            }
        })
    }
}
