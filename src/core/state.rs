//! View state owned by the reconciler: registry, cursor and latest stats

use indexmap::IndexMap;

use crate::core::cursor::ViewCursor;
use crate::integrations::docker::{ContainerInfo, ContainerStats};

/// Identity-keyed set of running containers
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    containers: IndexMap<String, ContainerInfo>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by id, returning the descriptor it replaced
    pub fn upsert(&mut self, container: ContainerInfo) -> Option<ContainerInfo> {
        self.containers.insert(container.id.clone(), container)
    }

    pub fn remove(&mut self, id: &str) -> Option<ContainerInfo> {
        self.containers.shift_remove(id)
    }

    /// Row at a display position
    pub fn get_index(&self, index: usize) -> Option<&ContainerInfo> {
        self.containers.get_index(index).map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerInfo> {
        self.containers.values()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// Latest usage sample set: parallel series, one element per container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub labels: Vec<String>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub memory_bytes: Vec<u64>,
    pub memory_limits: Vec<u64>,
}

impl StatsSnapshot {
    pub fn push(&mut self, label: &str, stats: &ContainerStats) {
        self.labels.push(label.to_string());
        self.cpu.push(stats.cpu_percent);
        self.memory.push(stats.memory_percent);
        self.memory_bytes.push(stats.memory_usage_bytes);
        self.memory_limits.push(stats.memory_limit_bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total_cpu(&self) -> f64 {
        self.cpu.iter().sum()
    }

    pub fn total_memory(&self) -> f64 {
        self.memory.iter().sum()
    }
}

/// Aggregate line recomputed on every tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub containers: usize,
    pub total_cpu: f64,
    pub total_memory: f64,
}

impl Summary {
    pub fn compute(registry: &ContainerRegistry, stats: Option<&StatsSnapshot>) -> Self {
        Self {
            containers: registry.len(),
            total_cpu: stats.map(StatsSnapshot::total_cpu).unwrap_or(0.0),
            total_memory: stats.map(StatsSnapshot::total_memory).unwrap_or(0.0),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            " Cons:{}  Total CPU:{:.0}%  Total Mem:{:.0}%",
            self.containers, self.total_cpu, self.total_memory
        )
    }
}

/// Descriptor field shown in the detail column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoField {
    #[default]
    Image,
    Status,
    Ports,
    Mounts,
    Command,
    Created,
    Labels,
}

impl InfoField {
    pub const ALL: [InfoField; 7] = [
        Self::Image,
        Self::Status,
        Self::Ports,
        Self::Mounts,
        Self::Command,
        Self::Created,
        Self::Labels,
    ];

    pub const MAX_INDEX: usize = Self::ALL.len() - 1;

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Out-of-range indices saturate at the last field
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::MAX_INDEX)]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Status => "Status",
            Self::Ports => "Ports",
            Self::Mounts => "Mounts",
            Self::Command => "Command",
            Self::Created => "Created",
            Self::Labels => "Labels",
        }
    }

    pub fn value(self, container: &ContainerInfo) -> String {
        match self {
            Self::Image => container.image.clone(),
            Self::Status => format!("{} ({})", container.status, container.state),
            Self::Ports => join_or_dash(container.ports.iter().map(ToString::to_string)),
            Self::Mounts => join_or_dash(container.mounts.iter().cloned()),
            Self::Command => container.command.clone(),
            Self::Created => container.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Labels => join_or_dash(
                container
                    .labels
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v)),
            ),
        }
    }
}

fn join_or_dash(items: impl Iterator<Item = String>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// Everything the reconciler owns between signals
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub registry: ContainerRegistry,
    pub cursor: ViewCursor,
    pub stats: Option<StatsSnapshot>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            registry: ContainerRegistry::new(),
            cursor: ViewCursor::default(),
            stats: None,
        }
    }

    /// Replace the snapshot wholesale
    pub fn replace_stats(&mut self, snapshot: StatsSnapshot) {
        self.stats = Some(snapshot);
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(&self.registry, self.stats.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::docker::ContainerStatus;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn container(id: &str, image: &str) -> ContainerInfo {
        ContainerInfo {
            id: id.to_string(),
            name: format!("{}-name", id),
            image: image.to_string(),
            status: ContainerStatus::Running,
            state: "Up 5 seconds".to_string(),
            ports: vec![],
            command: "run".to_string(),
            mounts: vec![],
            labels: BTreeMap::new(),
            created: chrono::Utc::now(),
        }
    }

    #[test]
    fn upsert_replaces_existing_identity() {
        let mut registry = ContainerRegistry::new();
        assert!(registry.upsert(container("a", "redis:7")).is_none());
        let replaced = registry.upsert(container("a", "redis:8"));

        assert_eq!(replaced.map(|c| c.image), Some("redis:7".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_index(0).map(|c| c.image.as_str()), Some("redis:8"));
    }

    #[test]
    fn size_tracks_distinct_adds_minus_removes() {
        let mut registry = ContainerRegistry::new();
        for id in ["a", "b", "c", "b"] {
            registry.upsert(container(id, "img"));
        }
        assert!(registry.remove("c").is_some());
        assert!(registry.remove("missing").is_none());

        assert_eq!(registry.len(), 2);

        registry.remove("a");
        registry.remove("b");
        assert!(registry.is_empty());
    }

    #[test]
    fn removal_keeps_remaining_rows_in_order() {
        let mut registry = ContainerRegistry::new();
        for id in ["a", "b", "c"] {
            registry.upsert(container(id, "img"));
        }
        registry.remove("a");

        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(registry.get_index(0).map(|c| c.id.as_str()), Some("b"));
        assert!(registry.get_index(2).is_none());
    }

    #[test]
    fn summary_without_stats_reports_zero_totals() {
        let mut registry = ContainerRegistry::new();
        registry.upsert(container("a", "img"));

        let summary = Summary::compute(&registry, None);
        assert_eq!(
            summary,
            Summary {
                containers: 1,
                total_cpu: 0.0,
                total_memory: 0.0
            }
        );
    }

    #[test]
    fn summary_sums_series() {
        let registry = ContainerRegistry::new();
        let stats = StatsSnapshot {
            labels: vec!["a".into(), "b".into(), "c".into()],
            cpu: vec![10.0, 20.0, 5.0],
            memory: vec![1.0, 2.0, 3.0],
            memory_bytes: vec![0, 0, 0],
            memory_limits: vec![0, 0, 0],
        };

        let summary = Summary::compute(&registry, Some(&stats));
        assert_eq!(summary.total_cpu, 35.0);
        assert_eq!(summary.total_memory, 6.0);
        assert_eq!(summary.to_string(), " Cons:0  Total CPU:35%  Total Mem:6%");
    }

    #[test]
    fn info_field_indices_saturate() {
        assert_eq!(InfoField::from_index(0), InfoField::Image);
        assert_eq!(InfoField::from_index(InfoField::MAX_INDEX), InfoField::Labels);
        assert_eq!(InfoField::from_index(99), InfoField::Labels);
        for field in InfoField::ALL {
            assert_eq!(InfoField::from_index(field.index()), field);
        }
    }

    #[test]
    fn info_field_values_fall_back_to_dash() {
        let c = container("a", "postgres:16");
        assert_eq!(InfoField::Image.value(&c), "postgres:16");
        assert_eq!(InfoField::Ports.value(&c), "-");
        assert_eq!(InfoField::Labels.value(&c), "-");
        assert_eq!(InfoField::Status.value(&c), "running (Up 5 seconds)");
    }
}
