//! Docker integration - container discovery, lifecycle events and usage sampling

mod source;

pub use source::{ContainerSource, LifecycleEvent};

use anyhow::Result;
use async_trait::async_trait;
use bollard::container::{ListContainersOptions, Stats, StatsOptions};
use bollard::models::{ContainerSummary, EventMessage};
use bollard::system::EventsOptions;
use bollard::Docker;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::collections::{BTreeMap, HashMap};

use crate::error::DashError;

const CONNECT_TIMEOUT_SECS: u64 = 120;

/// Descriptor of one running container as the dashboard shows it
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: ContainerStatus,
    /// Human readable status reported by the daemon ("Up 3 minutes")
    pub state: String,
    pub ports: Vec<PortMapping>,
    pub command: String,
    pub mounts: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub created: chrono::DateTime<chrono::Utc>,
}

impl ContainerInfo {
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(12)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    fn from_summary(container: ContainerSummary) -> Self {
        let id = container.id.unwrap_or_default();
        let name = container
            .names
            .and_then(|n| n.first().cloned())
            .unwrap_or_default()
            .trim_start_matches('/')
            .to_string();

        let ports = container
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PortMapping {
                private_port: p.private_port,
                public_port: p.public_port,
                protocol: p
                    .typ
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "tcp".to_string()),
            })
            .collect();

        let mounts = container
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(|m| {
                format!(
                    "{}:{}",
                    m.source.unwrap_or_default(),
                    m.destination.unwrap_or_default()
                )
            })
            .collect();

        let created = chrono::DateTime::from_timestamp(container.created.unwrap_or(0), 0)
            .unwrap_or_else(chrono::Utc::now);

        Self {
            id,
            name,
            image: container.image.unwrap_or_default(),
            status: ContainerStatus::from(container.state.unwrap_or_default().as_str()),
            state: container.status.unwrap_or_default(),
            ports,
            command: container.command.unwrap_or_default(),
            mounts,
            labels: container.labels.unwrap_or_default().into_iter().collect(),
            created,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Paused,
    Exited,
    Created,
    Restarting,
    Dead,
    Unknown,
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Exited => write!(f, "exited"),
            Self::Created => write!(f, "created"),
            Self::Restarting => write!(f, "restarting"),
            Self::Dead => write!(f, "dead"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for ContainerStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "running" => Self::Running,
            "paused" => Self::Paused,
            "exited" => Self::Exited,
            "created" => Self::Created,
            "restarting" => Self::Restarting,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub private_port: u16,
    pub public_port: Option<u16>,
    pub protocol: String,
}

impl std::fmt::Display for PortMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.public_port {
            Some(public) => write!(f, "{}->{}/{}", public, self.private_port, self.protocol),
            None => write!(f, "{}/{}", self.private_port, self.protocol),
        }
    }
}

/// One usage sample for a single container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerStats {
    pub cpu_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub memory_percent: f64,
}

/// What the container source needs from a runtime
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Every currently running container
    async fn running_containers(&self) -> Result<Vec<ContainerInfo>>;

    /// A single running container, `None` once it is gone
    async fn container(&self, id: &str) -> Result<Option<ContainerInfo>>;

    /// One usage sample for a container
    async fn sample(&self, id: &str) -> Result<ContainerStats>;

    /// Container events as `(action, id)`, replayed from `since` (unix
    /// seconds) and then followed live
    fn events(&self, since: i64) -> BoxStream<'static, Result<(String, String)>>;
}

/// Where to reach the Docker daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    LocalDefaults,
    Socket(String),
    Http(String),
}

impl Endpoint {
    pub fn parse(raw: Option<&str>) -> Result<Self, DashError> {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Ok(Self::LocalDefaults);
        };

        if let Some(path) = raw.strip_prefix("unix://") {
            return Ok(Self::Socket(path.to_string()));
        }
        if let Some(path) = raw.strip_prefix("unix:") {
            return Ok(Self::Socket(path.to_string()));
        }
        if let Some(addr) = raw.strip_prefix("tcp://") {
            return Ok(Self::Http(format!("http://{}", addr)));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Http(raw.to_string()));
        }

        Err(DashError::InvalidEndpoint(raw.to_string()))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalDefaults => write!(f, "local defaults"),
            Self::Socket(path) => write!(f, "unix://{}", path),
            Self::Http(addr) => write!(f, "{}", addr),
        }
    }
}

/// Docker client wrapper
#[derive(Clone)]
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    /// Connect and verify the daemon answers a ping
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, DashError> {
        let connect_err = |source| DashError::Connect {
            endpoint: endpoint.to_string(),
            source,
        };

        let docker = match endpoint {
            Endpoint::LocalDefaults => Docker::connect_with_local_defaults(),
            Endpoint::Socket(path) => {
                Docker::connect_with_socket(path, CONNECT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            Endpoint::Http(addr) => {
                Docker::connect_with_http(addr, CONNECT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
        }
        .map_err(connect_err)?;

        docker.ping().await.map_err(connect_err)?;
        tracing::info!(%endpoint, "connected to docker");

        Ok(Self { docker })
    }

    async fn list(&self, filters: HashMap<String, Vec<String>>) -> Result<Vec<ContainerInfo>> {
        let options = ListContainersOptions::<String> {
            all: false,
            filters,
            ..Default::default()
        };

        let containers = self.docker.list_containers(Some(options)).await?;
        Ok(containers
            .into_iter()
            .map(ContainerInfo::from_summary)
            .collect())
    }

    /// Container lifecycle events as `(action, container id)` pairs
    fn container_events(&self, since: i64) -> impl Stream<Item = Result<(String, String)>> {
        let mut filters = HashMap::new();
        filters.insert("type".to_string(), vec!["container".to_string()]);

        let options = EventsOptions::<String> {
            since: Some(since.to_string()),
            filters,
            ..Default::default()
        };

        self.docker
            .events(Some(options))
            .filter_map(|event| async move {
                match event {
                    Ok(message) => action_and_id(message).map(Ok),
                    Err(e) => Some(Err(e.into())),
                }
            })
    }

    fn parse_stats(stats: &Stats) -> ContainerStats {
        let cpu_delta = stats
            .cpu_stats
            .cpu_usage
            .total_usage
            .saturating_sub(stats.precpu_stats.cpu_usage.total_usage);
        let system_delta = stats
            .cpu_stats
            .system_cpu_usage
            .unwrap_or(0)
            .saturating_sub(stats.precpu_stats.system_cpu_usage.unwrap_or(0));
        let num_cpus = stats.cpu_stats.online_cpus.unwrap_or(
            stats
                .cpu_stats
                .cpu_usage
                .percpu_usage
                .as_ref()
                .map(|v| v.len())
                .unwrap_or(1) as u64,
        );

        let memory_usage = stats.memory_stats.usage.unwrap_or(0);
        let memory_limit = stats.memory_stats.limit.unwrap_or(0);

        ContainerStats {
            cpu_percent: cpu_percent(cpu_delta, system_delta, num_cpus),
            memory_usage_bytes: memory_usage,
            memory_limit_bytes: memory_limit,
            memory_percent: memory_percent(memory_usage, memory_limit),
        }
    }
}

#[async_trait]
impl ContainerRuntime for DockerClient {
    async fn running_containers(&self) -> Result<Vec<ContainerInfo>> {
        self.list(HashMap::new()).await
    }

    async fn container(&self, id: &str) -> Result<Option<ContainerInfo>> {
        let mut filters = HashMap::new();
        filters.insert("id".to_string(), vec![id.to_string()]);
        let found = self.list(filters).await?;
        Ok(found.into_iter().find(|c| c.id == id))
    }

    async fn sample(&self, id: &str) -> Result<ContainerStats> {
        // A non one-shot request waits for a second reading so precpu is populated
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };

        let mut stream = self.docker.stats(id, Some(options));
        match stream.next().await {
            Some(Ok(stats)) => Ok(Self::parse_stats(&stats)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(ContainerStats::default()),
        }
    }

    fn events(&self, since: i64) -> BoxStream<'static, Result<(String, String)>> {
        self.container_events(since).boxed()
    }
}

fn action_and_id(message: EventMessage) -> Option<(String, String)> {
    let action = message.action?;
    let id = message.actor.and_then(|actor| actor.id)?;
    Some((action, id))
}

/// CPU usage in percent of one core, as `docker stats` reports it
pub fn cpu_percent(cpu_delta: u64, system_delta: u64, num_cpus: u64) -> f64 {
    if system_delta == 0 || cpu_delta == 0 {
        return 0.0;
    }
    let percent = (cpu_delta as f64 / system_delta as f64) * num_cpus.max(1) as f64 * 100.0;
    if percent.is_finite() {
        percent
    } else {
        0.0
    }
}

pub fn memory_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    (usage as f64 / limit as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_container_status_from_str() {
        assert_eq!(ContainerStatus::from("running"), ContainerStatus::Running);
        assert_eq!(ContainerStatus::from("RUNNING"), ContainerStatus::Running);
        assert_eq!(ContainerStatus::from("exited"), ContainerStatus::Exited);
        assert_eq!(
            ContainerStatus::from("unknown_state"),
            ContainerStatus::Unknown
        );
    }

    #[test]
    fn parses_endpoints() {
        assert_eq!(Endpoint::parse(None).unwrap(), Endpoint::LocalDefaults);
        assert_eq!(Endpoint::parse(Some("  ")).unwrap(), Endpoint::LocalDefaults);
        assert_eq!(
            Endpoint::parse(Some("unix:/var/run/docker.sock")).unwrap(),
            Endpoint::Socket("/var/run/docker.sock".to_string())
        );
        assert_eq!(
            Endpoint::parse(Some("unix:///var/run/docker.sock")).unwrap(),
            Endpoint::Socket("/var/run/docker.sock".to_string())
        );
        assert_eq!(
            Endpoint::parse(Some("tcp://10.0.0.2:2375")).unwrap(),
            Endpoint::Http("http://10.0.0.2:2375".to_string())
        );
        assert_eq!(
            Endpoint::parse(Some("https://docker.internal:2376")).unwrap(),
            Endpoint::Http("https://docker.internal:2376".to_string())
        );
        assert!(matches!(
            Endpoint::parse(Some("ssh://host")),
            Err(DashError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn cpu_percent_scales_by_cores_and_guards_zero_deltas() {
        assert_eq!(cpu_percent(50, 100, 2), 100.0);
        assert_eq!(cpu_percent(25, 100, 1), 25.0);
        assert_eq!(cpu_percent(0, 100, 4), 0.0);
        assert_eq!(cpu_percent(10, 0, 4), 0.0);
        assert_eq!(cpu_percent(10, 100, 0), 10.0);
    }

    #[test]
    fn memory_percent_handles_missing_limit() {
        assert_eq!(memory_percent(512, 1024), 50.0);
        assert_eq!(memory_percent(512, 0), 0.0);
    }

    #[test]
    fn port_mapping_display() {
        let published = PortMapping {
            private_port: 80,
            public_port: Some(8080),
            protocol: "tcp".to_string(),
        };
        let internal = PortMapping {
            private_port: 5432,
            public_port: None,
            protocol: "tcp".to_string(),
        };
        assert_eq!(published.to_string(), "8080->80/tcp");
        assert_eq!(internal.to_string(), "5432/tcp");
    }

    #[test]
    fn summary_conversion_trims_names_and_collects_fields() {
        let summary = ContainerSummary {
            id: Some("0123456789abcdef".to_string()),
            names: Some(vec!["/web".to_string()]),
            image: Some("nginx:1.27".to_string()),
            command: Some("nginx -g 'daemon off;'".to_string()),
            state: Some("running".to_string()),
            status: Some("Up 2 minutes".to_string()),
            created: Some(1_700_000_000),
            ..Default::default()
        };

        let info = ContainerInfo::from_summary(summary);
        assert_eq!(info.name, "web");
        assert_eq!(info.short_id(), "0123456789ab");
        assert_eq!(info.status, ContainerStatus::Running);
        assert_eq!(info.state, "Up 2 minutes");
        assert_eq!(info.created.timestamp(), 1_700_000_000);
        assert!(info.ports.is_empty());
    }
}
