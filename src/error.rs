//! Typed failures the dashboard distinguishes at startup and in the event loop

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    /// A producer dropped its end of a signal queue while the loop was running.
    #[error("{0} signal source closed unexpectedly")]
    SourceClosed(&'static str),

    #[error("unsupported docker endpoint `{0}` (expected unix://, tcp:// or http(s)://)")]
    InvalidEndpoint(String),

    #[error("failed to connect to docker at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: bollard::errors::Error,
    },
}
