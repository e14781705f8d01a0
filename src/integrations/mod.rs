//! External integrations

pub mod docker;
