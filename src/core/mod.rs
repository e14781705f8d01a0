//! Core - the reconciliation loop and the state it owns

pub mod app;
pub mod cursor;
pub mod events;
pub mod state;
