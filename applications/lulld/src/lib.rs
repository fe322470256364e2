//! Lull Daemon Library
//!
//! Configuration, null audio backend, and error types of the headless host.
//!
//! This library exposes the daemon's building blocks for testing purposes.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{GrantingFocus, LoggingDeviceVolume, LoggingEngine};
pub use config::DaemonConfig;
pub use error::{DaemonError, Result};
