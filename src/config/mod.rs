//! Configuration management
//!
//! Node settings for the submission service: listen address, connection
//! read timeout and the simultaneous connection cap.

pub mod settings;

pub use settings::{Config, Settings, GLOBAL_CONFIG};
