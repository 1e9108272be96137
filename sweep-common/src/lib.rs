//! Common utilities shared across tweet-sweep crates.
//!
//! Today this is the [`observability`] module: one place that decides where logs
//! go, in which encoding, and at which default level. Keep it light so every
//! crate can depend on it without dragging in heavy transitive costs.
//!
//! ```rust
//! use sweep_common::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig::default();
//! assert_eq!(cfg.app_name, "tweet-sweep");
//! assert_eq!(cfg.format, LogFormat::Text);
//! ```
pub mod observability;

pub use observability::{init_logging, LogConfig, LogFormat};
