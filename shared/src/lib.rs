//! sensu-slo Shared Library
//!
//! This crate contains the pieces of the `sensu-slo` Sensu handler, which
//! reports how long ago a check executed as a statsite gauge.
//!
//! # Modules
//!
//! - [`models`] - Check result events, dimensions and the statsite line
//! - [`config`] - Handler settings and the Sensu settings loader
//! - [`environment`] - Default dimensions read from the host
//! - [`sink`] - Metric sinks, including the UDP sink
//! - [`reporter`] - The check age reporter
//!
//! # Example
//!
//! ```
//! use shared::models::{DimensionSet, Event, StatsiteLine};
//!
//! let event = Event::check_result("disk", 1000, "host1")
//!     .validate_event()
//!     .unwrap();
//!
//! let dims = DimensionSet::new()
//!     .with("metric_name", "sensu.check_age")
//!     .with("check_name", event.check_name.as_str())
//!     .with("client_name", event.client_name.as_str());
//!
//! let line = StatsiteLine::gauge(dims, event.age_at(1050));
//! assert!(line.to_string().ends_with(":50|g"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod environment;
pub mod models;
pub mod reporter;
pub mod sink;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
