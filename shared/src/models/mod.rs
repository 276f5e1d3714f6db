//! Data models for the sensu-slo handler.
//!
//! This module contains the check result event, metric dimensions and the
//! statsite line they are rendered into.

pub mod dimension;
pub mod event;
pub mod statsite;

pub use dimension::{Dimension, DimensionSet, CHECK_NAME_KEY, CLIENT_NAME_KEY, METRIC_NAME_KEY};
pub use event::{Check, Client, Event, EventParseError, EventValidationError, ValidatedEvent};
pub use statsite::{StatsiteLine, GAUGE_SUFFIX};
