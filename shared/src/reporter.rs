//! Check age reporting.
//!
//! The [`LatencyReporter`] turns one check result event into at most one
//! statsite gauge: the number of seconds between the check's execution and
//! the time the handler runs, labelled with the metric name, the default
//! environment dimensions, the check name and the client name.
//!
//! Nothing here returns an error to the caller. Every outcome, including
//! rejected events and failed sends, is logged and described by a
//! [`Report`].

use std::io;

use chrono::Utc;

use crate::config::SloSettings;
use crate::environment::EnvironmentDimensions;
use crate::models::{
    DimensionSet, Event, EventValidationError, StatsiteLine, ValidatedEvent, CHECK_NAME_KEY,
    CLIENT_NAME_KEY, METRIC_NAME_KEY,
};
use crate::sink::MetricSink;

/// Outcome of handling a single event.
#[derive(Debug)]
pub enum Report {
    /// The event was missing required data; nothing was sent.
    Rejected(EventValidationError),
    /// The line was sent.
    Sent {
        /// Bytes reported by the send call.
        bytes: usize,
        /// The line that was sent.
        line: String,
    },
    /// The send call reported zero bytes written.
    ZeroBytes {
        /// The line that was attempted.
        line: String,
    },
    /// The send call failed.
    SendFailed {
        /// The line that was attempted.
        line: String,
        /// The underlying I/O error.
        error: io::Error,
    },
}

impl Report {
    /// Returns the byte count reported by the send call, if one was made
    /// and succeeded.
    #[must_use]
    pub fn bytes_sent(&self) -> Option<usize> {
        match self {
            Self::Sent { bytes, .. } => Some(*bytes),
            Self::ZeroBytes { .. } => Some(0),
            Self::Rejected(_) | Self::SendFailed { .. } => None,
        }
    }

    /// Returns the rendered line, if the event got far enough to have one.
    #[must_use]
    pub fn line(&self) -> Option<&str> {
        match self {
            Self::Sent { line, .. } | Self::ZeroBytes { line } | Self::SendFailed { line, .. } => {
                Some(line.as_str())
            }
            Self::Rejected(_) => None,
        }
    }
}

/// Reports check age to statsite.
///
/// # Example
///
/// ```no_run
/// use shared::config::SloSettings;
/// use shared::environment::EnvironmentDimensions;
/// use shared::models::Event;
/// use shared::reporter::LatencyReporter;
/// use shared::sink::UdpSink;
///
/// let settings = SloSettings::default();
/// let reporter = LatencyReporter::new(
///     settings.clone(),
///     EnvironmentDimensions::default(),
///     UdpSink::from_settings(&settings),
/// );
///
/// let report = reporter.handle(&Event::check_result("disk", 1_700_000_000, "host1"));
/// println!("{:?} bytes sent to statsite", report.bytes_sent());
/// ```
#[derive(Debug)]
pub struct LatencyReporter<S> {
    settings: SloSettings,
    environment: EnvironmentDimensions,
    sink: S,
}

impl<S: MetricSink> LatencyReporter<S> {
    /// Creates a new reporter.
    ///
    /// # Arguments
    ///
    /// * `settings` - Resolved handler settings
    /// * `environment` - Reader for the default dimension files
    /// * `sink` - Where rendered lines are sent
    #[must_use]
    pub fn new(settings: SloSettings, environment: EnvironmentDimensions, sink: S) -> Self {
        Self {
            settings,
            environment,
            sink,
        }
    }

    /// Returns the settings in use.
    #[must_use]
    pub fn settings(&self) -> &SloSettings {
        &self.settings
    }

    /// Returns the sink lines are sent to.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handles an event using the current time.
    pub fn handle(&self, event: &Event) -> Report {
        self.handle_at(event, Utc::now().timestamp())
    }

    /// Handles an event as if the current Unix time were `now`.
    pub fn handle_at(&self, event: &Event, now: i64) -> Report {
        let validated = match event.validate_event() {
            Ok(validated) => validated,
            Err(error) => {
                tracing::error!("{error}");
                return Report::Rejected(error);
            }
        };

        let line = self.build_line(&validated, now).to_string();
        let destination = self.sink.destination();

        match self.sink.send(&line) {
            Ok(0) => {
                tracing::error!(
                    %destination,
                    msg = %line,
                    "Zero bytes sent to statsite"
                );
                Report::ZeroBytes { line }
            }
            Ok(bytes) => {
                tracing::debug!(
                    %destination,
                    bytes,
                    check = %validated.check_name,
                    client = %validated.client_name,
                    "Check age sent to statsite"
                );
                Report::Sent { bytes, line }
            }
            Err(error) => {
                tracing::error!(
                    %destination,
                    error = %error,
                    msg = %line,
                    "Failed to send check age to statsite"
                );
                Report::SendFailed { line, error }
            }
        }
    }

    /// Builds the gauge line for a validated event.
    ///
    /// Dimensions are ordered: metric name, readable environment
    /// dimensions, check name, client name.
    #[must_use]
    pub fn build_line(&self, event: &ValidatedEvent, now: i64) -> StatsiteLine {
        let mut dimensions =
            DimensionSet::new().with(METRIC_NAME_KEY, self.settings.metric_name.as_str());
        dimensions.extend(self.environment.collect());
        let dimensions = dimensions
            .with(CHECK_NAME_KEY, event.check_name.as_str())
            .with(CLIENT_NAME_KEY, event.client_name.as_str());

        StatsiteLine::gauge(dimensions, event.age_at(now))
    }
}
