//! Environment-variable configuration, read once at cold start.

use std::time::Duration;

use provisioning::{PollSchedule, ProjectName};
use thiserror::Error;

const PROJECT_NAME: &str = "PROJECT_NAME";
const POLL_INTERVAL_SECONDS: &str = "POLL_INTERVAL_SECONDS";
const MAX_WAIT_SECONDS: &str = "MAX_WAIT_SECONDS";
const SAFETY_MARGIN_SECONDS: &str = "SAFETY_MARGIN_SECONDS";
const CALLBACK_TIMEOUT_SECONDS: &str = "CALLBACK_TIMEOUT_SECONDS";

const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// A configuration value that prevents the handler from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration variable is set but is not a non-negative integer.
    #[error("{variable} must be a whole number of seconds, got '{value}'")]
    InvalidSeconds {
        /// Name of the offending environment variable.
        variable: &'static str,
        /// The raw value as read from the environment.
        value: String,
    },

    /// `POLL_INTERVAL_SECONDS` is `0`, which would poll without pause.
    #[error("POLL_INTERVAL_SECONDS must be greater than zero")]
    ZeroInterval,
}

/// Handler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Build project to start on create events. `None` when unset or empty;
    /// create events then report an error through the callback.
    pub project: Option<ProjectName>,
    /// Poll interval, wait budget and safety margin.
    pub schedule: PollSchedule,
    /// Upper bound on a single callback PUT.
    pub callback_timeout: Duration,
}

impl HandlerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seconds = |variable: &'static str, default: Duration| match lookup(variable) {
            None => Ok(default),
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) => Ok(Duration::from_secs(secs)),
                Err(_) => Err(ConfigError::InvalidSeconds { variable, value }),
            },
        };

        let schedule = PollSchedule::new(
            seconds(POLL_INTERVAL_SECONDS, PollSchedule::DEFAULT_INTERVAL)?,
            seconds(MAX_WAIT_SECONDS, PollSchedule::DEFAULT_MAX_WAIT)?,
            seconds(SAFETY_MARGIN_SECONDS, PollSchedule::DEFAULT_SAFETY_MARGIN)?,
        )
        .ok_or(ConfigError::ZeroInterval)?;

        Ok(Self {
            project: lookup(PROJECT_NAME).and_then(ProjectName::new),
            schedule,
            callback_timeout: seconds(CALLBACK_TIMEOUT_SECONDS, DEFAULT_CALLBACK_TIMEOUT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<HandlerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HandlerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_project_is_set() {
        let config = config(&[("PROJECT_NAME", "mirror-images")]).unwrap();

        assert_eq!(config.project.unwrap().as_str(), "mirror-images");
        assert_eq!(config.schedule, PollSchedule::default());
        assert_eq!(config.callback_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_or_empty_project_is_not_a_startup_error() {
        assert!(config(&[]).unwrap().project.is_none());
        assert!(config(&[("PROJECT_NAME", "")]).unwrap().project.is_none());
    }

    #[test]
    fn overrides_are_parsed_as_seconds() {
        let config = config(&[
            ("POLL_INTERVAL_SECONDS", "10"),
            ("MAX_WAIT_SECONDS", " 600 "),
            ("SAFETY_MARGIN_SECONDS", "45"),
            ("CALLBACK_TIMEOUT_SECONDS", "5"),
        ])
        .unwrap();

        assert_eq!(config.schedule.interval(), Duration::from_secs(10));
        assert_eq!(config.schedule.max_wait(), Duration::from_secs(600));
        assert_eq!(config.schedule.safety_margin(), Duration::from_secs(45));
        assert_eq!(config.callback_timeout, Duration::from_secs(5));
    }

    #[test]
    fn unparseable_value_is_rejected() {
        assert_eq!(
            config(&[("MAX_WAIT_SECONDS", "15m")]),
            Err(ConfigError::InvalidSeconds {
                variable: "MAX_WAIT_SECONDS",
                value: "15m".to_string(),
            })
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(
            config(&[("POLL_INTERVAL_SECONDS", "0")]),
            Err(ConfigError::ZeroInterval)
        );
    }

    #[test]
    fn errors_name_the_offending_variable() {
        let invalid = config(&[("CALLBACK_TIMEOUT_SECONDS", "-1")]).unwrap_err();
        assert_eq!(
            invalid.to_string(),
            "CALLBACK_TIMEOUT_SECONDS must be a whole number of seconds, got '-1'"
        );
        assert_eq!(
            ConfigError::ZeroInterval.to_string(),
            "POLL_INTERVAL_SECONDS must be greater than zero"
        );
    }
}
