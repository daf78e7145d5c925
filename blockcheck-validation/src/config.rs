#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Harness configuration.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};

/// Runtime settings for [`TestHarness`](crate::harness::TestHarness) and the
/// orchestrator.
///
/// # Examples
/// ```rust
/// use blockcheck_validation::config::HarnessConfig;
///
/// let config = HarnessConfig::new()
///     .with_max_wait_cycles(500)
///     .with_fail_fast(true)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.max_wait_cycles, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Liveness bound: edges to wait for any readiness signal before the
    /// operation times out.
    /// Default: `10_000`
    pub max_wait_cycles: u64,

    /// Edges `RST_N` is held low during a reset pulse.
    /// Default: `2`
    pub reset_cycles: u32,

    /// Reset the device after every session. When false the device is only
    /// reset after a session that failed.
    /// Default: `true`
    pub reset_between_sessions: bool,

    /// Compare device output against the published values in KAT corpora
    /// as well as against the reference model.
    /// Default: `true`
    pub check_published: bool,

    /// Stop a corpus run at the first failing case.
    /// Default: `false`
    pub fail_fast: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_wait_cycles: 10_000,
            reset_cycles: 2,
            reset_between_sessions: true,
            check_published: true,
            fail_fast: false,
        }
    }
}

impl HarnessConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Short timeouts and fail-fast, for iterating on a device model.
    #[must_use]
    pub fn for_development() -> Self {
        Self::default().with_max_wait_cycles(1_000).with_fail_fast(true)
    }

    /// Full corpus runs with generous timeouts for slow simulators.
    #[must_use]
    pub fn for_ci() -> Self {
        Self::default().with_max_wait_cycles(100_000).with_reset_cycles(4).with_fail_fast(false)
    }

    #[must_use]
    pub fn with_max_wait_cycles(mut self, cycles: u64) -> Self {
        self.max_wait_cycles = cycles;
        self
    }

    #[must_use]
    pub fn with_reset_cycles(mut self, cycles: u32) -> Self {
        self.reset_cycles = cycles;
        self
    }

    #[must_use]
    pub fn with_reset_between_sessions(mut self, enabled: bool) -> Self {
        self.reset_between_sessions = enabled;
        self
    }

    #[must_use]
    pub fn with_check_published(mut self, enabled: bool) -> Self {
        self.check_published = enabled;
        self
    }

    #[must_use]
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_wait_cycles` is zero
    /// - `reset_cycles` is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_wait_cycles == 0 {
            return Err(HarnessError::Config("max_wait_cycles must be at least 1".to_string()));
        }
        if self.reset_cycles == 0 {
            return Err(HarnessError::Config("reset_cycles must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or an invalid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.build()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = HarnessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_wait_cycles, 10_000);
        assert_eq!(config.reset_cycles, 2);
        assert!(config.check_published);
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_presets() {
        assert!(HarnessConfig::for_development().fail_fast);
        assert!(HarnessConfig::for_ci().max_wait_cycles > HarnessConfig::default().max_wait_cycles);
        assert!(HarnessConfig::for_development().validate().is_ok());
        assert!(HarnessConfig::for_ci().validate().is_ok());
    }

    #[test]
    fn test_zero_bounds_rejected() {
        assert!(matches!(
            HarnessConfig::new().with_max_wait_cycles(0).build(),
            Err(HarnessError::Config(_))
        ));
        assert!(HarnessConfig::new().with_reset_cycles(0).build().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            HarnessConfig::from_json(r#"{ "max_wait_cycles": 42, "fail_fast": true }"#).unwrap();
        assert_eq!(config.max_wait_cycles, 42);
        assert!(config.fail_fast);
        assert_eq!(config.reset_cycles, 2);

        assert!(matches!(HarnessConfig::from_json("{"), Err(HarnessError::Serialization(_))));
        assert!(matches!(
            HarnessConfig::from_json(r#"{ "reset_cycles": 0 }"#),
            Err(HarnessError::Config(_))
        ));
    }
}
