use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

const DEFAULT_APP_OPEN_TIMEOUT_MS: u64 = 2000;
const DEFAULT_SLOW_RETURN_THRESHOLD_MS: u64 = 2500;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;

/// Static resolver configuration: custom URL scheme, store targets, and the
/// empirically chosen timing thresholds of the open-attempt heuristic.
///
/// Constructed once at startup (in code or from a YAML file) and never
/// mutated; the resolver takes it by value and owns it for its lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Custom URL scheme the native app registered, e.g. `myapp://home`.
    pub app_scheme: String,
    /// Android package identifier, e.g. `com.example.app`.
    #[serde(default)]
    pub android_package: String,
    /// Play Store listing URL. Derived from `android_package` when omitted.
    #[serde(default)]
    pub play_store_url: String,
    /// iOS App Store listing URL.
    pub app_store_url: String,
    /// How long the host waits before firing the timeout trigger.
    #[serde(default = "default_app_open_timeout_ms")]
    pub app_open_timeout_ms: u64,
    /// Elapsed time at or beyond which a late timeout callback is read as
    /// "the app opened and the user came back" rather than "not installed".
    #[serde(default = "default_slow_return_threshold_ms")]
    pub slow_return_threshold_ms: u64,
    /// Presentational pause the host applies before the store redirect.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    /// Gates presentational logging only; never affects the decision logic.
    #[serde(default)]
    pub debug_mode: bool,
}

fn default_app_open_timeout_ms() -> u64 {
    DEFAULT_APP_OPEN_TIMEOUT_MS
}

fn default_slow_return_threshold_ms() -> u64 {
    DEFAULT_SLOW_RETURN_THRESHOLD_MS
}

fn default_redirect_delay_ms() -> u64 {
    DEFAULT_REDIRECT_DELAY_MS
}

impl ResolverConfig {
    /// Build a configuration with default timings.
    pub fn new(
        app_scheme: impl Into<String>,
        android_package: impl Into<String>,
        play_store_url: impl Into<String>,
        app_store_url: impl Into<String>,
    ) -> Result<Self> {
        Self {
            app_scheme: app_scheme.into(),
            android_package: android_package.into(),
            play_store_url: play_store_url.into(),
            app_store_url: app_store_url.into(),
            app_open_timeout_ms: DEFAULT_APP_OPEN_TIMEOUT_MS,
            slow_return_threshold_ms: DEFAULT_SLOW_RETURN_THRESHOLD_MS,
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            debug_mode: false,
        }
        .finish()
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.finish()
    }

    /// Fill derivable fields and validate. The Play Store URL can be derived
    /// from the package identifier the same way the store itself links to
    /// listings.
    fn finish(mut self) -> Result<Self> {
        if self.play_store_url.is_empty() && !self.android_package.is_empty() {
            self.play_store_url = format!(
                "https://play.google.com/store/apps/details?id={}",
                self.android_package
            );
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.app_scheme.is_empty() {
            return Err(Error::InvalidConfig("app_scheme must not be empty".into()));
        }
        if !self.app_scheme.contains("://") {
            return Err(Error::InvalidConfig(format!(
                "app_scheme must be a full scheme URL, got {:?}",
                self.app_scheme
            )));
        }
        if self.play_store_url.is_empty() {
            return Err(Error::InvalidConfig(
                "play_store_url or android_package must be set".into(),
            ));
        }
        if self.app_store_url.is_empty() {
            return Err(Error::InvalidConfig(
                "app_store_url must not be empty".into(),
            ));
        }
        if self.app_open_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "app_open_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.slow_return_threshold_ms < self.app_open_timeout_ms {
            return Err(Error::InvalidConfig(format!(
                "slow_return_threshold_ms ({}) must not be below app_open_timeout_ms ({})",
                self.slow_return_threshold_ms, self.app_open_timeout_ms
            )));
        }
        Ok(())
    }

    pub fn app_open_timeout(&self) -> Duration {
        Duration::from_millis(self.app_open_timeout_ms)
    }

    pub fn slow_return_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_return_threshold_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}
