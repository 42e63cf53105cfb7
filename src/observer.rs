use std::time::Duration;

use crate::types::{AttemptOutcome, PlatformInfo};

/// Notification sink the resolver calls at each state transition.
///
/// Pure notifications with no return value: debug panels, progress-step UIs,
/// and analytics collaborators all hang off this seam without the resolver
/// knowing anything about rendering or logging. Every method has a no-op
/// default so hosts implement only what they display.
pub trait ResolverObserver {
    fn platform_detected(&mut self, _platform: &PlatformInfo) {}
    fn attempt_started(&mut self, _scheme_url: &str) {}
    fn attempt_resolved(&mut self, _outcome: AttemptOutcome) {}
    /// The store redirect was decided; `delay` is the presentational pause
    /// the host should apply before the navigation lands.
    fn redirect_scheduled(&mut self, _store_url: &str, _delay: Duration) {}
    fn redirect_issued(&mut self, _store_url: &str) {}
    /// Terminal status: the store navigation itself failed and there is no
    /// further fallback.
    fn redirect_failed(&mut self, _store_url: &str, _reason: &str) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ResolverObserver for NullObserver {}

/// Observer that narrates every transition through `tracing`, standing in
/// for the original debug-console collaborator. Hosts typically install it
/// only when `ResolverConfig::debug_mode` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ResolverObserver for LogObserver {
    fn platform_detected(&mut self, platform: &PlatformInfo) {
        tracing::debug!(platform = platform.name(), "platform detected");
    }

    fn attempt_started(&mut self, scheme_url: &str) {
        tracing::debug!(url = scheme_url, "app open attempt started");
    }

    fn attempt_resolved(&mut self, outcome: AttemptOutcome) {
        tracing::debug!(outcome = outcome.as_str(), "attempt resolved");
    }

    fn redirect_scheduled(&mut self, store_url: &str, delay: Duration) {
        tracing::debug!(url = store_url, delay_ms = delay.as_millis() as u64, "store redirect scheduled");
    }

    fn redirect_issued(&mut self, store_url: &str) {
        tracing::debug!(url = store_url, "store redirect issued");
    }

    fn redirect_failed(&mut self, store_url: &str, reason: &str) {
        tracing::warn!(url = store_url, reason, "store redirect failed");
    }
}
