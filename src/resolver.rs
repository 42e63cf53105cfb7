use std::time::Instant;

use crate::classifier::PlatformClassifier;
use crate::clock::{Clock, SystemClock};
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::navigator::Navigator;
use crate::observer::{NullObserver, ResolverObserver};
use crate::redirect::redirect_to_store;
use crate::types::{AttemptOutcome, AttemptPhase, PlatformInfo};

/// The app-open attempt state machine.
///
/// `Idle -> Attempting -> Resolved(_)`, entered at most once per page load.
/// The host wires it to its environment through three seams: the [`Navigator`]
/// performs navigations, the [`Clock`] timestamps the attempt, and the
/// [`ResolverObserver`] receives transition notifications.
///
/// There is no reliable API to observe whether a custom-scheme navigation
/// opened a native app, so two competing triggers decide the outcome after
/// [`begin`](Self::begin):
///
/// - [`on_hidden`](Self::on_hidden) — the page was backgrounded, so the OS
///   switched away to the app: `Resolved(Opened)`.
/// - [`on_timeout`](Self::on_timeout) — fired by the host once
///   `config.app_open_timeout()` elapses. A callback that runs roughly on
///   schedule means control never left the page: `Resolved(NotInstalled)`
///   plus the store fallback. A callback that runs far past its schedule
///   means the page was suspended in between: `Resolved(Uncertain)`, no
///   redirect.
///
/// Whichever trigger arrives first resolves the machine; the terminal-phase
/// guard makes the loser a no-op, so at most one resolution path ever
/// executes. The whole thing is a best-effort heuristic and false
/// inferences are expected and accepted.
pub struct AppOpenResolver<N, C = SystemClock, O = NullObserver> {
    config: ResolverConfig,
    navigator: N,
    clock: C,
    observer: O,
    phase: AttemptPhase,
    platform: Option<PlatformInfo>,
    started_at: Option<Instant>,
}

impl<N: Navigator> AppOpenResolver<N> {
    pub fn new(config: ResolverConfig, navigator: N) -> Self {
        Self {
            config,
            navigator,
            clock: SystemClock,
            observer: NullObserver,
            phase: AttemptPhase::Idle,
            platform: None,
            started_at: None,
        }
    }
}

impl<N: Navigator, C: Clock, O: ResolverObserver> AppOpenResolver<N, C, O> {
    /// Replace the timestamp source, consuming the resolver.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> AppOpenResolver<N, C2, O> {
        AppOpenResolver {
            config: self.config,
            navigator: self.navigator,
            clock,
            observer: self.observer,
            phase: self.phase,
            platform: self.platform,
            started_at: self.started_at,
        }
    }

    /// Replace the notification sink, consuming the resolver.
    pub fn with_observer<O2: ResolverObserver>(self, observer: O2) -> AppOpenResolver<N, C, O2> {
        AppOpenResolver {
            config: self.config,
            navigator: self.navigator,
            clock: self.clock,
            observer,
            phase: self.phase,
            platform: self.platform,
            started_at: self.started_at,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<AttemptOutcome> {
        self.phase.outcome()
    }

    pub fn platform(&self) -> Option<PlatformInfo> {
        self.platform
    }

    /// Classify `ua` and enter the attempt in one step. Convenience wrapper
    /// the host calls from its DOM-ready signal.
    pub fn resolve(&mut self, classifier: &PlatformClassifier, ua: &str) -> Result<PlatformInfo> {
        let platform = classifier.classify(ua);
        self.begin(platform)?;
        Ok(platform)
    }

    /// Enter the attempt for an already-classified platform.
    ///
    /// Desktop never attempts the scheme navigation at all: it is assumed not
    /// to have the native app and goes straight to the store fallback. On
    /// mobile the start timestamp is recorded and the scheme navigation
    /// issued; a synchronous rejection resolves to `Error` and falls back to
    /// the store immediately.
    ///
    /// The machine is entered at most once: calling this on a non-idle
    /// resolver is ignored.
    pub fn begin(&mut self, platform: PlatformInfo) -> Result<()> {
        if self.phase != AttemptPhase::Idle {
            tracing::warn!(phase = ?self.phase, "begin called on a non-idle resolver; ignored");
            return Ok(());
        }

        self.platform = Some(platform);
        tracing::debug!(platform = platform.name(), "platform detected");
        self.observer.platform_detected(&platform);

        if !platform.is_mobile {
            tracing::debug!("desktop visitor, skipping app open");
            return self.resolve_to(AttemptOutcome::NotInstalled, &platform);
        }

        self.started_at = Some(self.clock.now());
        let scheme_url = self.config.app_scheme.clone();

        match self.navigator.navigate(&scheme_url) {
            Ok(()) => {
                self.phase = AttemptPhase::Attempting;
                tracing::debug!(url = %scheme_url, "app scheme navigation issued");
                self.observer.attempt_started(&scheme_url);
                Ok(())
            }
            Err(err) => {
                // NavigationRejected: recovered locally by the store fallback.
                tracing::warn!(url = %scheme_url, error = %err, "app scheme navigation rejected");
                self.resolve_to(AttemptOutcome::Error, &platform)
            }
        }
    }

    /// Visibility trigger: the page transitioned to hidden while attempting,
    /// meaning the OS switched away to the native app. One-shot; a no-op
    /// once the attempt has resolved.
    pub fn on_hidden(&mut self) {
        if self.phase != AttemptPhase::Attempting {
            return;
        }
        tracing::debug!("page hidden during attempt, app likely opened");
        self.phase = AttemptPhase::Resolved(AttemptOutcome::Opened);
        self.observer.attempt_resolved(AttemptOutcome::Opened);
    }

    /// Timeout trigger: fired by the host once `config.app_open_timeout()`
    /// has elapsed without a visibility transition. A no-op once the attempt
    /// has resolved.
    pub fn on_timeout(&mut self) -> Result<()> {
        if self.phase != AttemptPhase::Attempting {
            return Ok(());
        }
        let Some(started_at) = self.started_at else {
            return Ok(());
        };
        let Some(platform) = self.platform else {
            return Ok(());
        };

        let elapsed = self.clock.now().duration_since(started_at);
        tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "app open timeout fired");

        if elapsed < self.config.slow_return_threshold() {
            // The callback ran on schedule: control never left the page.
            self.resolve_to(AttemptOutcome::NotInstalled, &platform)
        } else {
            // The callback ran long past its schedule: the page was suspended
            // in between, so the app most likely opened. Surface the status
            // without redirecting.
            self.phase = AttemptPhase::Resolved(AttemptOutcome::Uncertain);
            self.observer.attempt_resolved(AttemptOutcome::Uncertain);
            Ok(())
        }
    }

    /// Resolve to a fallback-triggering outcome and issue the store redirect.
    fn resolve_to(&mut self, outcome: AttemptOutcome, platform: &PlatformInfo) -> Result<()> {
        debug_assert!(outcome.triggers_fallback());
        self.phase = AttemptPhase::Resolved(outcome);
        self.observer.attempt_resolved(outcome);
        redirect_to_store(platform, &self.config, &mut self.navigator, &mut self.observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    const SCHEME: &str = "myapp://home";
    const PLAY: &str = "https://play.example/listing";
    const APPS: &str = "https://apps.example/listing";

    fn config() -> ResolverConfig {
        ResolverConfig::new(SCHEME, "com.example.app", PLAY, APPS).unwrap()
    }

    fn ios() -> PlatformInfo {
        PlatformInfo {
            is_ios: true,
            is_android: false,
            is_mobile: true,
            is_desktop: false,
        }
    }

    fn android() -> PlatformInfo {
        PlatformInfo {
            is_ios: false,
            is_android: true,
            is_mobile: true,
            is_desktop: false,
        }
    }

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    /// Records navigations; optionally rejects a specific URL.
    #[derive(Clone, Default)]
    struct RecordingNavigator {
        urls: Rc<RefCell<Vec<String>>>,
        reject: Option<String>,
    }

    impl RecordingNavigator {
        fn rejecting(url: &str) -> Self {
            Self {
                urls: Rc::default(),
                reject: Some(url.to_string()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.urls.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, url: &str) -> crate::error::Result<()> {
            if self.reject.as_deref() == Some(url) {
                return Err(Error::NavigationRejected {
                    url: url.to_string(),
                    reason: "disallowed scheme".into(),
                });
            }
            self.urls.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    /// Captures the notification sequence for ordering assertions.
    #[derive(Clone, Default)]
    struct RecordingObserver(Rc<RefCell<Vec<String>>>);

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl ResolverObserver for RecordingObserver {
        fn platform_detected(&mut self, platform: &PlatformInfo) {
            self.0.borrow_mut().push(format!("platform:{}", platform.name()));
        }

        fn attempt_started(&mut self, scheme_url: &str) {
            self.0.borrow_mut().push(format!("started:{scheme_url}"));
        }

        fn attempt_resolved(&mut self, outcome: AttemptOutcome) {
            self.0.borrow_mut().push(format!("resolved:{}", outcome.as_str()));
        }

        fn redirect_scheduled(&mut self, store_url: &str, delay: Duration) {
            self.0
                .borrow_mut()
                .push(format!("scheduled:{store_url}:{}", delay.as_millis()));
        }

        fn redirect_issued(&mut self, store_url: &str) {
            self.0.borrow_mut().push(format!("issued:{store_url}"));
        }

        fn redirect_failed(&mut self, store_url: &str, _reason: &str) {
            self.0.borrow_mut().push(format!("failed:{store_url}"));
        }
    }

    fn resolver(
        navigator: RecordingNavigator,
    ) -> (
        AppOpenResolver<RecordingNavigator, ManualClock, RecordingObserver>,
        ManualClock,
        RecordingObserver,
    ) {
        let clock = ManualClock::new();
        let observer = RecordingObserver::default();
        let r = AppOpenResolver::new(config(), navigator)
            .with_clock(clock.clone())
            .with_observer(observer.clone());
        (r, clock, observer)
    }

    #[test]
    fn desktop_skips_attempt_and_redirects_to_play_store() {
        let nav = RecordingNavigator::default();
        let (mut r, _, _) = resolver(nav.clone());

        r.begin(PlatformInfo::desktop()).unwrap();

        // No scheme navigation at all, straight to the documented default.
        assert_eq!(nav.urls(), vec![PLAY.to_string()]);
        assert_eq!(r.outcome(), Some(AttemptOutcome::NotInstalled));
    }

    #[test]
    fn mobile_begin_enters_attempting() {
        let nav = RecordingNavigator::default();
        let (mut r, _, obs) = resolver(nav.clone());

        r.begin(android()).unwrap();

        assert_eq!(r.phase(), AttemptPhase::Attempting);
        assert_eq!(nav.urls(), vec![SCHEME.to_string()]);
        assert_eq!(
            obs.events(),
            vec!["platform:Android".to_string(), format!("started:{SCHEME}")]
        );
    }

    #[test]
    fn hidden_before_timeout_resolves_opened_without_redirect() {
        let nav = RecordingNavigator::default();
        let (mut r, clock, _) = resolver(nav.clone());

        r.begin(android()).unwrap();
        clock.advance(Duration::from_millis(400));
        r.on_hidden();

        assert_eq!(r.outcome(), Some(AttemptOutcome::Opened));
        // The later timeout is the losing trigger and must be a no-op.
        clock.advance(Duration::from_millis(1600));
        r.on_timeout().unwrap();
        assert_eq!(r.outcome(), Some(AttemptOutcome::Opened));
        assert_eq!(nav.urls(), vec![SCHEME.to_string()]);
    }

    #[test]
    fn on_schedule_timeout_resolves_not_installed_and_redirects_once() {
        let nav = RecordingNavigator::default();
        let (mut r, clock, _) = resolver(nav.clone());

        r.begin(ios()).unwrap();
        clock.advance(Duration::from_millis(2000));
        r.on_timeout().unwrap();

        assert_eq!(r.outcome(), Some(AttemptOutcome::NotInstalled));
        assert_eq!(nav.urls(), vec![SCHEME.to_string(), APPS.to_string()]);

        // A second timeout must not redirect again.
        r.on_timeout().unwrap();
        assert_eq!(nav.urls(), vec![SCHEME.to_string(), APPS.to_string()]);
    }

    #[test]
    fn android_timeout_redirects_to_play_store() {
        let nav = RecordingNavigator::default();
        let (mut r, clock, _) = resolver(nav.clone());

        r.begin(android()).unwrap();
        clock.advance(Duration::from_millis(2000));
        r.on_timeout().unwrap();

        assert_eq!(nav.urls(), vec![SCHEME.to_string(), PLAY.to_string()]);
    }

    #[test]
    fn late_timeout_resolves_uncertain_without_redirect() {
        let nav = RecordingNavigator::default();
        let (mut r, clock, obs) = resolver(nav.clone());

        r.begin(android()).unwrap();
        // Callback delayed well past the slow-return threshold: the page was
        // suspended, so the app most likely opened.
        clock.advance(Duration::from_millis(6000));
        r.on_timeout().unwrap();

        assert_eq!(r.outcome(), Some(AttemptOutcome::Uncertain));
        assert_eq!(nav.urls(), vec![SCHEME.to_string()]);
        assert!(obs.events().contains(&"resolved:uncertain".to_string()));
    }

    #[test]
    fn elapsed_exactly_at_threshold_is_uncertain() {
        let nav = RecordingNavigator::default();
        let (mut r, clock, _) = resolver(nav.clone());

        r.begin(android()).unwrap();
        clock.advance(Duration::from_millis(2500));
        r.on_timeout().unwrap();

        assert_eq!(r.outcome(), Some(AttemptOutcome::Uncertain));
    }

    #[test]
    fn rejected_scheme_navigation_falls_back_to_store() {
        let nav = RecordingNavigator::rejecting(SCHEME);
        let (mut r, _, obs) = resolver(nav.clone());

        r.begin(ios()).unwrap();

        assert_eq!(r.outcome(), Some(AttemptOutcome::Error));
        assert_eq!(nav.urls(), vec![APPS.to_string()]);
        assert!(obs.events().contains(&"resolved:error".to_string()));
    }

    #[test]
    fn failed_store_redirect_surfaces_terminal_error() {
        let nav = RecordingNavigator::rejecting(PLAY);
        let (mut r, clock, obs) = resolver(nav.clone());

        r.begin(android()).unwrap();
        clock.advance(Duration::from_millis(2000));
        let err = r.on_timeout().unwrap_err();

        assert!(matches!(err, Error::StoreRedirectFailed { .. }));
        assert_eq!(r.outcome(), Some(AttemptOutcome::NotInstalled));
        assert!(obs.events().contains(&format!("failed:{PLAY}")));
    }

    #[test]
    fn begin_on_non_idle_resolver_is_ignored() {
        let nav = RecordingNavigator::default();
        let (mut r, _, _) = resolver(nav.clone());

        r.begin(android()).unwrap();
        r.begin(ios()).unwrap();

        assert_eq!(r.phase(), AttemptPhase::Attempting);
        assert_eq!(r.platform(), Some(android()));
        assert_eq!(nav.urls(), vec![SCHEME.to_string()]);
    }

    #[test]
    fn hidden_after_resolution_is_a_noop() {
        let nav = RecordingNavigator::default();
        let (mut r, clock, _) = resolver(nav.clone());

        r.begin(android()).unwrap();
        clock.advance(Duration::from_millis(2000));
        r.on_timeout().unwrap();
        r.on_hidden();

        assert_eq!(r.outcome(), Some(AttemptOutcome::NotInstalled));
    }

    #[test]
    fn identical_stimuli_yield_identical_outcomes() {
        for _ in 0..2 {
            let nav = RecordingNavigator::default();
            let (mut r, clock, _) = resolver(nav.clone());
            r.begin(ios()).unwrap();
            clock.advance(Duration::from_millis(2000));
            r.on_timeout().unwrap();
            assert_eq!(r.outcome(), Some(AttemptOutcome::NotInstalled));
            assert_eq!(nav.urls(), vec![SCHEME.to_string(), APPS.to_string()]);
        }
    }

    #[test]
    fn redirect_delay_is_surfaced_to_the_observer() {
        let nav = RecordingNavigator::default();
        let (mut r, _, obs) = resolver(nav);

        r.begin(PlatformInfo::desktop()).unwrap();

        assert!(obs.events().contains(&format!("scheduled:{PLAY}:1000")));
    }
}
