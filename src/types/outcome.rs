/// Inferred result of an app-open attempt, derived from elapsed time and the
/// page-visibility observation. Consumed once by the fallback decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The page was backgrounded before the timeout: the app likely opened.
    Opened,
    /// The timeout callback ran on schedule with no visibility change: the
    /// app is likely not installed.
    NotInstalled,
    /// The timeout callback ran far past its schedule, which usually means
    /// the app opened and the user has already come back.
    Uncertain,
    /// The scheme navigation was rejected synchronously.
    Error,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::NotInstalled => "not installed",
            Self::Uncertain => "uncertain",
            Self::Error => "error",
        }
    }

    /// Whether this outcome routes the visitor to the store.
    pub fn triggers_fallback(&self) -> bool {
        matches!(self, Self::NotInstalled | Self::Error)
    }
}
