use super::AttemptOutcome;

/// Lifecycle of a single open attempt. `Resolved` is terminal: once either
/// trigger has fired, the machine ignores everything else, which is what
/// makes the visibility/timeout race mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Idle,
    Attempting,
    Resolved(AttemptOutcome),
}

impl AttemptPhase {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn outcome(&self) -> Option<AttemptOutcome> {
        match self {
            Self::Resolved(outcome) => Some(*outcome),
            _ => None,
        }
    }
}
