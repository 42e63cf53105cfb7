#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    YAML(#[from] serde_yaml::Error),
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
    #[error(transparent)]
    AhoCorasick(#[from] aho_corasick::BuildError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The custom-scheme navigation was rejected synchronously by the
    /// environment (disallowed scheme, malformed URL). Recovered locally by
    /// falling back to the store redirect; surfaced only through the observer.
    #[error("navigation rejected: {url}: {reason}")]
    NavigationRejected { url: String, reason: String },

    /// The store-URL navigation itself failed. Terminal: there is no further
    /// fallback and the attempt is not retried.
    #[error("store redirect failed: {url}: {reason}")]
    StoreRedirectFailed { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
