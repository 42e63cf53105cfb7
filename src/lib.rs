mod classifier;
mod clock;
mod config;
mod error;
mod marker;
mod navigator;
mod observer;
mod redirect;
mod resolver;
mod types;

pub use classifier::PlatformClassifier;
pub use clock::{Clock, SystemClock};
pub use config::ResolverConfig;
pub use error::{Error, Result};
pub use navigator::Navigator;
pub use observer::{LogObserver, NullObserver, ResolverObserver};
pub use redirect::store_url;
pub use resolver::AppOpenResolver;
pub use types::*;
