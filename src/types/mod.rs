mod outcome;
mod phase;
mod platform;

pub use outcome::*;
pub use phase::*;
pub use platform::*;
