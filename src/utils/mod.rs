mod helpers;
mod logging;
mod progress;

pub use helpers::*;
pub use logging::*;
pub use progress::*;
