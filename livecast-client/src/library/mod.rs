mod media_library;
mod snapshot;

pub use media_library::*;
pub use snapshot::*;
