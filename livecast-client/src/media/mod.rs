mod devices;
mod media_source;

pub use devices::*;
pub use media_source::*;
