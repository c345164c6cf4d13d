mod ice_provider;

pub use ice_provider::*;
