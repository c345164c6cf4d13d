mod turnservers;

pub use turnservers::*;
