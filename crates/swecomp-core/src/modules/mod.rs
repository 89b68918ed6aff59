//! Feature modules, one directory per concern.

pub mod collection;
pub mod conservation;
pub mod frame;
pub mod grid;
pub mod plan;
pub mod runlog;
