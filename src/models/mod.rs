//! Core data models for member conversion

pub mod command;
pub mod list;
pub mod report;
pub mod target;

pub use command::*;
pub use list::*;
pub use report::*;
pub use target::*;
