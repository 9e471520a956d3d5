//! Core types for Courier

mod address;
mod event;
mod notification;

pub use address::*;
pub use event::*;
pub use notification::*;
