//! Common types and utilities shared across the engine.

pub mod constants;
pub mod util;
pub mod value;

pub use constants::*;
pub use util::{atomic, Atomic};
pub use value::Value;
