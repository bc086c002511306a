//! Built-in data used when no CSV is supplied.

pub mod sample;

pub use sample::*;
