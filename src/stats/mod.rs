//! Statistics over result tables.
//!
//! - repeat-observation scatter per quantity and telescope (`repeat`)

pub mod repeat;

pub use repeat::*;
