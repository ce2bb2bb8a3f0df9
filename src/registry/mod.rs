//! Fixed ordering of stellar parameters and element abundances.
//!
//! Result tables store parameter and abundance arrays positionally; these
//! catalogs are the contract that gives each position a name.

pub mod elems;
pub mod params;

pub use elems::*;
pub use params::*;
