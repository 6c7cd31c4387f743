#![crate_name = "lhe_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Mathematical utilities for the lhe crates: polynomials in
//! `Z_Q[x]/(x^N + 1)` where `Q` runs along a chain of moduli.

mod errors;

pub mod rq;
pub mod zq;

pub use errors::{Error, Result};

#[cfg(test)]
#[macro_use]
extern crate proptest;
