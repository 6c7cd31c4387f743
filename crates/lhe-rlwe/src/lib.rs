#![crate_name = "lhe_rlwe"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! A reference provider of leveled homomorphic encryption over the ring
//! `Z_Q[x]/(x^N + 1)`.
//!
//! The integer family follows BGV: messages live in the low-order part of
//! the ciphertext, errors are multiples of the plaintext modulus, and modulus
//! switching preserves the message because every modulus of the chain is
//! congruent to 1 modulo the plaintext modulus. The approximate family follows
//! CKKS: messages are scaled reals and rescaling divides the scale by the
//! dropped modulus.

mod ciphertext;
mod encoding;
mod errors;
mod keys;
mod ops;
mod parameters;
mod plaintext;
mod provider;

pub use ciphertext::Ciphertext;
pub use encoding::Encoding;
pub use errors::{Error, ParametersError, Result};
pub use keys::{PublicKey, RelinearizationKey, SecretKey};
pub use parameters::{RlweParameters, RlweParametersBuilder, DEFAULT_PLAINTEXT_MODULUS};
pub use plaintext::Plaintext;
pub use provider::RlweProvider;

#[cfg(test)]
#[macro_use]
extern crate proptest;
