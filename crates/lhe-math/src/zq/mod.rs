//! Scalar moduli of the chain.

pub mod primes;
