#![crate_name = "lhe"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Leveled circuit evaluation over a homomorphic encryption provider.
//!
//! The evaluator multiplies and adds chains of ciphertexts while keeping
//! track of their degree, their position in the modulus chain and, for the
//! approximate family, their scale. It decides when to relinearize and when
//! to rescale according to a [`RelinPolicy`], and rejects every circuit the
//! parameters cannot support before calling the provider.
//!
//! ```no_run
//! # use lhe::{EvaluatorSession, RelinPolicy, SchemeProfile};
//! # use lhe_rlwe::{Encoding, Plaintext, RlweParameters, RlweProvider};
//! # use lhe_traits::{FheDecoder, FheEncoder};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = rand::thread_rng();
//! let params = RlweParameters::bgv_arc(2, 16)?;
//! let session = EvaluatorSession::new(
//!     SchemeProfile::integer(2, 3)?,
//!     RlweProvider::new(&params),
//!     &mut rng,
//! )?;
//!
//! let mut cts = vec![];
//! for v in [2u64, 3, 4] {
//!     let pt = Plaintext::try_encode(&[v] as &[u64], Encoding::integer(), &params)?;
//!     cts.push(session.encrypt(&pt, &mut rng)?);
//! }
//! let product = session.evaluate_multiply_chain(&cts, RelinPolicy::Deferred)?;
//! let pt = session.decrypt(product)?;
//! assert_eq!(Vec::<u64>::try_decode(&pt, Encoding::integer())?[0], 24);
//! # Ok(())
//! # }
//! ```

mod ciphertext;
mod errors;
mod evaluator;
mod keys;
mod plan;
mod profile;
mod session;
mod tracker;

pub use ciphertext::TrackedCiphertext;
pub use errors::{Error, Result};
pub use evaluator::Evaluator;
pub use keys::KeyBundle;
pub use plan::{CircuitPlan, RelinPolicy, Step};
pub use profile::{SchemeProfile, SchemeProfileBuilder};
pub use session::{CircuitOutput, EvaluatorSession};
pub use tracker::{CiphertextMeta, LevelTracker};

#[cfg(test)]
#[macro_use]
extern crate proptest;
