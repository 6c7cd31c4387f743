//! Keys of the RLWE provider.

mod key_switching_key;
mod public_key;
mod relinearization_key;
mod secret_key;

pub use public_key::PublicKey;
pub use relinearization_key::RelinearizationKey;
pub use secret_key::SecretKey;
