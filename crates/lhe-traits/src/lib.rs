#![crate_name = "lhe_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits for leveled homomorphic encryption providers.
//!
//! A provider implements [`HePrimitives`]: key generation, encryption,
//! decryption and the ciphertext operators used by a circuit evaluator.
//! Providers never relinearize or switch modulus implicitly; every such step
//! is requested explicitly by the caller.

use std::{collections::BTreeMap, sync::Arc};

use rand::{CryptoRng, RngCore};

/// The two scheme families supported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeFamily {
    /// Exact arithmetic modulo a plaintext modulus (BFV, BGV).
    IntegerPacked,
    /// Approximate fixed-point arithmetic over scaled values (CKKS).
    ApproximateFixedPoint,
}

impl std::fmt::Display for SchemeFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemeFamily::IntegerPacked => write!(f, "integer-packed"),
            SchemeFamily::ApproximateFixedPoint => write!(f, "approximate fixed-point"),
        }
    }
}

/// Key material produced by [`HePrimitives::generate_keys`].
pub struct GeneratedKeys<P: HePrimitives> {
    /// The public encryption key.
    pub public_key: P::PublicKey,
    /// The secret key.
    pub secret_key: P::SecretKey,
    /// Relinearization keys, indexed by the ciphertext degree they reduce.
    pub relinearization_keys: BTreeMap<usize, P::RelinearizationKey>,
}

/// The operations a leveled homomorphic encryption library exposes.
///
/// Levels are counted from the top of the modulus chain: a fresh ciphertext
/// is at level 0, and each [`HePrimitives::rescale`] or
/// [`HePrimitives::mod_drop`] removes the last modulus of its current chain.
pub trait HePrimitives: Send + Sync + Sized {
    /// The plaintext type.
    type Plaintext;
    /// The ciphertext handle.
    type Ciphertext: Clone + Send + Sync;
    /// The public key.
    type PublicKey: Send + Sync;
    /// The secret key.
    type SecretKey: Send + Sync;
    /// A relinearization key for a given ciphertext degree.
    type RelinearizationKey: Send + Sync;
    /// The type of error returned.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The scheme family implemented by this provider.
    fn family(&self) -> SchemeFamily;

    /// The modulus chain, first modulus first.
    fn moduli(&self) -> &[u64];

    /// The encoding scale of fresh ciphertexts, for the approximate family.
    fn scale(&self) -> Option<f64>;

    /// Generate a key pair and one relinearization key per requested degree.
    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        relin_degrees: &[usize],
        rng: &mut R,
    ) -> Result<GeneratedKeys<Self>, Self::Error>;

    /// Encrypt a plaintext under a public key.
    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        pt: &Self::Plaintext,
        pk: &Self::PublicKey,
        rng: &mut R,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Decrypt a ciphertext of any degree.
    fn decrypt(
        &self,
        ct: &Self::Ciphertext,
        sk: &Self::SecretKey,
    ) -> Result<Self::Plaintext, Self::Error>;

    /// Multiply two ciphertexts at the same level; the degree of the result is
    /// the sum of the degrees of the operands.
    fn multiply(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;

    /// Bring a ciphertext back to degree 1.
    fn relinearize(
        &self,
        ct: &mut Self::Ciphertext,
        rk: &Self::RelinearizationKey,
    ) -> Result<(), Self::Error>;

    /// Drop the last modulus, dividing the ciphertext by it.
    fn rescale(&self, ct: &mut Self::Ciphertext) -> Result<(), Self::Error>;

    /// Drop the last modulus without dividing the ciphertext.
    fn mod_drop(&self, ct: &mut Self::Ciphertext) -> Result<(), Self::Error>;

    /// Add two ciphertexts at the same level and scale.
    fn add(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, Self::Error>;
}

/// The homomorphic encryption parameters.
pub trait FheParameters {}

/// Encoding used when encoding a [`FhePlaintext`].
pub trait FhePlaintextEncoding {}

/// A plaintext which will encode one (or more) value(s).
pub trait FhePlaintext
where
    Self: Sized,
{
    /// The type of the FHE parameters.
    type Parameters: FheParameters;

    /// The type of the encoding.
    type Encoding: FhePlaintextEncoding;
}

/// Encode a value using a specified encoding.
pub trait FheEncoder<V>
where
    Self: FhePlaintext,
{
    /// The type of error returned.
    type Error;

    /// Attempt to encode a value using a specified encoding.
    fn try_encode(
        value: V,
        encoding: Self::Encoding,
        par: &Arc<Self::Parameters>,
    ) -> Result<Self, Self::Error>;
}

/// Decode the value in the plaintext with the specified (optional) encoding.
pub trait FheDecoder<P: FhePlaintext>
where
    Self: Sized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to decode a [`FhePlaintext`] into a value, using an (optional)
    /// encoding.
    fn try_decode<O>(pt: &P, encoding: O) -> Result<Self, Self::Error>
    where
        O: Into<Option<P::Encoding>>;
}

/// Encrypt a plaintext into a ciphertext.
pub trait FheEncrypter<P: FhePlaintext, C> {
    /// The type of error returned.
    type Error;

    /// Try to encrypt an [`FhePlaintext`] into a ciphertext.
    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &P, rng: &mut R) -> Result<C, Self::Error>;
}

/// Decrypt a ciphertext into a plaintext
pub trait FheDecrypter<P: FhePlaintext, C> {
    /// The type of error returned.
    type Error;

    /// Try to decrypt a ciphertext into an [`FhePlaintext`].
    fn try_decrypt(&self, ct: &C) -> Result<P, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::SchemeFamily;

    #[test]
    fn family_display() {
        assert_eq!(SchemeFamily::IntegerPacked.to_string(), "integer-packed");
        assert_eq!(
            SchemeFamily::ApproximateFixedPoint.to_string(),
            "approximate fixed-point"
        );
    }
}
