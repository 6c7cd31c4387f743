//! Key material of an evaluation session.

use crate::{Error, Result, SchemeProfile};
use lhe_traits::HePrimitives;
use log::info;
use rand::{CryptoRng, RngCore};
use std::{collections::BTreeMap, fmt};

/// Public, secret and relinearization keys generated for one session.
///
/// The secret key never leaves the bundle; it is dropped, and zeroized by
/// the provider, together with it.
pub struct KeyBundle<P: HePrimitives> {
    public_key: P::PublicKey,
    secret_key: P::SecretKey,
    relin_keys: BTreeMap<usize, P::RelinearizationKey>,
}

impl<P: HePrimitives> KeyBundle<P> {
    /// Generate keys with one relinearization key per requested degree.
    pub fn generate<R: RngCore + CryptoRng>(
        profile: &SchemeProfile,
        provider: &P,
        degrees: &[usize],
        rng: &mut R,
    ) -> Result<Self> {
        let mut degrees = degrees.to_vec();
        degrees.sort_unstable();
        degrees.dedup();
        if let Some(degree) = degrees
            .iter()
            .find(|d| !(2..=profile.max_relin_degree()).contains(*d))
        {
            return Err(Error::KeyGeneration(format!(
                "Relinearization degree {degree} is outside 2..={}",
                profile.max_relin_degree()
            )));
        }

        let keys = provider
            .generate_keys(&degrees, rng)
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;
        if let Some(degree) = degrees
            .iter()
            .find(|d| !keys.relinearization_keys.contains_key(*d))
        {
            return Err(Error::KeyGeneration(format!(
                "The provider returned no relinearization key for degree {degree}"
            )));
        }
        info!("generated keys with relinearization degrees {degrees:?}");

        Ok(Self {
            public_key: keys.public_key,
            secret_key: keys.secret_key,
            relin_keys: keys.relinearization_keys,
        })
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &P::PublicKey {
        &self.public_key
    }

    pub(crate) fn secret_key(&self) -> &P::SecretKey {
        &self.secret_key
    }

    /// Returns the relinearization key for a degree, if any.
    pub fn relin_key(&self, degree: usize) -> Option<&P::RelinearizationKey> {
        self.relin_keys.get(&degree)
    }

    /// Degrees for which a relinearization key is available.
    pub fn degrees(&self) -> impl Iterator<Item = usize> + '_ {
        self.relin_keys.keys().copied()
    }
}

impl<P: HePrimitives> fmt::Debug for KeyBundle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBundle")
            .field("relin_degrees", &self.degrees().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
