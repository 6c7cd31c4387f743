//! The RLWE provider behind the [`HePrimitives`] interface.

use crate::{
    Ciphertext, Error, Plaintext, PublicKey, RelinearizationKey, Result, RlweParameters,
    SecretKey,
};
use lhe_traits::{FheDecrypter, FheEncrypter, GeneratedKeys, HePrimitives, SchemeFamily};
use log::debug;
use rand::{CryptoRng, RngCore};
use std::{collections::BTreeMap, sync::Arc};

/// Reference implementation of [`HePrimitives`] over [`RlweParameters`].
#[derive(Debug, Clone)]
pub struct RlweProvider {
    par: Arc<RlweParameters>,
}

impl RlweProvider {
    /// Creates a provider for the given parameters.
    pub fn new(par: &Arc<RlweParameters>) -> Self {
        Self { par: par.clone() }
    }

    /// Returns the parameters of this provider.
    pub fn parameters(&self) -> &Arc<RlweParameters> {
        &self.par
    }
}

impl HePrimitives for RlweProvider {
    type Plaintext = Plaintext;
    type Ciphertext = Ciphertext;
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type RelinearizationKey = RelinearizationKey;
    type Error = Error;

    fn family(&self) -> SchemeFamily {
        self.par.family()
    }

    fn moduli(&self) -> &[u64] {
        self.par.moduli()
    }

    fn scale(&self) -> Option<f64> {
        self.par.scale()
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        relin_degrees: &[usize],
        rng: &mut R,
    ) -> Result<GeneratedKeys<Self>> {
        let secret_key = SecretKey::random(&self.par, rng)?;
        let public_key = PublicKey::new(&secret_key, rng)?;
        let mut relinearization_keys = BTreeMap::new();
        for degree in relin_degrees {
            if relinearization_keys.contains_key(degree) {
                continue;
            }
            let rk = RelinearizationKey::new(&secret_key, *degree, rng)?;
            debug!("generated a relinearization key of degree {degree}");
            relinearization_keys.insert(*degree, rk);
        }
        Ok(GeneratedKeys {
            public_key,
            secret_key,
            relinearization_keys,
        })
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        pt: &Plaintext,
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        pk.try_encrypt(pt, rng)
    }

    fn decrypt(&self, ct: &Ciphertext, sk: &SecretKey) -> Result<Plaintext> {
        sk.try_decrypt(ct)
    }

    fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        a.try_mul(b)
    }

    fn relinearize(&self, ct: &mut Ciphertext, rk: &RelinearizationKey) -> Result<()> {
        rk.relinearizes(ct)
    }

    fn rescale(&self, ct: &mut Ciphertext) -> Result<()> {
        ct.mod_switch_to_next_level()
    }

    fn mod_drop(&self, ct: &mut Ciphertext) -> Result<()> {
        ct.mod_drop_to_next_level()
    }

    fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        a.try_add(b)
    }
}
