//! Public keys of the RLWE provider.

use crate::{Ciphertext, Error, Plaintext, Result, RlweParameters};
use lhe_math::rq::Poly;
use lhe_traits::FheEncrypter;
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use zeroize::Zeroizing;

use super::SecretKey;

/// Public key of the RLWE provider: an encryption of zero under the secret
/// key.
#[derive(Debug, PartialEq, Clone)]
pub struct PublicKey {
    pub(crate) par: Arc<RlweParameters>,
    pub(crate) c: Ciphertext,
}

impl PublicKey {
    /// Generate a new [`PublicKey`] from a [`SecretKey`].
    pub fn new<R: RngCore + CryptoRng>(sk: &SecretKey, rng: &mut R) -> Result<Self> {
        let ctx = sk.par.ctx_at_level(0)?;
        let zero = Poly::zero(ctx);
        let a = Poly::random(ctx, rng);
        let (b, a) = sk.encrypt_poly(&zero, a, rng)?;
        Ok(Self {
            par: sk.par.clone(),
            c: Ciphertext::new(vec![b, a], 1.0, &sk.par)?,
        })
    }
}

impl FheEncrypter<Plaintext, Ciphertext> for PublicKey {
    type Error = Error;

    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        pt: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        if self.par != pt.par {
            return Err(Error::ParametersMismatch);
        }

        let mut ct = self.c.clone();
        ct.mod_drop_to_level(pt.level)?;

        let ctx = self.par.ctx_at_level(ct.level)?;
        let factor = self.par.error_factor();
        let u = Zeroizing::new(Poly::small(ctx, self.par.variance, rng)?);
        let mut e1 = Zeroizing::new(Poly::small(ctx, self.par.variance, rng)?);
        let mut e2 = Zeroizing::new(Poly::small(ctx, self.par.variance, rng)?);
        *e1 *= &factor;
        *e2 *= &factor;

        let mut c0 = &*u * &ct[0];
        c0 += &*e1;
        c0 += pt.to_poly();
        let mut c1 = &*u * &ct[1];
        c1 += &*e2;

        Ok(Ciphertext {
            par: self.par.clone(),
            c: vec![c0, c1],
            level: ct.level,
            scale: pt.scale,
        })
    }
}
