//! Relinearization keys of the RLWE provider

use super::key_switching_key::KeySwitchingKey;
use crate::{Ciphertext, Error, Result, RlweParameters, SecretKey};
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Relinearization key of the RLWE provider.
///
/// A relinearization key of degree `d` is a list of key switching keys, which
/// switch from `s^2, ..., s^d` to `s` where `s` is the secret key. It reduces
/// any ciphertext of degree between 2 and `d` back to degree 1.
#[derive(Debug, PartialEq, Clone)]
pub struct RelinearizationKey {
    pub(crate) par: Arc<RlweParameters>,
    pub(crate) degree: usize,
    pub(crate) ksk: Vec<KeySwitchingKey>,
}

impl RelinearizationKey {
    /// Generate a [`RelinearizationKey`] of a given degree from a
    /// [`SecretKey`].
    pub fn new<R: RngCore + CryptoRng>(
        sk: &SecretKey,
        degree: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let max = sk.par.max_relin_degree();
        if !(2..=max).contains(&degree) {
            return Err(Error::UnsupportedRelinDegree { degree, max });
        }

        let ctx = sk.par.ctx_at_level(0)?;
        let s = sk.to_poly(ctx)?;
        let mut si = Zeroizing::new(&*s * &*s);
        let mut ksk = Vec::with_capacity(degree - 1);
        for _ in 2..=degree {
            ksk.push(KeySwitchingKey::new(sk, &si, rng)?);
            *si *= &*s;
        }

        Ok(Self {
            par: sk.par.clone(),
            degree,
            ksk,
        })
    }

    /// The largest ciphertext degree this key reduces.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Relinearizes the supplied `(c0, c1, ..., ck)` ciphertext in place,
    /// reducing it to two components.
    pub fn relinearizes(&self, ct: &mut Ciphertext) -> Result<()> {
        if self.par != ct.par {
            return Err(Error::ParametersMismatch);
        }
        let degree = ct.degree();
        if degree < 2 || degree > self.degree {
            return Err(Error::InvalidCiphertextDegree(degree));
        }

        let (head, tail) = ct.c.split_at_mut(2);
        for (ci, ksk) in tail.iter().zip(self.ksk.iter()) {
            let (c0, c1) = ksk.key_switch(ci)?;
            head[0] += &c0;
            head[1] += &c1;
        }
        ct.c.truncate(2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::RelinearizationKey;
    use crate::{Ciphertext, Error, RlweParameters, SecretKey};
    use lhe_math::rq::Poly;
    use lhe_traits::{FheDecrypter, SchemeFamily};
    use rand::thread_rng;
    use std::error::Error as StdError;

    #[test]
    fn unsupported_degree() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let params = RlweParameters::default_arc(SchemeFamily::IntegerPacked, 2, 16);
        let sk = SecretKey::random(&params, &mut rng)?;
        assert_eq!(
            RelinearizationKey::new(&sk, 4, &mut rng),
            Err(Error::UnsupportedRelinDegree { degree: 4, max: 3 })
        );
        assert!(RelinearizationKey::new(&sk, 1, &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn relinearization() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let params = RlweParameters::default_arc(SchemeFamily::IntegerPacked, 3, 16);
        for _ in 0..5 {
            let sk = SecretKey::random(&params, &mut rng)?;
            let rk = RelinearizationKey::new(&sk, 3, &mut rng)?;
            assert_eq!(rk.degree(), 3);

            // The last level keeps a single 60-bit modulus, too small to
            // absorb the key switching noise of a random ciphertext.
            for level in 0..params.max_level() {
                let ctx = params.ctx_at_level(level)?;
                // A random degree-3 ciphertext with a random message.
                let c = (0..4).map(|_| Poly::random(ctx, &mut rng)).collect();
                let mut ct = Ciphertext::new(c, 1.0, &params)?;
                let before = sk.try_decrypt(&ct)?;

                rk.relinearizes(&mut ct)?;
                assert_eq!(ct.degree(), 1);
                let after = sk.try_decrypt(&ct)?;

                // The messages agree up to the key switching noise, which
                // is a multiple of the plaintext modulus.
                assert_eq!(before.poly, after.poly);
            }
        }
        Ok(())
    }

    #[test]
    fn invalid_degree() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let params = RlweParameters::default_arc(SchemeFamily::IntegerPacked, 2, 16);
        let sk = SecretKey::random(&params, &mut rng)?;
        let rk = RelinearizationKey::new(&sk, 2, &mut rng)?;
        let ctx = params.ctx_at_level(0)?;

        let c = (0..4).map(|_| Poly::random(ctx, &mut rng)).collect();
        let mut ct = Ciphertext::new(c, 1.0, &params)?;
        assert_eq!(rk.relinearizes(&mut ct), Err(Error::InvalidCiphertextDegree(3)));

        let c = (0..2).map(|_| Poly::random(ctx, &mut rng)).collect();
        let mut ct = Ciphertext::new(c, 1.0, &params)?;
        assert_eq!(rk.relinearizes(&mut ct), Err(Error::InvalidCiphertextDegree(1)));
        Ok(())
    }
}
