//! Ciphertext type of the RLWE provider.

use crate::{Error, Result, RlweParameters};
use lhe_math::rq::Poly;
use lhe_traits::SchemeFamily;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A ciphertext encrypting a plaintext.
///
/// A ciphertext of degree `d` holds `d + 1` polynomials `c_0, ..., c_d` and
/// decrypts as `c_0 + c_1 s + ... + c_d s^d`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
    /// The parameters of the underlying encryption scheme.
    pub(crate) par: Arc<RlweParameters>,

    /// The ciphertext elements.
    pub(crate) c: Vec<Poly>,

    /// The ciphertext level
    pub(crate) level: usize,

    /// The scale of the encrypted value; 1 for the integer family.
    pub(crate) scale: f64,
}

impl Deref for Ciphertext {
    type Target = [Poly];

    fn deref(&self) -> &Self::Target {
        &self.c
    }
}

impl DerefMut for Ciphertext {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.c
    }
}

impl Ciphertext {
    /// Create a ciphertext from a vector of polynomials.
    /// A ciphertext must contain at least two polynomials, all with the same
    /// context.
    pub fn new(c: Vec<Poly>, scale: f64, par: &Arc<RlweParameters>) -> Result<Self> {
        if c.len() < 2 {
            return Err(Error::InvalidCiphertextDegree(c.len().saturating_sub(1)));
        }
        let ctx = c[0].ctx();
        let level = par.level_of_ctx(ctx)?;
        if c.iter().any(|ci| ci.ctx() != ctx) {
            return Err(Error::MathError(lhe_math::Error::InvalidContext));
        }
        Ok(Self {
            par: par.clone(),
            c,
            level,
            scale,
        })
    }

    /// The power of the secret key this ciphertext decrypts with.
    pub fn degree(&self) -> usize {
        self.c.len() - 1
    }

    /// The number of moduli already removed from the chain.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The scale of the encrypted value.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn check_next_level(&self) -> Result<()> {
        if self.level >= self.par.max_level() {
            Err(Error::InvalidLevel {
                level: self.level + 1,
                max_level: self.par.max_level(),
            })
        } else {
            Ok(())
        }
    }

    /// Modulo switch the ciphertext to the next level, dividing it by the
    /// dropped modulus.
    ///
    /// For the integer family the plaintext is unchanged; for the approximate
    /// family the scale is divided by the dropped modulus.
    pub fn mod_switch_to_next_level(&mut self) -> Result<()> {
        self.check_next_level()?;
        let last = self.c[0].ctx().last_modulus();
        match self.par.family() {
            SchemeFamily::IntegerPacked => {
                let t = self
                    .par
                    .plaintext()
                    .ok_or_else(|| Error::DefaultError("Missing plaintext modulus".to_string()))?;
                for ci in self.c.iter_mut() {
                    ci.divide_by_last_modulus_mod_t(t)?;
                }
            }
            SchemeFamily::ApproximateFixedPoint => {
                for ci in self.c.iter_mut() {
                    ci.divide_and_round_by_last_modulus()?;
                }
                self.scale /= last as f64;
            }
        }
        self.level += 1;
        Ok(())
    }

    /// Drop the last modulus of the ciphertext without scaling it.
    pub fn mod_drop_to_next_level(&mut self) -> Result<()> {
        self.check_next_level()?;
        for ci in self.c.iter_mut() {
            ci.drop_last_modulus()?;
        }
        self.level += 1;
        Ok(())
    }

    /// Drop moduli until the ciphertext is at `level`.
    pub fn mod_drop_to_level(&mut self, level: usize) -> Result<()> {
        if level < self.level || level > self.par.max_level() {
            return Err(Error::InvalidLevel {
                level,
                max_level: self.par.max_level(),
            });
        }
        while self.level < level {
            self.mod_drop_to_next_level()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Ciphertext, Encoding, Error, Plaintext, PublicKey, RlweParameters, SecretKey};
    use lhe_math::rq::Poly;
    use lhe_traits::{FheDecoder, FheDecrypter, FheEncoder, FheEncrypter, SchemeFamily};
    use rand::thread_rng;
    use std::error::Error as StdError;

    #[test]
    fn new() -> Result<(), Box<dyn StdError>> {
        let params = RlweParameters::default_arc(SchemeFamily::IntegerPacked, 2, 16);
        let ctx = params.ctx_at_level(1)?;
        let ct = Ciphertext::new(vec![Poly::zero(ctx), Poly::zero(ctx)], 1.0, &params)?;
        assert_eq!(ct.level(), 1);
        assert_eq!(ct.degree(), 1);

        assert!(Ciphertext::new(vec![], 1.0, &params).is_err());
        assert!(Ciphertext::new(vec![Poly::zero(ctx)], 1.0, &params).is_err());
        let other = params.ctx_at_level(0)?;
        assert!(Ciphertext::new(vec![Poly::zero(ctx), Poly::zero(other)], 1.0, &params).is_err());
        Ok(())
    }

    #[test]
    fn mod_switch_integer() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let params = RlweParameters::default_arc(SchemeFamily::IntegerPacked, 3, 16);
        let sk = SecretKey::random(&params, &mut rng)?;
        let pk = PublicKey::new(&sk, &mut rng)?;
        let pt = Plaintext::try_encode(&[7u64, 65536] as &[u64], Encoding::integer(), &params)?;
        let mut ct = pk.try_encrypt(&pt, &mut rng)?;

        ct.mod_switch_to_next_level()?;
        assert_eq!(ct.level(), 1);
        let decrypted = Vec::<u64>::try_decode(&sk.try_decrypt(&ct)?, Encoding::integer())?;
        assert_eq!(&decrypted[..2], &[7, 65536]);

        ct.mod_drop_to_next_level()?;
        assert_eq!(ct.level(), 2);
        let decrypted = Vec::<u64>::try_decode(&sk.try_decrypt(&ct)?, Encoding::integer())?;
        assert_eq!(&decrypted[..2], &[7, 65536]);

        assert_eq!(
            ct.mod_switch_to_next_level(),
            Err(Error::InvalidLevel {
                level: 3,
                max_level: 2
            })
        );
        Ok(())
    }

    #[test]
    fn mod_switch_approximate() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let params = RlweParameters::default_arc(SchemeFamily::ApproximateFixedPoint, 2, 16);
        let sk = SecretKey::random(&params, &mut rng)?;
        let pk = PublicKey::new(&sk, &mut rng)?;
        let pt = Plaintext::try_encode(&[3.5f64] as &[f64], Encoding::real(), &params)?;

        let mut dropped = pk.try_encrypt(&pt, &mut rng)?;
        dropped.mod_drop_to_level(1)?;
        assert_eq!(dropped.scale(), 2f64.powi(30));
        let decrypted = Vec::<f64>::try_decode(&sk.try_decrypt(&dropped)?, Encoding::real())?;
        assert!((decrypted[0] - 3.5).abs() < 1e-4);

        let mut rescaled = pk.try_encrypt(&pt, &mut rng)?;
        rescaled.mod_switch_to_next_level()?;
        let expected_scale = 2f64.powi(30) / params.moduli()[1] as f64;
        assert_eq!(rescaled.scale(), expected_scale);
        assert!(dropped.mod_drop_to_level(0).is_err());
        Ok(())
    }
}
