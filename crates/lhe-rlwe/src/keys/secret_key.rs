//! Secret keys of the RLWE provider.

use crate::{Ciphertext, Error, Plaintext, Result, RlweParameters};
use lhe_math::rq::{Context, Poly};
use lhe_traits::{FheDecrypter, FheEncrypter, SchemeFamily};
use lhe_util::sample_vec_cbd;
use num_bigint::BigInt;
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Secret key of the RLWE provider.
///
/// The key is zeroized when dropped and cannot be cloned.
#[derive(PartialEq)]
pub struct SecretKey {
    pub(crate) par: Arc<RlweParameters>,
    pub(crate) coeffs: Box<[i64]>,
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("par", &self.par)
            .finish_non_exhaustive()
    }
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.coeffs.zeroize();
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl SecretKey {
    /// Generate a random [`SecretKey`].
    pub fn random<R: RngCore + CryptoRng>(par: &Arc<RlweParameters>, rng: &mut R) -> Result<Self> {
        let s_coefficients = sample_vec_cbd(par.degree(), par.variance, rng)
            .map_err(|e| Error::DefaultError(e.to_string()))?;
        Ok(Self::new(s_coefficients, par))
    }

    /// Generate a [`SecretKey`] from its coefficients.
    pub(crate) fn new(coeffs: Vec<i64>, par: &Arc<RlweParameters>) -> Self {
        Self {
            par: par.clone(),
            coeffs: coeffs.into_boxed_slice(),
        }
    }

    /// The secret key as a polynomial of the context `ctx`.
    pub(crate) fn to_poly(&self, ctx: &Arc<Context>) -> Result<Zeroizing<Poly>> {
        Ok(Zeroizing::new(Poly::try_from_i64(&self.coeffs, ctx)?))
    }

    /// Evaluate `c_0 + c_1 s + ... + c_d s^d`.
    fn dot_product_with_powers(&self, ct: &Ciphertext) -> Result<Zeroizing<Poly>> {
        let s = self.to_poly(ct.c[0].ctx())?;
        let mut si = s.clone();
        let mut c = Zeroizing::new(ct.c[0].clone());
        for ci in ct.c.iter().skip(1) {
            let cis = Zeroizing::new(ci * &*si);
            *c += &*cis;
            *si *= &*s;
        }
        Ok(c)
    }

    /// Measure the noise in a [`Ciphertext`] of the integer family, as the
    /// number of bits of the largest centered coefficient of `v - m`.
    pub fn measure_noise(&self, ct: &Ciphertext) -> Result<usize> {
        let t = self.par.plaintext().ok_or_else(|| {
            Error::DefaultError("Noise is only measured for the integer family".to_string())
        })?;
        let v = self.dot_product_with_powers(ct)?;
        let t = BigInt::from(t);
        let half_t: BigInt = &t >> 1u32;
        let noise = v
            .to_centered()
            .into_iter()
            .map(|vi| {
                let mut m = &vi % &t;
                if m > half_t {
                    m -= &t;
                } else if m < -&half_t {
                    m += &t;
                }
                (vi - m).bits()
            })
            .max()
            .unwrap_or(0);
        Ok(noise as usize)
    }

    /// Encrypt the polynomial `p` symmetrically: returns `(-a s + e + p, a)`
    /// with `e` multiplied by the plaintext modulus for the integer family.
    pub(crate) fn encrypt_poly<R: RngCore + CryptoRng>(
        &self,
        p: &Poly,
        a: Poly,
        rng: &mut R,
    ) -> Result<(Poly, Poly)> {
        let s = self.to_poly(p.ctx())?;
        let a_s = Zeroizing::new(&a * &*s);
        let mut b = Poly::small(p.ctx(), self.par.variance, rng)?;
        b *= &self.par.error_factor();
        b -= &*a_s;
        b += p;
        Ok((b, a))
    }
}

impl FheEncrypter<Plaintext, Ciphertext> for SecretKey {
    type Error = Error;

    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        pt: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        if self.par != pt.par {
            return Err(Error::ParametersMismatch);
        }
        let m = pt.to_poly();
        let a = Poly::random(m.ctx(), rng);
        let (b, a) = self.encrypt_poly(m, a, rng)?;
        Ok(Ciphertext {
            par: self.par.clone(),
            c: vec![b, a],
            level: pt.level,
            scale: pt.scale,
        })
    }
}

impl FheDecrypter<Plaintext, Ciphertext> for SecretKey {
    type Error = Error;

    fn try_decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
        if self.par != ct.par {
            return Err(Error::ParametersMismatch);
        }
        let v = self.dot_product_with_powers(ct)?;
        let poly = match self.par.family() {
            SchemeFamily::IntegerPacked => {
                let t = self
                    .par
                    .plaintext()
                    .ok_or_else(|| Error::DefaultError("Missing plaintext modulus".to_string()))?;
                let m = Zeroizing::new(v.centered_mod(t));
                let m = m.iter().map(|mi| *mi as i64).collect::<Vec<_>>();
                Poly::try_from_i64(&m, ct.c[0].ctx())?
            }
            SchemeFamily::ApproximateFixedPoint => (*v).clone(),
        };
        Ok(Plaintext {
            par: self.par.clone(),
            poly,
            scale: ct.scale,
            encoding: None,
            level: ct.level,
        })
    }
}
