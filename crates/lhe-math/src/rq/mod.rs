#![warn(missing_docs, unused_imports)]

//! Polynomials in R_Q\[x\] = ZZ_Q\[x\] / (x^N + 1) where Q is the product of
//! the moduli of a [`Context`].

mod context;
mod ops;
mod switcher;

pub use context::Context;

use crate::{Error, Result};
use itertools::Itertools;
use lhe_util::sample_vec_cbd;
use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::Zero;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use zeroize::{Zeroize, Zeroizing};

/// Struct that holds a polynomial for a specific context.
///
/// Coefficients are stored in power basis and reduced modulo the context
/// modulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    ctx: Arc<Context>,
    coefficients: Vec<BigUint>,
}

// Implements zeroization of polynomials
impl Zeroize for Poly {
    fn zeroize(&mut self) {
        self.coefficients.iter_mut().for_each(|c| c.set_zero())
    }
}

impl AsRef<Poly> for Poly {
    fn as_ref(&self) -> &Poly {
        self
    }
}

impl Poly {
    /// Creates a polynomial holding the constant 0.
    #[must_use]
    pub fn zero(ctx: &Arc<Context>) -> Self {
        Self {
            ctx: ctx.clone(),
            coefficients: vec![BigUint::zero(); ctx.degree],
        }
    }

    /// Generate a random polynomial.
    pub fn random<R: RngCore + CryptoRng>(ctx: &Arc<Context>, rng: &mut R) -> Self {
        let coefficients = (0..ctx.degree)
            .map(|_| rng.gen_biguint_below(&ctx.modulus))
            .collect_vec();
        Self {
            ctx: ctx.clone(),
            coefficients,
        }
    }

    /// Generate a random polynomial deterministically from a seed.
    #[must_use]
    pub fn random_from_seed(ctx: &Arc<Context>, seed: <ChaCha8Rng as SeedableRng>::Seed) -> Self {
        // Let's hash the seed into a ChaCha8Rng seed.
        let mut hasher = Sha256::new();
        hasher.update(seed);
        let mut prng =
            ChaCha8Rng::from_seed(<ChaCha8Rng as SeedableRng>::Seed::from(hasher.finalize()));
        Self::random(ctx, &mut prng)
    }

    /// Generate a small polynomial following a centered binomial distribution.
    ///
    /// Returns an error if the variance does not belong to [1, ..., 16].
    pub fn small<R: RngCore + CryptoRng>(
        ctx: &Arc<Context>,
        variance: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if !(1..=16).contains(&variance) {
            return Err(Error::Default(
                "The variance should be an integer between 1 and 16".to_string(),
            ));
        }

        let coeffs = Zeroizing::new(
            sample_vec_cbd(ctx.degree, variance, rng).map_err(|e| Error::Default(e.to_string()))?,
        );
        Self::try_from_i64(&coeffs, ctx)
    }

    /// Creates a polynomial from signed coefficients, reducing each of them
    /// modulo the context modulus. Missing coefficients are set to zero.
    pub fn try_from_i64(coefficients: &[i64], ctx: &Arc<Context>) -> Result<Self> {
        let coefficients = coefficients.iter().map(|c| BigInt::from(*c)).collect_vec();
        Self::try_from_bigint(&coefficients, ctx)
    }

    /// Creates a polynomial from arbitrary precision signed coefficients.
    pub fn try_from_bigint(coefficients: &[BigInt], ctx: &Arc<Context>) -> Result<Self> {
        if coefficients.len() > ctx.degree {
            return Err(Error::TooManyCoefficients {
                actual: coefficients.len(),
                degree: ctx.degree,
            });
        }
        let modulus = BigInt::from(ctx.modulus.clone());
        let mut p = Self::zero(ctx);
        p.coefficients
            .iter_mut()
            .zip(coefficients)
            .for_each(|(pi, c)| *pi = reduce(c, &modulus));
        Ok(p)
    }

    /// Returns the context of the underlying polynomial
    #[must_use]
    pub fn ctx(&self) -> &Arc<Context> {
        &self.ctx
    }

    /// Access the polynomial coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }

    /// Returns the coefficients lifted to (-Q/2, Q/2].
    #[must_use]
    pub fn to_centered(&self) -> Vec<BigInt> {
        let half: BigUint = &self.ctx.modulus >> 1u32;
        let modulus = BigInt::from(self.ctx.modulus.clone());
        self.coefficients
            .iter()
            .map(|c| {
                if c > &half {
                    BigInt::from(c.clone()) - &modulus
                } else {
                    BigInt::from(c.clone())
                }
            })
            .collect_vec()
    }

    /// Returns the infinity norm of the centered coefficients.
    #[must_use]
    pub fn norm(&self) -> BigUint {
        self.to_centered()
            .into_iter()
            .map(|c| c.magnitude().clone())
            .max()
            .unwrap_or_default()
    }

    /// Decompose the polynomial in base `2^base_bits`.
    ///
    /// Returns `ceil(log2(Q) / base_bits)` polynomials `d_j` with coefficients
    /// in `[0, 2^base_bits)` such that `sum_j d_j * 2^(j * base_bits)` equals
    /// this polynomial.
    pub fn decompose(&self, base_bits: usize) -> Result<Vec<Poly>> {
        if base_bits == 0 || base_bits > 62 {
            return Err(Error::Default(format!(
                "Invalid decomposition base 2^{base_bits}"
            )));
        }
        let ndigits = self.ctx.modulus.bits().div_ceil(base_bits as u64) as usize;
        let mask = (BigUint::from(1u64) << base_bits) - 1u64;
        let mut out = vec![Poly::zero(&self.ctx); ndigits];
        for (i, c) in self.coefficients.iter().enumerate() {
            let mut c = c.clone();
            for digit in out.iter_mut() {
                digit.coefficients[i] = &c & &mask;
                c >>= base_bits;
            }
        }
        Ok(out)
    }
}

/// Reduce a signed integer into [0, modulus).
pub(crate) fn reduce(c: &BigInt, modulus: &BigInt) -> BigUint {
    let r = c.mod_floor(modulus);
    debug_assert!(r.sign() != Sign::Minus);
    r.magnitude().clone()
}

#[cfg(test)]
mod tests {
    use super::{Context, Poly};
    use num_bigint::{BigInt, BigUint};
    use rand::{thread_rng, RngCore};
    use std::{error::Error, sync::Arc};
    use zeroize::Zeroize;

    const MODULI: &[u64; 2] = &[4611686018326724609, 4611686018309947393];

    #[test]
    fn zero() -> Result<(), Box<dyn Error>> {
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        let p = Poly::zero(&ctx);
        assert_eq!(p.coefficients().len(), 16);
        assert!(p.coefficients().iter().all(|c| c == &BigUint::default()));
        assert_eq!(p.ctx(), &ctx);
        Ok(())
    }

    #[test]
    fn random() -> Result<(), Box<dyn Error>> {
        let mut rng = thread_rng();
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        for _ in 0..20 {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            let p = Poly::random_from_seed(&ctx, seed);
            let q = Poly::random_from_seed(&ctx, seed);
            assert_eq!(p, q);
            assert!(p.coefficients().iter().all(|c| c < ctx.modulus()));

            rng.fill_bytes(&mut seed);
            let r = Poly::random_from_seed(&ctx, seed);
            assert_ne!(p, r);
        }
        let p = Poly::random(&ctx, &mut rng);
        assert!(p.coefficients().iter().all(|c| c < ctx.modulus()));
        Ok(())
    }

    #[test]
    fn small() -> Result<(), Box<dyn Error>> {
        let mut rng = thread_rng();
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        assert!(Poly::small(&ctx, 0, &mut rng).is_err());
        assert!(Poly::small(&ctx, 17, &mut rng).is_err());
        for variance in 1..=16 {
            let p = Poly::small(&ctx, variance, &mut rng)?;
            assert!(p.norm() <= BigUint::from(2 * variance as u64));
        }
        Ok(())
    }

    #[test]
    fn centered() -> Result<(), Box<dyn Error>> {
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        let p = Poly::try_from_i64(&[-3, 2, 0, -1], &ctx)?;
        assert_eq!(
            p.coefficients()[0],
            ctx.modulus() - BigUint::from(3u64)
        );
        let centered = p.to_centered();
        assert_eq!(centered.len(), 16);
        assert_eq!(&centered[..4], &[-3, 2, 0, -1].map(BigInt::from));
        assert_eq!(p.norm(), BigUint::from(3u64));

        assert!(Poly::try_from_i64(&[1; 17], &ctx).is_err());
        Ok(())
    }

    #[test]
    fn decompose() -> Result<(), Box<dyn Error>> {
        let mut rng = thread_rng();
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        let p = Poly::random(&ctx, &mut rng);
        let digits = p.decompose(16)?;
        assert_eq!(digits.len(), 8);

        let mut recomposed = Poly::zero(&ctx);
        for (j, d) in digits.iter().enumerate() {
            assert!(d.coefficients().iter().all(|c| c.bits() <= 16));
            let mut term = d.clone();
            term *= &(BigUint::from(1u64) << (16 * j));
            recomposed += &term;
        }
        assert_eq!(recomposed, p);
        assert!(p.decompose(0).is_err());
        Ok(())
    }

    #[test]
    fn zeroize() -> Result<(), Box<dyn Error>> {
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        let mut p = Poly::random(&ctx, &mut thread_rng());
        p.zeroize();
        assert_eq!(p, Poly::zero(&ctx));
        Ok(())
    }
}
