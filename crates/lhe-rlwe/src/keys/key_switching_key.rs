//! Key-switching keys of the RLWE provider.

use crate::{Error, Result, RlweParameters, SecretKey};
use itertools::izip;
use lhe_math::rq::{Context, Poly};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Key switching key of the RLWE provider.
///
/// Switches a polynomial `p` multiplying `from` into a pair `(c0, c1)` with
/// `c0 + c1 s = p * from + small`, using a gadget decomposition of `p` in base
/// `2^decomposition_bits`.
#[derive(Debug, PartialEq, Clone)]
pub struct KeySwitchingKey {
    /// The parameters of the underlying encryption scheme.
    pub(crate) par: Arc<RlweParameters>,

    /// The seed that generated the polynomials c1.
    pub(crate) seed: <ChaCha8Rng as SeedableRng>::Seed,

    /// The key switching elements c0.
    pub(crate) c0: Box<[Poly]>,

    /// The key switching elements c1.
    pub(crate) c1: Box<[Poly]>,

    /// Number of bits of the gadget base.
    pub(crate) base_bits: usize,
}

impl KeySwitchingKey {
    /// Generate a [`KeySwitchingKey`] to this [`SecretKey`] from a polynomial
    /// `from` at level 0.
    pub fn new<R: RngCore + CryptoRng>(sk: &SecretKey, from: &Poly, rng: &mut R) -> Result<Self> {
        let ctx = sk.par.ctx_at_level(0)?;
        if from.ctx() != ctx {
            return Err(Error::DefaultError(
                "Incorrect context for polynomial from".to_string(),
            ));
        }

        let base_bits = sk.par.decomposition_bits;
        let size = ctx.modulus().bits().div_ceil(base_bits as u64) as usize;

        let mut seed = <ChaCha8Rng as SeedableRng>::Seed::default();
        rng.fill(&mut seed);
        let c1 = Self::generate_c1(ctx, seed, size);
        let c0 = Self::generate_c0(sk, from, &c1, base_bits, rng)?;

        Ok(Self {
            par: sk.par.clone(),
            seed,
            c0: c0.into_boxed_slice(),
            c1: c1.into_boxed_slice(),
            base_bits,
        })
    }

    /// Generate the c1's from the seed
    fn generate_c1(
        ctx: &Arc<Context>,
        seed: <ChaCha8Rng as SeedableRng>::Seed,
        size: usize,
    ) -> Vec<Poly> {
        let mut rng = ChaCha8Rng::from_seed(seed);
        (0..size)
            .map(|_| {
                let mut seed_i = <ChaCha8Rng as SeedableRng>::Seed::default();
                rng.fill(&mut seed_i);
                Poly::random_from_seed(ctx, seed_i)
            })
            .collect()
    }

    /// Generate the c0's from the c1's and the secret key
    fn generate_c0<R: RngCore + CryptoRng>(
        sk: &SecretKey,
        from: &Poly,
        c1: &[Poly],
        base_bits: usize,
        rng: &mut R,
    ) -> Result<Vec<Poly>> {
        if c1.is_empty() {
            return Err(Error::DefaultError("Empty number of c1's".to_string()));
        }

        c1.iter()
            .enumerate()
            .map(|(i, c1i)| {
                let gi = BigUint::from(1u64) << (i * base_bits);
                let g_i_from = Zeroizing::new(from * &gi);
                let (b, _) = sk.encrypt_poly(&g_i_from, c1i.clone(), rng)?;
                Ok(b)
            })
            .collect::<Result<Vec<Poly>>>()
    }

    /// Key switch a polynomial at any level of the chain.
    pub fn key_switch(&self, p: &Poly) -> Result<(Poly, Poly)> {
        let ctx = p.ctx();
        let level = self.par.level_of_ctx(ctx)?;

        let mut c0 = Poly::zero(ctx);
        let mut c1 = Poly::zero(ctx);
        for (digit, c0_i, c1_i) in izip!(
            p.decompose(self.base_bits)?,
            self.c0.iter(),
            self.c1.iter()
        ) {
            let (mut c0_i, mut c1_i) = (c0_i.clone(), c1_i.clone());
            if level > 0 {
                c0_i.drop_to_context(ctx)?;
                c1_i.drop_to_context(ctx)?;
            }
            c0 += &(&digit * &c0_i);
            c1 += &(&digit * &c1_i);
        }
        Ok((c0, c1))
    }
}
