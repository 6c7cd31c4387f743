//! Create parameters for the RLWE provider.

use crate::{Error, ParametersError, Result};
use itertools::Itertools;
use lhe_math::{rq::Context, zq::primes::generate_prime};
use lhe_traits::{FheParameters, SchemeFamily};
use num_bigint::BigUint;
use num_integer::Integer;
use std::fmt::Debug;
use std::sync::Arc;

/// Plaintext modulus of the integer presets.
pub const DEFAULT_PLAINTEXT_MODULUS: u64 = 65537;

/// Parameters for the RLWE provider.
///
/// The same structure describes both scheme families: the integer family
/// carries a plaintext modulus, the approximate family an encoding scale.
#[derive(PartialEq)]
pub struct RlweParameters {
    family: SchemeFamily,

    /// Number of coefficients in a polynomial.
    polynomial_degree: usize,

    /// Plaintext modulus of the integer family.
    plaintext: Option<u64>,

    /// Vector of coprime moduli q_i for the ciphertext.
    pub(crate) moduli: Box<[u64]>,

    /// Vector of the sized of the coprime moduli q_i for the ciphertext.
    moduli_sizes: Box<[usize]>,

    /// Error variance
    pub(crate) variance: usize,

    /// Encoding scale of the approximate family.
    scale: Option<f64>,

    /// Largest ciphertext degree that can be relinearized.
    max_relin_degree: usize,

    /// Number of bits of the gadget base used by key switching.
    pub(crate) decomposition_bits: usize,

    /// Polynomial contexts, indexed by level.
    pub(crate) ctx: Vec<Arc<Context>>,
}

impl Debug for RlweParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RlweParameters")
            .field("family", &self.family)
            .field("polynomial_degree", &self.polynomial_degree)
            .field("plaintext_modulus", &self.plaintext)
            .field("moduli", &self.moduli)
            .field("scale", &self.scale)
            .field("max_relin_degree", &self.max_relin_degree)
            .finish()
    }
}

impl FheParameters for RlweParameters {}

impl RlweParameters {
    /// Returns the scheme family
    #[must_use]
    pub const fn family(&self) -> SchemeFamily {
        self.family
    }

    /// Returns the underlying polynomial degree
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.polynomial_degree
    }

    /// Returns a reference to the ciphertext moduli
    #[must_use]
    pub fn moduli(&self) -> &[u64] {
        &self.moduli
    }

    /// Returns a reference to the ciphertext moduli sizes
    #[must_use]
    pub fn moduli_sizes(&self) -> &[usize] {
        &self.moduli_sizes
    }

    /// Returns the plaintext modulus of the integer family.
    #[must_use]
    pub const fn plaintext(&self) -> Option<u64> {
        self.plaintext
    }

    /// Returns the encoding scale of the approximate family.
    #[must_use]
    pub const fn scale(&self) -> Option<f64> {
        self.scale
    }

    /// Returns the largest ciphertext degree that can be relinearized.
    #[must_use]
    pub const fn max_relin_degree(&self) -> usize {
        self.max_relin_degree
    }

    /// Returns the maximum level allowed by these parameters.
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.moduli.len() - 1
    }

    /// Factor applied to encryption errors: the plaintext modulus for the
    /// integer family, 1 otherwise.
    pub(crate) fn error_factor(&self) -> BigUint {
        BigUint::from(self.plaintext.unwrap_or(1))
    }

    /// Returns the context corresponding to the level.
    pub fn ctx_at_level(&self, level: usize) -> Result<&Arc<Context>> {
        self.ctx.get(level).ok_or(Error::InvalidLevel {
            level,
            max_level: self.max_level(),
        })
    }

    /// Returns the level of a given context
    pub fn level_of_ctx(&self, ctx: &Arc<Context>) -> Result<usize> {
        self.ctx[0].niterations_to(ctx).map_err(Error::MathError)
    }

    /// Integer family parameters with `num_moduli` 60-bit moduli and the
    /// plaintext modulus 65537.
    pub fn bgv_arc(num_moduli: usize, degree: usize) -> Result<Arc<Self>> {
        RlweParametersBuilder::new()
            .set_family(SchemeFamily::IntegerPacked)
            .set_degree(degree)
            .set_plaintext_modulus(DEFAULT_PLAINTEXT_MODULUS)
            .set_moduli_sizes(&vec![60usize; num_moduli])
            .build_arc()
    }

    /// Approximate family parameters with four moduli and a scale of 2^40.
    ///
    /// The chain ends with its two 40-bit primes, so that each rescale
    /// divides the scale by roughly 2^40.
    pub fn ckks_arc(degree: usize) -> Result<Arc<Self>> {
        RlweParametersBuilder::new()
            .set_family(SchemeFamily::ApproximateFixedPoint)
            .set_degree(degree)
            .set_moduli_sizes(&[60, 60, 40, 40])
            .set_scale(2f64.powi(40))
            .build_arc()
    }

    #[cfg(test)]
    /// Returns default parameters for tests.
    #[must_use]
    pub fn default_arc(family: SchemeFamily, num_moduli: usize, degree: usize) -> Arc<Self> {
        let mut builder = RlweParametersBuilder::new();
        builder
            .set_family(family)
            .set_degree(degree)
            .set_moduli_sizes(&vec![60usize; num_moduli])
            .set_max_relin_degree(3);
        match family {
            SchemeFamily::IntegerPacked => builder.set_plaintext_modulus(DEFAULT_PLAINTEXT_MODULUS),
            SchemeFamily::ApproximateFixedPoint => builder.set_scale(2f64.powi(30)),
        };
        builder.build_arc().unwrap()
    }
}

/// Builder for parameters for the RLWE provider.
#[derive(Debug)]
pub struct RlweParametersBuilder {
    family: SchemeFamily,
    degree: usize,
    plaintext: Option<u64>,
    variance: usize,
    scale: Option<f64>,
    max_relin_degree: usize,
    decomposition_bits: usize,
    ciphertext_moduli: Vec<u64>,
    ciphertext_moduli_sizes: Vec<usize>,
}

impl RlweParametersBuilder {
    /// Creates a new instance of the builder
    #[allow(clippy::new_without_default)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            family: SchemeFamily::IntegerPacked,
            degree: Default::default(),
            plaintext: None,
            variance: 10,
            scale: None,
            max_relin_degree: 3,
            decomposition_bits: 16,
            ciphertext_moduli: Default::default(),
            ciphertext_moduli_sizes: Default::default(),
        }
    }

    /// Sets the scheme family.
    pub fn set_family(&mut self, family: SchemeFamily) -> &mut Self {
        self.family = family;
        self
    }

    /// Sets the polynomial degree.
    pub fn set_degree(&mut self, degree: usize) -> &mut Self {
        self.degree = degree;
        self
    }

    /// Sets the plaintext modulus of the integer family.
    pub fn set_plaintext_modulus(&mut self, plaintext: u64) -> &mut Self {
        self.plaintext = Some(plaintext);
        self
    }

    /// Sets the sizes of the ciphertext moduli.
    /// Only one of `set_moduli_sizes` and `set_moduli`
    /// can be specified.
    pub fn set_moduli_sizes(&mut self, sizes: &[usize]) -> &mut Self {
        sizes.clone_into(&mut self.ciphertext_moduli_sizes);
        self
    }

    /// Sets the ciphertext moduli to use.
    /// Only one of `set_moduli_sizes` and `set_moduli`
    /// can be specified.
    pub fn set_moduli(&mut self, moduli: &[u64]) -> &mut Self {
        moduli.clone_into(&mut self.ciphertext_moduli);
        self
    }

    /// Sets the error variance. Returns an error if the variance is not between
    /// one and sixteen.
    pub fn set_variance(&mut self, variance: usize) -> &mut Self {
        self.variance = variance;
        self
    }

    /// Sets the encoding scale of the approximate family.
    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the largest ciphertext degree that relinearization keys can
    /// reduce. Defaults to 3.
    pub fn set_max_relin_degree(&mut self, max_relin_degree: usize) -> &mut Self {
        self.max_relin_degree = max_relin_degree;
        self
    }

    /// Sets the number of bits of the key switching gadget base. Defaults to
    /// 16.
    pub fn set_decomposition_bits(&mut self, bits: usize) -> &mut Self {
        self.decomposition_bits = bits;
        self
    }

    /// Generate ciphertext moduli with the specified sizes, congruent to 1
    /// modulo `modulo`.
    fn generate_moduli(moduli_sizes: &[usize], degree: usize, modulo: u64) -> Result<Vec<u64>> {
        let mut moduli = vec![];
        for size in moduli_sizes {
            if *size > 62 || *size < 10 {
                return Err(Error::ParametersError(
                    ParametersError::InvalidModulusSize(*size, 10, 62),
                ));
            }

            let mut upper_bound = 1 << size;
            loop {
                if let Some(prime) = generate_prime(*size, modulo, upper_bound) {
                    if !moduli.contains(&prime) {
                        moduli.push(prime);
                        break;
                    } else {
                        upper_bound = prime;
                    }
                } else {
                    return Err(Error::ParametersError(ParametersError::NotEnoughPrimes(
                        *size, degree,
                    )));
                }
            }
        }

        Ok(moduli)
    }

    /// Build a new `RlweParameters` inside an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<RlweParameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new `RlweParameters`.
    pub fn build(&self) -> Result<RlweParameters> {
        // Check that the degree is a power of 2 (and large enough).
        if self.degree < 8 || !self.degree.is_power_of_two() {
            return Err(ParametersError::InvalidDegree(self.degree).into());
        }

        if !(1..=16).contains(&self.variance) {
            return Err(ParametersError::OutOfRange(format!(
                "The variance should be an integer between 1 and 16, found {}",
                self.variance
            ))
            .into());
        }

        if self.max_relin_degree < 2 {
            return Err(ParametersError::OutOfRange(format!(
                "The maximum relinearization degree should be at least 2, found {}",
                self.max_relin_degree
            ))
            .into());
        }

        if !(1..=62).contains(&self.decomposition_bits) {
            return Err(ParametersError::OutOfRange(format!(
                "The decomposition base should have between 1 and 62 bits, found {}",
                self.decomposition_bits
            ))
            .into());
        }

        // The moduli must be congruent to 1 modulo 2 * degree, and for the
        // integer family modulo the plaintext modulus as well.
        let mut modulo = 2 * self.degree as u64;
        let (plaintext, scale) = match self.family {
            SchemeFamily::IntegerPacked => {
                let t = self.plaintext.ok_or_else(|| {
                    ParametersError::TooFewSpecified(
                        "The integer family requires a plaintext modulus".to_string(),
                    )
                })?;
                if t < 2 {
                    return Err(ParametersError::InvalidPlaintext(format!(
                        "Invalid plaintext modulus {t}"
                    ))
                    .into());
                }
                if self.scale.is_some() {
                    return Err(ParametersError::TooManySpecified(
                        "The integer family does not use a scale".to_string(),
                    )
                    .into());
                }
                modulo = modulo.lcm(&t);
                (Some(t), None)
            }
            SchemeFamily::ApproximateFixedPoint => {
                let scale = self.scale.ok_or_else(|| {
                    ParametersError::TooFewSpecified(
                        "The approximate family requires a scale".to_string(),
                    )
                })?;
                if !scale.is_finite() || scale < 1.0 {
                    return Err(ParametersError::InvalidScale(format!(
                        "Invalid scale {scale}"
                    ))
                    .into());
                }
                if self.plaintext.is_some() {
                    return Err(ParametersError::TooManySpecified(
                        "The approximate family does not use a plaintext modulus".to_string(),
                    )
                    .into());
                }
                (None, Some(scale))
            }
        };

        // Check that one of `ciphertext_moduli` and `ciphertext_moduli_sizes` is
        // specified.
        if !self.ciphertext_moduli.is_empty() && !self.ciphertext_moduli_sizes.is_empty() {
            return Err(ParametersError::TooManySpecified(
                "Only one of `ciphertext_moduli` and `ciphertext_moduli_sizes` can be specified"
                    .to_string(),
            )
            .into());
        } else if self.ciphertext_moduli.is_empty() && self.ciphertext_moduli_sizes.is_empty() {
            return Err(ParametersError::TooFewSpecified(
                "One of `ciphertext_moduli` and `ciphertext_moduli_sizes` must be specified"
                    .to_string(),
            )
            .into());
        }

        // Get or generate the moduli
        let mut moduli = self.ciphertext_moduli.clone();
        if !self.ciphertext_moduli_sizes.is_empty() {
            moduli = Self::generate_moduli(&self.ciphertext_moduli_sizes, self.degree, modulo)?
        }

        if let Some(t) = plaintext {
            if let Some(q) = moduli.iter().find(|q| *q % t != 1) {
                return Err(ParametersError::IncompatibleModulus(*q, t).into());
            }
        }

        // Recomputes the moduli sizes
        let moduli_sizes = moduli
            .iter()
            .map(|m| 64 - m.leading_zeros() as usize)
            .collect_vec();

        // Contexts for every level, level 0 holding all the moduli.
        let head = Context::new_arc(&moduli, self.degree)?;
        let mut ctx = vec![head.clone()];
        let mut current = head;
        while let Some(next) = current.next_context().cloned() {
            ctx.push(next.clone());
            current = next;
        }

        Ok(RlweParameters {
            family: self.family,
            polynomial_degree: self.degree,
            plaintext,
            moduli: moduli.into_boxed_slice(),
            moduli_sizes: moduli_sizes.into_boxed_slice(),
            variance: self.variance,
            scale,
            max_relin_degree: self.max_relin_degree,
            decomposition_bits: self.decomposition_bits,
            ctx,
        })
    }
}
