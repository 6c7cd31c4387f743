//! Scheme parameter profile.

use crate::{tracker::scales_match, Error, Result};
use lhe_traits::{HePrimitives, SchemeFamily};

/// The evaluator's view of the scheme parameters.
///
/// A profile is immutable once built; it carries only what the evaluator
/// needs to reason about degrees, levels and scales.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeProfile {
    family: SchemeFamily,
    chain_length: usize,
    initial_scale: Option<f64>,
    max_relin_degree: usize,
}

impl SchemeProfile {
    /// Profile for the integer-packed family.
    pub fn integer(chain_length: usize, max_relin_degree: usize) -> Result<Self> {
        SchemeProfileBuilder::new()
            .set_family(SchemeFamily::IntegerPacked)
            .set_chain_length(chain_length)
            .set_max_relin_degree(max_relin_degree)
            .build()
    }

    /// Profile for the approximate fixed-point family.
    pub fn approximate(chain_length: usize, scale: f64, max_relin_degree: usize) -> Result<Self> {
        SchemeProfileBuilder::new()
            .set_family(SchemeFamily::ApproximateFixedPoint)
            .set_chain_length(chain_length)
            .set_initial_scale(scale)
            .set_max_relin_degree(max_relin_degree)
            .build()
    }

    /// Profile describing the parameters of a provider.
    pub fn for_provider<P: HePrimitives>(provider: &P, max_relin_degree: usize) -> Result<Self> {
        let mut builder = SchemeProfileBuilder::new();
        builder
            .set_family(provider.family())
            .set_chain_length(provider.moduli().len())
            .set_max_relin_degree(max_relin_degree);
        if let Some(scale) = provider.scale() {
            builder.set_initial_scale(scale);
        }
        builder.build()
    }

    /// Returns the scheme family.
    #[must_use]
    pub fn family(&self) -> SchemeFamily {
        self.family
    }

    /// Returns the number of moduli in the modulus chain.
    #[must_use]
    pub fn chain_length(&self) -> usize {
        self.chain_length
    }

    /// Returns the scale of fresh ciphertexts, for the approximate family.
    #[must_use]
    pub fn initial_scale(&self) -> Option<f64> {
        self.initial_scale
    }

    /// Returns the largest ciphertext degree that can be relinearized.
    #[must_use]
    pub fn max_relin_degree(&self) -> usize {
        self.max_relin_degree
    }

    /// Returns the number of sequential rescaled multiplications the chain
    /// supports.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.chain_length - 1
    }

    /// Checks that the provider implements this profile.
    pub fn check_provider<P: HePrimitives>(&self, provider: &P) -> Result<()> {
        if provider.family() != self.family {
            return Err(Error::InvalidParameter(format!(
                "The profile describes the {} family but the provider implements the {} family",
                self.family,
                provider.family()
            )));
        }
        if provider.moduli().len() != self.chain_length {
            return Err(Error::InvalidParameter(format!(
                "The profile expects {} moduli but the provider has {}",
                self.chain_length,
                provider.moduli().len()
            )));
        }
        match (self.initial_scale, provider.scale()) {
            (None, None) => Ok(()),
            (Some(a), Some(b)) if scales_match(a, b) => Ok(()),
            (a, b) => Err(Error::InvalidParameter(format!(
                "The profile scale {a:?} differs from the provider scale {b:?}"
            ))),
        }
    }
}

/// Builder for a [`SchemeProfile`].
#[derive(Debug)]
pub struct SchemeProfileBuilder {
    family: SchemeFamily,
    chain_length: usize,
    initial_scale: Option<f64>,
    max_relin_degree: usize,
}

impl SchemeProfileBuilder {
    /// Creates a new instance of the builder.
    #[allow(clippy::new_without_default)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            family: SchemeFamily::IntegerPacked,
            chain_length: 0,
            initial_scale: None,
            max_relin_degree: 2,
        }
    }

    /// Sets the scheme family.
    pub fn set_family(&mut self, family: SchemeFamily) -> &mut Self {
        self.family = family;
        self
    }

    /// Sets the number of moduli in the modulus chain.
    pub fn set_chain_length(&mut self, chain_length: usize) -> &mut Self {
        self.chain_length = chain_length;
        self
    }

    /// Sets the scale of fresh ciphertexts.
    pub fn set_initial_scale(&mut self, scale: f64) -> &mut Self {
        self.initial_scale = Some(scale);
        self
    }

    /// Sets the largest ciphertext degree that can be relinearized.
    pub fn set_max_relin_degree(&mut self, max_relin_degree: usize) -> &mut Self {
        self.max_relin_degree = max_relin_degree;
        self
    }

    /// Build a new [`SchemeProfile`].
    pub fn build(&self) -> Result<SchemeProfile> {
        // A multiplication needs a second modulus for its rescale.
        if self.chain_length < 2 {
            return Err(Error::InvalidParameter(format!(
                "The modulus chain should contain at least 2 moduli, found {}",
                self.chain_length
            )));
        }

        if self.max_relin_degree < 2 {
            return Err(Error::InvalidParameter(format!(
                "The maximum relinearization degree should be at least 2, found {}",
                self.max_relin_degree
            )));
        }

        match (self.family, self.initial_scale) {
            (SchemeFamily::IntegerPacked, Some(_)) => {
                return Err(Error::InvalidParameter(
                    "The integer-packed family does not use a scale".to_string(),
                ))
            }
            (SchemeFamily::ApproximateFixedPoint, None) => {
                return Err(Error::InvalidParameter(
                    "The approximate fixed-point family requires an initial scale".to_string(),
                ))
            }
            (SchemeFamily::ApproximateFixedPoint, Some(scale))
                if !scale.is_finite() || scale <= 0.0 =>
            {
                return Err(Error::InvalidParameter(format!(
                    "The initial scale should be positive, found {scale}"
                )))
            }
            _ => {}
        }

        Ok(SchemeProfile {
            family: self.family,
            chain_length: self.chain_length,
            initial_scale: self.initial_scale,
            max_relin_degree: self.max_relin_degree,
        })
    }
}
