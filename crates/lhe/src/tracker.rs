//! Degree, level and scale bookkeeping.
//!
//! The tracker never touches a ciphertext: it maps the metadata of the
//! operands of an operation to the metadata of its result, and refuses the
//! operations that the parameters cannot support.

use crate::{Error, Result, SchemeProfile};
use std::collections::BTreeSet;

/// Relative tolerance used when comparing two scales.
pub(crate) const SCALE_TOLERANCE: f64 = 1e-9;

pub(crate) fn scales_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCALE_TOLERANCE * a.abs().max(b.abs())
}

/// Metadata the evaluator keeps next to every ciphertext handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CiphertextMeta {
    /// Power of the secret key the ciphertext is expressed in.
    pub degree: usize,
    /// Number of moduli already consumed.
    pub level: usize,
    /// Scale of the encrypted values, for the approximate family.
    pub scale: Option<f64>,
}

impl CiphertextMeta {
    /// Metadata of a freshly encrypted ciphertext.
    #[must_use]
    pub fn fresh(profile: &SchemeProfile) -> Self {
        Self {
            degree: 1,
            level: 0,
            scale: profile.initial_scale(),
        }
    }
}

/// Pure transition functions over [`CiphertextMeta`].
#[derive(Debug, Clone)]
pub struct LevelTracker<'a> {
    profile: &'a SchemeProfile,
    moduli: &'a [u64],
    relin_degrees: BTreeSet<usize>,
}

impl<'a> LevelTracker<'a> {
    /// Creates a tracker for a profile, its modulus chain and the degrees for
    /// which a relinearization key is available.
    pub fn new(
        profile: &'a SchemeProfile,
        moduli: &'a [u64],
        relin_degrees: impl IntoIterator<Item = usize>,
    ) -> Result<Self> {
        if moduli.len() != profile.chain_length() {
            return Err(Error::InvalidParameter(format!(
                "Expected {} moduli, found {}",
                profile.chain_length(),
                moduli.len()
            )));
        }
        Ok(Self {
            profile,
            moduli,
            relin_degrees: relin_degrees.into_iter().collect(),
        })
    }

    /// Number of bits of the product of the moduli left at `level`.
    fn modulus_bits(&self, level: usize) -> f64 {
        self.moduli[..self.moduli.len() - level]
            .iter()
            .map(|q| (*q as f64).log2())
            .sum()
    }

    /// The modulus removed when leaving `level`.
    fn dropped_modulus(&self, level: usize) -> u64 {
        self.moduli[self.moduli.len() - 1 - level]
    }

    fn check_degree(&self, degree: usize) -> Result<()> {
        if degree > self.profile.max_relin_degree() {
            Err(Error::DegreeExceeded {
                degree,
                max: self.profile.max_relin_degree(),
            })
        } else {
            Ok(())
        }
    }

    fn check_next_level(&self, level: usize) -> Result<()> {
        if level + 1 >= self.profile.chain_length() {
            Err(Error::LevelExhausted {
                level,
                chain_length: self.profile.chain_length(),
            })
        } else {
            Ok(())
        }
    }

    /// Metadata after multiplying `a` by `b`.
    pub fn after_multiply(&self, a: &CiphertextMeta, b: &CiphertextMeta) -> Result<CiphertextMeta> {
        self.check_degree(a.degree)?;
        self.check_degree(b.degree)?;

        let level = a.level.max(b.level);
        if level + 1 >= self.profile.chain_length() {
            return Err(Error::DepthExceeded {
                level,
                chain_length: self.profile.chain_length(),
            });
        }

        let degree = a.degree + b.degree;
        self.check_degree(degree)?;

        let scale = match (a.scale, b.scale) {
            (Some(sa), Some(sb)) => {
                let scale = sa * sb;
                let modulus_bits = self.modulus_bits(level);
                if !scale.is_finite() || scale.log2() >= modulus_bits {
                    return Err(Error::ScaleOutOfBounds {
                        log_scale: scale.log2(),
                        modulus_bits,
                    });
                }
                Some(scale)
            }
            _ => None,
        };

        Ok(CiphertextMeta {
            degree,
            level,
            scale,
        })
    }

    /// Metadata after relinearizing `a` with the key for its degree.
    pub fn after_relinearize(&self, a: &CiphertextMeta) -> Result<CiphertextMeta> {
        if !self.relin_degrees.contains(&a.degree) {
            return Err(Error::MissingRelinKey(a.degree));
        }
        Ok(CiphertextMeta { degree: 1, ..*a })
    }

    /// Metadata after rescaling `a`.
    pub fn after_rescale(&self, a: &CiphertextMeta) -> Result<CiphertextMeta> {
        self.check_next_level(a.level)?;
        let scale = match a.scale {
            Some(scale) => {
                let scale = scale / self.dropped_modulus(a.level) as f64;
                if scale < 1.0 {
                    return Err(Error::ScaleOutOfBounds {
                        log_scale: scale.log2(),
                        modulus_bits: self.modulus_bits(a.level + 1),
                    });
                }
                Some(scale)
            }
            None => None,
        };
        Ok(CiphertextMeta {
            level: a.level + 1,
            scale,
            ..*a
        })
    }

    /// Metadata after dropping the last modulus of `a` without dividing it.
    pub fn after_mod_drop(&self, a: &CiphertextMeta) -> Result<CiphertextMeta> {
        self.check_next_level(a.level)?;
        Ok(CiphertextMeta {
            level: a.level + 1,
            ..*a
        })
    }

    /// Metadata after adding `a` and `b`.
    pub fn after_add(&self, a: &CiphertextMeta, b: &CiphertextMeta) -> Result<CiphertextMeta> {
        if a.level != b.level {
            return Err(Error::LevelMismatch(a.level, b.level));
        }
        if let (Some(sa), Some(sb)) = (a.scale, b.scale) {
            if !scales_match(sa, sb) {
                return Err(Error::ScaleMismatch(sa, sb));
            }
        }
        Ok(CiphertextMeta {
            degree: a.degree.max(b.degree),
            ..*a
        })
    }
}
