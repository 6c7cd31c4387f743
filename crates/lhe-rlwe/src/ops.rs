//! Operations over ciphertexts.

use crate::{Ciphertext, Error, Result};
use lhe_math::rq::Poly;

/// Relative tolerance when comparing the scales of two ciphertexts.
const SCALE_TOLERANCE: f64 = 1e-9;

pub(crate) fn scales_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCALE_TOLERANCE * a.abs().max(b.abs())
}

impl Ciphertext {
    fn check_same_level(&self, other: &Ciphertext) -> Result<()> {
        if self.par != other.par {
            Err(Error::ParametersMismatch)
        } else if self.level != other.level {
            Err(Error::LevelMismatch(self.level, other.level))
        } else {
            Ok(())
        }
    }

    /// Add two ciphertexts at the same level and scale. The degree of the sum
    /// is the largest degree of the operands.
    pub fn try_add(&self, other: &Ciphertext) -> Result<Ciphertext> {
        self.check_same_level(other)?;
        if !scales_match(self.scale, other.scale) {
            return Err(Error::ScaleMismatch(self.scale, other.scale));
        }

        let (longer, shorter) = if self.c.len() >= other.c.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut c = longer.c.clone();
        c.iter_mut()
            .zip(shorter.c.iter())
            .for_each(|(ci, di)| *ci += di);

        Ok(Ciphertext {
            par: self.par.clone(),
            c,
            level: self.level,
            scale: self.scale,
        })
    }

    /// Multiply two ciphertexts at the same level, without relinearization.
    /// The degree of the product is the sum of the degrees of the operands.
    pub fn try_mul(&self, other: &Ciphertext) -> Result<Ciphertext> {
        self.check_same_level(other)?;

        let ctx = self.c[0].ctx();
        let mut c = vec![Poly::zero(ctx); self.c.len() + other.c.len() - 1];
        for (i, ai) in self.c.iter().enumerate() {
            for (j, bj) in other.c.iter().enumerate() {
                c[i + j] += &(ai * bj);
            }
        }

        Ok(Ciphertext {
            par: self.par.clone(),
            c,
            level: self.level,
            scale: self.scale * other.scale,
        })
    }
}
