use num_bigint::BigUint;
use std::{fmt::Debug, sync::Arc};

use crate::{Error, Result};

/// Struct that holds the context associated with elements in rq: the
/// polynomial degree and the moduli whose product is the ciphertext modulus.
#[derive(Clone, PartialEq, Eq)]
pub struct Context {
    pub(crate) moduli: Box<[u64]>,
    pub(crate) modulus: BigUint,
    pub(crate) degree: usize,
    pub(crate) next_context: Option<Arc<Context>>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("moduli", &self.moduli)
            .field("degree", &self.degree)
            .field("next_context", &self.next_context)
            .finish()
    }
}

impl Context {
    /// Creates a context from a list of moduli and a polynomial degree.
    ///
    /// The context for the chain obtained by dropping the last modulus is
    /// created recursively, so that a single context describes the whole
    /// modulus chain.
    pub fn new(moduli: &[u64], degree: usize) -> Result<Self> {
        if !degree.is_power_of_two() || degree < 8 {
            return Err(Error::InvalidDegree(degree));
        }
        if moduli.is_empty() {
            return Err(Error::Default("The list of moduli is empty".to_string()));
        }
        if let Some(m) = moduli.iter().find(|m| **m < 2) {
            return Err(Error::InvalidModulus(*m));
        }

        let modulus = moduli
            .iter()
            .fold(BigUint::from(1u64), |acc, m| acc * BigUint::from(*m));

        let next_context = if moduli.len() >= 2 {
            Some(Arc::new(Context::new(&moduli[..moduli.len() - 1], degree)?))
        } else {
            None
        };

        Ok(Self {
            moduli: moduli.to_owned().into_boxed_slice(),
            modulus,
            degree,
            next_context,
        })
    }

    /// Creates a context in an [`Arc`].
    pub fn new_arc(moduli: &[u64], degree: usize) -> Result<Arc<Self>> {
        Self::new(moduli, degree).map(Arc::new)
    }

    /// Returns the modulus as a BigUint.
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Returns a reference to the moduli in this context.
    #[must_use]
    pub fn moduli(&self) -> &[u64] {
        &self.moduli
    }

    /// Returns the last modulus, the one removed by a switch to the next
    /// context.
    #[must_use]
    pub fn last_modulus(&self) -> u64 {
        self.moduli[self.moduli.len() - 1]
    }

    /// Returns the polynomial degree.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the context obtained by dropping the last modulus, if any.
    #[must_use]
    pub fn next_context(&self) -> Option<&Arc<Context>> {
        self.next_context.as_ref()
    }

    /// Returns the number of iterations to switch to a children context.
    /// Returns an error if the context provided is not a child context.
    pub fn niterations_to(&self, context: &Arc<Context>) -> Result<usize> {
        if context.as_ref() == self {
            return Ok(0);
        }

        let mut niterations = 0;
        let mut found = false;
        let mut current_ctx = Arc::new(self.clone());
        while let Some(next) = current_ctx.next_context.clone() {
            niterations += 1;
            current_ctx = next;
            if &current_ctx == context {
                found = true;
                break;
            }
        }
        if found {
            Ok(niterations)
        } else {
            Err(Error::InvalidContext)
        }
    }

    /// Returns the context after `i` iterations.
    pub fn context_at_level(&self, i: usize) -> Result<Arc<Self>> {
        if i >= self.moduli.len() {
            Err(Error::Default(
                "No context at the specified level".to_string(),
            ))
        } else {
            let mut current_ctx = Arc::new(self.clone());
            for _ in 0..i {
                current_ctx = current_ctx
                    .next_context
                    .clone()
                    .ok_or(Error::ChainExhausted)?;
            }
            Ok(current_ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{error::Error, sync::Arc};

    use num_bigint::BigUint;

    use crate::rq::Context;

    const MODULI: &[u64; 3] = &[1153, 4611686018326724609, 4611686018309947393];

    #[test]
    fn context_constructor() {
        for modulus in MODULI {
            assert!(Context::new(&[*modulus], 16).is_ok());
            assert!(Context::new(&[*modulus], 8).is_ok());
            assert!(Context::new(&[*modulus], 4).is_err());
            assert!(Context::new(&[*modulus], 24).is_err());
        }
        assert!(Context::new(MODULI, 16).is_ok());
        assert!(Context::new(&[], 16).is_err());
        assert!(Context::new(&[1], 16).is_err());
    }

    #[test]
    fn modulus() -> Result<(), Box<dyn Error>> {
        let ctx = Context::new(MODULI, 16)?;
        let expected = MODULI
            .iter()
            .fold(BigUint::from(1u64), |acc, m| acc * *m);
        assert_eq!(ctx.modulus(), &expected);
        assert_eq!(ctx.last_modulus(), MODULI[2]);
        Ok(())
    }

    #[test]
    fn next_context() -> Result<(), Box<dyn Error>> {
        let ctx = Arc::new(Context::new(MODULI, 16)?);
        let next = ctx.next_context().ok_or("missing next context")?;
        assert_eq!(next.moduli(), &MODULI[..2]);
        assert_eq!(ctx.niterations_to(next)?, 1);
        assert_eq!(ctx.niterations_to(&ctx)?, 0);

        let last = ctx.context_at_level(2)?;
        assert_eq!(last.moduli(), &MODULI[..1]);
        assert!(last.next_context().is_none());
        assert_eq!(ctx.niterations_to(&last)?, 2);
        assert!(last.niterations_to(&ctx).is_err());
        assert!(ctx.context_at_level(3).is_err());
        Ok(())
    }
}
