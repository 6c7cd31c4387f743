//! Switching a polynomial down the modulus chain.

use super::{reduce, Poly};
use crate::{Error, Result};
use lhe_util::inverse;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use std::sync::Arc;

impl Poly {
    fn next_context(&self) -> Result<Arc<super::Context>> {
        self.ctx.next_context.clone().ok_or(Error::ChainExhausted)
    }

    /// Reduce the coefficients modulo the next modulus of the chain without
    /// scaling them.
    ///
    /// Returns an error if there is no next context.
    pub fn drop_last_modulus(&mut self) -> Result<()> {
        let next = self.next_context()?;
        let centered = self.to_centered();
        let modulus = BigInt::from(next.modulus.clone());
        self.coefficients = centered.iter().map(|c| reduce(c, &modulus)).collect();
        self.ctx = next;
        Ok(())
    }

    /// Divide the coefficients by the last modulus `p` with rounding, and
    /// switch to the next context: `y = round(x / p) mod Q'`.
    ///
    /// Returns an error if there is no next context.
    pub fn divide_and_round_by_last_modulus(&mut self) -> Result<()> {
        let next = self.next_context()?;
        let p = BigInt::from(self.ctx.last_modulus());
        let modulus = BigInt::from(next.modulus.clone());
        let twice_p: BigInt = &p << 1u32;
        self.coefficients = self
            .to_centered()
            .into_iter()
            .map(|x| {
                // floor((2x + p) / 2p) = round(x / p)
                let y: BigInt = ((x << 1u32) + &p).div_floor(&twice_p);
                reduce(&y, &modulus)
            })
            .collect();
        self.ctx = next;
        Ok(())
    }

    /// Divide the coefficients by the last modulus `p` and switch to the next
    /// context, after adding to each coefficient the multiple of `t` that
    /// makes it divisible by `p`. The value modulo `t` is multiplied by
    /// `p^-1 mod t`, which is 1 when `p = 1 mod t`.
    ///
    /// Returns an error if there is no next context or if `t` is not coprime
    /// with the last modulus.
    pub fn divide_by_last_modulus_mod_t(&mut self, t: u64) -> Result<()> {
        let next = self.next_context()?;
        let last = self.ctx.last_modulus();
        let t_inv = inverse(t % last, last).ok_or_else(|| {
            Error::Default(format!("{t} is not invertible modulo {last}"))
        })?;
        let p = BigInt::from(last);
        let half_p: BigInt = &p >> 1u32;
        let t_big = BigInt::from(t);
        let t_inv = BigInt::from(t_inv);
        let modulus = BigInt::from(next.modulus.clone());
        self.coefficients = self
            .to_centered()
            .into_iter()
            .map(|x| {
                // delta = t * u with u = -x * t^-1 mod p, centered.
                let mut u = ((-&x).mod_floor(&p) * &t_inv).mod_floor(&p);
                if u > half_p {
                    u -= &p;
                }
                let y = (x + &t_big * u) / &p;
                reduce(&y, &modulus)
            })
            .collect();
        self.ctx = next;
        Ok(())
    }

    /// Drop moduli until the polynomial lives in `context`.
    ///
    /// Returns an error if `context` is not a child of the current context.
    pub fn drop_to_context(&mut self, context: &Arc<super::Context>) -> Result<()> {
        let niterations = self.ctx.niterations_to(context)?;
        for _ in 0..niterations {
            self.drop_last_modulus()?;
        }
        Ok(())
    }

    /// Returns the coefficients reduced modulo `t`, from their centered lift.
    #[must_use]
    pub fn centered_mod(&self, t: u64) -> Vec<u64> {
        let t = BigInt::from(t);
        self.to_centered()
            .iter()
            .map(|c| {
                let r: BigUint = reduce(c, &t);
                r.iter_u64_digits().next().unwrap_or(0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::rq::{Context, Poly};
    use crate::zq::primes::generate_prime;
    use num_bigint::BigInt;
    use rand::thread_rng;
    use std::{error::Error, sync::Arc};

    // Both moduli are congruent to 1 modulo 65537 * 32.
    fn moduli() -> Vec<u64> {
        let modulo = 32 * 65537;
        vec![
            generate_prime(50, modulo, 1 << 50).unwrap(),
            generate_prime(40, modulo, 1 << 40).unwrap(),
        ]
    }

    #[test]
    fn drop_last_modulus() -> Result<(), Box<dyn Error>> {
        let ctx = Arc::new(Context::new(&moduli(), 16)?);
        let mut p = Poly::try_from_i64(&[-5, 7, 123456789], &ctx)?;
        p.drop_last_modulus()?;
        assert_eq!(p.ctx().moduli(), &moduli()[..1]);
        assert_eq!(&p.to_centered()[..3], &[-5, 7, 123456789].map(BigInt::from));
        assert!(p.drop_last_modulus().is_err());
        Ok(())
    }

    #[test]
    fn divide_and_round() -> Result<(), Box<dyn Error>> {
        let moduli = moduli();
        let ctx = Arc::new(Context::new(&moduli, 16)?);
        let p = moduli[1] as i64;
        let mut poly = Poly::try_from_i64(&[3 * p, -2 * p, p / 2 + 1, -(p / 2) - 1, 7], &ctx)?;
        poly.divide_and_round_by_last_modulus()?;
        assert_eq!(
            &poly.to_centered()[..5],
            &[3, -2, 1, -1, 0].map(BigInt::from)
        );
        Ok(())
    }

    #[test]
    fn divide_mod_t_preserves_message() -> Result<(), Box<dyn Error>> {
        let t = 65537u64;
        let moduli = moduli();
        let ctx = Arc::new(Context::new(&moduli, 16)?);
        let mut rng = thread_rng();
        for _ in 0..20 {
            let poly = Poly::random(&ctx, &mut rng);
            let before = poly.centered_mod(t);
            let mut switched = poly.clone();
            switched.divide_by_last_modulus_mod_t(t)?;
            assert_eq!(switched.ctx().moduli(), &moduli[..1]);
            assert_eq!(switched.centered_mod(t), before);
        }
        Ok(())
    }

    #[test]
    fn drop_to_context() -> Result<(), Box<dyn Error>> {
        let moduli = moduli();
        let ctx = Arc::new(Context::new(&moduli, 16)?);
        let target = ctx.context_at_level(1)?;
        let mut p = Poly::random(&ctx, &mut thread_rng());
        p.drop_to_context(&target)?;
        assert_eq!(p.ctx(), &target);
        assert!(p.drop_to_context(&ctx).is_err());
        Ok(())
    }

    proptest! {
        #[test]
        fn rounding_division(x in -(1i64 << 60)..(1i64 << 60)) {
            let moduli = moduli();
            let ctx = Arc::new(Context::new(&moduli, 16).unwrap());
            let p = moduli[1] as i128;
            let mut poly = Poly::try_from_i64(&[x], &ctx).unwrap();
            poly.divide_and_round_by_last_modulus().unwrap();
            let expected = (2 * x as i128 + p).div_euclid(2 * p);
            prop_assert_eq!(poly.to_centered()[0].clone(), BigInt::from(expected));
        }
    }
}
